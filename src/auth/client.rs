//! Auth sub-client — login, registration, session validation, logout.

use crate::auth::{error_detail, LoginForm, RegisterRequest, User};
use crate::client::MarketClient;
use crate::error::{AuthError, HttpError, SdkError};

/// A freshly issued session: who logged in and the bearer token to persist.
#[derive(Clone)]
pub struct Session {
    pub user: User,
    pub token: String,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("user", &self.user)
            .field("token", &"<redacted>")
            .finish()
    }
}

/// Sub-client for authentication operations.
pub struct Auth<'a> {
    pub(crate) client: &'a MarketClient,
}

impl<'a> Auth<'a> {
    /// Exchange email and password for a bearer token.
    ///
    /// The token is installed on the HTTP client immediately; persisting it
    /// is the caller's job (see `CredentialStore::set_credentials`).
    pub async fn login(&self, email: &str, password: &str) -> Result<Session, SdkError> {
        let email = email.trim();
        if email.is_empty() || password.is_empty() {
            return Err(AuthError::MissingFields.into());
        }

        let form = LoginForm {
            username: email.to_string(),
            password: password.to_string(),
        };
        let resp = self
            .client
            .http
            .login(&form)
            .await
            .map_err(|e| classify(e, "Login failed"))?;

        self.client
            .http
            .set_auth_token(Some(resp.access_token.clone()))
            .await;
        tracing::info!(email, "Logged in");

        Ok(Session {
            user: User::from_email(email),
            token: resp.access_token,
        })
    }

    /// Create an account, then log in with the same credentials.
    pub async fn register(&self, email: &str, password: &str) -> Result<Session, SdkError> {
        let email = email.trim();
        if email.is_empty() || password.is_empty() {
            return Err(AuthError::MissingFields.into());
        }

        let body = RegisterRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        self.client
            .http
            .register(&body)
            .await
            .map_err(|e| classify(e, "Registration failed"))?;
        tracing::info!(email, "Registered");

        self.login(email, password).await
    }

    /// Validate the installed token against `GET /users/me`.
    ///
    /// HTTP errors are returned unclassified so callers can tell a rejected
    /// token (`is_unauthorized`) from an unreachable backend.
    pub async fn check_session(&self) -> Result<User, SdkError> {
        if !self.client.http.has_auth_token().await {
            return Err(AuthError::NotAuthenticated.into());
        }
        let me = self.client.http.get_me().await?;
        Ok(me.into())
    }

    /// Drop the bearer token. The backend keeps no session state, so this
    /// makes no request.
    pub async fn logout(&self) {
        self.client.http.clear_auth_token().await;
        tracing::info!("Logged out");
    }

    pub async fn is_authenticated(&self) -> bool {
        self.client.http.has_auth_token().await
    }
}

/// Map a login/register failure to what the user should be told.
fn classify(err: HttpError, fallback: &str) -> SdkError {
    if err.is_unauthorized() {
        return AuthError::InvalidCredentials.into();
    }
    if err.is_connection() {
        return AuthError::ConnectionFailed.into();
    }
    let message = match &err {
        HttpError::BadRequest(body)
        | HttpError::NotFound(body)
        | HttpError::ServerError { body, .. } => error_detail(body),
        _ => None,
    };
    AuthError::Rejected(message.unwrap_or_else(|| fallback.to_string())).into()
}
