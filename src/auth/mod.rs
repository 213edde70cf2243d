//! Authentication — user/session types, the credential store, token
//! persistence, and the login/register/session sub-client.
//!
//! ## Session model
//!
//! The backend issues an opaque bearer token from `POST /login`. The SDK keeps
//! it in two places: the [`CredentialStore`] (app-visible session state) and
//! the HTTP client (header injection). Only the token is persisted between
//! runs, through a [`TokenStore`]; the user identity is re-derived from
//! `GET /users/me` when the session is validated.
//!
//! ## Boot
//!
//! 1. Synchronous: [`CredentialStore::load`] reads the persisted token before
//!    anything is rendered, so an authenticated user never sees a flash of
//!    the logged-out UI.
//! 2. Asynchronous: `client.auth().check_session()` validates the token; the
//!    dashboard logs out if the backend rejects it.

#[cfg(feature = "http")]
pub mod client;
pub mod store;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

pub use store::{FileTokenStore, MemoryTokenStore, TokenStore};

#[cfg(all(feature = "wasm", target_arch = "wasm32"))]
pub use store::LocalStorageTokenStore;

// ============================================================================
// User types
// ============================================================================

/// The authenticated user.
///
/// After a login only the email is known; `id` is filled in once the
/// session has been validated against `GET /users/me`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub email: String,
}

impl User {
    pub fn from_email(email: &str) -> Self {
        Self {
            id: None,
            email: email.to_string(),
        }
    }
}

impl From<MeResponse> for User {
    fn from(me: MeResponse) -> Self {
        Self {
            id: me.id,
            email: me.email,
        }
    }
}

// ============================================================================
// Wire types
// ============================================================================

/// Form body of `POST /login` (OAuth2 password flow field names).
#[derive(Clone, Serialize, Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

impl fmt::Debug for LoginForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginForm")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Response of `POST /login`.
#[derive(Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub access_token: String,
    #[serde(default)]
    pub token_type: Option<String>,
}

impl fmt::Debug for LoginResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginResponse")
            .field("access_token", &"<redacted>")
            .field("token_type", &self.token_type)
            .finish()
    }
}

/// JSON body of `POST /register`.
#[derive(Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
}

/// Response of `GET /users/me`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MeResponse {
    #[serde(default)]
    pub id: Option<i64>,
    pub email: String,
    #[serde(default)]
    pub is_active: Option<bool>,
}

/// Error body the backend returns for rejected requests: `{"detail": "..."}`.
///
/// `detail` is a string for business errors and a list of field errors for
/// request validation failures; both are flattened to one message.
pub(crate) fn error_detail(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    match value.get("detail")? {
        serde_json::Value::String(s) => Some(s.clone()),
        serde_json::Value::Array(items) => {
            let messages: Vec<&str> = items
                .iter()
                .filter_map(|item| item.get("msg").and_then(|m| m.as_str()))
                .collect();
            if messages.is_empty() {
                None
            } else {
                Some(messages.join("; "))
            }
        }
        _ => None,
    }
}

// ============================================================================
// Credential store
// ============================================================================

/// Session state: the current user and bearer token.
///
/// Pure state apart from mirroring the token into its [`TokenStore`]; it
/// never talks to the network.
pub struct CredentialStore {
    user: Option<User>,
    token: Option<String>,
    /// True until the persisted token has been looked at.
    rehydrating: bool,
    persistence: Arc<dyn TokenStore>,
}

impl CredentialStore {
    /// An empty store that has not been rehydrated yet.
    pub fn new(persistence: Arc<dyn TokenStore>) -> Self {
        Self {
            user: None,
            token: None,
            rehydrating: true,
            persistence,
        }
    }

    /// Boot phase 1: build a store and rehydrate it from `persistence`.
    /// A failing token store is logged and treated as "no token".
    pub fn load(persistence: Arc<dyn TokenStore>) -> Self {
        let token = match persistence.load() {
            Ok(token) => token,
            Err(e) => {
                tracing::warn!("Failed to read persisted token: {}", e);
                None
            }
        };
        let mut store = Self::new(persistence);
        store.rehydrate(token);
        store
    }

    /// Replace identity and token together, and persist the token.
    pub fn set_credentials(&mut self, user: User, token: String) {
        if let Err(e) = self.persistence.save(&token) {
            tracing::warn!("Failed to persist token: {}", e);
        }
        self.user = Some(user);
        self.token = Some(token);
        self.rehydrating = false;
    }

    /// Clear identity and token, and remove the persisted token.
    pub fn logout(&mut self) {
        self.user = None;
        self.token = None;
        if let Err(e) = self.persistence.clear() {
            tracing::warn!("Failed to remove persisted token: {}", e);
        }
    }

    /// Restore a persisted token without an identity.
    pub fn rehydrate(&mut self, token: Option<String>) {
        if let Some(token) = token.filter(|t| !t.trim().is_empty()) {
            self.token = Some(token);
        }
        self.rehydrating = false;
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    pub fn is_rehydrating(&self) -> bool {
        self.rehydrating
    }
}

impl fmt::Debug for CredentialStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialStore")
            .field("user", &self.user)
            .field("has_token", &self.token.is_some())
            .field("rehydrating", &self.rehydrating)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn memory() -> Arc<MemoryTokenStore> {
        Arc::new(MemoryTokenStore::new())
    }

    #[test]
    fn test_load_without_persisted_token() {
        let store = CredentialStore::load(memory());
        assert!(!store.is_rehydrating());
        assert!(!store.is_authenticated());
        assert!(store.user().is_none());
    }

    #[test]
    fn test_load_restores_token_without_user() {
        let persisted = memory();
        persisted.save("tok-123").unwrap();
        let store = CredentialStore::load(persisted);
        assert_eq!(store.token(), Some("tok-123"));
        assert!(store.user().is_none());
        assert!(store.is_authenticated());
    }

    #[test]
    fn test_set_credentials_persists_token() {
        let persisted = memory();
        let mut store = CredentialStore::new(persisted.clone());
        assert!(store.is_rehydrating());

        store.set_credentials(User::from_email("ana@example.com"), "tok".into());
        assert_eq!(store.user().unwrap().email, "ana@example.com");
        assert_eq!(store.token(), Some("tok"));
        assert!(!store.is_rehydrating());
        assert_eq!(persisted.load().unwrap().as_deref(), Some("tok"));
    }

    #[test]
    fn test_logout_clears_everything() {
        let persisted = memory();
        let mut store = CredentialStore::new(persisted.clone());
        store.set_credentials(User::from_email("ana@example.com"), "tok".into());
        store.logout();
        assert!(store.user().is_none());
        assert!(store.token().is_none());
        assert_eq!(persisted.load().unwrap(), None);
    }

    #[test]
    fn test_rehydrate_ignores_blank_token() {
        let mut store = CredentialStore::new(memory());
        store.rehydrate(Some("  ".into()));
        assert!(!store.is_authenticated());
        assert!(!store.is_rehydrating());
    }

    #[test]
    fn test_error_detail_string_and_list() {
        assert_eq!(
            error_detail(r#"{"detail": "Email already registered"}"#).as_deref(),
            Some("Email already registered")
        );
        assert_eq!(
            error_detail(r#"{"detail": [{"msg": "field required"}, {"msg": "too short"}]}"#)
                .as_deref(),
            Some("field required; too short")
        );
        assert_eq!(error_detail("Internal Server Error"), None);
    }

    #[test]
    fn test_secrets_redacted_in_debug() {
        let form = LoginForm {
            username: "ana@example.com".into(),
            password: "hunter2".into(),
        };
        assert!(!format!("{:?}", form).contains("hunter2"));
        let resp = LoginResponse {
            access_token: "secret-token".into(),
            token_type: Some("bearer".into()),
        };
        assert!(!format!("{:?}", resp).contains("secret-token"));
    }
}
