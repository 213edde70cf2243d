//! Low-level HTTP client — `DashboardHttp`.
//!
//! One method per API endpoint. Returns wire types (conversion to domain types
//! happens at the sub-client boundary). Internal to the SDK — the high-level
//! client wraps this.

use crate::auth::{LoginForm, LoginResponse, MeResponse, RegisterRequest};
use crate::domain::favorite::wire::{FavoriteRequest, FavoriteResponse};
use crate::domain::instrument::wire::InstrumentResponse;
use crate::error::HttpError;
use crate::http::retry::{RetryConfig, RetryPolicy};
use crate::shared::Symbol;

use async_lock::RwLock;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;

/// How a request body is encoded.
pub(crate) enum Body<'a, B: Serialize + ?Sized> {
    Json(&'a B),
    Form(&'a B),
}

impl<B: Serialize + ?Sized> Clone for Body<'_, B> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<B: Serialize + ?Sized> Copy for Body<'_, B> {}

/// Low-level HTTP client for the dashboard REST API.
pub struct DashboardHttp {
    base_url: String,
    client: Client,
    /// Bearer token. NEVER exposed publicly.
    auth_token: Arc<RwLock<Option<String>>>,
    /// Policy for idempotent GETs. Mutations are never retried.
    read_retry: RetryPolicy,
}

impl DashboardHttp {
    pub fn new(base_url: &str) -> Result<Self, HttpError> {
        Self::with_options(
            base_url,
            crate::network::DEFAULT_REQUEST_TIMEOUT,
            RetryPolicy::None,
        )
    }

    pub fn with_options(
        base_url: &str,
        timeout: Duration,
        read_retry: RetryPolicy,
    ) -> Result<Self, HttpError> {
        #[allow(unused_mut)]
        let mut builder = Client::builder();
        #[cfg(not(target_arch = "wasm32"))]
        {
            builder = builder.timeout(timeout).pool_max_idle_per_host(10);
        }
        #[cfg(target_arch = "wasm32")]
        let _ = timeout;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: builder.build()?,
            auth_token: Arc::new(RwLock::new(None)),
            read_retry,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub(crate) async fn set_auth_token(&self, token: Option<String>) {
        *self.auth_token.write().await = token;
    }

    /// Install a token without awaiting. Returns `false` if the token slot
    /// is currently locked.
    pub(crate) fn prime_auth_token(&self, token: Option<String>) -> bool {
        match self.auth_token.try_write() {
            Some(mut slot) => {
                *slot = token;
                true
            }
            None => false,
        }
    }

    pub(crate) async fn clear_auth_token(&self) {
        *self.auth_token.write().await = None;
    }

    pub(crate) async fn has_auth_token(&self) -> bool {
        self.auth_token.read().await.is_some()
    }

    #[cfg(test)]
    pub(crate) fn auth_token_slot(&self) -> &RwLock<Option<String>> {
        &self.auth_token
    }

    // ── Instruments ──────────────────────────────────────────────────────

    pub async fn get_instrument(&self, symbol: &Symbol) -> Result<InstrumentResponse, HttpError> {
        let url = format!(
            "{}/instruments/{}",
            self.base_url,
            urlencoding::encode(symbol.as_str())
        );
        self.get(&url, self.read_retry.clone()).await
    }

    // ── Favorites ────────────────────────────────────────────────────────

    pub async fn get_favorites(&self) -> Result<Vec<FavoriteResponse>, HttpError> {
        let url = format!("{}/favorites", self.base_url);
        self.get(&url, self.read_retry.clone()).await
    }

    pub async fn add_favorite(&self, symbol: &Symbol) -> Result<serde_json::Value, HttpError> {
        let url = format!("{}/favorites", self.base_url);
        let body = FavoriteRequest {
            symbol: symbol.clone(),
        };
        self.request_with_retry(
            reqwest::Method::POST,
            &url,
            Some(Body::Json(&body)),
            RetryPolicy::None,
        )
        .await
    }

    pub async fn remove_favorite(&self, symbol: &Symbol) -> Result<serde_json::Value, HttpError> {
        let url = format!(
            "{}/favorites/{}",
            self.base_url,
            urlencoding::encode(symbol.as_str())
        );
        self.request_with_retry::<_, ()>(reqwest::Method::DELETE, &url, None, RetryPolicy::None)
            .await
    }

    // ── Auth ─────────────────────────────────────────────────────────────

    pub async fn login(&self, form: &LoginForm) -> Result<LoginResponse, HttpError> {
        let url = format!("{}/login", self.base_url);
        self.request_with_retry(
            reqwest::Method::POST,
            &url,
            Some(Body::Form(form)),
            RetryPolicy::None,
        )
        .await
    }

    pub async fn register(&self, body: &RegisterRequest) -> Result<serde_json::Value, HttpError> {
        let url = format!("{}/register", self.base_url);
        self.request_with_retry(
            reqwest::Method::POST,
            &url,
            Some(Body::Json(body)),
            RetryPolicy::None,
        )
        .await
    }

    pub async fn get_me(&self) -> Result<MeResponse, HttpError> {
        let url = format!("{}/users/me", self.base_url);
        self.get(&url, self.read_retry.clone()).await
    }

    // ── Internal HTTP methods ────────────────────────────────────────────

    async fn get<T: DeserializeOwned>(
        &self,
        url: &str,
        retry: RetryPolicy,
    ) -> Result<T, HttpError> {
        self.request_with_retry::<T, ()>(reqwest::Method::GET, url, None, retry)
            .await
    }

    async fn request_with_retry<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        method: reqwest::Method,
        url: &str,
        body: Option<Body<'_, B>>,
        retry: RetryPolicy,
    ) -> Result<T, HttpError> {
        let config = match &retry {
            RetryPolicy::None => {
                return self.do_request(&method, url, body).await;
            }
            RetryPolicy::Idempotent => RetryConfig::idempotent(),
            RetryPolicy::Custom(c) => c.clone(),
        };

        let mut last_error = None;

        for attempt in 0..=config.max_retries {
            let e = match self.do_request::<T, B>(&method, url, body).await {
                Ok(resp) => return Ok(resp),
                Err(e) => e,
            };

            // Retry-After overrides the backoff, capped at `max_delay`.
            let (should_retry, retry_after) = match &e {
                HttpError::ServerError { status, .. } => {
                    (config.retryable_statuses.contains(status), None)
                }
                HttpError::RateLimited { retry_after_ms } => (
                    config.retryable_statuses.contains(&429),
                    retry_after_ms.map(|ms| Duration::from_millis(ms).min(config.max_delay)),
                ),
                other => (other.is_connection(), None),
            };
            if !should_retry {
                return Err(e);
            }

            if attempt < config.max_retries {
                let delay = retry_after.unwrap_or_else(|| config.delay_for_attempt(attempt));
                tracing::debug!(
                    attempt = attempt + 1,
                    max = config.max_retries,
                    delay_ms = delay.as_millis() as u64,
                    "Retrying request to {}: {}",
                    url,
                    e
                );
                futures_timer::Delay::new(delay).await;
            }
            last_error = Some(e);
        }

        Err(HttpError::MaxRetriesExceeded {
            attempts: config.max_retries + 1,
            last_error: last_error
                .map(|e| e.to_string())
                .unwrap_or_else(|| "unknown".to_string()),
        })
    }

    async fn do_request<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        method: &reqwest::Method,
        url: &str,
        body: Option<Body<'_, B>>,
    ) -> Result<T, HttpError> {
        let mut req = self.client.request(method.clone(), url);

        if let Some(token) = self.auth_token.read().await.as_ref() {
            req = req.bearer_auth(token);
        }

        req = match body {
            Some(Body::Json(b)) => req.json(b),
            Some(Body::Form(b)) => req.form(b),
            None => req,
        };

        tracing::trace!(%method, url, "Sending request");
        let resp = req.send().await?;
        let status = resp.status();

        if status.is_success() {
            let text = resp.text().await?;
            return decode_body(&text);
        }

        let status_code = status.as_u16();
        let retry_after_ms = resp
            .headers()
            .get(reqwest::header::RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.trim().parse::<u64>().ok())
            .map(|secs| secs.saturating_mul(1000));
        let body_text = resp.text().await.unwrap_or_default();

        match status_code {
            401 => Err(HttpError::Unauthorized),
            404 => Err(HttpError::NotFound(body_text)),
            408 => Err(HttpError::Timeout),
            429 => Err(HttpError::RateLimited { retry_after_ms }),
            400..=499 => Err(HttpError::BadRequest(body_text)),
            _ => Err(HttpError::ServerError {
                status: status_code,
                body: body_text,
            }),
        }
    }
}

/// Decode a success body. Empty bodies (`204 No Content`) decode as JSON `null`
/// so unit-like and `serde_json::Value` responses still succeed.
fn decode_body<T: DeserializeOwned>(text: &str) -> Result<T, HttpError> {
    let text = if text.trim().is_empty() { "null" } else { text };
    serde_json::from_str(text).map_err(|e| HttpError::Decode(e.to_string()))
}

impl Clone for DashboardHttp {
    fn clone(&self) -> Self {
        Self {
            base_url: self.base_url.clone(),
            client: self.client.clone(),
            auth_token: self.auth_token.clone(),
            read_retry: self.read_retry.clone(),
        }
    }
}
