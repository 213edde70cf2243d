//! Unified SDK error types.

use thiserror::Error;

/// Top-level SDK error.
#[derive(Error, Debug)]
pub enum SdkError {
    #[error("HTTP error: {0}")]
    Http(#[from] HttpError),

    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    /// Every quote request of a batch failed.
    #[error("Market data unavailable: all {attempted} quote request(s) failed")]
    MarketDataUnavailable { attempted: usize },

    #[error("{0}")]
    Other(String),
}

impl SdkError {
    /// Whether this error means the session token was rejected by the backend.
    pub fn is_unauthorized(&self) -> bool {
        match self {
            SdkError::Http(e) => e.is_unauthorized(),
            SdkError::Auth(AuthError::InvalidCredentials | AuthError::TokenExpired) => true,
            _ => false,
        }
    }
}

/// HTTP-layer errors.
#[derive(Error, Debug)]
pub enum HttpError {
    #[cfg(feature = "http")]
    #[error("Request failed: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Server error {status}: {body}")]
    ServerError { status: u16, body: String },

    #[error("Rate limited (retry after {retry_after_ms:?}ms)")]
    RateLimited { retry_after_ms: Option<u64> },

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Timeout")]
    Timeout,

    #[error("Malformed response body: {0}")]
    Decode(String),

    #[error("Max retries exceeded after {attempts} attempts: {last_error}")]
    MaxRetriesExceeded { attempts: u32, last_error: String },
}

impl HttpError {
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, HttpError::Unauthorized)
    }

    /// True when no HTTP response was received at all (DNS, refused, reset).
    pub fn is_connection(&self) -> bool {
        match self {
            #[cfg(feature = "http")]
            HttpError::Reqwest(e) => {
                #[cfg(not(target_arch = "wasm32"))]
                let no_response = e.is_connect() || e.is_timeout() || e.is_request();
                #[cfg(target_arch = "wasm32")]
                let no_response = e.is_timeout() || e.is_request();
                no_response
            }
            HttpError::Timeout => true,
            _ => false,
        }
    }
}

/// Authentication errors.
#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Not authenticated")]
    NotAuthenticated,

    #[error("Email and password are required")]
    MissingFields,

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Could not connect to the server")]
    ConnectionFailed,

    /// Validation error reported by the server (e.g. email already registered).
    #[error("Rejected by server: {0}")]
    Rejected(String),

    #[error("Token expired")]
    TokenExpired,
}

/// Token persistence errors. Never fatal: callers log and carry on.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Corrupt token file: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}
