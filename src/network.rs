//! Network defaults for the dashboard backend.

use std::time::Duration;

/// Default REST API base URL.
pub const DEFAULT_API_URL: &str = "http://127.0.0.1:8000";

/// Interval between background quote refreshes.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(5 * 60);

/// Per-request timeout on native targets.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
