//! High-level client — `MarketClient` with nested sub-client accessors.
//!
//! Each domain has its own sub-client in `domain/<name>/client.rs`.
//! This module keeps the builder and the accessor methods.

use crate::auth::client::Auth;
use crate::domain::favorite::client::FavoritesClient;
use crate::domain::instrument::client::Instruments;
use crate::domain::instrument::default_symbols;
use crate::error::SdkError;
use crate::http::{DashboardHttp, RetryPolicy};
use crate::shared::Symbol;

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

// Re-export sub-client types for convenience.
pub use crate::auth::client::{Auth as AuthClient, Session};
pub use crate::domain::favorite::client::FavoritesClient as FavoritesSubClient;
pub use crate::domain::instrument::client::{Instruments as InstrumentsClient, QuoteBatch};

/// The entry point for the dashboard backend.
///
/// Provides nested sub-client accessors for each domain:
/// `client.instruments()`, `client.favorites()`, `client.auth()`.
/// Clones share the HTTP connection pool and the bearer token.
pub struct MarketClient {
    pub(crate) http: DashboardHttp,
    /// Watch list, in display order.
    pub(crate) symbols: Arc<[Symbol]>,
}

impl std::fmt::Debug for MarketClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MarketClient")
            .field("symbols", &self.symbols)
            .finish_non_exhaustive()
    }
}

impl MarketClient {
    pub fn builder() -> MarketClientBuilder {
        MarketClientBuilder::default()
    }

    // ── Sub-client accessors ─────────────────────────────────────────────

    pub fn instruments(&self) -> Instruments<'_> {
        Instruments { client: self }
    }

    pub fn favorites(&self) -> FavoritesClient<'_> {
        FavoritesClient { client: self }
    }

    pub fn auth(&self) -> Auth<'_> {
        Auth { client: self }
    }

    // ── Configuration ────────────────────────────────────────────────────

    pub fn symbols(&self) -> &[Symbol] {
        &self.symbols
    }

    pub fn base_url(&self) -> &str {
        self.http.base_url()
    }
}

impl Clone for MarketClient {
    fn clone(&self) -> Self {
        Self {
            http: self.http.clone(),
            symbols: self.symbols.clone(),
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════════
// Builder
// ═════════════════════════════════════════════════════════════════════════════

pub struct MarketClientBuilder {
    base_url: String,
    symbols: Vec<Symbol>,
    retry_policy: RetryPolicy,
    timeout: Duration,
}

impl Default for MarketClientBuilder {
    fn default() -> Self {
        Self {
            base_url: crate::network::DEFAULT_API_URL.to_string(),
            symbols: default_symbols(),
            retry_policy: RetryPolicy::None,
            timeout: crate::network::DEFAULT_REQUEST_TIMEOUT,
        }
    }
}

impl MarketClientBuilder {
    pub fn base_url(mut self, url: &str) -> Self {
        self.base_url = url.to_string();
        self
    }

    /// Replace the watch list. Duplicates are dropped, first one wins.
    pub fn symbols<I, S>(mut self, symbols: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<Symbol>,
    {
        self.symbols = symbols.into_iter().map(Into::into).collect();
        self
    }

    /// Retry policy for read requests (quotes, favorites list, session check).
    /// Mutations are never retried.
    pub fn retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.retry_policy = policy;
        self
    }

    /// Per-request timeout (native only; the browser applies its own).
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn build(self) -> Result<MarketClient, SdkError> {
        let mut seen = HashSet::new();
        let symbols: Vec<Symbol> = self
            .symbols
            .into_iter()
            .filter(|s| !s.is_empty() && seen.insert(s.clone()))
            .collect();
        if symbols.is_empty() {
            return Err(SdkError::Validation(
                "watch list must contain at least one symbol".to_string(),
            ));
        }
        if self.base_url.trim().is_empty() {
            return Err(SdkError::Validation("base_url must not be empty".to_string()));
        }

        let http = DashboardHttp::with_options(&self.base_url, self.timeout, self.retry_policy)?;
        Ok(MarketClient {
            http,
            symbols: symbols.into(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_defaults() {
        let client = MarketClient::builder().build().unwrap();
        assert_eq!(client.base_url(), crate::network::DEFAULT_API_URL);
        assert_eq!(client.symbols().len(), 19);
        assert_eq!(client.symbols()[0], Symbol::from("AAPL"));
    }

    #[test]
    fn test_builder_rejects_empty_watch_list() {
        let err = MarketClient::builder()
            .symbols(Vec::<Symbol>::new())
            .build()
            .unwrap_err();
        assert!(matches!(err, SdkError::Validation(_)));

        let err = MarketClient::builder().symbols([""]).build().unwrap_err();
        assert!(matches!(err, SdkError::Validation(_)));
    }

    #[test]
    fn test_builder_dedups_symbols() {
        let client = MarketClient::builder()
            .symbols(["BTC", "ETH", "BTC"])
            .build()
            .unwrap();
        assert_eq!(client.symbols(), &[Symbol::from("BTC"), Symbol::from("ETH")]);
    }
}
