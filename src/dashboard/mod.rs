//! The dashboard — one application-owned state container plus the fetch
//! operations that feed it.
//!
//! [`Dashboard`] wraps a [`MarketClient`] and an `Arc<RwLock<DashboardState>>`
//! holding the credential store, the instrument store, the favorite toggles
//! in flight and transient UI state. Clones share both.
//!
//! Locks are only held for synchronous state updates, never across a
//! request. Each operation reads what it needs, releases the lock, awaits
//! the backend, then re-acquires it to apply the result.
//!
//! ## Boot
//!
//! ```rust,ignore
//! let dashboard = Dashboard::builder()
//!     .token_store(Arc::new(FileTokenStore::new("token.json")))
//!     .build()?;               // phase 1: persisted token restored
//! dashboard.boot().await?;     // phase 2: token validated
//! dashboard.load().await?;
//! let polling = dashboard.spawn_polling();
//! ```

pub mod poll;

use crate::auth::{CredentialStore, MemoryTokenStore, TokenStore, User};
use crate::client::{MarketClient, MarketClientBuilder};
use crate::domain::favorite::ToggleOutcome;
use crate::domain::instrument::{FetchStatus, InstrumentStore};
use crate::error::{AuthError, SdkError};
use crate::http::RetryPolicy;
use crate::shared::Symbol;
use crate::view::{self, DashboardView, Intent, InstrumentDetail, ToggleError, ViewContext};

use async_lock::RwLock;
use std::collections::HashSet;
use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

pub use poll::{PollHandle, Poller};

/// Shown when every quote request of a refresh failed.
pub const MARKET_DATA_ERROR: &str = "Market data could not be loaded";

/// Shown next to a card whose favorite toggle was rolled back.
pub const TOGGLE_ERROR: &str = "Failed to update favorites. Please try again.";

#[derive(Debug)]
pub(crate) struct DashboardState {
    pub(crate) credentials: CredentialStore,
    pub(crate) instruments: InstrumentStore,
    /// Symbols with a favorite toggle awaiting the backend.
    pub(crate) in_flight: HashSet<Symbol>,
    pub(crate) toggle_error: Option<ToggleError>,
    /// Instrument open in the detail view.
    pub(crate) selected: Option<Symbol>,
}

impl DashboardState {
    fn view_context(&self, refreshing: bool) -> ViewContext<'_> {
        ViewContext {
            store: &self.instruments,
            authenticated: self.credentials.is_authenticated(),
            in_flight: &self.in_flight,
            refreshing,
            toggle_error: self.toggle_error.as_ref(),
        }
    }

    /// Drop the session and everything that belongs to it.
    fn sign_out(&mut self) {
        self.credentials.logout();
        self.instruments.set_favorites(Vec::new());
        self.toggle_error = None;
    }
}

/// Marks a manual refresh as running until dropped, including when the
/// refresh future is cancelled mid-request.
struct RefreshGuard(Arc<AtomicUsize>);

impl RefreshGuard {
    fn raise(counter: &Arc<AtomicUsize>) -> Self {
        counter.fetch_add(1, Ordering::SeqCst);
        Self(counter.clone())
    }
}

impl Drop for RefreshGuard {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

pub struct Dashboard {
    client: MarketClient,
    state: Arc<RwLock<DashboardState>>,
    /// Manual refreshes in progress.
    refreshing: Arc<AtomicUsize>,
    poll_interval: Duration,
}

impl Clone for Dashboard {
    fn clone(&self) -> Self {
        Self {
            client: self.client.clone(),
            state: self.state.clone(),
            refreshing: self.refreshing.clone(),
            poll_interval: self.poll_interval,
        }
    }
}

impl Dashboard {
    pub fn builder() -> DashboardBuilder {
        DashboardBuilder::default()
    }

    pub fn client(&self) -> &MarketClient {
        &self.client
    }

    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    // ── Session ──────────────────────────────────────────────────────────

    /// Boot phase 2: validate the restored token.
    ///
    /// A rejected token (401) signs the user out and yields `Ok(None)`. Any
    /// other failure keeps the token and is returned.
    pub async fn boot(&self) -> Result<Option<User>, SdkError> {
        let token = match self.state.read().await.credentials.token() {
            Some(token) => token.to_string(),
            None => return Ok(None),
        };

        match self.client.auth().check_session().await {
            Ok(user) => {
                let mut state = self.state.write().await;
                if state.credentials.token() == Some(token.as_str()) {
                    state.credentials.set_credentials(user.clone(), token);
                }
                tracing::info!(email = %user.email, "Session restored");
                Ok(Some(user))
            }
            Err(e) if e.is_unauthorized() => {
                tracing::info!("Persisted session rejected, signing out");
                self.discard_session(&token).await;
                Ok(None)
            }
            Err(e) => {
                tracing::warn!("Session check failed, keeping token: {}", e);
                Err(e)
            }
        }
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<User, SdkError> {
        let session = self.client.auth().login(email, password).await?;
        self.start_session(session.user.clone(), session.token).await;
        Ok(session.user)
    }

    /// Create an account and sign in with it.
    pub async fn register(&self, email: &str, password: &str) -> Result<User, SdkError> {
        let session = self.client.auth().register(email, password).await?;
        self.start_session(session.user.clone(), session.token).await;
        Ok(session.user)
    }

    pub async fn logout(&self) {
        self.client.auth().logout().await;
        self.state.write().await.sign_out();
    }

    pub async fn is_authenticated(&self) -> bool {
        self.state.read().await.credentials.is_authenticated()
    }

    pub async fn user(&self) -> Option<User> {
        self.state.read().await.credentials.user().cloned()
    }

    async fn start_session(&self, user: User, token: String) {
        self.state.write().await.credentials.set_credentials(user, token);
        if let Err(e) = self.refresh_favorites().await {
            tracing::warn!("Favorites fetch after sign-in failed: {}", e);
        }
    }

    /// Sign out because the backend rejected `token`. A newer session that
    /// replaced it in the meantime is left alone.
    async fn discard_session(&self, token: &str) {
        if self.state.read().await.credentials.token() != Some(token) {
            return;
        }
        self.client.auth().logout().await;

        let current = {
            let mut state = self.state.write().await;
            if state.credentials.token() == Some(token) {
                state.sign_out();
                return;
            }
            state.credentials.token().map(str::to_string)
        };
        // A new session started while the old token was being cleared.
        if let Some(current) = current {
            self.client.http.set_auth_token(Some(current)).await;
        }
    }

    // ── Quotes ───────────────────────────────────────────────────────────

    /// Fetch every watched symbol concurrently and replace the list with the
    /// quotes that arrived. Returns how many did.
    ///
    /// When every request fails the previous list is kept, the store's
    /// error is set and `SdkError::MarketDataUnavailable` is returned.
    pub async fn refresh_instruments(&self) -> Result<usize, SdkError> {
        self.state
            .write()
            .await
            .instruments
            .set_status(FetchStatus::Loading);

        let batch = self.client.instruments().watch_list().await;

        let mut state = self.state.write().await;
        if batch.all_failed() {
            tracing::error!(attempted = batch.attempted(), "Every quote request failed");
            state.instruments.set_error(MARKET_DATA_ERROR);
            return Err(SdkError::MarketDataUnavailable {
                attempted: batch.attempted(),
            });
        }

        let count = batch.instruments.len();
        state.instruments.set_instruments(batch.instruments);
        Ok(count)
    }

    /// Manual refresh: same as [`refresh_instruments`](Self::refresh_instruments)
    /// with the `refreshing` flag raised for its duration.
    pub async fn refresh(&self) -> Result<usize, SdkError> {
        let _guard = RefreshGuard::raise(&self.refreshing);
        self.refresh_instruments().await
    }

    pub fn is_refreshing(&self) -> bool {
        self.refreshing.load(Ordering::SeqCst) > 0
    }

    // ── Favorites ────────────────────────────────────────────────────────

    /// Replace the favorites with the backend's list.
    ///
    /// A 401 signs the user out. Other failures leave the favorites as they
    /// were.
    pub async fn refresh_favorites(&self) -> Result<(), SdkError> {
        let token = match self.state.read().await.credentials.token() {
            Some(token) => token.to_string(),
            None => return Err(AuthError::NotAuthenticated.into()),
        };

        match self.client.favorites().list().await {
            Ok(symbols) => {
                let mut state = self.state.write().await;
                if state.credentials.token() == Some(token.as_str()) {
                    state.instruments.set_favorites(symbols);
                }
                Ok(())
            }
            Err(e) if e.is_unauthorized() => {
                tracing::info!("Favorites fetch unauthorized, signing out");
                self.discard_session(&token).await;
                Err(e)
            }
            Err(e) => {
                tracing::warn!("Favorites fetch failed: {}", e);
                Err(e)
            }
        }
    }

    /// Flip `symbol`'s favorite status optimistically and tell the backend.
    ///
    /// While a toggle for `symbol` is in flight further toggles of the same
    /// symbol are ignored (`ToggleOutcome::Suppressed`). If the backend call
    /// fails the local change is undone and a [`ToggleError`] is recorded.
    pub async fn toggle_favorite(&self, symbol: &Symbol) -> Result<ToggleOutcome, SdkError> {
        let (adding, token) = {
            let mut state = self.state.write().await;
            let token = match state.credentials.token() {
                Some(token) => token.to_string(),
                None => return Err(AuthError::NotAuthenticated.into()),
            };
            if !state.in_flight.insert(symbol.clone()) {
                tracing::debug!(%symbol, "Favorite toggle already in flight");
                return Ok(ToggleOutcome::Suppressed);
            }
            if state.toggle_error.as_ref().map(|e| &e.symbol) == Some(symbol) {
                state.toggle_error = None;
            }
            (state.instruments.toggle_favorite(symbol), token)
        };

        let result = if adding {
            self.client.favorites().add(symbol).await
        } else {
            self.client.favorites().remove(symbol).await
        };

        let mut state = self.state.write().await;
        state.in_flight.remove(symbol);

        match result {
            Ok(()) => Ok(if adding {
                ToggleOutcome::Added
            } else {
                ToggleOutcome::Removed
            }),
            Err(e) => {
                tracing::warn!(%symbol, adding, "Favorite update failed, rolling back: {}", e);
                if state.instruments.is_favorite(symbol) == adding {
                    state.instruments.toggle_favorite(symbol);
                }
                if e.is_unauthorized() && state.credentials.token() == Some(token.as_str()) {
                    drop(state);
                    self.discard_session(&token).await;
                    state = self.state.write().await;
                }
                state.toggle_error = Some(ToggleError {
                    symbol: symbol.clone(),
                    message: TOGGLE_ERROR.to_string(),
                });
                Err(e)
            }
        }
    }

    // ── Lifecycle ────────────────────────────────────────────────────────

    /// Initial load: quotes, then favorites when signed in. A favorites
    /// failure is logged and does not fail the load.
    pub async fn load(&self) -> Result<(), SdkError> {
        self.state.write().await.instruments.clear_error();

        let quotes = self.refresh_instruments().await;

        if self.is_authenticated().await {
            if let Err(e) = self.refresh_favorites().await {
                tracing::warn!("Favorites unavailable during load: {}", e);
            }
        }

        quotes.map(|_| ())
    }

    /// The poll loop and its cancel handle. The loop refreshes quotes every
    /// `poll_interval` until cancelled; the caller drives it.
    pub fn poller(&self) -> (Poller<impl Future<Output = ()>>, PollHandle) {
        poll::poller(self.clone())
    }

    /// Spawn the poll loop on the tokio runtime.
    #[cfg(all(feature = "native", not(target_arch = "wasm32")))]
    pub fn spawn_polling(&self) -> PollHandle {
        let (poll, handle) = self.poller();
        tokio::spawn(async move {
            let _ = poll.await;
        });
        handle
    }

    /// Spawn the poll loop on the browser event loop.
    #[cfg(all(feature = "wasm", target_arch = "wasm32"))]
    pub fn spawn_polling(&self) -> PollHandle {
        let (poll, handle) = self.poller();
        wasm_bindgen_futures::spawn_local(async move {
            let _ = poll.await;
        });
        handle
    }

    // ── View ─────────────────────────────────────────────────────────────

    /// Route a user intent.
    pub async fn dispatch(&self, intent: Intent) -> Result<(), SdkError> {
        match intent {
            Intent::Refresh => self.refresh().await.map(|_| ()),
            Intent::Search(term) => {
                self.state.write().await.instruments.set_search_term(term);
                Ok(())
            }
            Intent::ToggleFavorite(symbol) => self.toggle_favorite(&symbol).await.map(|_| ()),
            Intent::Select(symbol) => {
                self.state.write().await.selected = Some(symbol);
                Ok(())
            }
            Intent::CloseDetail => {
                self.state.write().await.selected = None;
                Ok(())
            }
            Intent::DismissToggleError => {
                self.state.write().await.toggle_error = None;
                Ok(())
            }
        }
    }

    pub async fn view(&self) -> DashboardView {
        let state = self.state.read().await;
        DashboardView::build(&state.view_context(self.is_refreshing()))
    }

    /// Detail of the selected instrument, if one is selected and loaded.
    pub async fn detail(&self) -> Option<InstrumentDetail> {
        let state = self.state.read().await;
        let symbol = state.selected.as_ref()?;
        view::detail(symbol, &state.view_context(self.is_refreshing()))
    }

    /// A copy of the instrument store.
    pub async fn instruments(&self) -> InstrumentStore {
        self.state.read().await.instruments.clone()
    }
}

// ═════════════════════════════════════════════════════════════════════════════
// Builder
// ═════════════════════════════════════════════════════════════════════════════

pub struct DashboardBuilder {
    client: MarketClientBuilder,
    token_store: Option<Arc<dyn TokenStore>>,
    poll_interval: Duration,
}

impl Default for DashboardBuilder {
    fn default() -> Self {
        Self {
            client: MarketClient::builder(),
            token_store: None,
            poll_interval: crate::network::DEFAULT_POLL_INTERVAL,
        }
    }
}

impl DashboardBuilder {
    pub fn base_url(mut self, url: &str) -> Self {
        self.client = self.client.base_url(url);
        self
    }

    pub fn symbols<I, S>(mut self, symbols: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<Symbol>,
    {
        self.client = self.client.symbols(symbols);
        self
    }

    pub fn retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.client = self.client.retry_policy(policy);
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.client = self.client.timeout(timeout);
        self
    }

    /// Where the bearer token is persisted. Defaults to memory.
    pub fn token_store(mut self, store: Arc<dyn TokenStore>) -> Self {
        self.token_store = Some(store);
        self
    }

    pub fn poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Build the dashboard. This is boot phase 1: the persisted token is
    /// read synchronously and installed on the client.
    pub fn build(self) -> Result<Dashboard, SdkError> {
        if self.poll_interval.is_zero() {
            return Err(SdkError::Validation(
                "poll_interval must be greater than zero".to_string(),
            ));
        }
        let client = self.client.build()?;
        let token_store = self
            .token_store
            .unwrap_or_else(|| Arc::new(MemoryTokenStore::new()));
        let credentials = CredentialStore::load(token_store);

        // The client was created above; nothing else can hold its token lock.
        client
            .http
            .prime_auth_token(credentials.token().map(str::to_string));

        Ok(Dashboard {
            client,
            state: Arc::new(RwLock::new(DashboardState {
                credentials,
                instruments: InstrumentStore::new(),
                in_flight: HashSet::new(),
                toggle_error: None,
                selected: None,
            })),
            refreshing: Arc::new(AtomicUsize::new(0)),
            poll_interval: self.poll_interval,
        })
    }
}
