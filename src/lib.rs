//! # market-dash
//!
//! Client SDK for a market-data dashboard, for native and WASM targets:
//! quotes for a watch list, server-side favorites, sessions and render-ready
//! view models.
//!
//! ## Architecture
//!
//! The SDK is organized in layers:
//!
//! 1. **Core** — Newtypes, domain models, the instrument store (always available, WASM-safe)
//! 2. **Auth** — Credential store, token persistence, login/register/session
//! 3. **HTTP API** — `DashboardHttp` with opt-in retry policies
//! 4. **High-Level Client** — `MarketClient` with nested sub-clients
//! 5. **Dashboard** — `Dashboard` state container, polling, intents and views
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use market_dash::prelude::*;
//!
//! let dashboard = Dashboard::builder()
//!     .base_url("http://127.0.0.1:8000")
//!     .build()?;
//!
//! dashboard.boot().await?;
//! dashboard.load().await?;
//! let _polling = dashboard.spawn_polling();
//!
//! dashboard.dispatch(Intent::Search("btc".into())).await?;
//! let view = dashboard.view().await;
//! ```

// ── Layer 1: Core ────────────────────────────────────────────────────────────

/// Shared newtypes and formatting helpers.
pub mod shared;

/// Domain modules (vertical slices): types, wire types, conversions, state.
pub mod domain;

/// Unified SDK error types.
pub mod error;

/// Network defaults.
pub mod network;

/// View models and user intents.
pub mod view;

// ── Layer 2: Auth ────────────────────────────────────────────────────────────

/// Authentication: credential store, token persistence, login/logout.
pub mod auth;

// ── Layer 3: HTTP API ────────────────────────────────────────────────────────

/// HTTP client with retry policies.
#[cfg(feature = "http")]
pub mod http;

// ── Layer 4: High-Level Client ───────────────────────────────────────────────

/// `MarketClient` — typed access to the backend.
#[cfg(feature = "http")]
pub mod client;

// ── Layer 5: Dashboard ───────────────────────────────────────────────────────

/// `Dashboard` — the application state container.
#[cfg(feature = "http")]
pub mod dashboard;

// ── Prelude ──────────────────────────────────────────────────────────────────

pub mod prelude {
    // Shared newtypes
    pub use crate::shared::{Numeric, Symbol};

    // Domain types
    pub use crate::domain::favorite::{Favorites, ToggleOutcome};
    pub use crate::domain::instrument::{
        default_symbols, FetchStatus, Instrument, InstrumentAction, InstrumentStore, Trend,
        DEFAULT_SYMBOLS,
    };
    pub use crate::domain::price_history::{LineData, SeriesRange};

    // Errors
    pub use crate::error::{AuthError, HttpError, SdkError, StorageError};

    // Network
    pub use crate::network::{DEFAULT_API_URL, DEFAULT_POLL_INTERVAL};

    // Auth
    pub use crate::auth::{CredentialStore, FileTokenStore, MemoryTokenStore, TokenStore, User};
    #[cfg(all(feature = "wasm", target_arch = "wasm32"))]
    pub use crate::auth::LocalStorageTokenStore;

    // Views
    pub use crate::view::{
        DashboardView, FavoriteAction, InstrumentCard, InstrumentDetail, Intent, ToggleError,
    };

    // HTTP client + sub-clients
    #[cfg(feature = "http")]
    pub use crate::client::{
        AuthClient, FavoritesSubClient, InstrumentsClient, MarketClient, MarketClientBuilder,
        QuoteBatch, Session,
    };
    #[cfg(feature = "http")]
    pub use crate::http::retry::{RetryConfig, RetryPolicy};

    // Dashboard
    #[cfg(feature = "http")]
    pub use crate::dashboard::{Dashboard, DashboardBuilder, PollHandle};
}
