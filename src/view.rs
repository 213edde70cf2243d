//! View models — render-ready snapshots of the dashboard state, and the
//! intents a UI sends back.
//!
//! Nothing here touches the network. A view is rebuilt from state on every
//! change; rendering (markup, colours, the chart itself) belongs to the host.

use crate::domain::instrument::{Instrument, InstrumentStore, Trend};
use crate::domain::price_history::{LineData, SeriesRange};
use crate::shared::{fmt, Symbol};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::HashSet;

/// Heading shown above the card grid when no search is active.
pub const TOP_HEADING: &str = "Top instruments";

// ── Intents ──────────────────────────────────────────────────────────────────

/// A user action, routed by `Dashboard::dispatch`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    Refresh,
    Search(String),
    ToggleFavorite(Symbol),
    Select(Symbol),
    CloseDetail,
    DismissToggleError,
}

// ── Toggle error ─────────────────────────────────────────────────────────────

/// A failed favorite toggle, shown next to the card until dismissed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ToggleError {
    pub symbol: Symbol,
    pub message: String,
}

// ── Cards ────────────────────────────────────────────────────────────────────

/// What the favorite control on a card does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FavoriteAction {
    /// Authenticated: toggles the favorite. Disabled while `updating`.
    Toggle { updating: bool },
    /// Anonymous: sends the user to the login screen.
    LoginPrompt,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InstrumentCard {
    pub symbol: Symbol,
    pub name: String,
    pub price: String,
    pub change: String,
    pub change_percent: String,
    pub trend: Trend,
    pub is_favorite: bool,
    pub action: FavoriteAction,
}

impl InstrumentCard {
    fn build(instrument: &Instrument, ctx: &ViewContext<'_>) -> Self {
        let action = if ctx.authenticated {
            FavoriteAction::Toggle {
                updating: ctx.in_flight.contains(&instrument.symbol),
            }
        } else {
            FavoriteAction::LoginPrompt
        };
        Self {
            symbol: instrument.symbol.clone(),
            name: instrument.display_name().to_string(),
            price: fmt::price(&instrument.price),
            change: fmt::signed(&instrument.change),
            change_percent: fmt::percent(&instrument.change_percent),
            trend: instrument.trend(),
            is_favorite: ctx.store.is_favorite(&instrument.symbol),
            action,
        }
    }
}

// ── Detail ───────────────────────────────────────────────────────────────────

/// The detail modal of one instrument.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InstrumentDetail {
    pub card: InstrumentCard,
    pub kind: Option<String>,
    pub open: Option<String>,
    pub previous_close: Option<String>,
    /// `"low - high"` for the session.
    pub day_range: Option<String>,
    pub year_range: Option<String>,
    pub volume: Option<String>,
    pub last_updated: Option<DateTime<Utc>>,
    /// Close prices, oldest first.
    pub series: Vec<LineData>,
    /// Change over the charted period.
    pub period_change: Option<String>,
}

impl InstrumentDetail {
    fn build(instrument: &Instrument, ctx: &ViewContext<'_>) -> Self {
        let period_change = SeriesRange::of(&instrument.history)
            .and_then(|r| r.change_percent())
            .map(|p| fmt::percent(&p));
        Self {
            card: InstrumentCard::build(instrument, ctx),
            kind: instrument.kind.clone(),
            open: instrument.open.as_ref().map(fmt::price),
            previous_close: instrument.previous_close.as_ref().map(fmt::price),
            day_range: range(instrument.day_low, instrument.day_high),
            year_range: range(instrument.year_low, instrument.year_high),
            volume: instrument.volume.as_ref().map(|v| fmt::abbr(v, 2)),
            last_updated: instrument.last_updated,
            series: instrument.history.clone(),
            period_change,
        }
    }
}

fn range(low: Option<Decimal>, high: Option<Decimal>) -> Option<String> {
    match (low, high) {
        (Some(lo), Some(hi)) => Some(format!("{} - {}", fmt::price(&lo), fmt::price(&hi))),
        _ => None,
    }
}

// ── Dashboard ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardView {
    /// Present only for an authenticated user with at least one visible favorite.
    pub favorites: Option<Vec<InstrumentCard>>,
    pub cards: Vec<InstrumentCard>,
    pub heading: String,
    /// Cards shown after filtering.
    pub showing: usize,
    /// Instruments loaded.
    pub total: usize,
    pub search_term: String,
    pub refreshing: bool,
    pub error: Option<String>,
    pub toggle_error: Option<ToggleError>,
    pub last_updated: Option<DateTime<Utc>>,
}

/// Everything a view is derived from.
pub(crate) struct ViewContext<'a> {
    pub store: &'a InstrumentStore,
    pub authenticated: bool,
    pub in_flight: &'a HashSet<Symbol>,
    pub refreshing: bool,
    pub toggle_error: Option<&'a ToggleError>,
}

impl DashboardView {
    pub(crate) fn build(ctx: &ViewContext<'_>) -> Self {
        let store = ctx.store;
        let cards: Vec<InstrumentCard> = store
            .filtered_instruments()
            .into_iter()
            .map(|i| InstrumentCard::build(i, ctx))
            .collect();

        let favorites = if ctx.authenticated {
            let favs: Vec<InstrumentCard> = store
                .favorite_instruments()
                .into_iter()
                .map(|i| InstrumentCard::build(i, ctx))
                .collect();
            (!favs.is_empty()).then_some(favs)
        } else {
            None
        };

        let term = store.search_term().trim();
        let heading = if term.is_empty() {
            TOP_HEADING.to_string()
        } else {
            format!("Results for \"{}\"", term)
        };

        Self {
            favorites,
            showing: cards.len(),
            total: store.instruments().len(),
            cards,
            heading,
            search_term: store.search_term().to_string(),
            refreshing: ctx.refreshing,
            error: store.error().map(str::to_string),
            toggle_error: ctx.toggle_error.cloned(),
            last_updated: store.last_updated(),
        }
    }
}

/// Detail of `symbol`, if it is loaded.
pub(crate) fn detail(symbol: &Symbol, ctx: &ViewContext<'_>) -> Option<InstrumentDetail> {
    ctx.store
        .instrument(symbol)
        .map(|i| InstrumentDetail::build(i, ctx))
}
