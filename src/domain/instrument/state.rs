//! Instrument store — app-owned, SDK-provided update logic.
//!
//! Holds the instrument list, the favorites set and the search term, and
//! derives the filtered views the dashboard renders. Every transition is a
//! plain `&mut self` method; [`InstrumentAction`] offers the same transitions
//! as values for reducer-style dispatch.

use super::Instrument;
use crate::domain::favorite::Favorites;
use crate::shared::Symbol;
use chrono::{DateTime, Utc};
use std::collections::HashSet;

/// Lifecycle of the last quote fetch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FetchStatus {
    #[default]
    Idle,
    Loading,
    Succeeded,
    Failed,
}

/// A state transition on the instrument store.
#[derive(Debug, Clone, PartialEq)]
pub enum InstrumentAction {
    SetInstruments(Vec<Instrument>),
    UpdateInstrument(Instrument),
    SetFavorites(Vec<Symbol>),
    ToggleFavorite(Symbol),
    SetSearchTerm(String),
    SetStatus(FetchStatus),
    SetError(String),
    Reset,
}

#[derive(Debug, Clone, Default)]
pub struct InstrumentStore {
    list: Vec<Instrument>,
    favorites: Favorites,
    status: FetchStatus,
    last_updated: Option<DateTime<Utc>>,
    search_term: String,
    error: Option<String>,
}

impl InstrumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply a transition.
    pub fn apply(&mut self, action: InstrumentAction) {
        match action {
            InstrumentAction::SetInstruments(list) => self.set_instruments(list),
            InstrumentAction::UpdateInstrument(i) => self.update_instrument(i),
            InstrumentAction::SetFavorites(symbols) => self.set_favorites(symbols),
            InstrumentAction::ToggleFavorite(symbol) => {
                self.toggle_favorite(&symbol);
            }
            InstrumentAction::SetSearchTerm(term) => self.set_search_term(term),
            InstrumentAction::SetStatus(status) => self.set_status(status),
            InstrumentAction::SetError(message) => self.set_error(message),
            InstrumentAction::Reset => self.reset(),
        }
    }

    // ── Transitions ──────────────────────────────────────────────────────

    /// Replace the whole list. Later duplicates of a symbol are dropped.
    pub fn set_instruments(&mut self, list: Vec<Instrument>) {
        let mut seen = HashSet::with_capacity(list.len());
        self.list = list
            .into_iter()
            .filter(|i| seen.insert(i.symbol.clone()))
            .collect();
        self.last_updated = Some(Utc::now());
        self.status = FetchStatus::Succeeded;
        self.error = None;
    }

    /// Merge a single refreshed quote into the entry with the same symbol.
    /// Unknown symbols are ignored.
    pub fn update_instrument(&mut self, instrument: Instrument) {
        if let Some(existing) = self.list.iter_mut().find(|i| i.symbol == instrument.symbol) {
            existing.merge(instrument);
        }
        self.last_updated = Some(Utc::now());
    }

    pub fn set_favorites(&mut self, symbols: Vec<Symbol>) {
        self.favorites = Favorites::from_iter(symbols);
    }

    /// Flip membership of `symbol`. Returns `true` if it is now a favorite.
    pub fn toggle_favorite(&mut self, symbol: &Symbol) -> bool {
        self.favorites.toggle(symbol)
    }

    pub fn set_search_term(&mut self, term: impl Into<String>) {
        self.search_term = term.into();
    }

    pub fn set_status(&mut self, status: FetchStatus) {
        self.status = status;
    }

    pub fn set_error(&mut self, message: impl Into<String>) {
        self.error = Some(message.into());
        self.status = FetchStatus::Failed;
    }

    pub fn clear_error(&mut self) {
        self.error = None;
    }

    pub fn reset(&mut self) {
        self.list.clear();
        self.favorites.clear();
        self.status = FetchStatus::Idle;
        self.last_updated = None;
        self.error = None;
    }

    // ── Queries ──────────────────────────────────────────────────────────

    pub fn instruments(&self) -> &[Instrument] {
        &self.list
    }

    pub fn instrument(&self, symbol: &Symbol) -> Option<&Instrument> {
        self.list.iter().find(|i| &i.symbol == symbol)
    }

    pub fn favorites(&self) -> &Favorites {
        &self.favorites
    }

    pub fn is_favorite(&self, symbol: &Symbol) -> bool {
        self.favorites.contains(symbol)
    }

    pub fn search_term(&self) -> &str {
        &self.search_term
    }

    pub fn status(&self) -> FetchStatus {
        self.status
    }

    pub fn last_updated(&self) -> Option<DateTime<Utc>> {
        self.last_updated
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Instruments whose symbol or name contains the search term,
    /// case-insensitively, in list order. An empty (or all-whitespace) term
    /// returns the full list.
    pub fn filtered_instruments(&self) -> Vec<&Instrument> {
        let needle = self.search_term.trim().to_lowercase();
        if needle.is_empty() {
            return self.list.iter().collect();
        }
        self.list
            .iter()
            .filter(|i| i.matches_lowercase(&needle))
            .collect()
    }

    /// Filtered instruments that are also favorites. Favorites without a
    /// loaded instrument are not shown.
    pub fn favorite_instruments(&self) -> Vec<&Instrument> {
        self.filtered_instruments()
            .into_iter()
            .filter(|i| self.favorites.contains(&i.symbol))
            .collect()
    }
}
