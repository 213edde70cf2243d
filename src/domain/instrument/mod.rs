//! Instrument domain — quote types, the default watch list, and the
//! instrument store.

#[cfg(feature = "http")]
pub mod client;
mod convert;
pub mod state;
pub mod wire;

use crate::domain::price_history::LineData;
use crate::shared::Symbol;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

pub use state::{FetchStatus, InstrumentAction, InstrumentStore};

/// Symbols shown on the dashboard when none are configured:
/// ten equities, five crypto assets, four FX pairs.
pub const DEFAULT_SYMBOLS: &[&str] = &[
    // Equities
    "AAPL", "MSFT", "GOOGL", "AMZN", "TSLA", "META", "NVDA", "V", "WMT", "JPM",
    // Crypto
    "BTC", "ETH", "XRP", "SOL", "ADA",
    // FX
    "EURUSD", "GBPUSD", "USDJPY", "AUDUSD",
];

pub fn default_symbols() -> Vec<Symbol> {
    DEFAULT_SYMBOLS.iter().map(|s| Symbol::from(*s)).collect()
}

// ─── Trend ───────────────────────────────────────────────────────────────────

/// Direction of the latest price change, used for colouring cards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Up,
    Down,
    Flat,
}

impl Trend {
    pub fn of(change: &Decimal) -> Self {
        if change.is_zero() {
            Trend::Flat
        } else if change.is_sign_negative() {
            Trend::Down
        } else {
            Trend::Up
        }
    }
}

// ─── Instrument ──────────────────────────────────────────────────────────────

/// A tradable instrument and its latest quote.
///
/// Identity is the symbol. `name` stays optional because some data sources
/// omit it; search treats a missing name as a non-match.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Instrument {
    pub symbol: Symbol,
    pub name: Option<String>,
    pub kind: Option<String>,
    pub price: Decimal,
    pub change: Decimal,
    pub change_percent: Decimal,
    pub open: Option<Decimal>,
    pub day_high: Option<Decimal>,
    pub day_low: Option<Decimal>,
    pub previous_close: Option<Decimal>,
    pub volume: Option<Decimal>,
    pub year_high: Option<Decimal>,
    pub year_low: Option<Decimal>,
    pub last_updated: Option<DateTime<Utc>>,
    pub history: Vec<LineData>,
}

impl Instrument {
    /// Minimal quote, mostly useful for tests and fixtures.
    pub fn new(symbol: impl Into<Symbol>, name: Option<&str>, price: Decimal) -> Self {
        Self {
            symbol: symbol.into(),
            name: name.map(str::to_string),
            kind: None,
            price,
            change: Decimal::ZERO,
            change_percent: Decimal::ZERO,
            open: None,
            day_high: None,
            day_low: None,
            previous_close: None,
            volume: None,
            year_high: None,
            year_low: None,
            last_updated: None,
            history: Vec::new(),
        }
    }

    pub fn trend(&self) -> Trend {
        Trend::of(&self.change)
    }

    /// Case-insensitive substring match on symbol or name. `needle` must
    /// already be lowercased.
    pub(crate) fn matches_lowercase(&self, needle: &str) -> bool {
        let symbol_match = !self.symbol.is_empty()
            && self.symbol.as_str().to_lowercase().contains(needle);
        let name_match = self
            .name
            .as_deref()
            .map(|n| n.to_lowercase().contains(needle))
            .unwrap_or(false);
        symbol_match || name_match
    }

    /// Display name, falling back to the symbol.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(self.symbol.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_symbols() {
        let symbols = default_symbols();
        assert_eq!(symbols.len(), 19);
        assert_eq!(symbols[0].as_str(), "AAPL");
        assert_eq!(symbols[18].as_str(), "AUDUSD");
    }

    #[test]
    fn test_trend() {
        assert_eq!(Trend::of(&Decimal::new(125, 2)), Trend::Up);
        assert_eq!(Trend::of(&Decimal::new(-5, 1)), Trend::Down);
        assert_eq!(Trend::of(&Decimal::ZERO), Trend::Flat);
    }

    #[test]
    fn test_matches_missing_name() {
        let instrument = Instrument::new("BTC", None, Decimal::ONE);
        assert!(instrument.matches_lowercase("bt"));
        assert!(!instrument.matches_lowercase("bitcoin"));
        assert_eq!(instrument.display_name(), "BTC");
    }
}
