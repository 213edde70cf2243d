//! Conversions from wire types to domain types for instruments.

use super::wire::InstrumentResponse;
use super::Instrument;
use crate::domain::price_history::series_from_wire;
use crate::shared::{opt_decimal, Symbol};
use rust_decimal::Decimal;

impl From<InstrumentResponse> for Instrument {
    fn from(r: InstrumentResponse) -> Self {
        let history = r
            .historical
            .as_deref()
            .map(series_from_wire)
            .unwrap_or_default();

        Self {
            symbol: Symbol::from(r.symbol.unwrap_or_default().trim()),
            name: r.name.filter(|n| !n.trim().is_empty()),
            kind: r.kind,
            price: opt_decimal(r.price.as_ref()).unwrap_or_default(),
            change: opt_decimal(r.change.as_ref()).unwrap_or_default(),
            change_percent: opt_decimal(r.change_percent.as_ref()).unwrap_or_default(),
            open: opt_decimal(r.open.as_ref()),
            day_high: opt_decimal(r.day_high.as_ref()),
            day_low: opt_decimal(r.day_low.as_ref()),
            previous_close: opt_decimal(r.previous_close.as_ref()),
            volume: opt_decimal(r.volume.as_ref()),
            year_high: opt_decimal(r.year_high.as_ref()),
            year_low: opt_decimal(r.year_low.as_ref()),
            last_updated: r.last_updated,
            history,
        }
    }
}

impl Instrument {
    /// Convert a quote fetched for `requested`. The backend's own symbol wins;
    /// the requested one fills in when the response omits it.
    pub fn from_quote(requested: &Symbol, response: InstrumentResponse) -> Self {
        let mut instrument = Instrument::from(response);
        if instrument.symbol.is_empty() {
            instrument.symbol = requested.clone();
        }
        if instrument.change.is_zero() && instrument.change_percent.is_zero() {
            if let Some((change, percent)) = instrument
                .previous_close
                .and_then(|prev| change_since(instrument.price, prev))
            {
                instrument.change = change;
                instrument.change_percent = percent;
            }
        }
        instrument
    }

    /// Overlay the fields present in `update` onto `self` (same symbol).
    /// Optional fields that the update lacks keep their previous value.
    pub(crate) fn merge(&mut self, update: Instrument) {
        self.price = update.price;
        self.change = update.change;
        self.change_percent = update.change_percent;
        if update.name.is_some() {
            self.name = update.name;
        }
        if update.kind.is_some() {
            self.kind = update.kind;
        }
        macro_rules! overlay {
            ($($field:ident),*) => {
                $(if update.$field.is_some() { self.$field = update.$field; })*
            };
        }
        overlay!(
            open,
            day_high,
            day_low,
            previous_close,
            volume,
            year_high,
            year_low,
            last_updated
        );
        if !update.history.is_empty() {
            self.history = update.history;
        }
    }
}

/// Absolute and percentage change from `prev` to `price`. `None` when `prev`
/// is zero or the arithmetic overflows.
fn change_since(price: Decimal, prev: Decimal) -> Option<(Decimal, Decimal)> {
    let change = price.checked_sub(prev)?;
    let percent = change
        .checked_div(prev)?
        .checked_mul(Decimal::ONE_HUNDRED)?;
    Some((change, percent))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_snake_case_quote() {
        let raw = r#"{
            "symbol": "AAPL",
            "name": "Apple Inc.",
            "price": "187.30",
            "change": "+2.10",
            "change_percent": "+1.13%",
            "volume": 52300000
        }"#;
        let resp: InstrumentResponse = serde_json::from_str(raw).unwrap();
        let i = Instrument::from_quote(&Symbol::from("AAPL"), resp);
        assert_eq!(i.symbol.as_str(), "AAPL");
        assert_eq!(i.name.as_deref(), Some("Apple Inc."));
        assert_eq!(i.price, dec("187.30"));
        assert_eq!(i.change, dec("2.10"));
        assert_eq!(i.change_percent, dec("1.13"));
        assert_eq!(i.volume, Some(Decimal::from(52_300_000)));
        assert!(i.history.is_empty());
    }

    #[test]
    fn test_camel_case_quote_with_history() {
        let raw = r#"{
            "symbol": "BTC",
            "type": "crypto",
            "price": 64250.5,
            "changePercent": -0.8,
            "dayHigh": 65000,
            "dayLow": 63000,
            "previousClose": 64700,
            "yearHigh": 73000,
            "yearLow": 25000,
            "lastUpdated": "2024-03-01T12:00:00Z",
            "historical": [
                {"date": "2024-02-29", "close": 64700},
                {"date": "2024-03-01", "close": 64250.5}
            ]
        }"#;
        let resp: InstrumentResponse = serde_json::from_str(raw).unwrap();
        let i = Instrument::from_quote(&Symbol::from("BTC"), resp);
        assert_eq!(i.kind.as_deref(), Some("crypto"));
        assert_eq!(i.change_percent, dec("-0.8"));
        assert_eq!(i.day_high, Some(Decimal::from(65000)));
        assert_eq!(i.year_low, Some(Decimal::from(25000)));
        assert!(i.last_updated.is_some());
        assert_eq!(i.history.len(), 2);
        assert!(i.name.is_none());
    }

    #[test]
    fn test_missing_symbol_uses_requested() {
        let resp: InstrumentResponse = serde_json::from_str(r#"{"price": 1.0845}"#).unwrap();
        let i = Instrument::from_quote(&Symbol::from("EURUSD"), resp);
        assert_eq!(i.symbol.as_str(), "EURUSD");
        assert_eq!(i.price, dec("1.0845"));
    }

    #[test]
    fn test_change_derived_from_previous_close() {
        let resp: InstrumentResponse =
            serde_json::from_str(r#"{"symbol": "MSFT", "price": 110, "previous_close": 100}"#)
                .unwrap();
        let i = Instrument::from_quote(&Symbol::from("MSFT"), resp);
        assert_eq!(i.change, Decimal::from(10));
        assert_eq!(i.change_percent, Decimal::from(10));
    }

    #[test]
    fn test_change_overflow_leaves_zero() {
        let resp: InstrumentResponse = serde_json::from_str(
            r#"{"symbol": "AAPL", "price": 10000000000, "previous_close": "0.00000000000000000001"}"#,
        )
        .unwrap();
        let i = Instrument::from_quote(&Symbol::from("AAPL"), resp);
        assert_eq!(i.price, Decimal::from(10_000_000_000u64));
        assert_eq!(i.change, Decimal::ZERO);
        assert_eq!(i.change_percent, Decimal::ZERO);
    }

    #[test]
    fn test_zero_previous_close_leaves_zero() {
        let resp: InstrumentResponse =
            serde_json::from_str(r#"{"symbol": "MSFT", "price": 110, "previous_close": 0}"#)
                .unwrap();
        let i = Instrument::from_quote(&Symbol::from("MSFT"), resp);
        assert_eq!(i.change, Decimal::ZERO);
        assert_eq!(i.change_percent, Decimal::ZERO);
    }

    #[test]
    fn test_unparsable_numbers_default() {
        let resp: InstrumentResponse =
            serde_json::from_str(r#"{"symbol": "XRP", "price": "n/a", "open": ""}"#).unwrap();
        let i = Instrument::from_quote(&Symbol::from("XRP"), resp);
        assert_eq!(i.price, Decimal::ZERO);
        assert_eq!(i.open, None);
    }

    #[test]
    fn test_merge_keeps_absent_fields() {
        let mut base = Instrument::new("AAPL", Some("Apple"), dec("180"));
        base.volume = Some(Decimal::from(100));
        let mut update = Instrument::new("AAPL", None, dec("181"));
        update.change = dec("1");
        base.merge(update);
        assert_eq!(base.price, dec("181"));
        assert_eq!(base.change, dec("1"));
        assert_eq!(base.name.as_deref(), Some("Apple"));
        assert_eq!(base.volume, Some(Decimal::from(100)));
    }
}
