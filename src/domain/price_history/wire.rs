//! Wire types for historical prices embedded in instrument quotes.

use crate::shared::Numeric;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A raw historical point. Backends disagree on naming, so the date may come
/// as `date`/`time`/`timestamp` (a date string or epoch millis) and the value
/// as `close`, `price` or `value`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoricalPoint {
    #[serde(
        default,
        alias = "time",
        alias = "timestamp",
        alias = "t",
        skip_serializing_if = "Option::is_none"
    )]
    pub date: Option<Numeric>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub close: Option<Numeric>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<Numeric>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Numeric>,
}

impl HistoricalPoint {
    pub fn value(&self) -> Option<Decimal> {
        [&self.close, &self.price, &self.value]
            .into_iter()
            .flatten()
            .find_map(Numeric::to_decimal)
    }
}
