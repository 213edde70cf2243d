//! Wire types for instrument quote responses (REST).
//!
//! The quote backend mixes `snake_case` and `camelCase` keys depending on the
//! data source, so every field accepts both spellings.

use crate::domain::price_history::wire::HistoricalPoint;
use crate::shared::serde_util::lenient_datetime;
use crate::shared::Numeric;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// REST response for `GET /instruments/{symbol}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InstrumentResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub symbol: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, rename = "type", alias = "kind", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<Numeric>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub change: Option<Numeric>,
    #[serde(default, alias = "changePercent", skip_serializing_if = "Option::is_none")]
    pub change_percent: Option<Numeric>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub open: Option<Numeric>,
    #[serde(default, alias = "dayHigh", alias = "high", skip_serializing_if = "Option::is_none")]
    pub day_high: Option<Numeric>,
    #[serde(default, alias = "dayLow", alias = "low", skip_serializing_if = "Option::is_none")]
    pub day_low: Option<Numeric>,
    #[serde(default, alias = "previousClose", skip_serializing_if = "Option::is_none")]
    pub previous_close: Option<Numeric>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volume: Option<Numeric>,
    #[serde(default, alias = "yearHigh", skip_serializing_if = "Option::is_none")]
    pub year_high: Option<Numeric>,
    #[serde(default, alias = "yearLow", skip_serializing_if = "Option::is_none")]
    pub year_low: Option<Numeric>,
    #[serde(
        default,
        alias = "lastUpdated",
        deserialize_with = "lenient_datetime::deserialize",
        skip_serializing_if = "Option::is_none"
    )]
    pub last_updated: Option<DateTime<Utc>>,
    #[serde(
        default,
        alias = "history",
        alias = "historical_data",
        skip_serializing_if = "Option::is_none"
    )]
    pub historical: Option<Vec<HistoricalPoint>>,
}
