//! Shared newtypes and utilities used across all domain modules.
//!
//! These types are serialization-transparent: they serialize/deserialize identically
//! to the raw format the backend sends, so they can be used directly in wire types
//! without conversion overhead.

pub mod fmt;
pub mod serde_util;

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::str::FromStr;

// ─── Symbol ──────────────────────────────────────────────────────────────────

/// Newtype for instrument symbols (e.g. `"AAPL"`, `"BTC"`, `"EURUSD"`).
///
/// The symbol is the identity of an instrument. Comparison is exact; search
/// matching is case-insensitive and lives in the instrument store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Symbol(String);

impl Symbol {
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl std::fmt::Display for Symbol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for Symbol {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for Symbol {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl FromStr for Symbol {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Symbol(s.to_string()))
    }
}

impl AsRef<str> for Symbol {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Serialize for Symbol {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for Symbol {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ok(Symbol(s))
    }
}

// ─── Numeric ─────────────────────────────────────────────────────────────────

/// A numeric field as the quote backend sends it: either a JSON number or a
/// string such as `"187.30"`, `"+1.25%"` or `"1,234,567"`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Numeric {
    Number(serde_json::Number),
    Text(String),
}

impl Numeric {
    /// Lenient decimal conversion. Strips `%`, `+`, thousands separators and
    /// surrounding whitespace. Returns `None` for empty or unparsable input.
    pub fn to_decimal(&self) -> Option<Decimal> {
        match self {
            Numeric::Number(n) => {
                let repr = n.to_string();
                Decimal::from_str(&repr)
                    .ok()
                    .or_else(|| Decimal::from_scientific(&repr).ok())
            }
            Numeric::Text(s) => {
                let cleaned: String = s
                    .trim()
                    .trim_end_matches('%')
                    .trim_start_matches('+')
                    .chars()
                    .filter(|c| *c != ',' && !c.is_whitespace())
                    .collect();
                if cleaned.is_empty() {
                    return None;
                }
                Decimal::from_str(&cleaned)
                    .ok()
                    .or_else(|| Decimal::from_scientific(&cleaned).ok())
            }
        }
    }
}

impl From<f64> for Numeric {
    fn from(v: f64) -> Self {
        serde_json::Number::from_f64(v)
            .map(Numeric::Number)
            .unwrap_or_else(|| Numeric::Text(v.to_string()))
    }
}

impl From<&str> for Numeric {
    fn from(s: &str) -> Self {
        Numeric::Text(s.to_string())
    }
}

/// Convert an optional wire numeric to a decimal, `None` when absent or unparsable.
pub fn opt_decimal(value: Option<&Numeric>) -> Option<Decimal> {
    value.and_then(Numeric::to_decimal)
}
