//! Price history domain — chart series for the instrument detail view.

pub mod wire;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::shared::serde_util::parse_datetime;
use crate::shared::Numeric;

/// A single data point on a price chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineData {
    /// Unix timestamp in milliseconds.
    pub time: i64,
    pub value: Decimal,
}

impl LineData {
    /// Convert a raw historical point. Points without a usable timestamp or
    /// value are dropped.
    pub fn from_wire(point: &wire::HistoricalPoint) -> Option<Self> {
        let time = match point.date.as_ref()? {
            Numeric::Number(ms) => ms.as_i64()?,
            Numeric::Text(date) => parse_datetime(date)?.timestamp_millis(),
        };
        let value = point.value()?;
        Some(Self { time, value })
    }
}

/// Build a chart series from raw points: drops invalid points, sorts by time
/// and keeps the last value for duplicated timestamps.
pub fn series_from_wire(points: &[wire::HistoricalPoint]) -> Vec<LineData> {
    let mut series: Vec<LineData> = points.iter().filter_map(LineData::from_wire).collect();
    series.sort_by_key(|p| p.time);

    let mut deduped: Vec<LineData> = Vec::with_capacity(series.len());
    for point in series {
        match deduped.last_mut() {
            Some(last) if last.time == point.time => last.value = point.value,
            _ => deduped.push(point),
        }
    }
    deduped
}

/// Summary of a chart series used for axis bounds and the period change label.
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesRange {
    pub min: Decimal,
    pub max: Decimal,
    pub first: Decimal,
    pub last: Decimal,
}

impl SeriesRange {
    pub fn of(series: &[LineData]) -> Option<Self> {
        let first = series.first()?.value;
        let last = series.last()?.value;
        let (min, max) = series.iter().fold((first, first), |(lo, hi), p| {
            (lo.min(p.value), hi.max(p.value))
        });
        Some(Self { min, max, first, last })
    }

    /// Percentage change from the first to the last point, `None` if the
    /// series starts at zero or the result does not fit a `Decimal`.
    pub fn change_percent(&self) -> Option<Decimal> {
        self.last
            .checked_sub(self.first)?
            .checked_div(self.first)?
            .checked_mul(Decimal::ONE_HUNDRED)
    }
}

#[cfg(test)]
mod tests {
    use super::wire::HistoricalPoint;
    use super::*;
    use std::str::FromStr;

    fn point(date: &str, close: &str) -> HistoricalPoint {
        HistoricalPoint {
            date: Some(Numeric::from(date)),
            close: Some(Numeric::from(close)),
            price: None,
            value: None,
        }
    }

    #[test]
    fn test_series_sorted_and_filtered() {
        let series = series_from_wire(&[
            point("2024-03-02", "101.5"),
            point("garbage", "100"),
            point("2024-03-01", "100.0"),
            point("2024-03-03", "n/a"),
        ]);
        assert_eq!(series.len(), 2);
        assert!(series[0].time < series[1].time);
        assert_eq!(series[1].value, Decimal::from_str("101.5").unwrap());
    }

    #[test]
    fn test_duplicate_timestamps_keep_last() {
        let series = series_from_wire(&[
            point("2024-03-01", "100"),
            point("2024-03-01", "102"),
        ]);
        assert_eq!(series.len(), 1);
        assert_eq!(series[0].value, Decimal::from(102));
    }

    #[test]
    fn test_series_range() {
        let series = series_from_wire(&[
            point("2024-03-01", "100"),
            point("2024-03-02", "90"),
            point("2024-03-03", "110"),
        ]);
        let range = SeriesRange::of(&series).unwrap();
        assert_eq!(range.min, Decimal::from(90));
        assert_eq!(range.max, Decimal::from(110));
        assert_eq!(range.change_percent(), Some(Decimal::from(10)));
    }

    #[test]
    fn test_epoch_millis_dates() {
        let raw: Vec<HistoricalPoint> = serde_json::from_str(
            r#"[{"t": 1709251200000, "price": 64000.5}, {"time": "2024-03-02", "value": "65000"}]"#,
        )
        .unwrap();
        let series = series_from_wire(&raw);
        assert_eq!(series.len(), 2);
        assert_eq!(series[0].time, 1709251200000);
        assert_eq!(series[1].value, Decimal::from(65000));
    }

    #[test]
    fn test_change_percent_overflow_is_none() {
        let series = vec![
            LineData {
                time: 1,
                value: Decimal::from_str("0.00000000000000000001").unwrap(),
            },
            LineData {
                time: 2,
                value: Decimal::from(10_000_000_000u64),
            },
        ];
        let range = SeriesRange::of(&series).unwrap();
        assert_eq!(range.change_percent(), None);
    }

    #[test]
    fn test_change_percent_from_zero_is_none() {
        let series = series_from_wire(&[point("2024-03-01", "0"), point("2024-03-02", "5")]);
        assert_eq!(SeriesRange::of(&series).unwrap().change_percent(), None);
    }

    #[test]
    fn test_empty_series_has_no_range() {
        assert!(SeriesRange::of(&[]).is_none());
    }
}
