//! Daily closing price points.

use chrono::NaiveDate;

/// A single (date, closing price) observation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub close: f64,
}

impl PricePoint {
    pub fn new(date: NaiveDate, close: f64) -> Self {
        PricePoint { date, close }
    }
}

/// Day-over-day change between consecutive closes.
pub fn daily_changes(points: &[PricePoint]) -> Vec<f64> {
    points.windows(2).map(|w| w[1].close - w[0].close).collect()
}
