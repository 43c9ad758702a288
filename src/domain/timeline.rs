//! Per-security price history with a simulation cursor.
//!
//! The cursor marks "today" in simulated time. Every statistic is computed over
//! points at or before the cursor; nothing outside this module can read ahead.

use crate::domain::error::StocksimError;
use crate::domain::indicator::rsi::calculate_rsi;
use crate::domain::indicator::sma::calculate_sma;
use crate::domain::indicator::stddev::calculate_stddev;
use crate::domain::indicator::{NEUTRAL_RSI, trailing_window};
use crate::domain::price::PricePoint;

#[derive(Debug, Clone)]
pub struct SecurityTimeline {
    symbol: String,
    history: Vec<PricePoint>,
    cursor: usize,
}

impl SecurityTimeline {
    /// Build a timeline from an oldest-first history with unique dates.
    ///
    /// An empty history is accepted as a placeholder; every query on it fails
    /// with [`StocksimError::EmptySeries`].
    pub fn new(symbol: impl Into<String>, history: Vec<PricePoint>) -> Self {
        debug_assert!(
            history.windows(2).all(|w| w[0].date < w[1].date),
            "history must be strictly ascending by date"
        );
        SecurityTimeline {
            symbol: symbol.into(),
            history,
            cursor: 0,
        }
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn history(&self) -> &[PricePoint] {
        &self.history
    }

    pub fn len(&self) -> usize {
        self.history.len()
    }

    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn is_exhausted(&self) -> bool {
        self.cursor + 1 >= self.history.len()
    }

    fn current_point(&self) -> Result<&PricePoint, StocksimError> {
        self.history
            .get(self.cursor)
            .ok_or_else(|| StocksimError::EmptySeries {
                symbol: self.symbol.clone(),
            })
    }

    pub fn current_price(&self) -> Result<f64, StocksimError> {
        self.current_point().map(|p| p.close)
    }

    /// Step the cursor forward; holds at the last point.
    pub fn advance(&mut self) {
        if !self.is_exhausted() {
            self.cursor += 1;
        }
    }

    fn window(&self, window: usize) -> Result<&[PricePoint], StocksimError> {
        self.current_point()?;
        Ok(trailing_window(&self.history, self.cursor, window))
    }

    /// Mean close over `[max(0, cursor - window), cursor]`.
    pub fn moving_average(&self, window: usize) -> Result<f64, StocksimError> {
        let points = self.window(window)?;
        // window() guarantees at least the cursor point
        Ok(calculate_sma(points).unwrap_or_default())
    }

    /// Population standard deviation over the same window as [`Self::moving_average`].
    pub fn standard_deviation(&self, window: usize) -> Result<f64, StocksimError> {
        let points = self.window(window)?;
        Ok(calculate_stddev(points).unwrap_or_default())
    }

    pub fn volatility(&self, window: usize) -> Result<f64, StocksimError> {
        self.standard_deviation(window)
    }

    /// RSI over the `period` changes ending at the cursor.
    ///
    /// Returns [`NEUTRAL_RSI`] until `period` points precede the cursor.
    pub fn rsi(&self, period: usize) -> Result<f64, StocksimError> {
        self.current_point()?;
        if period == 0 || self.cursor < period {
            return Ok(NEUTRAL_RSI);
        }
        Ok(calculate_rsi(trailing_window(
            &self.history,
            self.cursor,
            period,
        )))
    }
}
