//! Bollinger-style mean reversion around the 50 day average.

use super::{Decision, Policy, holding_value};
use crate::domain::error::StocksimError;
use crate::domain::ledger::PortfolioLedger;
use crate::domain::timeline::SecurityTimeline;

pub const WINDOW: usize = 50;
pub const THRESHOLD: f64 = 1.0;

/// Sells the whole holding above SMA + 1 sd; buys `cash / N` below SMA - 1 sd,
/// where N is the size of the market.
#[derive(Debug, Clone)]
pub struct MeanReversionStrategy {
    window: usize,
    threshold: f64,
}

impl MeanReversionStrategy {
    pub fn new() -> Self {
        Self::with_params(WINDOW, THRESHOLD)
    }

    pub fn with_params(window: usize, threshold: f64) -> Self {
        MeanReversionStrategy { window, threshold }
    }
}

impl Default for MeanReversionStrategy {
    fn default() -> Self {
        Self::new()
    }
}

impl Policy for MeanReversionStrategy {
    fn name(&self) -> &str {
        "Mean Reversion"
    }

    fn decide(
        &mut self,
        market: &[SecurityTimeline],
        ledger: &PortfolioLedger,
    ) -> Result<Decision, StocksimError> {
        let mut decision = Decision::new();

        for timeline in market {
            let sma = timeline.moving_average(self.window)?;
            let band = self.threshold * timeline.standard_deviation(self.window)?;
            let price = timeline.current_price()?;
            let symbol = timeline.symbol();

            if price > sma + band && ledger.holdings(symbol) > 0 {
                decision.set(symbol, -holding_value(timeline, ledger)?);
            }
            if price < sma - band {
                decision.set(symbol, ledger.cash() / market.len() as f64);
            }
        }

        Ok(decision)
    }
}
