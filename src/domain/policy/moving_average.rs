//! Golden-cross / death-cross on the 50 and 200 day simple moving averages.

use super::{Decision, Policy, holding_value, split_cash_evenly};
use crate::domain::error::StocksimError;
use crate::domain::ledger::PortfolioLedger;
use crate::domain::timeline::SecurityTimeline;

pub const SHORT_WINDOW: usize = 50;
pub const LONG_WINDOW: usize = 200;

/// Sells the whole holding while SMA(50) < SMA(200); splits cash evenly across
/// every symbol with SMA(50) > SMA(200).
#[derive(Debug, Clone)]
pub struct MovingAverageCrossover {
    short_window: usize,
    long_window: usize,
}

impl MovingAverageCrossover {
    pub fn new() -> Self {
        Self::with_windows(SHORT_WINDOW, LONG_WINDOW)
    }

    pub fn with_windows(short_window: usize, long_window: usize) -> Self {
        MovingAverageCrossover {
            short_window,
            long_window,
        }
    }
}

impl Default for MovingAverageCrossover {
    fn default() -> Self {
        Self::new()
    }
}

impl Policy for MovingAverageCrossover {
    fn name(&self) -> &str {
        "Moving Average Crossover Strategy"
    }

    fn decide(
        &mut self,
        market: &[SecurityTimeline],
        ledger: &PortfolioLedger,
    ) -> Result<Decision, StocksimError> {
        let mut decision = Decision::new();
        let mut to_buy: Vec<&str> = Vec::new();

        for timeline in market {
            let short = timeline.moving_average(self.short_window)?;
            let long = timeline.moving_average(self.long_window)?;

            if short < long {
                decision.set(timeline.symbol(), -holding_value(timeline, ledger)?);
            } else if short > long {
                to_buy.push(timeline.symbol());
            }
        }

        split_cash_evenly(&mut decision, &to_buy, ledger.cash());
        Ok(decision)
    }
}
