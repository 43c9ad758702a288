//! Overbought / oversold on the 14 day RSI.

use super::{Decision, Policy, holding_value, split_cash_evenly};
use crate::domain::error::StocksimError;
use crate::domain::ledger::PortfolioLedger;
use crate::domain::timeline::SecurityTimeline;

pub const PERIOD: usize = 14;
pub const OVERBOUGHT: f64 = 70.0;
pub const OVERSOLD: f64 = 30.0;

#[derive(Debug, Clone)]
pub struct RsiStrategy {
    period: usize,
}

impl RsiStrategy {
    pub fn new() -> Self {
        Self::with_period(PERIOD)
    }

    pub fn with_period(period: usize) -> Self {
        RsiStrategy { period }
    }
}

impl Default for RsiStrategy {
    fn default() -> Self {
        Self::new()
    }
}

impl Policy for RsiStrategy {
    fn name(&self) -> &str {
        "RSI Strategy"
    }

    fn decide(
        &mut self,
        market: &[SecurityTimeline],
        ledger: &PortfolioLedger,
    ) -> Result<Decision, StocksimError> {
        let mut decision = Decision::new();
        let mut oversold: Vec<&str> = Vec::new();

        for timeline in market {
            let rsi = timeline.rsi(self.period)?;
            if rsi > OVERBOUGHT {
                decision.set(timeline.symbol(), -holding_value(timeline, ledger)?);
            } else if rsi < OVERSOLD {
                oversold.push(timeline.symbol());
            }
        }

        split_cash_evenly(&mut decision, &oversold, ledger.cash());
        Ok(decision)
    }
}
