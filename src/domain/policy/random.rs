//! Random baseline policy.

use super::{Decision, Policy};
use crate::domain::error::StocksimError;
use crate::domain::ledger::PortfolioLedger;
use crate::domain::timeline::SecurityTimeline;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    Sell,
    Hold,
    Buy,
}

/// Picks one symbol and one of sell/hold/buy uniformly each day.
///
/// Buys a uniform fraction of the available cash. Sells a uniform fraction of
/// the current holding, expressed in dollars as a negative amount.
#[derive(Debug)]
pub struct RandomStrategy<R = StdRng> {
    rng: R,
}

impl RandomStrategy<StdRng> {
    pub fn from_seed(seed: u64) -> Self {
        RandomStrategy {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl<R: Rng> RandomStrategy<R> {
    pub fn with_rng(rng: R) -> Self {
        RandomStrategy { rng }
    }

    fn pick_action(&mut self) -> Action {
        match self.rng.gen_range(0..3) {
            0 => Action::Sell,
            1 => Action::Hold,
            _ => Action::Buy,
        }
    }
}

impl<R: Rng + std::fmt::Debug> Policy for RandomStrategy<R> {
    fn name(&self) -> &str {
        "Random"
    }

    fn decide(
        &mut self,
        market: &[SecurityTimeline],
        ledger: &PortfolioLedger,
    ) -> Result<Decision, StocksimError> {
        let mut decision = Decision::new();
        if market.is_empty() {
            return Ok(decision);
        }

        let timeline = &market[self.rng.gen_range(0..market.len())];
        let symbol = timeline.symbol();

        match self.pick_action() {
            Action::Buy => {
                let fraction: f64 = self.rng.gen_range(0.0..1.0);
                decision.set(symbol, fraction * ledger.cash());
            }
            Action::Sell => {
                let fraction: f64 = self.rng.gen_range(0.0..1.0);
                let shares = fraction * ledger.holdings(symbol) as f64;
                decision.set(symbol, -(shares * timeline.current_price()?));
            }
            Action::Hold => {}
        }
        Ok(decision)
    }
}
