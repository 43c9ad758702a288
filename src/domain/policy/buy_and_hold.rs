//! Buy once, spread evenly, then hold forever.

use super::{Decision, Policy};
use crate::domain::error::StocksimError;
use crate::domain::ledger::PortfolioLedger;
use crate::domain::timeline::SecurityTimeline;

#[derive(Debug, Default)]
pub struct BuyAndHoldEvenly {
    has_bought: bool,
}

impl BuyAndHoldEvenly {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Policy for BuyAndHoldEvenly {
    fn name(&self) -> &str {
        "Buy and Hold"
    }

    fn decide(
        &mut self,
        market: &[SecurityTimeline],
        ledger: &PortfolioLedger,
    ) -> Result<Decision, StocksimError> {
        let mut decision = Decision::new();
        if !self.has_bought && !market.is_empty() {
            let allocation = ledger.cash() / market.len() as f64;
            for timeline in market {
                decision.set(timeline.symbol(), allocation);
            }
        }
        // fires once, even against an empty market
        self.has_bought = true;
        Ok(decision)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::policy::test_timeline;

    #[test]
    fn first_call_splits_cash_evenly() {
        let market = vec![
            test_timeline("A", &[10.0]),
            test_timeline("B", &[20.0]),
            test_timeline("C", &[30.0]),
        ];
        let ledger = PortfolioLedger::new(900.0);
        let mut policy = BuyAndHoldEvenly::new();

        let decision = policy.decide(&market, &ledger).unwrap();
        assert_eq!(decision.len(), 3);
        for symbol in ["A", "B", "C"] {
            assert_eq!(decision.amount(symbol), Some(300.0));
        }
    }

    #[test]
    fn second_call_is_empty() {
        let market = vec![test_timeline("A", &[10.0]), test_timeline("B", &[20.0])];
        let ledger = PortfolioLedger::new(900.0);
        let mut policy = BuyAndHoldEvenly::new();

        policy.decide(&market, &ledger).unwrap();
        assert!(policy.decide(&market, &ledger).unwrap().is_empty());
        assert!(policy.decide(&market, &PortfolioLedger::new(5000.0)).unwrap().is_empty());
    }

    #[test]
    fn empty_market_consumes_the_single_shot() {
        let ledger = PortfolioLedger::new(900.0);
        let mut policy = BuyAndHoldEvenly::new();
        assert!(policy.decide(&[], &ledger).unwrap().is_empty());

        let market = vec![test_timeline("A", &[10.0])];
        assert!(policy.decide(&market, &ledger).unwrap().is_empty());
    }
}
