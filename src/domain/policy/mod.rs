//! Trading policies.
//!
//! A policy looks at the market (every timeline, each at its cursor) and a
//! read-only view of its trader's ledger, and returns a [`Decision`]:
//! a signed dollar amount per symbol. Positive amounts are buy instructions,
//! non-positive amounts are sell instructions.

pub mod buy_and_hold;
pub mod mean_reversion;
pub mod moving_average;
pub mod random;
pub mod rsi;

use crate::domain::error::StocksimError;
use crate::domain::ledger::PortfolioLedger;
use crate::domain::timeline::SecurityTimeline;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

pub use buy_and_hold::BuyAndHoldEvenly;
pub use mean_reversion::MeanReversionStrategy;
pub use moving_average::MovingAverageCrossover;
pub use random::RandomStrategy;
pub use rsi::RsiStrategy;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Decision {
    amounts: BTreeMap<String, f64>,
}

impl Decision {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the amount for `symbol`, replacing any earlier instruction.
    pub fn set(&mut self, symbol: &str, amount: f64) {
        self.amounts.insert(symbol.to_string(), amount);
    }

    pub fn amount(&self, symbol: &str) -> Option<f64> {
        self.amounts.get(symbol).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.amounts.is_empty()
    }

    pub fn len(&self) -> usize {
        self.amounts.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.amounts.iter().map(|(s, &a)| (s.as_str(), a))
    }
}

impl<S: Into<String>> FromIterator<(S, f64)> for Decision {
    fn from_iter<I: IntoIterator<Item = (S, f64)>>(iter: I) -> Self {
        Decision {
            amounts: iter.into_iter().map(|(s, a)| (s.into(), a)).collect(),
        }
    }
}

pub trait Policy: fmt::Debug {
    /// Display name, used to label the trader.
    fn name(&self) -> &str;

    fn decide(
        &mut self,
        market: &[SecurityTimeline],
        ledger: &PortfolioLedger,
    ) -> Result<Decision, StocksimError>;
}

/// Value of the ledger's whole holding in `timeline` at the current price.
pub fn holding_value(
    timeline: &SecurityTimeline,
    ledger: &PortfolioLedger,
) -> Result<f64, StocksimError> {
    let shares = ledger.holdings(timeline.symbol());
    Ok(shares as f64 * timeline.current_price()?)
}

/// Split `cash` evenly across `symbols`, one buy instruction each.
fn split_cash_evenly(decision: &mut Decision, symbols: &[&str], cash: f64) {
    if symbols.is_empty() {
        return;
    }
    let per_symbol = cash / symbols.len() as f64;
    for symbol in symbols {
        decision.set(symbol, per_symbol);
    }
}

#[cfg(test)]
pub(crate) fn test_timeline(symbol: &str, prices: &[f64]) -> SecurityTimeline {
    use crate::domain::price::PricePoint;
    let start = chrono::NaiveDate::from_ymd_opt(2023, 1, 1).unwrap();
    let history = prices
        .iter()
        .enumerate()
        .map(|(i, &close)| PricePoint::new(start + chrono::Duration::days(i as i64), close))
        .collect();
    SecurityTimeline::new(symbol, history)
}

#[cfg(test)]
pub(crate) fn advance_all(market: &mut [SecurityTimeline], steps: usize) {
    for _ in 0..steps {
        market.iter_mut().for_each(SecurityTimeline::advance);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PolicyKind {
    BuyAndHold,
    Random,
    MovingAverage,
    Rsi,
    MeanReversion,
}

impl PolicyKind {
    pub const ALL: [PolicyKind; 5] = [
        PolicyKind::BuyAndHold,
        PolicyKind::Random,
        PolicyKind::MovingAverage,
        PolicyKind::Rsi,
        PolicyKind::MeanReversion,
    ];

    pub fn display_name(&self) -> &'static str {
        match self {
            PolicyKind::BuyAndHold => "Buy and Hold",
            PolicyKind::Random => "Random",
            PolicyKind::MovingAverage => "Moving Average",
            PolicyKind::Rsi => "RSI",
            PolicyKind::MeanReversion => "Mean Reversion",
        }
    }

    pub fn slug(&self) -> &'static str {
        match self {
            PolicyKind::BuyAndHold => "buy_and_hold",
            PolicyKind::Random => "random",
            PolicyKind::MovingAverage => "moving_average",
            PolicyKind::Rsi => "rsi",
            PolicyKind::MeanReversion => "mean_reversion",
        }
    }

    /// "[Buy and Hold, Random, ...]"
    pub fn available() -> String {
        let names: Vec<&str> = Self::ALL.iter().map(|k| k.display_name()).collect();
        format!("[{}]", names.join(", "))
    }

    /// Construct a fresh policy; `seed` feeds the RNG of [`RandomStrategy`].
    pub fn build(&self, seed: u64) -> Box<dyn Policy> {
        match self {
            PolicyKind::BuyAndHold => Box::new(BuyAndHoldEvenly::new()),
            PolicyKind::Random => Box::new(RandomStrategy::from_seed(seed)),
            PolicyKind::MovingAverage => Box::new(MovingAverageCrossover::new()),
            PolicyKind::Rsi => Box::new(RsiStrategy::new()),
            PolicyKind::MeanReversion => Box::new(MeanReversionStrategy::new()),
        }
    }
}

impl fmt::Display for PolicyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

impl FromStr for PolicyKind {
    type Err = StocksimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|k| {
                k.slug() == wanted
                    || k.display_name().to_lowercase() == wanted
                    || k.slug().replace('_', "-") == wanted
            })
            .ok_or_else(|| StocksimError::UnknownPolicy {
                name: s.trim().to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::price::PricePoint;
    use chrono::NaiveDate;

    #[test]
    fn decision_set_and_get() {
        let mut d = Decision::new();
        assert!(d.is_empty());
        d.set("AAPL", 250.0);
        d.set("MSFT", -10.0);
        assert_eq!(d.len(), 2);
        assert_eq!(d.amount("AAPL"), Some(250.0));
        assert_eq!(d.amount("MSFT"), Some(-10.0));
        assert_eq!(d.amount("GOOG"), None);
    }

    #[test]
    fn decision_set_replaces() {
        let mut d = Decision::new();
        d.set("AAPL", -50.0);
        d.set("AAPL", 100.0);
        assert_eq!(d.amount("AAPL"), Some(100.0));
    }

    #[test]
    fn decision_from_pairs() {
        let d: Decision = [("A", 1.0), ("B", 2.0)].into_iter().collect();
        let pairs: Vec<(&str, f64)> = d.iter().collect();
        assert_eq!(pairs, vec![("A", 1.0), ("B", 2.0)]);
    }

    #[test]
    fn holding_value_uses_current_price() {
        let day = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
        let tl = SecurityTimeline::new("X", vec![PricePoint::new(day, 25.0)]);
        let mut ledger = PortfolioLedger::new(1000.0);
        ledger.buy(day, "X", 25.0, 100.0);
        assert!((holding_value(&tl, &ledger).unwrap() - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn split_cash_with_no_symbols_emits_nothing() {
        let mut d = Decision::new();
        split_cash_evenly(&mut d, &[], 1000.0);
        assert!(d.is_empty());
    }

    #[test]
    fn kind_parses_slugs_and_display_names() {
        assert_eq!("buy_and_hold".parse::<PolicyKind>().unwrap(), PolicyKind::BuyAndHold);
        assert_eq!("Buy and Hold".parse::<PolicyKind>().unwrap(), PolicyKind::BuyAndHold);
        assert_eq!("RSI".parse::<PolicyKind>().unwrap(), PolicyKind::Rsi);
        assert_eq!(" moving-average ".parse::<PolicyKind>().unwrap(), PolicyKind::MovingAverage);
        assert_eq!("MEAN REVERSION".parse::<PolicyKind>().unwrap(), PolicyKind::MeanReversion);
        assert_eq!("random".parse::<PolicyKind>().unwrap(), PolicyKind::Random);
    }

    #[test]
    fn kind_rejects_unknown() {
        let err = "martingale".parse::<PolicyKind>().unwrap_err();
        assert!(matches!(err, StocksimError::UnknownPolicy { name } if name == "martingale"));
    }

    #[test]
    fn available_lists_every_policy() {
        assert_eq!(
            PolicyKind::available(),
            "[Buy and Hold, Random, Moving Average, RSI, Mean Reversion]"
        );
    }

    #[test]
    fn build_names_match_kind() {
        for kind in PolicyKind::ALL {
            let policy = kind.build(7);
            assert!(!policy.name().is_empty());
        }
        assert_eq!(PolicyKind::Rsi.build(0).name(), "RSI Strategy");
    }
}
