//! A policy bound to a ledger, plus the rule that turns decisions into orders.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use tracing::debug;

use crate::domain::error::StocksimError;
use crate::domain::ledger::{Fill, PortfolioLedger};
use crate::domain::policy::{Decision, Policy, PolicyKind};
use crate::domain::timeline::SecurityTimeline;

/// What to do with non-positive decision entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SellMode {
    /// Sell instructions are dropped; only buys are executed.
    #[default]
    Ignore,
    /// Sell instructions liquidate up to the instructed dollar value.
    Execute,
}

impl fmt::Display for SellMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SellMode::Ignore => write!(f, "ignore"),
            SellMode::Execute => write!(f, "execute"),
        }
    }
}

impl FromStr for SellMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "ignore" => Ok(SellMode::Ignore),
            "execute" => Ok(SellMode::Execute),
            other => Err(format!("unknown sell mode '{other}' (expected ignore or execute)")),
        }
    }
}

/// One configured trader: a policy and its starting capital.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TraderSpec {
    pub kind: PolicyKind,
    pub capital: f64,
}

impl TraderSpec {
    /// Parse a `policy:capital` entry such as `buy_and_hold:10000`.
    pub fn parse(entry: &str) -> Result<Self, StocksimError> {
        let invalid = |reason: String| StocksimError::ConfigInvalid {
            section: "traders".into(),
            key: "traders".into(),
            reason,
        };

        let (policy, capital) = entry
            .split_once(':')
            .ok_or_else(|| invalid(format!("'{}' is not policy:capital", entry.trim())))?;
        let kind: PolicyKind = policy.parse()?;
        let capital: f64 = capital
            .trim()
            .parse()
            .map_err(|_| invalid(format!("invalid capital '{}'", capital.trim())))?;
        if !capital.is_finite() || capital <= 0.0 {
            return Err(invalid(format!("capital must be positive, got {capital}")));
        }
        Ok(TraderSpec { kind, capital })
    }

    /// Display name the built trader will carry, e.g. `RSI Strategy with 1000.00`.
    pub fn trader_name(&self) -> String {
        self.build(0, SellMode::default()).name().to_string()
    }

    /// Instantiate the trader; `seed` only matters for random policies.
    pub fn build(&self, seed: u64, sell_mode: SellMode) -> Trader {
        Trader::new(self.kind.build(seed), self.capital).with_sell_mode(sell_mode)
    }
}

#[derive(Debug)]
pub struct Trader {
    name: String,
    initial_capital: f64,
    policy: Box<dyn Policy>,
    ledger: PortfolioLedger,
    sell_mode: SellMode,
}

impl Trader {
    pub fn new(policy: Box<dyn Policy>, initial_capital: f64) -> Self {
        let name = format!("{} with {:.2}", policy.name(), initial_capital);
        Trader {
            name,
            initial_capital,
            policy,
            ledger: PortfolioLedger::new(initial_capital),
            sell_mode: SellMode::default(),
        }
    }

    pub fn with_sell_mode(mut self, sell_mode: SellMode) -> Self {
        self.sell_mode = sell_mode;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn initial_capital(&self) -> f64 {
        self.initial_capital
    }

    pub fn ledger(&self) -> &PortfolioLedger {
        &self.ledger
    }

    pub fn sell_mode(&self) -> SellMode {
        self.sell_mode
    }

    pub fn decide(&mut self, market: &[SecurityTimeline]) -> Result<Decision, StocksimError> {
        self.policy.decide(market, &self.ledger)
    }

    /// Execute `decision` at current prices, symbol by symbol in market order.
    ///
    /// Positive amounts buy whole shares. Negative amounts sell only under
    /// [`SellMode::Execute`]. Entries for symbols outside `market` are ignored.
    pub fn execute(
        &mut self,
        date: NaiveDate,
        decision: &Decision,
        market: &[SecurityTimeline],
    ) -> Result<Vec<Fill>, StocksimError> {
        let mut fills = Vec::new();

        for timeline in market {
            let symbol = timeline.symbol();
            let Some(amount) = decision.amount(symbol) else {
                continue;
            };
            let price = timeline.current_price()?;

            let fill = if amount > 0.0 {
                self.ledger.buy(date, symbol, price, amount)
            } else if amount < 0.0 && self.sell_mode == SellMode::Execute {
                let shares = shares_to_sell(self.ledger.holdings(symbol), price, -amount);
                self.ledger.sell(date, symbol, price, shares)
            } else {
                None
            };

            if let Some(fill) = fill {
                debug!(trader = %self.name, %fill, "order filled");
                fills.push(fill);
            }
        }

        Ok(fills)
    }

    /// Ledger valuation at every security's current price.
    pub fn total_value(&self, market: &[SecurityTimeline]) -> Result<f64, StocksimError> {
        let prices = market
            .iter()
            .map(|t| Ok((t.symbol(), t.current_price()?)))
            .collect::<Result<HashMap<&str, f64>, StocksimError>>()?;
        Ok(self
            .ledger
            .valuation(|symbol| prices.get(symbol).copied().unwrap_or(0.0)))
    }
}

/// Whole shares worth `dollar_value`, or the whole holding when the value covers it.
fn shares_to_sell(held: u64, price: f64, dollar_value: f64) -> u64 {
    if held == 0 || price <= 0.0 {
        return 0;
    }
    if dollar_value >= held as f64 * price {
        held
    } else {
        ((dollar_value / price).floor() as u64).min(held)
    }
}
