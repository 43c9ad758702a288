//! Cash and share holdings for a single trader.

use chrono::NaiveDate;
use std::collections::BTreeMap;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Buy,
    Sell,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Buy => write!(f, "BUY"),
            Side::Sell => write!(f, "SELL"),
        }
    }
}

/// An executed order.
#[derive(Debug, Clone, PartialEq)]
pub struct Fill {
    pub date: NaiveDate,
    pub side: Side,
    pub symbol: String,
    pub shares: u64,
    pub price: f64,
}

impl Fill {
    pub fn value(&self) -> f64 {
        self.shares as f64 * self.price
    }
}

impl fmt::Display for Fill {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} x {} @ ${:.2}",
            self.date, self.side, self.symbol, self.shares, self.price
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PortfolioLedger {
    cash: f64,
    holdings: BTreeMap<String, u64>,
    fills: Vec<Fill>,
}

impl PortfolioLedger {
    pub fn new(initial_cash: f64) -> Self {
        PortfolioLedger {
            cash: initial_cash,
            holdings: BTreeMap::new(),
            fills: Vec::new(),
        }
    }

    pub fn cash(&self) -> f64 {
        self.cash
    }

    /// Shares held in `symbol`, 0 when absent.
    pub fn holdings(&self, symbol: &str) -> u64 {
        self.holdings.get(symbol).copied().unwrap_or(0)
    }

    pub fn positions(&self) -> &BTreeMap<String, u64> {
        &self.holdings
    }

    pub fn fills(&self) -> &[Fill] {
        &self.fills
    }

    /// Cash plus every holding marked at `price_of(symbol)`.
    pub fn valuation<F>(&self, price_of: F) -> f64
    where
        F: Fn(&str) -> f64,
    {
        let invested: f64 = self
            .holdings
            .iter()
            .map(|(symbol, &shares)| shares as f64 * price_of(symbol))
            .sum();
        self.cash + invested
    }

    /// Buy as many whole shares as `dollar_amount` covers at `price`.
    ///
    /// Sub-share amounts, amounts the cash balance cannot cover and share
    /// counts a `u64` holding cannot represent are no-ops.
    pub fn buy(
        &mut self,
        date: NaiveDate,
        symbol: &str,
        price: f64,
        dollar_amount: f64,
    ) -> Option<Fill> {
        if price <= 0.0 || dollar_amount <= 0.0 {
            return None;
        }
        let whole = (dollar_amount / price).floor();
        // `as u64` would saturate instead of failing
        if !(1.0..u64::MAX as f64).contains(&whole) {
            return None;
        }
        let shares = whole as u64;
        let cost = shares as f64 * price;
        if self.cash < cost {
            return None;
        }
        let total = self.holdings(symbol).checked_add(shares)?;

        self.cash -= cost;
        self.holdings.insert(symbol.to_string(), total);
        Some(self.record(date, Side::Buy, symbol, shares, price))
    }

    /// Sell up to `shares` of `symbol` at `price`, capped at the current holding.
    pub fn sell(&mut self, date: NaiveDate, symbol: &str, price: f64, shares: u64) -> Option<Fill> {
        let held = self.holdings(symbol);
        let shares = shares.min(held);
        if shares == 0 || price <= 0.0 {
            return None;
        }

        self.cash += shares as f64 * price;
        if shares == held {
            self.holdings.remove(symbol);
        } else if let Some(count) = self.holdings.get_mut(symbol) {
            *count -= shares;
        }
        Some(self.record(date, Side::Sell, symbol, shares, price))
    }

    fn record(&mut self, date: NaiveDate, side: Side, symbol: &str, shares: u64, price: f64) -> Fill {
        let fill = Fill {
            date,
            side,
            symbol: symbol.to_string(),
            shares,
            price,
        };
        self.fills.push(fill.clone());
        fill
    }
}
