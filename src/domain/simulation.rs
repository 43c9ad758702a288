//! Day-stepping simulation clock.
//!
//! Each tick: every trader decides and executes, a valuation snapshot is taken
//! on the first calendar day of a month, then the date and every timeline move
//! forward by one step. The run ends once the date passes `today`.

use std::collections::BTreeMap;

use chrono::{Datelike, Days, NaiveDate};
use tracing::{debug, info};

use crate::domain::error::StocksimError;
use crate::domain::ledger::Fill;
use crate::domain::timeline::SecurityTimeline;
use crate::domain::trader::Trader;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClockState {
    Running,
    Finished,
}

/// Every trader's total value on one sampling day, in trader order.
#[derive(Debug, Clone, PartialEq)]
pub struct ValuationSnapshot {
    pub date: NaiveDate,
    pub values: Vec<(String, f64)>,
}

impl ValuationSnapshot {
    pub fn value_of(&self, trader: &str) -> Option<f64> {
        self.values
            .iter()
            .find(|(name, _)| name == trader)
            .map(|&(_, value)| value)
    }
}

/// End-of-run state of one trader.
#[derive(Debug, Clone, PartialEq)]
pub struct TraderSummary {
    pub name: String,
    pub initial_capital: f64,
    pub cash: f64,
    pub holdings: BTreeMap<String, u64>,
    pub fills: Vec<Fill>,
    pub final_value: f64,
}

impl TraderSummary {
    pub fn total_return(&self) -> f64 {
        if self.initial_capital > 0.0 {
            (self.final_value - self.initial_capital) / self.initial_capital
        } else {
            0.0
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SimulationResult {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub symbols: Vec<String>,
    pub snapshots: Vec<ValuationSnapshot>,
    pub traders: Vec<TraderSummary>,
}

impl SimulationResult {
    pub fn trader_names(&self) -> Vec<&str> {
        self.traders.iter().map(|t| t.name.as_str()).collect()
    }

    /// Sampled values of one trader, oldest first.
    pub fn series(&self, trader: &str) -> Vec<(NaiveDate, f64)> {
        self.snapshots
            .iter()
            .filter_map(|s| s.value_of(trader).map(|v| (s.date, v)))
            .collect()
    }
}

#[derive(Debug)]
pub struct SimulationClock {
    market: Vec<SecurityTimeline>,
    traders: Vec<Trader>,
    start_date: NaiveDate,
    date: NaiveDate,
    snapshots: Vec<ValuationSnapshot>,
}

impl SimulationClock {
    /// Build a clock starting at `start_date`.
    ///
    /// Fails with [`StocksimError::EmptySeries`] if any timeline has no data.
    pub fn new(
        market: Vec<SecurityTimeline>,
        traders: Vec<Trader>,
        start_date: NaiveDate,
    ) -> Result<Self, StocksimError> {
        if let Some(empty) = market.iter().find(|t| t.is_empty()) {
            return Err(StocksimError::EmptySeries {
                symbol: empty.symbol().to_string(),
            });
        }
        Ok(SimulationClock {
            market,
            traders,
            start_date,
            date: start_date,
            snapshots: Vec::new(),
        })
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn market(&self) -> &[SecurityTimeline] {
        &self.market
    }

    pub fn traders(&self) -> &[Trader] {
        &self.traders
    }

    pub fn snapshots(&self) -> &[ValuationSnapshot] {
        &self.snapshots
    }

    pub fn state(&self, today: NaiveDate) -> ClockState {
        if self.date > today {
            ClockState::Finished
        } else {
            ClockState::Running
        }
    }

    /// Run one simulated day.
    pub fn tick(&mut self) -> Result<(), StocksimError> {
        for trader in &mut self.traders {
            let decision = trader.decide(&self.market)?;
            trader.execute(self.date, &decision, &self.market)?;
        }

        if self.date.day() == 1 {
            let values = self
                .traders
                .iter()
                .map(|t| Ok((t.name().to_string(), t.total_value(&self.market)?)))
                .collect::<Result<Vec<_>, StocksimError>>()?;
            debug!(date = %self.date, traders = values.len(), "valuation sampled");
            self.snapshots.push(ValuationSnapshot {
                date: self.date,
                values,
            });
        }

        self.date = self
            .date
            .checked_add_days(Days::new(1))
            .ok_or(StocksimError::DateOutOfRange { date: self.date })?;
        self.market.iter_mut().for_each(SecurityTimeline::advance);
        Ok(())
    }

    /// Tick until the date passes `today`, then summarise every trader.
    pub fn run(mut self, today: NaiveDate) -> Result<SimulationResult, StocksimError> {
        info!(
            start = %self.start_date,
            end = %today,
            symbols = self.market.len(),
            traders = self.traders.len(),
            "simulation started"
        );

        let mut days = 0usize;
        while self.state(today) == ClockState::Running {
            self.tick()?;
            days += 1;
        }

        let traders = self
            .traders
            .iter()
            .map(|t| {
                Ok(TraderSummary {
                    name: t.name().to_string(),
                    initial_capital: t.initial_capital(),
                    cash: t.ledger().cash(),
                    holdings: t.ledger().positions().clone(),
                    fills: t.ledger().fills().to_vec(),
                    final_value: t.total_value(&self.market)?,
                })
            })
            .collect::<Result<Vec<_>, StocksimError>>()?;

        info!(days, snapshots = self.snapshots.len(), "simulation finished");

        Ok(SimulationResult {
            start_date: self.start_date,
            end_date: today,
            symbols: self.market.iter().map(|t| t.symbol().to_string()).collect(),
            snapshots: self.snapshots,
            traders,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::policy::{BuyAndHoldEvenly, PolicyKind};
    use crate::domain::price::PricePoint;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn daily(symbol: &str, start: NaiveDate, prices: &[f64]) -> SecurityTimeline {
        let history = prices
            .iter()
            .enumerate()
            .map(|(i, &close)| PricePoint::new(start + chrono::Duration::days(i as i64), close))
            .collect();
        SecurityTimeline::new(symbol, history)
    }

    fn buy_and_hold(cash: f64) -> Trader {
        Trader::new(Box::new(BuyAndHoldEvenly::new()), cash)
    }

    #[test]
    fn two_day_run_buys_once_and_samples_first_of_month() {
        let start = date(2024, 1, 1);
        let market = vec![daily("X", start, &[100.0, 100.0, 100.0])];
        let clock = SimulationClock::new(market, vec![buy_and_hold(1000.0)], start).unwrap();

        let result = clock.run(date(2024, 1, 2)).unwrap();

        let trader = &result.traders[0];
        assert_eq!(trader.holdings.get("X"), Some(&10));
        assert!(trader.cash.abs() < 1e-9);
        assert_eq!(trader.fills.len(), 1);
        assert_eq!(result.snapshots.len(), 1);
        assert_eq!(result.snapshots[0].date, start);
        assert_eq!(result.snapshots[0].value_of(&trader.name), Some(1000.0));
    }

    #[test]
    fn state_finishes_after_today() {
        let start = date(2024, 1, 30);
        let market = vec![daily("X", start, &[10.0, 11.0, 12.0])];
        let mut clock = SimulationClock::new(market, vec![], start).unwrap();
        let today = date(2024, 1, 31);

        assert_eq!(clock.state(today), ClockState::Running);
        clock.tick().unwrap();
        assert_eq!(clock.state(today), ClockState::Running);
        clock.tick().unwrap();
        assert_eq!(clock.state(today), ClockState::Finished);
        assert_eq!(clock.date(), date(2024, 2, 1));
        assert_eq!(clock.market()[0].current_price().unwrap(), 12.0);
    }

    #[test]
    fn samples_only_on_first_day_of_month() {
        let start = date(2024, 1, 15);
        let prices: Vec<f64> = (0..80).map(|i| 50.0 + i as f64).collect();
        let market = vec![daily("X", start, &prices)];
        let clock = SimulationClock::new(market, vec![buy_and_hold(500.0)], start).unwrap();

        let result = clock.run(date(2024, 4, 2)).unwrap();

        let dates: Vec<NaiveDate> = result.snapshots.iter().map(|s| s.date).collect();
        assert_eq!(dates, vec![date(2024, 2, 1), date(2024, 3, 1), date(2024, 4, 1)]);
    }

    #[test]
    fn snapshots_keep_trader_order() {
        let start = date(2024, 3, 1);
        let market = vec![daily("X", start, &[20.0, 21.0])];
        let traders = vec![
            buy_and_hold(300.0),
            Trader::new(PolicyKind::Random.build(3), 400.0),
        ];
        let result = SimulationClock::new(market, traders, start)
            .unwrap()
            .run(start)
            .unwrap();

        let names: Vec<&str> = result.snapshots[0]
            .values
            .iter()
            .map(|(n, _)| n.as_str())
            .collect();
        assert_eq!(names, result.trader_names());
        assert_eq!(names[0], "Buy and Hold with 300.00");
    }

    #[test]
    fn start_after_today_runs_no_days() {
        let start = date(2024, 5, 1);
        let market = vec![daily("X", start, &[10.0])];
        let result = SimulationClock::new(market, vec![buy_and_hold(100.0)], start)
            .unwrap()
            .run(date(2024, 4, 30))
            .unwrap();
        assert!(result.snapshots.is_empty());
        assert!(result.traders[0].fills.is_empty());
        assert!((result.traders[0].final_value - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn refuses_empty_timeline() {
        let start = date(2024, 1, 1);
        let market = vec![
            daily("X", start, &[1.0]),
            SecurityTimeline::new("EMPTY", vec![]),
        ];
        let err = SimulationClock::new(market, vec![], start).unwrap_err();
        assert!(matches!(err, StocksimError::EmptySeries { symbol } if symbol == "EMPTY"));
    }

    #[test]
    fn run_to_end_of_calendar_reports_date_range() {
        let market = vec![daily("X", date(2024, 1, 1), &[1.0])];
        let err = SimulationClock::new(market, vec![buy_and_hold(100.0)], NaiveDate::MAX)
            .unwrap()
            .run(NaiveDate::MAX)
            .unwrap_err();
        assert!(matches!(err, StocksimError::DateOutOfRange { date } if date == NaiveDate::MAX));
    }

    #[test]
    fn timelines_hold_at_end_while_clock_continues() {
        let start = date(2024, 1, 1);
        let market = vec![daily("X", start, &[10.0, 20.0])];
        let result = SimulationClock::new(market, vec![buy_and_hold(100.0)], start)
            .unwrap()
            .run(date(2024, 2, 10))
            .unwrap();
        // 10 shares bought at 10, valued at the last known price
        assert_eq!(result.snapshots.len(), 2);
        assert_eq!(result.snapshots[1].value_of(&result.traders[0].name), Some(200.0));
        assert!((result.traders[0].final_value - 200.0).abs() < 1e-9);
        assert!((result.traders[0].total_return() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn series_follows_snapshots() {
        let start = date(2024, 1, 1);
        let prices: Vec<f64> = (0..40).map(|i| 10.0 + i as f64).collect();
        let market = vec![daily("X", start, &prices)];
        let result = SimulationClock::new(market, vec![buy_and_hold(100.0)], start)
            .unwrap()
            .run(date(2024, 2, 5))
            .unwrap();
        let name = result.traders[0].name.clone();
        let series = result.series(&name);
        assert_eq!(series.len(), 2);
        assert_eq!(series[0], (date(2024, 1, 1), 100.0));
        // day 31: price 41, 10 shares
        assert_eq!(series[1], (date(2024, 2, 1), 410.0));
        assert!(result.series("nobody").is_empty());
    }
}
