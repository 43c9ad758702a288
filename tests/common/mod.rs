#![allow(dead_code)]

use chrono::NaiveDate;
use std::collections::HashMap;
use stocksim::domain::config_validation::SimulationConfig;
use stocksim::domain::error::StocksimError;
use stocksim::domain::policy::PolicyKind;
pub use stocksim::domain::price::PricePoint;
use stocksim::domain::timeline::SecurityTimeline;
use stocksim::domain::trader::{SellMode, TraderSpec};
use stocksim::ports::data_port::DataPort;

pub struct MockDataPort {
    pub data: HashMap<String, Vec<PricePoint>>,
    pub errors: HashMap<String, String>,
}

impl MockDataPort {
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
            errors: HashMap::new(),
        }
    }

    pub fn with_points(mut self, symbol: &str, points: Vec<PricePoint>) -> Self {
        self.data.insert(symbol.to_string(), points);
        self
    }

    pub fn with_error(mut self, symbol: &str, reason: &str) -> Self {
        self.errors.insert(symbol.to_string(), reason.to_string());
        self.data.entry(symbol.to_string()).or_default();
        self
    }
}

impl DataPort for MockDataPort {
    fn fetch_history(
        &self,
        symbol: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<PricePoint>, StocksimError> {
        if let Some(reason) = self.errors.get(symbol) {
            return Err(StocksimError::DataSource {
                reason: reason.clone(),
            });
        }
        Ok(self
            .data
            .get(symbol)
            .map(|points| {
                points
                    .iter()
                    .filter(|p| p.date >= start_date && p.date <= end_date)
                    .copied()
                    .collect()
            })
            .unwrap_or_default())
    }

    fn list_symbols(&self) -> Result<Vec<String>, StocksimError> {
        let mut symbols: Vec<String> = self.data.keys().cloned().collect();
        symbols.sort();
        Ok(symbols)
    }

    fn get_data_range(
        &self,
        symbol: &str,
    ) -> Result<Option<(NaiveDate, NaiveDate, usize)>, StocksimError> {
        if let Some(reason) = self.errors.get(symbol) {
            return Err(StocksimError::DataSource {
                reason: reason.clone(),
            });
        }
        match self.data.get(symbol) {
            Some(points) if !points.is_empty() => {
                let min = points.iter().map(|p| p.date).min().unwrap();
                let max = points.iter().map(|p| p.date).max().unwrap();
                Ok(Some((min, max, points.len())))
            }
            _ => Ok(None),
        }
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// One point per calendar day from `start`.
pub fn daily_points(start: NaiveDate, closes: &[f64]) -> Vec<PricePoint> {
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| PricePoint::new(start + chrono::Duration::days(i as i64), close))
        .collect()
}

/// `count` daily points rising by `step` from `start_price`.
pub fn generate_points(start: NaiveDate, count: usize, start_price: f64, step: f64) -> Vec<PricePoint> {
    let closes: Vec<f64> = (0..count).map(|i| start_price + i as f64 * step).collect();
    daily_points(start, &closes)
}

pub fn make_timeline(symbol: &str, start: NaiveDate, closes: &[f64]) -> SecurityTimeline {
    SecurityTimeline::new(symbol, daily_points(start, closes))
}

pub fn sample_config(symbols: &[&str], traders: &[(PolicyKind, f64)]) -> SimulationConfig {
    SimulationConfig {
        data_dir: "unused".into(),
        symbols: symbols.iter().map(|s| s.to_string()).collect(),
        start_date: date(2024, 1, 1),
        end_date: date(2024, 6, 30),
        seed: 0,
        sell_mode: SellMode::Ignore,
        traders: traders
            .iter()
            .map(|&(kind, capital)| TraderSpec { kind, capital })
            .collect(),
        csv_path: "portfolio_values.csv".into(),
        chart_path: None,
    }
}
