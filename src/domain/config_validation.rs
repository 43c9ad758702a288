//! Configuration validation.
//!
//! Checks every key a simulation needs and resolves them into a
//! [`SimulationConfig`]. The first offending key is reported.

use crate::domain::error::StocksimError;
use crate::domain::trader::{SellMode, TraderSpec};
use crate::domain::universe::parse_symbols;
use crate::ports::config_port::ConfigPort;
use chrono::{Months, NaiveDate};

pub const DEFAULT_CSV_PATH: &str = "portfolio_values.csv";

/// Fully resolved simulation settings.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationConfig {
    pub data_dir: String,
    pub symbols: Vec<String>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub seed: u64,
    pub sell_mode: SellMode,
    pub traders: Vec<TraderSpec>,
    pub csv_path: String,
    pub chart_path: Option<String>,
}

/// Validate and resolve the whole configuration; `today` backs `years_back`
/// and the default `end_date`.
pub fn load_simulation_config(
    config: &dyn ConfigPort,
    today: NaiveDate,
) -> Result<SimulationConfig, StocksimError> {
    let data_dir = resolve_data_dir(config)?;
    let symbols = resolve_symbols(config)?;
    let (start_date, end_date) = resolve_horizon(config, today)?;
    let seed = resolve_seed(config)?;
    let sell_mode = resolve_sell_mode(config)?;
    let traders = resolve_traders(config)?;
    let (csv_path, chart_path) = resolve_report_paths(config);

    Ok(SimulationConfig {
        data_dir,
        symbols,
        start_date,
        end_date,
        seed,
        sell_mode,
        traders,
        csv_path,
        chart_path,
    })
}

fn non_empty(config: &dyn ConfigPort, section: &str, key: &str) -> Option<String> {
    config
        .get_string(section, key)
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

fn missing(section: &str, key: &str) -> StocksimError {
    StocksimError::ConfigMissing {
        section: section.to_string(),
        key: key.to_string(),
    }
}

fn invalid(section: &str, key: &str, reason: String) -> StocksimError {
    StocksimError::ConfigInvalid {
        section: section.to_string(),
        key: key.to_string(),
        reason,
    }
}

pub fn resolve_data_dir(config: &dyn ConfigPort) -> Result<String, StocksimError> {
    non_empty(config, "data", "dir").ok_or_else(|| missing("data", "dir"))
}

pub fn resolve_symbols(config: &dyn ConfigPort) -> Result<Vec<String>, StocksimError> {
    let raw = non_empty(config, "simulation", "symbols")
        .ok_or_else(|| missing("simulation", "symbols"))?;
    Ok(parse_symbols(&raw)?)
}

/// `[start, end]` from `start_date` or `years_back`, with `end_date`
/// defaulting to `today`.
pub fn resolve_horizon(
    config: &dyn ConfigPort,
    today: NaiveDate,
) -> Result<(NaiveDate, NaiveDate), StocksimError> {
    let end_date = match non_empty(config, "simulation", "end_date") {
        Some(s) => parse_date(&s, "end_date")?,
        None => today,
    };

    let start_date = match (
        non_empty(config, "simulation", "start_date"),
        non_empty(config, "simulation", "years_back"),
    ) {
        (Some(s), _) => parse_date(&s, "start_date")?,
        (None, Some(years)) => {
            let years: u32 = years
                .parse()
                .ok()
                .filter(|&y| y > 0)
                .ok_or_else(|| {
                    invalid(
                        "simulation",
                        "years_back",
                        format!("years_back must be a positive integer, got '{years}'"),
                    )
                })?;
            years
                .checked_mul(12)
                .and_then(|months| today.checked_sub_months(Months::new(months)))
                .ok_or_else(|| {
                    invalid("simulation", "years_back", "years_back is too large".into())
                })?
        }
        (None, None) => return Err(missing("simulation", "start_date")),
    };

    if start_date > end_date {
        return Err(invalid(
            "simulation",
            "start_date",
            format!("start_date {start_date} is after end_date {end_date}"),
        ));
    }
    Ok((start_date, end_date))
}

fn parse_date(value: &str, field: &str) -> Result<NaiveDate, StocksimError> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| {
        invalid(
            "simulation",
            field,
            format!("invalid {field} format, expected YYYY-MM-DD"),
        )
    })
}

pub fn resolve_seed(config: &dyn ConfigPort) -> Result<u64, StocksimError> {
    match non_empty(config, "simulation", "seed") {
        None => Ok(0),
        Some(s) => s.parse().map_err(|_| {
            invalid(
                "simulation",
                "seed",
                format!("seed must be a non-negative integer, got '{s}'"),
            )
        }),
    }
}

pub fn resolve_sell_mode(config: &dyn ConfigPort) -> Result<SellMode, StocksimError> {
    match non_empty(config, "simulation", "sell_mode") {
        None => Ok(SellMode::default()),
        Some(s) => s
            .parse()
            .map_err(|reason| invalid("simulation", "sell_mode", reason)),
    }
}

pub fn resolve_traders(config: &dyn ConfigPort) -> Result<Vec<TraderSpec>, StocksimError> {
    if non_empty(config, "traders", "traders").is_none() {
        return Err(missing("traders", "traders"));
    }
    config
        .get_list("traders", "traders")
        .iter()
        .map(|entry| TraderSpec::parse(entry))
        .collect()
}

/// CSV path (default [`DEFAULT_CSV_PATH`]) and optional chart path.
pub fn resolve_report_paths(config: &dyn ConfigPort) -> (String, Option<String>) {
    let csv = non_empty(config, "report", "csv").unwrap_or_else(|| DEFAULT_CSV_PATH.to_string());
    (csv, non_empty(config, "report", "chart"))
}
