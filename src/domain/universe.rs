//! Symbol universe: parsing the configured symbol list and checking that each
//! symbol has data over the simulation horizon.

use crate::domain::error::StocksimError;
use crate::domain::timeline::SecurityTimeline;
use crate::ports::data_port::DataPort;
use chrono::NaiveDate;
use std::collections::HashSet;
use tracing::{info, warn};

pub const MAX_SYMBOLS: usize = 25;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UniverseError {
    #[error("no symbols given")]
    Empty,

    #[error("empty token in symbol list")]
    EmptyToken,

    #[error("duplicate symbol: {0}")]
    DuplicateSymbol(String),

    #[error("{count} symbols given, at most {max} allowed")]
    TooMany { count: usize, max: usize },
}

impl From<UniverseError> for StocksimError {
    fn from(err: UniverseError) -> Self {
        StocksimError::ConfigInvalid {
            section: "simulation".into(),
            key: "symbols".into(),
            reason: err.to_string(),
        }
    }
}

/// Parse a comma-separated symbol list: trimmed, upper-cased, unique.
pub fn parse_symbols(input: &str) -> Result<Vec<String>, UniverseError> {
    if input.trim().is_empty() {
        return Err(UniverseError::Empty);
    }

    let mut symbols = Vec::new();
    let mut seen = HashSet::new();

    for token in input.split(',') {
        let trimmed = token.trim();
        if trimmed.is_empty() {
            return Err(UniverseError::EmptyToken);
        }
        let symbol = trimmed.to_uppercase();
        if !seen.insert(symbol.clone()) {
            return Err(UniverseError::DuplicateSymbol(symbol));
        }
        symbols.push(symbol);
    }

    if symbols.len() > MAX_SYMBOLS {
        return Err(UniverseError::TooMany {
            count: symbols.len(),
            max: MAX_SYMBOLS,
        });
    }

    Ok(symbols)
}

#[derive(Debug, Clone, PartialEq)]
pub enum SkipReason {
    UnknownSymbol,
    NoData,
    FetchFailed(String),
}

#[derive(Debug, Clone)]
pub struct SkippedSymbol {
    pub symbol: String,
    pub reason: SkipReason,
}

#[derive(Debug)]
pub struct UniverseValidationResult {
    /// Loaded timelines, in the order the symbols were requested.
    pub timelines: Vec<SecurityTimeline>,
    pub skipped: Vec<SkippedSymbol>,
}

impl UniverseValidationResult {
    pub fn symbols(&self) -> Vec<&str> {
        self.timelines.iter().map(|t| t.symbol()).collect()
    }
}

/// Load every symbol's history over `[start_date, end_date]`.
///
/// Symbols the source does not know, or that have no points in range, are
/// skipped with a warning. Fails with [`StocksimError::NoData`] when nothing
/// is left.
pub fn validate_universe(
    data_port: &dyn DataPort,
    symbols: Vec<String>,
    start_date: NaiveDate,
    end_date: NaiveDate,
) -> Result<UniverseValidationResult, StocksimError> {
    let mut timelines = Vec::new();
    let mut skipped = Vec::new();
    let requested = symbols.join(", ");

    for symbol in symbols {
        let reason = match data_port.has_symbol(&symbol) {
            Ok(false) => Some(SkipReason::UnknownSymbol),
            Err(e) => Some(SkipReason::FetchFailed(e.to_string())),
            Ok(true) => match data_port.fetch_history(&symbol, start_date, end_date) {
                Ok(history) if history.is_empty() => Some(SkipReason::NoData),
                Ok(history) => {
                    info!(symbol = %symbol, points = history.len(), "symbol loaded");
                    timelines.push(SecurityTimeline::new(symbol.clone(), history));
                    None
                }
                Err(e) => Some(SkipReason::FetchFailed(e.to_string())),
            },
        };

        if let Some(reason) = reason {
            warn!(symbol = %symbol, reason = ?reason, "skipping symbol");
            skipped.push(SkippedSymbol { symbol, reason });
        }
    }

    if timelines.is_empty() {
        return Err(StocksimError::NoData { symbol: requested });
    }

    if !skipped.is_empty() {
        info!(
            kept = timelines.len(),
            requested = timelines.len() + skipped.len(),
            "universe reduced"
        );
    }

    Ok(UniverseValidationResult { timelines, skipped })
}
