//! CSV file data adapter.
//!
//! One `<SYMBOL>.csv` per symbol in the data directory. The header row must
//! name a `date` column (`YYYY-MM-DD`) and a `close` column; other columns are
//! ignored, so exported quote files with open/high/low/volume load unchanged.

use crate::domain::error::StocksimError;
use crate::domain::price::PricePoint;
use crate::ports::data_port::DataPort;
use chrono::NaiveDate;
use std::fs;
use std::path::PathBuf;
use tracing::debug;

pub struct CsvAdapter {
    base_path: PathBuf,
}

impl CsvAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    fn csv_path(&self, symbol: &str) -> PathBuf {
        self.base_path.join(format!("{}.csv", symbol))
    }

    /// Every point in the symbol's file, ascending, one per date.
    fn read_all(&self, symbol: &str) -> Result<Vec<PricePoint>, StocksimError> {
        let path = self.csv_path(symbol);
        let content = fs::read_to_string(&path).map_err(|e| StocksimError::DataSource {
            reason: format!("failed to read {}: {}", path.display(), e),
        })?;

        let mut rdr = csv::Reader::from_reader(content.as_bytes());
        let headers = rdr.headers().map_err(|e| StocksimError::DataSource {
            reason: format!("CSV header error in {}: {}", path.display(), e),
        })?;
        let column = |name: &str| {
            headers
                .iter()
                .position(|h| h.trim().eq_ignore_ascii_case(name))
                .ok_or_else(|| StocksimError::DataSource {
                    reason: format!("{} has no '{}' column", path.display(), name),
                })
        };
        let date_col = column("date")?;
        let close_col = column("close")?;

        let mut points = Vec::new();
        for result in rdr.records() {
            let record = result.map_err(|e| StocksimError::DataSource {
                reason: format!("CSV parse error: {}", e),
            })?;

            let date_str = record.get(date_col).unwrap_or_default().trim();
            let date = NaiveDate::parse_from_str(date_str, "%Y-%m-%d").map_err(|e| {
                StocksimError::DataSource {
                    reason: format!("invalid date '{}': {}", date_str, e),
                }
            })?;

            let close_str = record.get(close_col).unwrap_or_default().trim();
            if close_str.is_empty() || close_str.eq_ignore_ascii_case("null") {
                debug!(symbol, %date, "skipping row without close");
                continue;
            }
            let close: f64 = close_str.parse().map_err(|e| StocksimError::DataSource {
                reason: format!("invalid close value '{}': {}", close_str, e),
            })?;

            points.push(PricePoint::new(date, close));
        }

        points.sort_by_key(|p| p.date);
        points.dedup_by_key(|p| p.date);
        Ok(points)
    }
}

impl DataPort for CsvAdapter {
    fn fetch_history(
        &self,
        symbol: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<PricePoint>, StocksimError> {
        let points = self
            .read_all(symbol)?
            .into_iter()
            .filter(|p| p.date >= start_date && p.date <= end_date)
            .collect();
        Ok(points)
    }

    fn list_symbols(&self) -> Result<Vec<String>, StocksimError> {
        let entries = fs::read_dir(&self.base_path).map_err(|e| StocksimError::DataSource {
            reason: format!(
                "failed to read directory {}: {}",
                self.base_path.display(),
                e
            ),
        })?;

        let mut symbols = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| StocksimError::DataSource {
                reason: format!("directory entry error: {}", e),
            })?;

            let name = entry.file_name();
            let name_str = name.to_string_lossy();
            if let Some(symbol) = name_str.strip_suffix(".csv") {
                if !symbol.is_empty() {
                    symbols.push(symbol.to_string());
                }
            }
        }

        symbols.sort();
        Ok(symbols)
    }

    fn get_data_range(
        &self,
        symbol: &str,
    ) -> Result<Option<(NaiveDate, NaiveDate, usize)>, StocksimError> {
        if !self.csv_path(symbol).is_file() {
            return Ok(None);
        }
        let points = self.read_all(symbol)?;
        Ok(match (points.first(), points.last()) {
            (Some(first), Some(last)) => Some((first.date, last.date, points.len())),
            _ => None,
        })
    }

    fn has_symbol(&self, symbol: &str) -> Result<bool, StocksimError> {
        Ok(self.csv_path(symbol).is_file())
    }
}
