//! Price data access port.

use crate::domain::error::StocksimError;
use crate::domain::price::PricePoint;
use chrono::NaiveDate;

pub trait DataPort {
    /// Closing prices for `symbol` within `[start_date, end_date]`, oldest first.
    fn fetch_history(
        &self,
        symbol: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<PricePoint>, StocksimError>;

    fn list_symbols(&self) -> Result<Vec<String>, StocksimError>;

    /// First date, last date and point count, or `None` if the symbol has no data.
    fn get_data_range(
        &self,
        symbol: &str,
    ) -> Result<Option<(NaiveDate, NaiveDate, usize)>, StocksimError>;

    fn has_symbol(&self, symbol: &str) -> Result<bool, StocksimError> {
        Ok(self.list_symbols()?.iter().any(|s| s == symbol))
    }
}
