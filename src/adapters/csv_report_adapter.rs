//! CSV report adapter: one row per sampled date and trader.

use crate::domain::error::StocksimError;
use crate::domain::simulation::SimulationResult;
use crate::ports::report_port::ReportPort;

pub const HEADER: [&str; 3] = ["Date", "Trader", "Portfolio Value"];

#[derive(Debug, Default)]
pub struct CsvReportAdapter;

impl CsvReportAdapter {
    pub fn new() -> Self {
        Self
    }

    /// Render the report into any writer.
    pub fn write_to<W: std::io::Write>(
        &self,
        result: &SimulationResult,
        out: W,
    ) -> Result<(), StocksimError> {
        let report_err = |e: csv::Error| StocksimError::Report {
            reason: format!("CSV write error: {}", e),
        };

        let mut wtr = csv::Writer::from_writer(out);
        wtr.write_record(HEADER).map_err(report_err)?;
        for snapshot in &result.snapshots {
            let date = snapshot.date.to_string();
            for (trader, value) in &snapshot.values {
                let value = format!("{:.2}", value);
                wtr.write_record([date.as_str(), trader.as_str(), value.as_str()])
                    .map_err(report_err)?;
            }
        }
        wtr.flush()?;
        Ok(())
    }
}

impl ReportPort for CsvReportAdapter {
    fn write(&self, result: &SimulationResult, output_path: &str) -> Result<(), StocksimError> {
        let file = std::fs::File::create(output_path).map_err(|e| StocksimError::Report {
            reason: format!("failed to create {}: {}", output_path, e),
        })?;
        self.write_to(result, file)
    }
}
