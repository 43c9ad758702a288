//! Report generation port.

use crate::domain::error::StocksimError;
use crate::domain::simulation::SimulationResult;

/// Port for writing simulation results.
pub trait ReportPort {
    fn write(&self, result: &SimulationResult, output_path: &str) -> Result<(), StocksimError>;
}
