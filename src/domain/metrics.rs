//! Per-trader performance statistics over the sampled valuations.

use super::simulation::{SimulationResult, TraderSummary};

#[derive(Debug, Clone, PartialEq)]
pub struct PerformanceSummary {
    pub trader: String,
    pub initial_capital: f64,
    pub final_value: f64,
    pub total_return: f64,
    pub max_drawdown: f64,
    /// Longest run of samples spent below a previous peak.
    pub max_drawdown_duration: usize,
    pub trades: usize,
}

impl PerformanceSummary {
    /// Statistics for one trader: its sampled values followed by the final value.
    pub fn compute(result: &SimulationResult, summary: &TraderSummary) -> Self {
        let mut curve: Vec<f64> = result
            .series(&summary.name)
            .into_iter()
            .map(|(_, v)| v)
            .collect();
        curve.push(summary.final_value);

        let (max_drawdown, max_drawdown_duration) = compute_drawdown(&curve);

        PerformanceSummary {
            trader: summary.name.clone(),
            initial_capital: summary.initial_capital,
            final_value: summary.final_value,
            total_return: summary.total_return(),
            max_drawdown,
            max_drawdown_duration,
            trades: summary.fills.len(),
        }
    }

    pub fn for_all(result: &SimulationResult) -> Vec<Self> {
        result
            .traders
            .iter()
            .map(|t| Self::compute(result, t))
            .collect()
    }
}

/// Largest peak-to-trough fall as a fraction of the peak, and the longest
/// stretch of consecutive points below the running peak.
fn compute_drawdown(values: &[f64]) -> (f64, usize) {
    let Some(&first) = values.first() else {
        return (0.0, 0);
    };

    let mut peak = first;
    let mut max_dd = 0.0_f64;
    let mut max_dd_duration = 0usize;
    let mut current_dd_duration = 0usize;

    for &value in values {
        if value >= peak {
            peak = value;
            current_dd_duration = 0;
        } else if peak > 0.0 {
            let dd = (peak - value) / peak;
            if dd > max_dd {
                max_dd = dd;
            }
            current_dd_duration += 1;
            if current_dd_duration > max_dd_duration {
                max_dd_duration = current_dd_duration;
            }
        }
    }

    (max_dd, max_dd_duration)
}
