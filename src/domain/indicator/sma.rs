//! Simple moving average.
//!
//! SMA = sum(C) / count over the window handed in.

use crate::domain::price::PricePoint;

/// Mean close over `window`, `None` when the window is empty.
pub fn calculate_sma(window: &[PricePoint]) -> Option<f64> {
    if window.is_empty() {
        return None;
    }
    let sum: f64 = window.iter().map(|p| p.close).sum();
    Some(sum / window.len() as f64)
}
