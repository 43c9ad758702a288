//! Standard deviation indicator.
//!
//! Population standard deviation over the closes in the window:
//! STDDEV = sqrt(sum((C - SMA)^2) / count)
//! The divisor is the number of points, so a single-point window yields 0.

use crate::domain::indicator::sma::calculate_sma;
use crate::domain::price::PricePoint;

pub fn calculate_stddev(window: &[PricePoint]) -> Option<f64> {
    let mean = calculate_sma(window)?;
    // a summed mean can drift off a constant close
    if window.iter().all(|p| p.close == window[0].close) {
        return Some(0.0);
    }
    let variance: f64 = window
        .iter()
        .map(|p| {
            let diff = p.close - mean;
            diff * diff
        })
        .sum::<f64>()
        / window.len() as f64;
    Some(variance.sqrt())
}
