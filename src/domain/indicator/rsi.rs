//! RSI (Relative Strength Index).
//!
//! Averages are taken over the changes between consecutive closes in the window:
//! - avg_gain = sum of positive changes / number of changes
//! - avg_loss = sum of |negative changes| / number of changes
//!
//! Formula: RSI = 100 - (100 / (1 + avg_gain / avg_loss))
//! If avg_loss == 0: RSI = 100

use crate::domain::indicator::NEUTRAL_RSI;
use crate::domain::price::{PricePoint, daily_changes};

/// RSI over every change in `window`. A window of `n + 1` points yields an
/// `n`-period RSI. Windows with fewer than two points report [`NEUTRAL_RSI`].
pub fn calculate_rsi(window: &[PricePoint]) -> f64 {
    let changes = daily_changes(window);
    if changes.is_empty() {
        return NEUTRAL_RSI;
    }

    let period = changes.len() as f64;
    let gains: f64 = changes.iter().filter(|&&c| c > 0.0).sum();
    let losses: f64 = changes.iter().filter(|&&c| c < 0.0).map(|c| -c).sum();

    let avg_gain = gains / period;
    let avg_loss = losses / period;

    if avg_loss == 0.0 {
        100.0
    } else {
        100.0 - (100.0 / (1.0 + avg_gain / avg_loss))
    }
}
