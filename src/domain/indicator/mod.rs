//! Trailing-window indicator calculations.
//!
//! Every function here works on a window slice that the caller has already cut
//! at the cursor, so none of them can see prices after "today":
//! - `sma`: arithmetic mean of closes
//! - `stddev`: population standard deviation of closes
//! - `rsi`: Relative Strength Index over the changes inside the window

pub mod rsi;
pub mod sma;
pub mod stddev;

use crate::domain::price::PricePoint;

/// RSI value reported while there is not enough history.
pub const NEUTRAL_RSI: f64 = 50.0;

/// Points in `[max(0, cursor - window), cursor]`.
///
/// `cursor` must be a valid index into `points`.
pub fn trailing_window(points: &[PricePoint], cursor: usize, window: usize) -> &[PricePoint] {
    debug_assert!(cursor < points.len(), "cursor {cursor} out of bounds");
    let start = cursor.saturating_sub(window);
    &points[start..=cursor]
}
