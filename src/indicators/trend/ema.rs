//! EMA (Exponential Moving Average) indicator

use crate::common::math;

/// Calculate the EMA of `prices` at the last value
///
/// Seeded with the simple average of the first `period` prices, then
/// smoothed forward with `k = 2 / (period + 1)`.
///
/// With fewer than `period` prices this is only an approximation: the last
/// price is returned, or 0 for an empty series.
pub fn calculate_ema(prices: &[f64], period: usize) -> f64 {
    let seed = match math::sma(prices, period) {
        Some(seed) => seed,
        None => return prices.last().copied().unwrap_or(0.0),
    };

    prices[period..]
        .iter()
        .fold(seed, |ema, &price| math::ema_from_previous(price, ema, period))
}
