//! MACD (Moving Average Convergence Divergence) indicator

use crate::indicators::trend::calculate_ema;

pub const MACD_FAST_PERIOD: usize = 12;
pub const MACD_SLOW_PERIOD: usize = 26;

/// Calculate the MACD line
///
/// MACD = EMA(12) - EMA(26)
///
/// Returns 0 when there are fewer than 26 prices.
pub fn calculate_macd(prices: &[f64]) -> f64 {
    if prices.len() < MACD_SLOW_PERIOD {
        return 0.0;
    }

    calculate_ema(prices, MACD_FAST_PERIOD) - calculate_ema(prices, MACD_SLOW_PERIOD)
}
