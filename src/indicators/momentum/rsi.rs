//! RSI (Relative Strength Index) indicator

pub const RSI_DEFAULT_PERIOD: usize = 14;

/// Returned when there is not enough history to compute RSI.
pub const RSI_NEUTRAL: f64 = 50.0;

/// Calculate RSI over the last `period` price changes
///
/// RSI = 100 - (100 / (1 + RS))
/// RS = Average Gain / Average Loss
///
/// Fewer than `period + 1` prices yields [`RSI_NEUTRAL`]; a window with no
/// losses yields 100.
pub fn calculate_rsi(prices: &[f64], period: usize) -> f64 {
    if period == 0 || prices.len() < period + 1 {
        return RSI_NEUTRAL;
    }

    let (gains, losses) = prices
        .windows(2)
        .map(|w| w[1] - w[0])
        .rev()
        .take(period)
        .fold((0.0, 0.0), |(gains, losses), change| {
            if change > 0.0 {
                (gains + change, losses)
            } else {
                (gains, losses + change.abs())
            }
        });

    let avg_gain = gains / period as f64;
    let avg_loss = losses / period as f64;

    if avg_loss == 0.0 {
        return 100.0;
    }

    let rs = avg_gain / avg_loss;
    100.0 - (100.0 / (1.0 + rs))
}

/// Calculate RSI with default period (14)
pub fn calculate_rsi_default(prices: &[f64]) -> f64 {
    calculate_rsi(prices, RSI_DEFAULT_PERIOD)
}
