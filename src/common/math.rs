//! Small numeric building blocks shared by the indicators.

/// Simple moving average over the first `period` values.
pub fn sma(values: &[f64], period: usize) -> Option<f64> {
    if period == 0 || values.len() < period {
        return None;
    }
    Some(values[..period].iter().sum::<f64>() / period as f64)
}

/// EMA smoothing constant `2 / (period + 1)`.
pub fn smoothing(period: usize) -> f64 {
    2.0 / (period as f64 + 1.0)
}

/// Advance an EMA by one value.
pub fn ema_from_previous(value: f64, previous: f64, period: usize) -> f64 {
    let k = smoothing(period);
    value * k + previous * (1.0 - k)
}

/// Round to a fixed number of decimal places.
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}
