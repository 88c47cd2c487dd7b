//! Unit tests for MACD indicator

use copper_signal::indicators::momentum::calculate_macd;
use copper_signal::indicators::trend::calculate_ema;

fn create_test_prices(count: usize, base_price: f64, step: f64) -> Vec<f64> {
    (0..count).map(|i| base_price + i as f64 * step).collect()
}

#[test]
fn test_macd_insufficient_data() {
    assert_eq!(calculate_macd(&[]), 0.0);
    assert_eq!(calculate_macd(&create_test_prices(25, 4.0, 0.05)), 0.0);
}

#[test]
fn test_macd_is_fast_minus_slow_ema() {
    for count in [26, 27, 60, 250] {
        let prices: Vec<f64> = (0..count)
            .map(|i| 4.0 + (i as f64 * 0.37).sin() * 0.2)
            .collect();
        let expected = calculate_ema(&prices, 12) - calculate_ema(&prices, 26);
        assert!((calculate_macd(&prices) - expected).abs() < 1e-9);
    }
}

#[test]
fn test_macd_follows_trend_direction() {
    assert!(calculate_macd(&create_test_prices(60, 4.0, 0.02)) > 0.0);
    assert!(calculate_macd(&create_test_prices(60, 6.0, -0.02)) < 0.0);
    assert!(calculate_macd(&vec![4.15; 60]).abs() < 1e-9);
}
