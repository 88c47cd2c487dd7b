//! Indicator engine: pure numeric transforms over a close-price series.
//!
//! Every function degrades to a neutral value on short history instead of
//! failing, so callers always get a usable number.

pub mod momentum;
pub mod registry;
pub mod trend;

pub use momentum::*;
pub use registry::*;
pub use trend::*;

use serde::{Deserialize, Serialize};

/// Indicators derived from the copper close series on each refresh.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DerivedIndicators {
    pub rsi: f64,
    pub macd: f64,
}

impl DerivedIndicators {
    pub fn from_prices(prices: &[f64]) -> Self {
        Self {
            rsi: calculate_rsi_default(prices),
            macd: calculate_macd(prices),
        }
    }
}
