//! Shared data models spanning the engine layers.

pub mod indicators;
pub mod rules;
pub mod signal;

pub use indicators::{ChartSeries, IndicatorReadings, PricePoint, PriceSeries};
pub use rules::{Comparison, IndicatorKey, RsiRule, RuleSet, ThresholdRule};
pub use signal::{Notification, ScoreResult, Signal};
