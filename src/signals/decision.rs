//! BUY/SELL/HOLD decision
//!
//! This path is separate from [`evaluate_rules`](crate::signals::scoring::evaluate_rules):
//! it counts raw directional checks instead of weighted points, and only RSI
//! follows the configured thresholds. The other cut-offs are fixed below.

use crate::models::indicators::IndicatorReadings;
use crate::models::rules::{IndicatorKey, RuleSet};
use crate::models::signal::Signal;

pub const DOLLAR_INDEX_BUY_BELOW: f64 = 100.0;
pub const INVENTORY_BUY_BELOW: f64 = 145_000.0;
pub const PMI_BUY_ABOVE: f64 = 50.0;
pub const MACD_BUY_ABOVE: f64 = 0.0;

/// Share of enabled checks that must point to BUY.
pub const BUY_RATIO: f64 = 0.6;

/// Raw buy-side check for one indicator.
pub fn is_buy_condition(key: IndicatorKey, readings: &IndicatorReadings, rules: &RuleSet) -> bool {
    match key {
        IndicatorKey::Rsi => readings.rsi < rules.rsi.buy_threshold,
        IndicatorKey::DollarIndex => readings.dollar_index < DOLLAR_INDEX_BUY_BELOW,
        IndicatorKey::Macd => readings.macd > MACD_BUY_ABOVE,
        IndicatorKey::Pmi => readings.pmi > PMI_BUY_ABOVE,
        IndicatorKey::Inventory => readings.inventory < INVENTORY_BUY_BELOW,
    }
}

/// Fraction of enabled indicators whose raw check points to BUY, 0 when none are enabled.
pub fn buy_condition_ratio(readings: &IndicatorReadings, rules: &RuleSet) -> f64 {
    let (buy, total) = rules.enabled_keys().fold((0usize, 0usize), |(buy, total), key| {
        let hit = is_buy_condition(key, readings, rules);
        (buy + usize::from(hit), total + 1)
    });

    if total == 0 {
        0.0
    } else {
        buy as f64 / total as f64
    }
}

pub fn derive_signal(readings: &IndicatorReadings, rules: &RuleSet) -> Signal {
    if buy_condition_ratio(readings, rules) >= BUY_RATIO {
        Signal::Buy
    } else if readings.rsi > rules.rsi.sell_threshold && readings.macd < 0.0 {
        Signal::Sell
    } else {
        Signal::Hold
    }
}
