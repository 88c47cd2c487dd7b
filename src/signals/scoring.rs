//! Weighted rule scoring

use std::collections::BTreeMap;

use crate::models::indicators::IndicatorReadings;
use crate::models::rules::{IndicatorKey, RuleSet};
use crate::models::signal::ScoreResult;

/// Points each enabled rule contributes to the maximum score.
pub const RULE_WEIGHT: u32 = 20;

/// Evaluate every enabled rule against `readings` using the configured thresholds
///
/// Disabled rules contribute neither to `score` nor to `max_score` and are
/// left out of `results`.
pub fn evaluate_rules(readings: &IndicatorReadings, rules: &RuleSet) -> ScoreResult {
    let mut score = 0;
    let mut max_score = 0;
    let mut results = BTreeMap::new();

    for key in IndicatorKey::ALL {
        if !rules.is_enabled(key) {
            continue;
        }

        max_score += RULE_WEIGHT;
        let passed = rules.passes(key, readings.value(key));
        if passed {
            score += RULE_WEIGHT;
        }
        results.insert(key, passed);
    }

    ScoreResult {
        score,
        max_score,
        percentage: percentage(score, max_score),
        results,
    }
}

/// `round(100 * score / max_score)`, 0 when nothing is enabled.
pub fn percentage(score: u32, max_score: u32) -> u32 {
    if max_score == 0 {
        return 0;
    }
    (100.0 * score as f64 / max_score as f64).round() as u32
}
