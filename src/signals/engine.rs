//! Signal evaluation entry point used by the dashboard.

use serde::Serialize;

use crate::models::indicators::IndicatorReadings;
use crate::models::rules::RuleSet;
use crate::models::signal::{ScoreResult, Signal};
use crate::signals::decision::derive_signal;
use crate::signals::scoring::evaluate_rules;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Evaluation {
    pub score: ScoreResult,
    pub signal: Signal,
}

pub struct SignalEngine;

impl SignalEngine {
    /// Score the rules and derive the signal from the same snapshot.
    pub fn evaluate(readings: &IndicatorReadings, rules: &RuleSet) -> Evaluation {
        Evaluation {
            score: evaluate_rules(readings, rules),
            signal: derive_signal(readings, rules),
        }
    }
}
