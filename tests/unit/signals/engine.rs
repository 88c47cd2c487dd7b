//! Unit tests for signal engine

use copper_signal::models::indicators::IndicatorReadings;
use copper_signal::models::rules::RuleSet;
use copper_signal::models::signal::Signal;
use copper_signal::signals::decision::derive_signal;
use copper_signal::signals::engine::SignalEngine;
use copper_signal::signals::scoring::evaluate_rules;

#[test]
fn test_evaluate_combines_score_and_signal() {
    let readings = IndicatorReadings::default();
    let rules = RuleSet::default();

    let evaluation = SignalEngine::evaluate(&readings, &rules);
    assert_eq!(evaluation.score, evaluate_rules(&readings, &rules));
    assert_eq!(evaluation.signal, derive_signal(&readings, &rules));
    assert_eq!(evaluation.signal, Signal::Buy);
    assert_eq!(evaluation.score.percentage, 60);
}

#[test]
fn test_evaluation_serializes_for_the_dashboard() {
    let evaluation = SignalEngine::evaluate(&IndicatorReadings::default(), &RuleSet::default());
    let value = serde_json::to_value(&evaluation).unwrap();

    assert_eq!(value["signal"], "BUY");
    assert_eq!(value["score"]["maxScore"], 100);
    assert_eq!(value["score"]["results"]["dollarIndex"], true);
    assert_eq!(value["score"]["results"]["inventory"], false);
}
