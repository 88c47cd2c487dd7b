//! Unit tests for settings persistence

use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use copper_signal::models::rules::{Comparison, IndicatorKey, RuleSet};
use copper_signal::settings::store::merge_onto_defaults;
use copper_signal::settings::SettingsStore;
use serde_json::json;

fn temp_settings_path(name: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    std::env::temp_dir()
        .join(format!("copper-signal-{}-{}-{}", name, std::process::id(), nanos))
        .join("settings.json")
}

#[tokio::test]
async fn test_missing_file_loads_defaults() {
    let store = SettingsStore::new(temp_settings_path("missing"));
    assert_eq!(store.load().await, RuleSet::default());
}

#[tokio::test]
async fn test_save_then_load_round_trips() {
    let path = temp_settings_path("round-trip");
    let store = SettingsStore::new(&path);

    let mut rules = RuleSet::default();
    rules.set_enabled(IndicatorKey::Inventory, false);
    rules.set_enabled(IndicatorKey::Macd, false);
    rules.rsi.buy_threshold = 28.5;
    rules.rsi.sell_threshold = 71.0;

    store.save(&rules).await.unwrap();
    assert_eq!(SettingsStore::new(&path).load().await, rules);

    let saved: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(saved["customSettings"]["rsiBuy"], 28.5);
    assert_eq!(saved["customSettings"]["rsiSell"], 71.0);
    assert_eq!(saved["indicatorSettings"]["inventory"]["enabled"], false);
    assert_eq!(saved["indicatorSettings"]["dollarIndex"]["condition"], "less");
}

#[tokio::test]
async fn test_malformed_file_falls_back_to_defaults() {
    let path = temp_settings_path("malformed");
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(&path, "{ \"customSettings\": { \"rsiBuy\": 30, ").unwrap();

    assert_eq!(SettingsStore::new(&path).load().await, RuleSet::default());
}

#[test]
fn test_partial_document_merges_field_by_field() {
    let rules = merge_onto_defaults(&json!({
        "customSettings": { "rsiBuy": 30 },
        "indicatorSettings": {
            "pmi": { "enabled": false, "threshold": "high" },
            "inventory": { "threshold": 150000, "condition": "sideways" },
            "gold": { "enabled": true }
        },
        "theme": "dark"
    }));

    let defaults = RuleSet::default();
    assert!(!rules.pmi.enabled);
    assert_eq!(rules.pmi.threshold, defaults.pmi.threshold);
    assert_eq!(rules.inventory.threshold, 150_000.0);
    assert_eq!(rules.inventory.condition, Comparison::Less);
    assert_eq!(rules.rsi.buy_threshold, 30.0);
    assert_eq!(rules.rsi.sell_threshold, defaults.rsi.sell_threshold);
    assert_eq!(rules.dollar_index, defaults.dollar_index);
}

#[test]
fn test_wrong_types_keep_defaults() {
    let rules = merge_onto_defaults(&json!({
        "customSettings": { "rsiBuy": "35", "rsiSell": null },
        "indicatorSettings": { "macd": { "enabled": "yes" }, "rsi": [] }
    }));
    assert_eq!(rules, RuleSet::default());

    assert_eq!(merge_onto_defaults(&json!([1, 2, 3])), RuleSet::default());
}

#[test]
fn test_custom_settings_win_over_rsi_rule_thresholds() {
    let rules = merge_onto_defaults(&json!({
        "customSettings": { "rsiBuy": 40, "rsiSell": 60 },
        "indicatorSettings": { "rsi": { "enabled": true, "buyThreshold": 20, "sellThreshold": 80 } }
    }));
    assert_eq!(rules.rsi.buy_threshold, 40.0);
    assert_eq!(rules.rsi.sell_threshold, 60.0);
}
