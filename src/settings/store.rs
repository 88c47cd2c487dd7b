//! JSON file persistence for the rule set.
//!
//! Loading merges field by field onto the defaults: a known field is taken
//! only when present with the expected type, unknown fields are ignored, and
//! a malformed document falls back to the defaults with a warning.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::error::Result;
use crate::models::rules::{Comparison, IndicatorKey, RuleSet, ThresholdRule};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomSettings {
    pub rsi_buy: f64,
    pub rsi_sell: f64,
}

/// On-disk document shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedSettings {
    pub custom_settings: CustomSettings,
    pub indicator_settings: RuleSet,
}

impl From<&RuleSet> for PersistedSettings {
    fn from(rules: &RuleSet) -> Self {
        Self {
            custom_settings: CustomSettings {
                rsi_buy: rules.rsi.buy_threshold,
                rsi_sell: rules.rsi.sell_threshold,
            },
            indicator_settings: *rules,
        }
    }
}

pub struct SettingsStore {
    path: PathBuf,
}

impl SettingsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the persisted rule set, or the defaults when there is none.
    pub async fn load(&self) -> RuleSet {
        let raw = match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "No saved settings, using defaults");
                return RuleSet::default();
            }
            Err(e) => {
                warn!(
                    path = %self.path.display(),
                    error = %e,
                    "Failed to read settings, using defaults"
                );
                return RuleSet::default();
            }
        };

        match serde_json::from_str::<Value>(&raw) {
            Ok(document) => {
                let rules = merge_onto_defaults(&document);
                info!(path = %self.path.display(), "Loaded saved settings");
                rules
            }
            Err(e) => {
                warn!(
                    path = %self.path.display(),
                    error = %e,
                    "Malformed settings file, using defaults"
                );
                RuleSet::default()
            }
        }
    }

    /// Persist the full rule set, replacing the previous document.
    pub async fn save(&self, rules: &RuleSet) -> Result<()> {
        let document = serde_json::to_string_pretty(&PersistedSettings::from(rules))?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }

        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, document).await?;
        tokio::fs::rename(&tmp, &self.path).await?;

        debug!(path = %self.path.display(), "Settings saved");
        Ok(())
    }
}

/// Merge a parsed settings document onto [`RuleSet::default`].
pub fn merge_onto_defaults(document: &Value) -> RuleSet {
    let mut rules = RuleSet::default();

    if let Some(indicators) = document.get("indicatorSettings").and_then(Value::as_object) {
        for key in IndicatorKey::ALL {
            let Some(fields) = indicators.get(key.as_str()).and_then(Value::as_object) else {
                continue;
            };

            if let Some(enabled) = fields.get("enabled").and_then(Value::as_bool) {
                rules.set_enabled(key, enabled);
            }

            match key {
                IndicatorKey::DollarIndex => merge_threshold(&mut rules.dollar_index, fields),
                IndicatorKey::Inventory => merge_threshold(&mut rules.inventory, fields),
                IndicatorKey::Pmi => merge_threshold(&mut rules.pmi, fields),
                IndicatorKey::Macd => merge_threshold(&mut rules.macd, fields),
                IndicatorKey::Rsi => {
                    if let Some(buy) = number(fields, "buyThreshold") {
                        rules.rsi.buy_threshold = buy;
                    }
                    if let Some(sell) = number(fields, "sellThreshold") {
                        rules.rsi.sell_threshold = sell;
                    }
                }
            }
        }
    }

    // customSettings drive RSI scoring, so they win over indicatorSettings.rsi.
    if let Some(custom) = document.get("customSettings").and_then(Value::as_object) {
        if let Some(buy) = number(custom, "rsiBuy") {
            rules.rsi.buy_threshold = buy;
        }
        if let Some(sell) = number(custom, "rsiSell") {
            rules.rsi.sell_threshold = sell;
        }
    }

    rules
}

fn merge_threshold(rule: &mut ThresholdRule, fields: &Map<String, Value>) {
    if let Some(threshold) = number(fields, "threshold") {
        rule.threshold = threshold;
    }
    match fields.get("condition").and_then(Value::as_str) {
        Some("less") => rule.condition = Comparison::Less,
        Some("greater") => rule.condition = Comparison::Greater,
        Some(other) => debug!(condition = other, "Ignoring unknown rule condition"),
        None => {}
    }
}

fn number(fields: &Map<String, Value>, name: &str) -> Option<f64> {
    fields
        .get(name)
        .and_then(Value::as_f64)
        .filter(|v| v.is_finite())
}
