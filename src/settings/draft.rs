use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::{AppError, Result};
use crate::models::rules::{IndicatorKey, RuleSet};

/// Staged copy of the editable settings.
///
/// Edits never touch the live rule set; [`SettingsDraft::apply_to`] builds the
/// replacement that gets committed in one step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsDraft {
    pub rsi_buy: f64,
    pub rsi_sell: f64,
    #[serde(default)]
    pub enabled: BTreeMap<IndicatorKey, bool>,
}

impl SettingsDraft {
    pub fn from_rules(rules: &RuleSet) -> Self {
        Self {
            rsi_buy: rules.rsi.buy_threshold,
            rsi_sell: rules.rsi.sell_threshold,
            enabled: IndicatorKey::ALL
                .into_iter()
                .map(|key| (key, rules.is_enabled(key)))
                .collect(),
        }
    }

    pub fn toggle(&mut self, key: IndicatorKey) {
        let entry = self.enabled.entry(key).or_insert(true);
        *entry = !*entry;
    }

    pub fn set_rsi_thresholds(&mut self, buy: f64, sell: f64) {
        self.rsi_buy = buy;
        self.rsi_sell = sell;
    }

    pub fn validate(&self) -> Result<()> {
        for (name, value) in [("rsiBuy", self.rsi_buy), ("rsiSell", self.rsi_sell)] {
            if !value.is_finite() || !(0.0..=100.0).contains(&value) {
                return Err(AppError::InvalidSettings(format!(
                    "{} must be between 0 and 100, got {}",
                    name, value
                )));
            }
        }
        Ok(())
    }

    /// The rule set that results from committing this draft onto `current`.
    ///
    /// Only the enabled flags and RSI thresholds change; keys missing from
    /// `enabled` keep their current flag.
    pub fn apply_to(&self, current: &RuleSet) -> Result<RuleSet> {
        self.validate()?;

        let mut rules = *current;
        for (key, enabled) in &self.enabled {
            rules.set_enabled(*key, *enabled);
        }
        rules.rsi.buy_threshold = self.rsi_buy;
        rules.rsi.sell_threshold = self.rsi_sell;
        Ok(rules)
    }
}
