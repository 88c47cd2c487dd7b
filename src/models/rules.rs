//! Configurable indicator rules.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::AppError;

/// Rule keys, declared in evaluation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum IndicatorKey {
    DollarIndex,
    Inventory,
    Pmi,
    Rsi,
    Macd,
}

impl IndicatorKey {
    pub const ALL: [IndicatorKey; 5] = [
        IndicatorKey::DollarIndex,
        IndicatorKey::Inventory,
        IndicatorKey::Pmi,
        IndicatorKey::Rsi,
        IndicatorKey::Macd,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            IndicatorKey::DollarIndex => "dollarIndex",
            IndicatorKey::Inventory => "inventory",
            IndicatorKey::Pmi => "pmi",
            IndicatorKey::Rsi => "rsi",
            IndicatorKey::Macd => "macd",
        }
    }
}

impl fmt::Display for IndicatorKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for IndicatorKey {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        IndicatorKey::ALL
            .into_iter()
            .find(|key| key.as_str() == s)
            .ok_or_else(|| AppError::UnknownIndicator(s.to_string()))
    }
}

/// Direction of a single-threshold comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Comparison {
    Less,
    Greater,
}

impl Comparison {
    pub fn holds(&self, value: f64, threshold: f64) -> bool {
        match self {
            Comparison::Less => value < threshold,
            Comparison::Greater => value > threshold,
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Comparison::Less => "<",
            Comparison::Greater => ">",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThresholdRule {
    pub enabled: bool,
    pub threshold: f64,
    pub condition: Comparison,
}

impl ThresholdRule {
    pub fn new(threshold: f64, condition: Comparison) -> Self {
        Self {
            enabled: true,
            threshold,
            condition,
        }
    }

    pub fn passes(&self, value: f64) -> bool {
        self.condition.holds(value, self.threshold)
    }
}

/// RSI is the only indicator with a buy/sell threshold pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RsiRule {
    pub enabled: bool,
    pub buy_threshold: f64,
    pub sell_threshold: f64,
}

impl Default for RsiRule {
    fn default() -> Self {
        Self {
            enabled: true,
            buy_threshold: 35.0,
            sell_threshold: 65.0,
        }
    }
}

/// The full rule set; replaced wholesale on save.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleSet {
    pub dollar_index: ThresholdRule,
    pub inventory: ThresholdRule,
    pub pmi: ThresholdRule,
    pub rsi: RsiRule,
    pub macd: ThresholdRule,
}

impl Default for RuleSet {
    fn default() -> Self {
        Self {
            dollar_index: ThresholdRule::new(100.0, Comparison::Less),
            inventory: ThresholdRule::new(145_000.0, Comparison::Less),
            pmi: ThresholdRule::new(50.0, Comparison::Greater),
            rsi: RsiRule::default(),
            macd: ThresholdRule::new(0.0, Comparison::Greater),
        }
    }
}

impl RuleSet {
    pub fn is_enabled(&self, key: IndicatorKey) -> bool {
        match key {
            IndicatorKey::DollarIndex => self.dollar_index.enabled,
            IndicatorKey::Inventory => self.inventory.enabled,
            IndicatorKey::Pmi => self.pmi.enabled,
            IndicatorKey::Rsi => self.rsi.enabled,
            IndicatorKey::Macd => self.macd.enabled,
        }
    }

    pub fn set_enabled(&mut self, key: IndicatorKey, enabled: bool) {
        match key {
            IndicatorKey::DollarIndex => self.dollar_index.enabled = enabled,
            IndicatorKey::Inventory => self.inventory.enabled = enabled,
            IndicatorKey::Pmi => self.pmi.enabled = enabled,
            IndicatorKey::Rsi => self.rsi.enabled = enabled,
            IndicatorKey::Macd => self.macd.enabled = enabled,
        }
    }

    /// Whether `value` satisfies the configured rule for `key`, ignoring `enabled`.
    pub fn passes(&self, key: IndicatorKey, value: f64) -> bool {
        match key {
            IndicatorKey::DollarIndex => self.dollar_index.passes(value),
            IndicatorKey::Inventory => self.inventory.passes(value),
            IndicatorKey::Pmi => self.pmi.passes(value),
            IndicatorKey::Rsi => value < self.rsi.buy_threshold,
            IndicatorKey::Macd => self.macd.passes(value),
        }
    }

    pub fn enabled_keys(&self) -> impl Iterator<Item = IndicatorKey> + '_ {
        IndicatorKey::ALL
            .into_iter()
            .filter(move |key| self.is_enabled(*key))
    }

    /// Human readable condition, e.g. `< 145,000`.
    pub fn condition_label(&self, key: IndicatorKey) -> String {
        let (symbol, threshold) = match key {
            IndicatorKey::DollarIndex => (
                self.dollar_index.condition.symbol(),
                self.dollar_index.threshold,
            ),
            IndicatorKey::Inventory => {
                (self.inventory.condition.symbol(), self.inventory.threshold)
            }
            IndicatorKey::Pmi => (self.pmi.condition.symbol(), self.pmi.threshold),
            IndicatorKey::Rsi => ("<", self.rsi.buy_threshold),
            IndicatorKey::Macd => (self.macd.condition.symbol(), self.macd.threshold),
        };
        format!("{} {}", symbol, format_threshold(threshold))
    }
}

fn format_threshold(value: f64) -> String {
    if value.fract() != 0.0 {
        return value.to_string();
    }
    let digits = format!("{}", value.abs() as u64);
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if value < 0.0 {
        format!("-{}", grouped)
    } else {
        grouped
    }
}
