use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::indicators::registry::IndicatorRegistry;
use crate::models::rules::IndicatorKey;

/// Chronological close prices as delivered by the chart endpoint.
///
/// Gaps are kept as `None` so the series stays aligned with its timestamps;
/// indicator math only ever sees [`PriceSeries::valid_prices`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PriceSeries {
    closes: Vec<Option<f64>>,
}

impl PriceSeries {
    pub fn new(closes: Vec<Option<f64>>) -> Self {
        Self { closes }
    }

    pub fn len(&self) -> usize {
        self.closes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.closes.is_empty()
    }

    /// Close at `index`, `None` for gaps and out-of-range indices.
    pub fn get(&self, index: usize) -> Option<f64> {
        self.closes.get(index).copied().flatten()
    }

    /// Closes with gaps removed.
    pub fn valid_prices(&self) -> Vec<f64> {
        self.closes.iter().filter_map(|c| *c).collect()
    }
}

/// One instrument's chart payload, reduced to what the engine consumes.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChartSeries {
    pub symbol: String,
    pub latest_price: Option<f64>,
    pub timestamps: Vec<i64>,
    pub closes: PriceSeries,
}

/// Latest indicator values shown on the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndicatorReadings {
    pub copper_price: f64,
    pub dollar_index: f64,
    pub inventory: f64,
    pub pmi: f64,
    pub rsi: f64,
    pub macd: f64,
    pub gold_price: f64,
}

impl Default for IndicatorReadings {
    fn default() -> Self {
        Self {
            copper_price: 4.15,
            dollar_index: 98.5,
            inventory: 145_000.0,
            pmi: 50.2,
            rsi: 45.0,
            macd: 0.08,
            gold_price: 2050.0,
        }
    }
}

impl IndicatorReadings {
    /// Reading that a rule keyed by `key` is evaluated against.
    pub fn value(&self, key: IndicatorKey) -> f64 {
        match key {
            IndicatorKey::DollarIndex => self.dollar_index,
            IndicatorKey::Inventory => self.inventory,
            IndicatorKey::Pmi => self.pmi,
            IndicatorKey::Rsi => self.rsi,
            IndicatorKey::Macd => self.macd,
        }
    }

    pub fn set_value(&mut self, key: IndicatorKey, value: f64) {
        match key {
            IndicatorKey::DollarIndex => self.dollar_index = value,
            IndicatorKey::Inventory => self.inventory = value,
            IndicatorKey::Pmi => self.pmi = value,
            IndicatorKey::Rsi => self.rsi = value,
            IndicatorKey::Macd => self.macd = value,
        }
    }

    /// Copy the periodic metrics (no realtime source) over from `previous`.
    pub fn with_periodic_from(mut self, previous: &IndicatorReadings) -> Self {
        for key in IndicatorRegistry::periodic_keys() {
            self.set_value(key, previous.value(key));
        }
        self
    }
}

/// One point of the copper/gold history chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub date: DateTime<Utc>,
    pub copper: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gold: Option<f64>,
}
