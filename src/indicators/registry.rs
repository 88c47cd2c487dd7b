//! Indicator metadata

use serde::Serialize;

use crate::models::rules::IndicatorKey;

/// How often a reading is refreshed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Freshness {
    /// Recomputed from market data on every refresh.
    Realtime,
    /// No realtime source; carried over unchanged across refreshes.
    Periodic,
}

/// Static description of a scored indicator.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct IndicatorInfo {
    pub key: IndicatorKey,
    pub name: &'static str,
    pub freshness: Freshness,
}

pub struct IndicatorRegistry;

impl IndicatorRegistry {
    pub fn info(key: IndicatorKey) -> IndicatorInfo {
        let (name, freshness) = match key {
            IndicatorKey::DollarIndex => ("Dollar Index", Freshness::Realtime),
            IndicatorKey::Inventory => ("LME Inventory", Freshness::Periodic),
            IndicatorKey::Pmi => ("China PMI", Freshness::Periodic),
            IndicatorKey::Rsi => ("RSI", Freshness::Realtime),
            IndicatorKey::Macd => ("MACD", Freshness::Realtime),
        };
        IndicatorInfo {
            key,
            name,
            freshness,
        }
    }

    pub fn all() -> Vec<IndicatorInfo> {
        IndicatorKey::ALL.into_iter().map(Self::info).collect()
    }

    /// Keys whose readings must be carried over rather than refetched.
    pub fn periodic_keys() -> Vec<IndicatorKey> {
        Self::all()
            .into_iter()
            .filter(|info| info.freshness == Freshness::Periodic)
            .map(|info| info.key)
            .collect()
    }
}
