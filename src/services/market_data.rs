//! Market data provider interface.

use async_trait::async_trait;

use crate::error::Result;
use crate::models::indicators::ChartSeries;

/// Symbols fetched on every refresh.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstrumentSymbols {
    pub copper: String,
    pub dollar_index: String,
    pub gold: String,
}

impl Default for InstrumentSymbols {
    fn default() -> Self {
        Self {
            copper: "HG=F".to_string(),
            dollar_index: "DX-Y.NYB".to_string(),
            gold: "GC=F".to_string(),
        }
    }
}

#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    /// Latest price and daily close history for `symbol`.
    async fn fetch_chart(&self, symbol: &str) -> Result<ChartSeries>;
}
