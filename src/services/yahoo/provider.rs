//! Chart-data provider over HTTP

use async_trait::async_trait;
use backon::{ExponentialBuilder, Retryable};
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

use super::messages::ChartResponse;
use crate::config::MarketDataConfig;
use crate::error::{AppError, Result};
use crate::models::indicators::{ChartSeries, PriceSeries};
use crate::services::market_data::MarketDataProvider;

pub struct YahooChartProvider {
    config: MarketDataConfig,
    client: reqwest::Client,
}

impl YahooChartProvider {
    pub fn new(config: MarketDataConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent("Mozilla/5.0")
            .build()?;
        Ok(Self::with_client(config, client))
    }

    /// The per-request deadline comes from `client` here, not from `config.timeout`.
    pub fn with_client(config: MarketDataConfig, client: reqwest::Client) -> Self {
        Self { config, client }
    }

    /// Request URL for `symbol`, wrapped in the CORS proxy when one is configured.
    pub fn chart_url(&self, symbol: &str) -> Result<String> {
        let base = &self.config.base_url;
        let mut url = Url::parse(base)
            .map_err(|e| AppError::Network(format!("Invalid base URL {}: {}", base, e)))?;

        url.path_segments_mut()
            .map_err(|_| AppError::Network(format!("Base URL {} cannot take a path", base)))?
            .pop_if_empty()
            .extend(["v8", "finance", "chart", symbol]);
        url.query_pairs_mut()
            .append_pair("interval", &self.config.interval)
            .append_pair("range", &self.config.range);

        Ok(match &self.config.proxy_url {
            Some(proxy) => {
                let encoded: String =
                    url::form_urlencoded::byte_serialize(url.as_str().as_bytes()).collect();
                format!("{}{}", proxy, encoded)
            }
            None => url.into(),
        })
    }

    async fn fetch_once(&self, url: &str, symbol: &str) -> Result<ChartSeries> {
        let response = self.client.get(url).send().await.map_err(|e| {
            if e.is_timeout() {
                AppError::Timeout(symbol.to_string())
            } else {
                AppError::Network(format!("{}: {}", symbol, e))
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::Network(format!("{}: HTTP {}", symbol, status)));
        }

        let payload: ChartResponse = response
            .json()
            .await
            .map_err(|e| AppError::Upstream(format!("{}: {}", symbol, e)))?;

        parse_chart(symbol, payload)
    }
}

/// Reduce a chart payload to the fields the engine consumes.
pub fn parse_chart(symbol: &str, payload: ChartResponse) -> Result<ChartSeries> {
    if let Some(error) = payload.chart.error {
        return Err(AppError::Upstream(format!(
            "{}: {} - {}",
            symbol, error.code, error.description
        )));
    }

    let result = payload
        .chart
        .result
        .and_then(|results| results.into_iter().next())
        .ok_or_else(|| AppError::Upstream(format!("{}: empty chart result", symbol)))?;

    let closes = result
        .indicators
        .quote
        .into_iter()
        .next()
        .map(|quote| quote.close)
        .unwrap_or_default();

    Ok(ChartSeries {
        symbol: symbol.to_string(),
        latest_price: result.meta.regular_market_price,
        timestamps: result.timestamp,
        closes: PriceSeries::new(closes),
    })
}

#[async_trait]
impl MarketDataProvider for YahooChartProvider {
    async fn fetch_chart(&self, symbol: &str) -> Result<ChartSeries> {
        let url = self.chart_url(symbol)?;
        debug!(symbol = symbol, url = %url, "Fetching chart");

        let backoff = ExponentialBuilder::default()
            .with_min_delay(Duration::from_millis(200))
            .with_max_times(self.config.retries);

        let chart = (|| self.fetch_once(&url, symbol))
            .retry(backoff)
            .when(|e| matches!(e, AppError::Network(_) | AppError::Timeout(_)))
            .notify(|e, after| {
                warn!(
                    symbol = symbol,
                    error = %e,
                    retry_in_ms = after.as_millis() as u64,
                    "Chart fetch failed, retrying"
                );
            })
            .await?;

        debug!(
            symbol = symbol,
            points = chart.closes.len(),
            latest = ?chart.latest_price,
            "Fetched chart"
        );
        Ok(chart)
    }
}
