//! Market data refresh: fan out the chart requests, join them, and turn the
//! result into a new set of readings.

use chrono::{DateTime, Utc};
use futures_util::future::try_join_all;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, info};

use crate::common::math::round_to;
use crate::error::{AppError, Result};
use crate::indicators::DerivedIndicators;
use crate::models::indicators::{ChartSeries, IndicatorReadings, PricePoint};
use crate::services::market_data::{InstrumentSymbols, MarketDataProvider};

/// Number of most recent points kept for the history chart.
pub const HISTORY_POINTS: usize = 180;

/// Gold price used whenever the gold chart has no latest price.
pub const GOLD_FALLBACK_PRICE: f64 = 2050.0;

#[derive(Debug, Clone, PartialEq)]
pub struct RefreshOutcome {
    pub readings: IndicatorReadings,
    pub history: Vec<PricePoint>,
}

pub struct MarketRefresher {
    provider: Arc<dyn MarketDataProvider>,
    symbols: InstrumentSymbols,
    in_flight: AtomicBool,
}

impl MarketRefresher {
    pub fn new(provider: Arc<dyn MarketDataProvider>) -> Self {
        Self::with_symbols(provider, InstrumentSymbols::default())
    }

    pub fn with_symbols(provider: Arc<dyn MarketDataProvider>, symbols: InstrumentSymbols) -> Self {
        Self {
            provider,
            symbols,
            in_flight: AtomicBool::new(false),
        }
    }

    pub fn is_refreshing(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Fetch all instruments and derive fresh readings on top of `previous`.
    ///
    /// Fails if any request fails, and with [`AppError::RefreshInProgress`]
    /// while another refresh is still running.
    pub async fn refresh(&self, previous: &IndicatorReadings) -> Result<RefreshOutcome> {
        let _guard = InFlightGuard::acquire(&self.in_flight)?;

        let symbols = [
            self.symbols.copper.as_str(),
            self.symbols.dollar_index.as_str(),
            self.symbols.gold.as_str(),
        ];
        debug!(symbols = ?symbols, "Refreshing market data");

        let mut charts = try_join_all(symbols.iter().map(|s| self.provider.fetch_chart(s)))
            .await?
            .into_iter();

        let (Some(copper), Some(dollar), Some(gold)) =
            (charts.next(), charts.next(), charts.next())
        else {
            return Err(AppError::Upstream("missing chart in refresh batch".to_string()));
        };

        let outcome = build_outcome(previous, &copper, &dollar, &gold);
        info!(
            copper = outcome.readings.copper_price,
            dollar_index = outcome.readings.dollar_index,
            rsi = outcome.readings.rsi,
            macd = outcome.readings.macd,
            history_points = outcome.history.len(),
            "Market data refreshed"
        );
        Ok(outcome)
    }
}

/// Releases the single-flight flag when the refresh finishes, however it ends.
struct InFlightGuard<'a> {
    flag: &'a AtomicBool,
}

impl<'a> InFlightGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Result<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| AppError::RefreshInProgress)?;
        Ok(Self { flag })
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

/// Combine fetched charts with the previous readings.
///
/// RSI and MACD come from the copper closes; PMI and inventory are carried
/// over. A missing latest price keeps the previous copper/dollar value, while
/// gold drops to [`GOLD_FALLBACK_PRICE`].
pub fn build_outcome(
    previous: &IndicatorReadings,
    copper: &ChartSeries,
    dollar: &ChartSeries,
    gold: &ChartSeries,
) -> RefreshOutcome {
    let derived = DerivedIndicators::from_prices(&copper.closes.valid_prices());

    let readings = IndicatorReadings {
        copper_price: round_to(latest_or(copper, previous.copper_price), 2),
        dollar_index: round_to(latest_or(dollar, previous.dollar_index), 1),
        rsi: round_to(derived.rsi, 1),
        macd: round_to(derived.macd, 2),
        gold_price: latest_or(gold, GOLD_FALLBACK_PRICE),
        ..IndicatorReadings::default()
    }
    .with_periodic_from(previous);

    RefreshOutcome {
        readings,
        history: build_history(copper, gold),
    }
}

fn latest_or(chart: &ChartSeries, fallback: f64) -> f64 {
    chart
        .latest_price
        .filter(|p| p.is_finite() && *p != 0.0)
        .unwrap_or(fallback)
}

/// Copper/gold points indexed by the copper timestamps, dropping gaps in copper.
pub fn build_history(copper: &ChartSeries, gold: &ChartSeries) -> Vec<PricePoint> {
    let points: Vec<PricePoint> = copper
        .timestamps
        .iter()
        .enumerate()
        .filter_map(|(i, &ts)| {
            let close = copper.closes.get(i)?;
            let date = DateTime::<Utc>::from_timestamp(ts, 0)?;
            Some(PricePoint {
                date,
                copper: round_to(close, 2),
                gold: gold.closes.get(i).map(|g| round_to(g, 0)),
            })
        })
        .collect();

    let skip = points.len().saturating_sub(HISTORY_POINTS);
    points.into_iter().skip(skip).collect()
}
