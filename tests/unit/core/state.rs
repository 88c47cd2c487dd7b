//! Unit tests for dashboard state

use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use async_trait::async_trait;
use copper_signal::core::refresh::MarketRefresher;
use copper_signal::core::state::{DashboardState, MAX_NOTIFICATIONS};
use copper_signal::error::{AppError, Result};
use copper_signal::indicators::registry::Freshness;
use copper_signal::metrics::Metrics;
use copper_signal::models::indicators::{ChartSeries, IndicatorReadings, PriceSeries};
use copper_signal::models::rules::{IndicatorKey, RuleSet};
use copper_signal::models::signal::Signal;
use copper_signal::services::market_data::MarketDataProvider;
use copper_signal::settings::SettingsStore;
use tokio::sync::Semaphore;

fn temp_settings_path(name: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    std::env::temp_dir()
        .join(format!("copper-signal-state-{}-{}-{}", name, std::process::id(), nanos))
        .join("settings.json")
}

/// Rising copper; the dollar index alternates between 110 and 90 on each refresh.
struct AlternatingDollarProvider {
    dollar_calls: AtomicUsize,
}

#[async_trait]
impl MarketDataProvider for AlternatingDollarProvider {
    async fn fetch_chart(&self, symbol: &str) -> Result<ChartSeries> {
        let latest = match symbol {
            "DX-Y.NYB" => {
                let n = self.dollar_calls.fetch_add(1, Ordering::SeqCst);
                if n % 2 == 0 {
                    110.0
                } else {
                    90.0
                }
            }
            "GC=F" => 2300.0,
            _ => 4.5,
        };
        Ok(ChartSeries {
            symbol: symbol.to_string(),
            latest_price: Some(latest),
            timestamps: (0..40).map(|i| 1_700_000_000 + i * 86_400).collect(),
            closes: PriceSeries::new((0..40).map(|i| Some(4.0 + i as f64 * 0.01)).collect()),
        })
    }
}

struct GatedProvider {
    inner: AlternatingDollarProvider,
    gate: Semaphore,
}

#[async_trait]
impl MarketDataProvider for GatedProvider {
    async fn fetch_chart(&self, symbol: &str) -> Result<ChartSeries> {
        let _permit = self.gate.acquire().await.expect("gate open");
        self.inner.fetch_chart(symbol).await
    }
}

struct FailingProvider;

#[async_trait]
impl MarketDataProvider for FailingProvider {
    async fn fetch_chart(&self, symbol: &str) -> Result<ChartSeries> {
        Err(AppError::Timeout(symbol.to_string()))
    }
}

async fn state_with(
    provider: Arc<dyn MarketDataProvider>,
    name: &str,
) -> (DashboardState, PathBuf) {
    let path = temp_settings_path(name);
    let state =
        DashboardState::load(MarketRefresher::new(provider), SettingsStore::new(&path)).await;
    (state, path)
}

async fn alternating_state(name: &str) -> (DashboardState, PathBuf) {
    let provider = Arc::new(AlternatingDollarProvider {
        dollar_calls: AtomicUsize::new(0),
    });
    state_with(provider, name).await
}

#[tokio::test]
async fn test_failed_refresh_keeps_previous_readings() {
    let (state, _) = state_with(Arc::new(FailingProvider), "failing").await;

    let result = state.refresh().await;
    assert!(matches!(result, Err(AppError::Timeout(_))));

    let view = state.dashboard().await;
    assert_eq!(view.readings, IndicatorReadings::default());
    assert!(view.last_updated.is_none());
    assert!(state.history().await.is_empty());
    assert!(view.notifications.is_empty());
}

#[tokio::test]
async fn test_refresh_replaces_readings_and_records_signal_change() {
    let (state, _) = alternating_state("refresh").await;
    assert_eq!(state.evaluate().await.signal, Signal::Buy);

    let evaluation = state.refresh().await.unwrap();
    assert_eq!(evaluation.signal, Signal::Hold);

    let view = state.dashboard().await;
    assert_eq!(view.readings.dollar_index, 110.0);
    assert_eq!(view.readings.copper_price, 4.5);
    assert_eq!(view.readings.pmi, 50.2);
    assert_eq!(view.readings.inventory, 145_000.0);
    assert!(view.last_updated.is_some());
    assert_eq!(state.history().await.len(), 40);
    assert_eq!(view.notifications.len(), 1);
    assert_eq!(view.notifications[0].message, "Signal changed: BUY -> HOLD (score 40%)");
}

#[tokio::test]
async fn test_notifications_are_capped() {
    let (state, _) = alternating_state("capped").await;
    for _ in 0..7 {
        state.refresh().await.unwrap();
    }

    let notifications = state.notifications().await;
    assert_eq!(notifications.len(), MAX_NOTIFICATIONS);
    assert!(notifications[0].message.starts_with("Signal changed: BUY -> HOLD"));
    assert!(notifications[1].message.starts_with("Signal changed: HOLD -> BUY"));
}

#[tokio::test]
async fn test_disabled_alerts_record_nothing() {
    let (state, _) = alternating_state("alerts-off").await;
    state.set_alerts_enabled(false).await;

    state.refresh().await.unwrap();
    assert!(state.notifications().await.is_empty());
    assert!(!state.dashboard().await.alerts_enabled);
}

#[tokio::test]
async fn test_saving_a_draft_commits_and_persists() {
    let (state, path) = alternating_state("save").await;

    let mut draft = state.begin_edit().await;
    draft.toggle(IndicatorKey::Inventory);
    draft.set_rsi_thresholds(50.0, 70.0);
    assert_eq!(state.rules().await, RuleSet::default());

    let rules = state.save_settings(&draft).await.unwrap();
    assert!(!rules.inventory.enabled);
    assert_eq!(state.rules().await, rules);

    let evaluation = state.evaluate().await;
    assert_eq!(evaluation.score.max_score, 80);
    assert_eq!(evaluation.score.score, 80);

    let reloaded = SettingsStore::new(&path).load().await;
    assert_eq!(reloaded, rules);
}

#[tokio::test]
async fn test_invalid_draft_leaves_rules_untouched() {
    let (state, path) = alternating_state("invalid").await;

    let mut draft = state.begin_edit().await;
    draft.toggle(IndicatorKey::Pmi);
    draft.set_rsi_thresholds(120.0, 65.0);

    assert!(matches!(
        state.save_settings(&draft).await,
        Err(AppError::InvalidSettings(_))
    ));
    assert_eq!(state.rules().await, RuleSet::default());
    assert!(!path.exists());
}

#[tokio::test]
async fn test_remove_indicator_is_not_persisted() {
    let (state, path) = alternating_state("remove").await;

    let rules = state.remove_indicator(IndicatorKey::Macd).await;
    assert!(!rules.macd.enabled);
    assert!(!state.dashboard().await.indicators[&IndicatorKey::Macd].enabled);
    assert!(!path.exists());
}

#[tokio::test]
async fn test_dashboard_lists_every_indicator() {
    let (state, _) = alternating_state("view").await;
    let view = state.dashboard().await;

    assert_eq!(view.indicators.len(), IndicatorKey::ALL.len());
    assert_eq!(view.indicators[&IndicatorKey::Pmi].freshness, Freshness::Periodic);
    assert_eq!(view.indicators[&IndicatorKey::Rsi].freshness, Freshness::Realtime);
    assert_eq!(view.indicators[&IndicatorKey::Inventory].condition, "< 145,000");
    assert!(!view.refreshing);
}

#[tokio::test]
async fn test_notification_ids_are_unique_and_increasing() {
    let (state, _) = alternating_state("ids").await;
    for _ in 0..3 {
        state.refresh().await.unwrap();
    }

    let ids: Vec<i64> = state.notifications().await.iter().map(|n| n.id).collect();
    assert_eq!(ids, vec![3, 2, 1]);
}

#[tokio::test]
async fn test_rejected_refresh_is_not_counted_as_failure() {
    let provider = Arc::new(GatedProvider {
        inner: AlternatingDollarProvider {
            dollar_calls: AtomicUsize::new(0),
        },
        gate: Semaphore::new(0),
    });
    let metrics = Arc::new(Metrics::new().unwrap());
    let (state, _) = state_with(provider.clone(), "in-flight").await;
    let state = Arc::new(state.with_metrics(metrics.clone()));

    let first = {
        let state = state.clone();
        tokio::spawn(async move { state.refresh().await })
    };
    while !state.dashboard().await.refreshing {
        tokio::task::yield_now().await;
    }

    let second = state.refresh().await;
    assert!(matches!(second, Err(AppError::RefreshInProgress)));
    assert_eq!(metrics.market_refresh_total.get(), 0);
    assert_eq!(metrics.market_refresh_failures_total.get(), 0);

    provider.gate.add_permits(3);
    first.await.expect("refresh task").unwrap();
    assert_eq!(metrics.market_refresh_total.get(), 1);
    assert_eq!(metrics.market_refresh_failures_total.get(), 0);
}
