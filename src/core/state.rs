//! Dashboard application state.
//!
//! Owns the current readings, the committed rule set and the notification
//! feed. The indicator engine and the scorer stay pure; this type only hands
//! them snapshots.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, error, info, warn};

use crate::core::refresh::MarketRefresher;
use crate::error::{AppError, Result};
use crate::indicators::registry::{Freshness, IndicatorRegistry};
use crate::metrics::Metrics;
use crate::models::indicators::{IndicatorReadings, PricePoint};
use crate::models::rules::{IndicatorKey, RuleSet};
use crate::models::signal::{Notification, Signal};
use crate::settings::{SettingsDraft, SettingsStore};
use crate::signals::engine::{Evaluation, SignalEngine};

/// Most recent notifications kept in the feed.
pub const MAX_NOTIFICATIONS: usize = 5;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IndicatorView {
    pub name: &'static str,
    pub enabled: bool,
    pub condition: String,
    pub freshness: Freshness,
}

/// Everything the dashboard renders in one response.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardView {
    pub readings: IndicatorReadings,
    #[serde(flatten)]
    pub evaluation: Evaluation,
    pub indicators: BTreeMap<IndicatorKey, IndicatorView>,
    pub last_updated: Option<DateTime<Utc>>,
    pub alerts_enabled: bool,
    pub notifications: Vec<Notification>,
    pub refreshing: bool,
}

struct Inner {
    readings: IndicatorReadings,
    rules: RuleSet,
    history: Vec<PricePoint>,
    last_updated: Option<DateTime<Utc>>,
    alerts_enabled: bool,
    notifications: Vec<Notification>,
    next_notification_id: i64,
}

pub struct DashboardState {
    inner: RwLock<Inner>,
    refresher: MarketRefresher,
    store: SettingsStore,
    metrics: Option<Arc<Metrics>>,
}

impl DashboardState {
    /// Build the state with default readings and the persisted rules.
    pub async fn load(refresher: MarketRefresher, store: SettingsStore) -> Self {
        let rules = store.load().await;
        Self {
            inner: RwLock::new(Inner {
                readings: IndicatorReadings::default(),
                rules,
                history: Vec::new(),
                last_updated: None,
                alerts_enabled: true,
                notifications: Vec::new(),
                next_notification_id: 1,
            }),
            refresher,
            store,
            metrics: None,
        }
    }

    pub fn with_metrics(mut self, metrics: Arc<Metrics>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    pub async fn readings(&self) -> IndicatorReadings {
        self.inner.read().await.readings
    }

    pub async fn rules(&self) -> RuleSet {
        self.inner.read().await.rules
    }

    pub async fn history(&self) -> Vec<PricePoint> {
        self.inner.read().await.history.clone()
    }

    pub async fn evaluate(&self) -> Evaluation {
        let inner = self.inner.read().await;
        SignalEngine::evaluate(&inner.readings, &inner.rules)
    }

    pub async fn dashboard(&self) -> DashboardView {
        let inner = self.inner.read().await;
        let indicators = IndicatorKey::ALL
            .into_iter()
            .map(|key| {
                let info = IndicatorRegistry::info(key);
                let view = IndicatorView {
                    name: info.name,
                    enabled: inner.rules.is_enabled(key),
                    condition: inner.rules.condition_label(key),
                    freshness: info.freshness,
                };
                (key, view)
            })
            .collect();

        DashboardView {
            readings: inner.readings,
            evaluation: SignalEngine::evaluate(&inner.readings, &inner.rules),
            indicators,
            last_updated: inner.last_updated,
            alerts_enabled: inner.alerts_enabled,
            notifications: inner.notifications.clone(),
            refreshing: self.refresher.is_refreshing(),
        }
    }

    /// Pull fresh market data and replace the readings.
    ///
    /// On failure the previous readings and history stay as they were. A
    /// request rejected because another refresh is running is not counted.
    pub async fn refresh(&self) -> Result<Evaluation> {
        let previous = self.readings().await;

        let outcome = match self.refresher.refresh(&previous).await {
            Ok(outcome) => {
                if let Some(metrics) = &self.metrics {
                    metrics.market_refresh_total.inc();
                }
                outcome
            }
            Err(AppError::RefreshInProgress) => {
                debug!("Refresh already in flight, request rejected");
                return Err(AppError::RefreshInProgress);
            }
            Err(e) => {
                if let Some(metrics) = &self.metrics {
                    metrics.market_refresh_total.inc();
                    metrics.market_refresh_failures_total.inc();
                }
                warn!(error = %e, "Market data refresh failed, keeping previous readings");
                return Err(e);
            }
        };

        let mut inner = self.inner.write().await;
        let before = SignalEngine::evaluate(&inner.readings, &inner.rules).signal;
        let after = SignalEngine::evaluate(&outcome.readings, &inner.rules);

        inner.readings = outcome.readings;
        inner.history = outcome.history;
        inner.last_updated = Some(Utc::now());

        if after.signal != before {
            info!(from = %before, to = %after.signal, "Signal changed");
            let message = format!(
                "Signal changed: {} -> {} (score {}%)",
                before, after.signal, after.score.percentage
            );
            push_notification(&mut inner, message);
        }

        if let Some(metrics) = &self.metrics {
            metrics.signal_score_percentage.set(i64::from(after.score.percentage));
        }

        Ok(after)
    }

    /// Staged copy of the current settings for editing.
    pub async fn begin_edit(&self) -> SettingsDraft {
        SettingsDraft::from_rules(&self.inner.read().await.rules)
    }

    /// Commit a draft: persist it, then swap in the new rule set.
    ///
    /// The write lock is held across the save so commits never interleave.
    pub async fn save_settings(&self, draft: &SettingsDraft) -> Result<RuleSet> {
        let mut inner = self.inner.write().await;
        let rules = draft.apply_to(&inner.rules)?;

        if let Err(e) = self.store.save(&rules).await {
            error!(error = %e, path = %self.store.path().display(), "Failed to persist settings");
            return Err(e);
        }

        inner.rules = rules;
        info!("Settings saved");
        Ok(rules)
    }

    /// Disable one indicator in the live rule set without persisting.
    pub async fn remove_indicator(&self, key: IndicatorKey) -> RuleSet {
        let mut inner = self.inner.write().await;
        inner.rules.set_enabled(key, false);
        info!(indicator = %key, "Indicator disabled");
        inner.rules
    }

    pub async fn set_alerts_enabled(&self, enabled: bool) {
        self.inner.write().await.alerts_enabled = enabled;
    }

    pub async fn notifications(&self) -> Vec<Notification> {
        self.inner.read().await.notifications.clone()
    }
}

fn push_notification(inner: &mut Inner, message: String) {
    if !inner.alerts_enabled {
        return;
    }
    let id = inner.next_notification_id;
    inner.next_notification_id += 1;
    inner.notifications.insert(
        0,
        Notification {
            id,
            message,
            created_at: Utc::now(),
        },
    );
    inner.notifications.truncate(MAX_NOTIFICATIONS);
}
