//! HTTP endpoint server using Axum

use axum::{
    extract::{Path, Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Json, Response},
    routing::{delete, get, post, put},
    Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::RwLock;
use tower::ServiceBuilder;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::{error, info, warn, Level};

use crate::config::AppConfig;
use crate::core::refresh::MarketRefresher;
use crate::core::state::{DashboardState, DashboardView};
use crate::error::AppError;
use crate::metrics::Metrics;
use crate::models::indicators::PricePoint;
use crate::models::rules::{IndicatorKey, RuleSet};
use crate::services::yahoo::YahooChartProvider;
use crate::settings::{SettingsDraft, SettingsStore};

#[derive(Clone)]
pub struct AppState {
    pub health: Arc<RwLock<HealthStatus>>,
    pub metrics: Arc<Metrics>,
    pub start_time: Arc<Instant>,
    pub dashboard: Arc<DashboardState>,
}

#[derive(Clone, Debug)]
pub struct HealthStatus {
    pub status: String,
}

impl Default for HealthStatus {
    fn default() -> Self {
        Self {
            status: "healthy".to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::RefreshInProgress => StatusCode::CONFLICT,
            AppError::Network(_) | AppError::Timeout(_) | AppError::Upstream(_) => {
                StatusCode::BAD_GATEWAY
            }
            AppError::UnknownIndicator(_) => StatusCode::NOT_FOUND,
            AppError::InvalidSettings(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Settings(_) | AppError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

pub async fn health_check(State(state): State<AppState>) -> Result<Json<Value>, StatusCode> {
    let health = state.health.read().await;
    let uptime_seconds = state.start_time.elapsed().as_secs();
    Ok(Json(json!({
        "status": health.status,
        "uptime_seconds": uptime_seconds,
        "service": "copper-signal"
    })))
}

pub async fn metrics_handler(State(state): State<AppState>) -> Result<String, StatusCode> {
    state
        .metrics
        .export()
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)
}

/// Middleware to track HTTP request metrics
async fn metrics_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let start = Instant::now();
    let method = request.method().clone();
    let path = request.uri().path().to_string();

    state.metrics.http_requests_in_flight.inc();
    let response = next.run(request).await;
    let status = response.status();
    let duration = start.elapsed();
    state.metrics.http_requests_in_flight.dec();

    state.metrics.http_requests_total.inc();
    state
        .metrics
        .http_request_duration_seconds
        .observe(duration.as_secs_f64());

    if status.is_server_error() {
        error!(
            method = %method,
            path = %path,
            status = %status,
            duration_ms = duration.as_millis(),
            "HTTP request error"
        );
    }

    response
}

#[derive(Debug, Deserialize)]
struct AlertsRequest {
    enabled: bool,
}

async fn get_dashboard(State(state): State<AppState>) -> Json<DashboardView> {
    Json(state.dashboard.dashboard().await)
}

async fn get_history(State(state): State<AppState>) -> Json<Vec<PricePoint>> {
    Json(state.dashboard.history().await)
}

/// Refresh market data; on failure the previous readings are kept.
async fn refresh(State(state): State<AppState>) -> Result<Json<DashboardView>, AppError> {
    state.dashboard.refresh().await?;
    Ok(Json(state.dashboard.dashboard().await))
}

async fn get_settings(State(state): State<AppState>) -> Json<RuleSet> {
    Json(state.dashboard.rules().await)
}

async fn get_settings_draft(State(state): State<AppState>) -> Json<SettingsDraft> {
    Json(state.dashboard.begin_edit().await)
}

async fn save_settings(
    State(state): State<AppState>,
    Json(draft): Json<SettingsDraft>,
) -> Result<Json<RuleSet>, AppError> {
    let rules = state.dashboard.save_settings(&draft).await?;
    Ok(Json(rules))
}

async fn remove_indicator(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<RuleSet>, AppError> {
    let key: IndicatorKey = key.parse()?;
    Ok(Json(state.dashboard.remove_indicator(key).await))
}

async fn set_alerts(
    State(state): State<AppState>,
    Json(request): Json<AlertsRequest>,
) -> Json<Value> {
    state.dashboard.set_alerts_enabled(request.enabled).await;
    Json(json!({ "enabled": request.enabled }))
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/metrics", get(metrics_handler))
        .route("/api/dashboard", get(get_dashboard))
        .route("/api/history", get(get_history))
        .route("/api/refresh", post(refresh))
        .route("/api/settings", get(get_settings))
        .route("/api/settings", put(save_settings))
        .route("/api/settings/draft", get(get_settings_draft))
        .route("/api/indicators/{key}", delete(remove_indicator))
        .route("/api/alerts", put(set_alerts))
        .layer(
            ServiceBuilder::new()
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(DefaultMakeSpan::new().level(Level::DEBUG))
                        .on_request(DefaultOnRequest::new().level(Level::DEBUG))
                        .on_response(DefaultOnResponse::new().level(Level::DEBUG)),
                )
                .layer(axum::middleware::from_fn_with_state(
                    state.clone(),
                    metrics_middleware,
                ))
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

/// Wire up the provider, state and router from `config`.
pub async fn build_app_state(config: &AppConfig) -> Result<AppState, Box<dyn std::error::Error>> {
    let metrics = Arc::new(Metrics::new()?);
    let provider = Arc::new(YahooChartProvider::new(config.market_data.clone())?);
    let refresher = MarketRefresher::new(provider);
    let store = SettingsStore::new(config.settings_path.clone());

    let dashboard = DashboardState::load(refresher, store)
        .await
        .with_metrics(metrics.clone());

    Ok(AppState {
        health: Arc::new(RwLock::new(HealthStatus::default())),
        metrics,
        start_time: Arc::new(Instant::now()),
        dashboard: Arc::new(dashboard),
    })
}

pub async fn start_server(config: AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    let state = build_app_state(&config).await?;

    if let Err(e) = state.dashboard.refresh().await {
        warn!(error = %e, "Initial market data refresh failed, serving default readings");
    }

    let app = create_router(state);
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", config.port)).await?;

    info!(port = config.port, "HTTP server listening on port {}", config.port);
    axum::serve(listener, app).await?;

    Ok(())
}
