//! Prometheus metrics exported at `/metrics`.

use prometheus::{Encoder, Histogram, HistogramOpts, IntCounter, IntGauge, Registry, TextEncoder};

pub struct Metrics {
    registry: Registry,
    pub http_requests_total: IntCounter,
    pub http_request_duration_seconds: Histogram,
    pub http_requests_in_flight: IntGauge,
    pub market_refresh_total: IntCounter,
    pub market_refresh_failures_total: IntCounter,
    pub signal_score_percentage: IntGauge,
}

impl Metrics {
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let http_requests_total =
            IntCounter::new("http_requests_total", "Total number of HTTP requests")?;
        let http_request_duration_seconds = Histogram::with_opts(HistogramOpts::new(
            "http_request_duration_seconds",
            "HTTP request latency in seconds",
        ))?;
        let http_requests_in_flight =
            IntGauge::new("http_requests_in_flight", "HTTP requests currently being served")?;
        let market_refresh_total =
            IntCounter::new("market_refresh_total", "Market data refreshes attempted")?;
        let market_refresh_failures_total = IntCounter::new(
            "market_refresh_failures_total",
            "Market data refreshes that failed and kept the previous readings",
        )?;
        let signal_score_percentage = IntGauge::new(
            "signal_score_percentage",
            "Weighted rule score after the last successful refresh",
        )?;

        registry.register(Box::new(http_requests_total.clone()))?;
        registry.register(Box::new(http_request_duration_seconds.clone()))?;
        registry.register(Box::new(http_requests_in_flight.clone()))?;
        registry.register(Box::new(market_refresh_total.clone()))?;
        registry.register(Box::new(market_refresh_failures_total.clone()))?;
        registry.register(Box::new(signal_score_percentage.clone()))?;

        Ok(Self {
            registry,
            http_requests_total,
            http_request_duration_seconds,
            http_requests_in_flight,
            market_refresh_total,
            market_refresh_failures_total,
            signal_score_percentage,
        })
    }

    /// Render all metrics in the Prometheus text format.
    pub fn export(&self) -> Result<String, prometheus::Error> {
        let mut buffer = Vec::new();
        TextEncoder::new().encode(&self.registry.gather(), &mut buffer)?;
        String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(e.to_string()))
    }
}
