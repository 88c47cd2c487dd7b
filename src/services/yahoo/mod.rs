//! Chart-data client for the public finance endpoint.

pub mod messages;
pub mod provider;

pub use provider::YahooChartProvider;
