//! External collaborators: market data sources.

pub mod market_data;
pub mod yahoo;

pub use market_data::*;
pub use yahoo::YahooChartProvider;
