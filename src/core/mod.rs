//! Core application primitives (refresh orchestration, dashboard state, HTTP)

pub mod http;
pub mod refresh;
pub mod state;

pub use http::*;
pub use refresh::*;
pub use state::*;
