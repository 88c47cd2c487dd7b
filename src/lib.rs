//! Copper signal engine: indicator math, rule scoring and the dashboard API
//! that serves them.

pub mod common;
pub mod config;
pub mod core;
pub mod error;
pub mod indicators;
pub mod logging;
pub mod metrics;
pub mod models;
pub mod services;
pub mod settings;
pub mod signals;

pub use error::{AppError, Result};
