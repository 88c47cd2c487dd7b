//! Signal evaluation: weighted rule score and BUY/SELL/HOLD decision.

pub mod decision;
pub mod engine;
pub mod scoring;

pub use decision::*;
pub use engine::*;
pub use scoring::*;
