//! Persisted rule configuration and the staged edit used by the settings panel.

pub mod draft;
pub mod store;

pub use draft::SettingsDraft;
pub use store::{CustomSettings, PersistedSettings, SettingsStore};
