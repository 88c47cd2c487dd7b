use thiserror::Error as ThisError;

#[derive(ThisError, Debug)]
pub enum AppError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Request to {0} timed out")]
    Timeout(String),

    #[error("Upstream payload error: {0}")]
    Upstream(String),

    #[error("A market data refresh is already in progress")]
    RefreshInProgress,

    #[error("Unknown indicator: {0}")]
    UnknownIndicator(String),

    #[error("Invalid settings: {0}")]
    InvalidSettings(String),

    #[error("Settings error: {0}")]
    Settings(String),

    #[error("IO error: {0}")]
    Io(String),
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Io(err.to_string())
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            AppError::Upstream(err.to_string())
        } else {
            AppError::Network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Settings(format!("JSON error: {}", err))
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
