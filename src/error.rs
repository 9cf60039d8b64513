use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum NormalizeError {
    #[error("{record}: missing field `{field}`")]
    MissingField { record: &'static str, field: &'static str },

    #[error("player `{player}` has no statistics entries")]
    NoStatistics { player: String },
}

#[derive(Debug, Error, PartialEq)]
pub enum StatsError {
    #[error("team not found in standings: {0}")]
    TeamNotFound(String),

    #[error("fixture {match_id:?} has no final score")]
    UnplayedFixture { match_id: Option<u64> },

    #[error("fixture {match_id:?} does not involve {team}")]
    NotInvolved { team: String, match_id: Option<u64> },
}

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{endpoint} returned status {status}")]
    Status { endpoint: String, status: u16 },

    #[error("{endpoint} reported errors: {message}")]
    Api { endpoint: String, message: String },

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("API_KEY is not set")]
    MissingApiKey,

    #[error("{name} must be a number, got `{value}`")]
    Invalid { name: &'static str, value: String },
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Normalize(#[from] NormalizeError),

    #[error(transparent)]
    Stats(#[from] StatsError),

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

pub type Result<T> = std::result::Result<T, AppError>;
