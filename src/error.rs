//! Error types for configuration and progression loading.
//!
//! The simulation itself never fails: invalid requests are ignored. Only
//! data coming from outside (tuning files, stored progression, ship ids)
//! can be rejected.

/// Main error type for Star Catch.
#[derive(thiserror::Error, Debug)]
pub enum StarCatchError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid tuning: {0}")]
    InvalidTuning(String),

    #[error("Unknown ship: {0}")]
    UnknownShip(String),

    #[error("Unknown achievement: {0}")]
    UnknownAchievement(String),
}

pub type Result<T> = std::result::Result<T, StarCatchError>;
