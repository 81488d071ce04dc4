use thiserror::Error;

#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("save file i/o failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("save file is corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),
}

impl PersistenceError {
    /// First run: nothing has been saved yet.
    pub fn is_missing(&self) -> bool {
        matches!(self, PersistenceError::Io(e) if e.kind() == std::io::ErrorKind::NotFound)
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{var} must be a non-negative integer, got {value:?}")]
    InvalidNumber { var: &'static str, value: String },
    #[error("{var} must be a number, got {value:?}")]
    InvalidDistance { var: &'static str, value: String },
    #[error("LOBBY_LADDER_POLICY must be `cap` or `wrap`, got {0:?}")]
    InvalidPolicy(String),
    #[error("LOBBY_DAILY_LADDER must list at least one reward")]
    EmptyLadder,
    #[error("LOBBY_REFILL_INTERVAL_SECS must be greater than zero")]
    ZeroRefillInterval,
}
