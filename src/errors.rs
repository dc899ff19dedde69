use thiserror::Error;
use uuid::Uuid;

/// Unified error type for the pattern, generation, and storage layers.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Invalid pattern: {0}")]
    Validation(String),
    #[error("Recurring expense not found: {0}")]
    PatternNotFound(Uuid),
    #[error("Expense not found: {0}")]
    ExpenseNotFound(Uuid),
    #[error("Persistence error: {0}")]
    Storage(String),
    #[error("Generation already in progress")]
    GenerationInProgress,
    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, EngineError>;

impl From<std::io::Error> for EngineError {
    fn from(err: std::io::Error) -> Self {
        EngineError::Storage(err.to_string())
    }
}

impl From<serde_json::Error> for EngineError {
    fn from(err: serde_json::Error) -> Self {
        EngineError::Storage(err.to_string())
    }
}
