use thiserror::Error;

/// Errors surfaced by the store, persistence, and export layers.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Persistence error: {0}")]
    Storage(String),

    #[error("Invalid reference: {0}")]
    InvalidRef(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}
