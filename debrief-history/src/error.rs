use thiserror::Error;

#[derive(Debug, Error)]
pub enum HistoryError {
    #[error("Rating must be -1, 0 or 1 but was {0}")]
    InvalidRating(i8),
    #[error("Call record is not a json object")]
    InvalidRecord,
    #[error("File lookup failed: {0}")]
    LookupFailed(String),
    #[error("Call record operation failed")]
    RecordOperationFailed(#[from] std::io::Error),
    #[error("Call record is poisoned")]
    RecordPoisoned,
    #[error("Call record serialization failed")]
    SerializationFailed(#[from] serde_json::Error),
}
