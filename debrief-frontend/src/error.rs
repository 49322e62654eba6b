use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Error aggregation")]
    Aggregate(Vec<AppError>),
    #[error("File operation failed")]
    FileOperationFailed(#[from] std::io::Error),
    #[error("Http request failed")]
    HttpRequestFailed(#[from] reqwest::Error),
    #[error("Invalid authorization header")]
    InvalidAuthorization(#[from] reqwest::header::InvalidHeaderValue),
    #[error("Action id is required when an action endpoint is configured")]
    MissingActionId,
    #[error("Resolving the call record path failed")]
    RecordPathNotResolved,
    #[error("Serializing submission failed")]
    SerializationFailed(#[from] serde_json::Error),
    #[error("Action endpoint rejected the submission")]
    SubmissionRejected,
    #[error("Waiting for tasks failed")]
    TaskJoinFailed(#[from] tokio::task::JoinError),
    #[error("Terminal not initialized")]
    TerminalNotInitialized,
}
