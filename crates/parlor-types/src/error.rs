use thiserror::Error;

/// Failures of calls to the chat server (network, HTTP, or payload).
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RemoteError {
    #[error("transport error: {0}")]
    Transport(String),

    /// The server answered with an `{"error": ...}` payload.
    #[error("{0}")]
    Server(String),

    #[error("malformed payload: {0}")]
    MalformedPayload(String),
}

/// Errors from the speech synthesis backend.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SpeechError {
    #[error("speech synthesis unavailable")]
    Unavailable,

    #[error("synthesis failed: {0}")]
    Synthesis(String),

    #[error("utterance interrupted")]
    Interrupted,
}

/// Errors from the speech-to-text backend.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RecognitionError {
    #[error("speech recognition not configured")]
    Unavailable,

    #[error("recognition failed: {0}")]
    Failed(String),
}

/// Errors from repository operations (used by the cache trait in parlor-core).
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database connection error")]
    Connection,

    #[error("query error: {0}")]
    Query(String),

    #[error("entity not found")]
    NotFound,
}

/// Errors surfaced by `ChatStore` operations.
#[derive(Debug, Error)]
pub enum ChatError {
    #[error(transparent)]
    Remote(#[from] RemoteError),

    #[error("cache error: {0}")]
    Cache(#[from] RepositoryError),

    #[error("invalid input: {0}")]
    Validation(String),
}
