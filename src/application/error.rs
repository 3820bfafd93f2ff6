//! Application-level errors

use thiserror::Error;

/// Failures of the layers around the engine.
///
/// Engine rejections never show up here: they are explanation steps.
#[derive(Error, Debug)]
pub enum ApplicationError {
    #[error("invalid script command '{command}': {reason}")]
    InvalidScript { command: String, reason: String },

    #[error("invalid edge '{0}': expected SOURCE-TARGET:WEIGHT, e.g. 1-2:5")]
    InvalidEdgeSpec(String),

    #[error("config error: {message}")]
    Config { message: String },

    #[error("serialization failed: {message}")]
    Serialize { message: String },

    #[error("operation failed: {context}")]
    OperationFailed {
        context: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

/// Result type for application layer operations.
pub type ApplicationResult<T> = Result<T, ApplicationError>;

impl From<serde_json::Error> for ApplicationError {
    fn from(e: serde_json::Error) -> Self {
        ApplicationError::Serialize {
            message: e.to_string(),
        }
    }
}
