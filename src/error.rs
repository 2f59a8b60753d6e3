use crate::types::MessageId;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum UsageError {
    // Transport errors
    #[error("Request to {url} failed")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Upstream {url} responded with status {status}")]
    UpstreamStatus { url: String, status: u16 },

    // Validation errors
    #[error("Failed to parse JSON: {context}")]
    Validation {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid data format: {message}")]
    InvalidData { message: String },

    // Processing errors
    #[error("Error processing message {message_id}: {detail}")]
    Processing {
        message_id: MessageId,
        detail: String,
    },

    // Configuration errors
    #[error("Invalid value '{value}' for {var}: {reason}")]
    Config {
        var: String,
        value: String,
        reason: String,
    },

    #[error("Failed to build HTTP client")]
    HttpClient(#[source] reqwest::Error),

    // Async processing
    #[error("Task failed")]
    TaskJoin(#[from] tokio::task::JoinError),

    #[error("Failed to initialize thread pool")]
    ThreadPoolInit(#[from] rayon::ThreadPoolBuildError),
}

impl UsageError {
    /// Connectivity failure or non-success status from a collaborator
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            UsageError::Transport { .. } | UsageError::UpstreamStatus { .. }
        )
    }

    /// Collaborator returned data that does not match the expected schema
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            UsageError::Validation { .. } | UsageError::InvalidData { .. }
        )
    }

    /// Internal failure while merging per-message results
    pub fn is_processing(&self) -> bool {
        matches!(
            self,
            UsageError::Processing { .. } | UsageError::TaskJoin(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, UsageError>;
