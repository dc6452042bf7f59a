use thiserror::Error;

#[derive(Error, Debug)]
pub enum GraphError {
    #[error("Document store request failed: {0}")]
    StoreRequestError(#[from] reqwest::Error),

    #[error("Document store returned HTTP {status}: {message}")]
    StoreStatusError { status: u16, message: String },

    #[error("Malformed document '{document}': {message}")]
    DecodeError { document: String, message: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("RPC transport error: {0}")]
    TransportError(#[from] tonic::transport::Error),

    #[error("Remote call failed: {}", .0.message())]
    RemoteCallError(#[from] tonic::Status),

    #[error("Worker pool unavailable: {message}")]
    WorkerPoolError { message: String },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Missing configuration value: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },
}

/// Coarse classification used at the RPC and HTTP boundaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Decode,
    Unexpected,
    Transport,
    Config,
}

impl GraphError {
    pub fn decode(document: impl Into<String>, message: impl Into<String>) -> Self {
        GraphError::DecodeError {
            document: document.into(),
            message: message.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            GraphError::DecodeError { .. } => ErrorCategory::Decode,
            GraphError::TransportError(_) | GraphError::RemoteCallError(_) => {
                ErrorCategory::Transport
            }
            GraphError::ConfigError { .. }
            | GraphError::MissingConfigError { .. }
            | GraphError::InvalidConfigValueError { .. } => ErrorCategory::Config,
            GraphError::StoreRequestError(_)
            | GraphError::StoreStatusError { .. }
            | GraphError::IoError(_)
            | GraphError::SerializationError(_)
            | GraphError::WorkerPoolError { .. } => ErrorCategory::Unexpected,
        }
    }

    /// Render as the status returned from `GetGraphData`. Every failure is `Internal`.
    pub fn into_status(self) -> tonic::Status {
        match self.category() {
            ErrorCategory::Decode => {
                tonic::Status::internal(format!("Error processing document data: {}", self))
            }
            _ => tonic::Status::internal(format!("Unexpected error in GetGraphData: {}", self)),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Decode => "Inspect the offending document and fix its field types",
            ErrorCategory::Unexpected => "Check that the document store is reachable and retry",
            ErrorCategory::Transport => "Check that the aggregation service is running",
            ErrorCategory::Config => "Review the configuration file and environment variables",
        }
    }
}

pub type Result<T> = std::result::Result<T, GraphError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_error_maps_to_internal_with_processing_message() {
        let status = GraphError::decode("u1", "score must be numeric").into_status();

        assert_eq!(status.code(), tonic::Code::Internal);
        assert!(status.message().starts_with("Error processing document data:"));
        assert!(status.message().contains("score must be numeric"));
    }

    #[test]
    fn test_store_error_maps_to_internal_with_generic_message() {
        let status = GraphError::StoreStatusError {
            status: 503,
            message: "backend unavailable".to_string(),
        }
        .into_status();

        assert_eq!(status.code(), tonic::Code::Internal);
        assert!(status.message().starts_with("Unexpected error in GetGraphData:"));
    }

    #[test]
    fn test_categories() {
        assert_eq!(
            GraphError::RemoteCallError(tonic::Status::unavailable("down")).category(),
            ErrorCategory::Transport
        );
        assert_eq!(
            GraphError::MissingConfigError {
                field: "store.project_id".to_string()
            }
            .category(),
            ErrorCategory::Config
        );
    }
}
