//! Error types for the cloud drafts client

use serde::Serialize;
use thiserror::Error;

/// Client error types
#[derive(Error, Debug)]
pub enum DraftsError {
    #[error("Git error: {0}")]
    Git(#[from] git2::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Repository not found: {0}")]
    RepositoryNotFound(String),

    /// No usable remote, or the client itself is misconfigured
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The base reference of a patch could not be resolved to a commit
    #[error("No commit found for {0}")]
    ReferenceResolution(String),

    /// Network failure, timeout, or a non-success status
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Operation failed: {0}")]
    OperationFailed(String),

    /// Draft and changeset records exist remotely but the upload failed
    #[error("Draft {draft_id} was created but uploading changeset {changeset_id} failed: {source}")]
    PartialDraft {
        draft_id: String,
        changeset_id: String,
        #[source]
        source: Box<DraftsError>,
    },
}

impl DraftsError {
    /// Stable machine-readable code for this error
    pub fn code(&self) -> &'static str {
        match self {
            DraftsError::Git(_) => "GIT_ERROR",
            DraftsError::Io(_) => "IO_ERROR",
            DraftsError::Serialization(_) => "SERIALIZATION_ERROR",
            DraftsError::RepositoryNotFound(_) => "REPO_NOT_FOUND",
            DraftsError::Configuration(_) => "CONFIGURATION_ERROR",
            DraftsError::ReferenceResolution(_) => "REFERENCE_NOT_RESOLVED",
            DraftsError::Transport(_) => "TRANSPORT_ERROR",
            DraftsError::InvalidResponse(_) => "INVALID_RESPONSE",
            DraftsError::OperationFailed(_) => "OPERATION_FAILED",
            DraftsError::PartialDraft { .. } => "PARTIAL_DRAFT",
        }
    }
}

/// Serializable error response for hosts that forward errors over IPC
#[derive(Serialize, Debug)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
    pub details: Option<String>,
}

impl From<&DraftsError> for ErrorResponse {
    fn from(error: &DraftsError) -> Self {
        let details = match error {
            DraftsError::PartialDraft { draft_id, .. } => Some(draft_id.clone()),
            _ => None,
        };

        ErrorResponse {
            code: error.code().to_string(),
            message: error.to_string(),
            details,
        }
    }
}

impl From<DraftsError> for ErrorResponse {
    fn from(error: DraftsError) -> Self {
        ErrorResponse::from(&error)
    }
}

impl serde::Serialize for DraftsError {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        ErrorResponse::from(self).serialize(serializer)
    }
}

/// Result type alias for draft operations
pub type Result<T> = std::result::Result<T, DraftsError>;
