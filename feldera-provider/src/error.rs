//! Provider error types.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

use crate::client::ApiError;

/// Lifecycle operation that issued a remote call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Create,
    Read,
    Update,
    Delete,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Operation::Create => "create",
            Operation::Read => "read",
            Operation::Update => "update",
            Operation::Delete => "delete",
        };
        f.write_str(s)
    }
}

/// Errors that can occur during provider operations.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// Missing or invalid provider configuration. Blocks every operation.
    #[error("configuration: {0}")]
    Configuration(String),

    /// The stored program id is not a UUID.
    #[error("unable to parse program id {id:?}, got error: {source}")]
    Parse {
        id: String,
        #[source]
        source: uuid::Error,
    },

    /// A field required by the operation is not set.
    #[error("missing required attribute: {0}")]
    MissingAttribute(&'static str),

    /// The remote service has no program with this id.
    #[error("program {id} not found")]
    NotFound { id: String },

    /// Any other failed remote call.
    #[error("unable to {operation} program, {source}")]
    Client {
        operation: Operation,
        #[source]
        source: ApiError,
    },
}

impl ProviderError {
    /// Short headline for reporting the error to the user.
    pub fn summary(&self) -> &'static str {
        match self {
            ProviderError::Configuration(_) => "Configuration Error",
            ProviderError::Parse { .. } => "Parser Error",
            ProviderError::MissingAttribute(_) => "Missing Attribute",
            ProviderError::NotFound { .. } => "Resource Not Found",
            ProviderError::Client { .. } => "Client Error",
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, ProviderError::NotFound { .. })
    }

    /// Remote HTTP status behind a client error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            ProviderError::Client { source, .. } => source.status(),
            ProviderError::NotFound { .. } => Some(404),
            _ => None,
        }
    }
}

/// Result type for provider operations.
pub type Result<T> = std::result::Result<T, ProviderError>;

/// Errors reading or writing local files (declared config, persisted state).
#[derive(Debug, Error)]
pub enum FileError {
    #[error("failed to access {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid JSON in {}: {source}", .path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("{}: {message}", .path.display())]
    Invalid { path: PathBuf, message: String },
}

/// Errors of host-side flows that persist state locally.
#[derive(Debug, Error)]
pub enum HostError {
    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error(transparent)]
    File(#[from] FileError),

    /// Import would overwrite state that is already managed.
    #[error("state already exists at {}, refusing to import over it", .0.display())]
    StateExists(PathBuf),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_error_message_embeds_cause() {
        let err = ProviderError::Client {
            operation: Operation::Create,
            source: ApiError::Status {
                status: 409,
                body: "name taken".to_string(),
            },
        };
        assert_eq!(
            err.to_string(),
            "unable to create program, got status: 409 resp: name taken"
        );
        assert_eq!(err.summary(), "Client Error");
        assert_eq!(err.status(), Some(409));
        assert!(!err.is_not_found());
    }

    #[test]
    fn parse_error_summary() {
        let source = uuid::Uuid::parse_str("not-a-uuid").unwrap_err();
        let err = ProviderError::Parse {
            id: "not-a-uuid".to_string(),
            source,
        };
        assert_eq!(err.summary(), "Parser Error");
        assert!(err.to_string().contains("\"not-a-uuid\""));
    }
}
