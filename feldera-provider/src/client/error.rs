//! Client error types.

use thiserror::Error;

/// Errors that can occur while talking to the program API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request did not produce a response (connect, TLS, aborted).
    #[error("got error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The service answered with a status other than the expected one.
    #[error("got status: {status} resp: {body}")]
    Status { status: u16, body: String },

    /// Expected status, but the payload was empty or did not decode.
    #[error("got status: {status} resp: {body} ({reason})")]
    UnexpectedBody {
        status: u16,
        body: String,
        reason: String,
    },
}

impl ApiError {
    /// HTTP status of the response, if one was received.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Transport(_) => None,
            ApiError::Status { status, .. } | ApiError::UnexpectedBody { status, .. } => {
                Some(*status)
            }
        }
    }

    /// True if the service reported that the program does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, ApiError::Status { status: 404, .. })
    }
}
