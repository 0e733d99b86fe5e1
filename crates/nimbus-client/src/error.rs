//! Error types for nimbus-client.

use thiserror::Error;

/// Outcome of a single remote operation.
///
/// Built exclusively by operation execution: the success arm carries the
/// typed payload, every failure reaches the caller as a [`RemoteError`].
pub type RemoteResult<T> = Result<T, RemoteError>;

/// Uniform failure shape for remote operations.
#[derive(Debug, Error)]
pub enum RemoteError {
    /// The exchange never completed (connection refused, timeout, TLS
    /// failure, aborted transfer). Carries the transport's own error as the
    /// cause. Never retried here.
    #[error("transport failure: {0}")]
    Transport(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// The server answered outside the success class, or rejected the
    /// request in the OCS meta block despite an HTTP 200.
    #[error("unexpected status {status}: {message}")]
    Status { status: u16, message: String },

    /// The response body does not match the expected schema. Reported even
    /// when the HTTP status was success: a malformed success body is not
    /// trustworthy.
    #[error("malformed response body: {0}")]
    Parse(#[source] serde_json::Error),
}

impl RemoteError {
    pub(crate) fn transport<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        RemoteError::Transport(Box::new(err))
    }

    /// HTTP (or OCS meta) status code, absent for transport and parse
    /// failures.
    pub fn status(&self) -> Option<u16> {
        match self {
            RemoteError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_transport(&self) -> bool {
        matches!(self, RemoteError::Transport(_))
    }

    pub fn is_parse(&self) -> bool {
        matches!(self, RemoteError::Parse(_))
    }
}

/// A profile field identifier outside the closed set.
///
/// Raised when parsing field names from configuration or user input, before
/// any network exchange takes place.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown profile field: {0}")]
pub struct UnknownFieldError(pub String);
