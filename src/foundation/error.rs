/// Convenience alias used throughout the crate.
pub type CinemorphResult<T> = Result<T, CinemorphError>;

/// Error type for every fallible operation in this crate.
///
/// The variants map one-to-one onto the failure classes of the session model:
/// malformed DNA ([`Validation`](Self::Validation)), operations invoked in a
/// state that forbids them ([`Precondition`](Self::Precondition)), non-success
/// backend responses ([`Backend`](Self::Backend)), and network failures
/// ([`Transport`](Self::Transport)). None of them is retried automatically;
/// the session rolls back to its last known-good state and the error is
/// surfaced to the caller.
#[derive(thiserror::Error, Debug)]
pub enum CinemorphError {
    /// A DNA payload (inbound or outbound) failed schema validation.
    #[error("validation error: {0}")]
    Validation(String),

    /// An operation was invoked in a session state that forbids it.
    /// Raised locally, before any network call is made.
    #[error("precondition error: {0}")]
    Precondition(String),

    /// The backend answered with a non-success status.
    #[error("backend error ({status}): {message}")]
    Backend {
        /// HTTP status code returned by the gateway.
        status: u16,
        /// Response body, surfaced verbatim to the caller.
        message: String,
    },

    /// The backend could not be reached (connect failure, timeout).
    #[error("transport error: {0}")]
    Transport(String),

    /// Anything else.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl CinemorphError {
    /// Builds a [`Validation`](Self::Validation) error.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Builds a [`Precondition`](Self::Precondition) error.
    pub fn precondition(msg: impl Into<String>) -> Self {
        Self::Precondition(msg.into())
    }

    /// Builds a [`Backend`](Self::Backend) error.
    pub fn backend(status: u16, message: impl Into<String>) -> Self {
        Self::Backend {
            status,
            message: message.into(),
        }
    }

    /// Builds a [`Transport`](Self::Transport) error.
    pub fn transport(msg: impl Into<String>) -> Self {
        Self::Transport(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
