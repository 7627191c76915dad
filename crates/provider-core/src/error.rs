//! Error types for provider adapter operations.

use thiserror::Error;

/// Errors that can occur while talking to an AI backend.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// The adapter is misconfigured (missing credential, bad URL).
    ///
    /// Fatal at startup: a process must not accept traffic with a
    /// misconfigured active provider.
    #[error("provider configuration error: {0}")]
    Configuration(String),

    /// The request never reached the backend or the connection failed.
    #[error("network error: {0}")]
    Network(String),

    /// The backend answered with a non-success status.
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// The backend answered, but the body could not be interpreted.
    #[error("invalid response: {0}")]
    InvalidResponse(String),

    /// A continuation handle does not belong to this provider or its
    /// state is corrupt. The caller must discard it and reopen.
    #[error("invalid continuation: {0}")]
    InvalidContinuation(String),

    /// The call exceeded the configured deadline.
    #[error("provider call timed out")]
    Timeout,
}
