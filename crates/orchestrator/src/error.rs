//! Error types for orchestrator operations.

use database::DatabaseError;
use provider_core::ProviderError;
use thiserror::Error;
use transport::TransportError;

/// Errors that can occur during orchestration.
///
/// These never reach the end user verbatim: `handle_message` maps every
/// failure to a localized fallback reply and keeps diagnostics in the logs.
#[derive(Debug, Error)]
pub enum OrchestratorError {
    /// Startup configuration is unusable (e.g. missing credential for the
    /// selected provider). Fatal: the process must not accept traffic.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The provider adapter failed or timed out.
    #[error("provider error: {0}")]
    Provider(#[from] ProviderError),

    /// Persistence failed; the turn must not report success.
    #[error("database error: {0}")]
    Database(#[from] DatabaseError),

    /// The transport rejected an outbound send.
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),
}
