// src/error.rs
// Per-source failure taxonomy. Nothing here ever reaches the caller of the
// aggregation entry point; failures are logged and converted into zero
// contribution (optionally replaced by fallback content).

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SourceFailure {
    /// Source exceeded its deadline. Soft failure, skipped, no retry within
    /// the same request.
    #[error("{name} timed out after {budget_ms}ms")]
    Timeout { name: &'static str, budget_ms: u64 },

    /// Adapter-reported error: network failure, malformed response,
    /// rate-limit rejection. Handled the same as a timeout.
    #[error("{name} fetch failed: {reason}")]
    Fetch {
        name: &'static str,
        #[source]
        reason: anyhow::Error,
    },

    /// Adapter lacks required configuration; short-circuits to the fallback
    /// provider without attempting a call.
    #[error("{name} is not configured")]
    Unavailable { name: &'static str },
}

impl SourceFailure {
    /// Which source was lost.
    pub fn source(&self) -> &'static str {
        match self {
            SourceFailure::Timeout { name, .. }
            | SourceFailure::Fetch { name, .. }
            | SourceFailure::Unavailable { name } => name,
        }
    }

    /// Short label for logs and metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            SourceFailure::Timeout { .. } => "timeout",
            SourceFailure::Fetch { .. } => "fetch",
            SourceFailure::Unavailable { .. } => "unavailable",
        }
    }
}
