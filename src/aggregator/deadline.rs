// src/aggregator/deadline.rs
// Bounds one adapter call's wall-clock latency.

use std::future::Future;
use std::time::Duration;

use anyhow::Result;

use crate::error::SourceFailure;
use crate::topic::Topic;

/// Race an adapter invocation against its budget. Exactly one outcome is
/// returned: the adapter's result, or `SourceFailure::Timeout`.
///
/// On expiry the adapter future is dropped, which cancels its work at the
/// next await point. This is a best-effort bound, not a hard guarantee: I/O
/// already owned by the HTTP client's pool can outlive the call. The shared
/// client's own request timeout limits how long that lingers.
pub async fn guard<F>(
    source: &'static str,
    budget: Duration,
    fut: F,
) -> Result<Vec<Topic>, SourceFailure>
where
    F: Future<Output = Result<Vec<Topic>>>,
{
    match tokio::time::timeout(budget, fut).await {
        Ok(Ok(topics)) => Ok(topics),
        Ok(Err(reason)) => Err(SourceFailure::Fetch {
            name: source,
            reason,
        }),
        Err(_) => Err(SourceFailure::Timeout {
            name: source,
            budget_ms: budget.as_millis() as u64,
        }),
    }
}
