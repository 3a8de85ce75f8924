//! Labelled deadlines for async operations.
//!
//! Both timeout layers in the service go through [`with_deadline`]: the inner
//! per-item layer (one forum search, one page fetch) and the outer
//! whole-operation layer. The label travels with the error so a timeout in
//! the logs or an API response says which boundary fired.

use std::future::Future;
use std::time::Duration;

use thiserror::Error;

/// A deadline fired before the wrapped operation completed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{label} timed out after {}ms", .limit.as_millis())]
pub struct DeadlineElapsed {
    pub label: String,
    pub limit: Duration,
}

/// Await `operation`, giving up after `limit`.
///
/// On timeout the future is dropped; work it had already dispatched is not
/// cancelled, only no longer awaited.
///
/// # Errors
///
/// Returns [`DeadlineElapsed`] carrying `label` if `limit` passes first.
pub async fn with_deadline<T, Fut>(
    label: impl Into<String>,
    limit: Duration,
    operation: Fut,
) -> Result<T, DeadlineElapsed>
where
    Fut: Future<Output = T>,
{
    let label = label.into();
    if let Ok(value) = tokio::time::timeout(limit, operation).await {
        Ok(value)
    } else {
        tracing::debug!(
            label = %label,
            limit_ms = u64::try_from(limit.as_millis()).unwrap_or(u64::MAX),
            "deadline elapsed"
        );
        Err(DeadlineElapsed { label, limit })
    }
}
