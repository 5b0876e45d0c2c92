//! Shared utilities for use cases.
//!
//! Timeout and cancellation helpers used by the fusion and answer flows.

use std::future::Future;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Await `future`, bounded by `timeout` when one is configured.
///
/// `on_timeout` maps the elapsed limit to the caller's error type.
pub(crate) async fn bounded<T, E, F>(
    timeout: Option<Duration>,
    future: F,
    on_timeout: impl FnOnce(Duration) -> E,
) -> Result<T, E>
where
    F: Future<Output = Result<T, E>>,
{
    match timeout {
        Some(limit) => match tokio::time::timeout(limit, future).await {
            Ok(result) => result,
            Err(_) => Err(on_timeout(limit)),
        },
        None => future.await,
    }
}

/// True if the token exists and has been cancelled.
pub(crate) fn is_cancelled(token: &Option<CancellationToken>) -> bool {
    token.as_ref().is_some_and(CancellationToken::is_cancelled)
}
