//! Shared utilities for use cases.
//!
//! Cancellation checks and the select-against-token helper used at every
//! suspension point of a turn.

use crate::use_cases::run_turn::RunTurnError;
use std::future::Future;
use tokio_util::sync::CancellationToken;

/// Check if cancellation has been requested.
///
/// Returns `Err(RunTurnError::Cancelled)` if the token exists and is cancelled.
pub(crate) fn check_cancelled(token: &Option<CancellationToken>) -> Result<(), RunTurnError> {
    if let Some(token) = token
        && token.is_cancelled()
    {
        return Err(RunTurnError::Cancelled);
    }
    Ok(())
}

/// Drive `future` until it completes or the token fires.
///
/// On cancellation the future is dropped in place, which is what aborts an
/// in-flight HTTP request or kills a running subprocess.
pub(crate) async fn run_cancellable<F>(
    token: &Option<CancellationToken>,
    future: F,
) -> Result<F::Output, RunTurnError>
where
    F: Future,
{
    check_cancelled(token)?;
    match token {
        Some(token) => tokio::select! {
            biased;
            _ = token.cancelled() => Err(RunTurnError::Cancelled),
            output = future => Ok(output),
        },
        None => Ok(future.await),
    }
}
