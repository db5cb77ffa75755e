//! Cancellation utilities
//!
//! Provides a first-class cancellation handle for in-flight proxy calls. The
//! handle is observed at the two suspension points of a call: the transport
//! wait and the retry delay.

use std::future::Future;
use tokio_util::sync::CancellationToken;

use crate::error::GeneratorError;

/// A handle that can be used to request cancellation.
#[derive(Clone, Debug, Default)]
pub struct CancelHandle {
    token: CancellationToken,
}

impl CancelHandle {
    /// Create a new cancel handle.
    pub fn new() -> Self {
        Self {
            token: CancellationToken::new(),
        }
    }

    /// Request cancellation. Calls observing this handle abort their current
    /// attempt and skip any remaining retries.
    pub fn cancel(&self) {
        self.token.cancel();
    }

    /// Check if cancellation was requested.
    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// A future that resolves when cancellation is requested.
    pub fn cancelled(&self) -> tokio_util::sync::WaitForCancellationFuture<'_> {
        self.token.cancelled()
    }
}

/// Drive `future` to completion unless `cancel` fires first.
///
/// Without a handle the future runs as-is.
pub async fn run_cancellable<F, T>(
    cancel: Option<&CancelHandle>,
    future: F,
) -> Result<T, GeneratorError>
where
    F: Future<Output = Result<T, GeneratorError>>,
{
    match cancel {
        Some(handle) => {
            tokio::select! {
                biased;
                _ = handle.cancelled() => Err(GeneratorError::Cancelled),
                res = future => res,
            }
        }
        None => future.await,
    }
}
