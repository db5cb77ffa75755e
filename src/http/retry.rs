//! Retrying transport handler.
//!
//! Sits innermost in the handler chain, so header handlers run once per
//! logical call and every attempt re-sends the already-mutated request.

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::{GeneratorError, Result, classify_http_error};
use crate::http::{HttpRequest, HttpResponse, HttpTransport, TransportHandler};
use crate::retry::{RetryDecision, RetryStrategy};
use crate::utils::run_cancellable;

/// Status codes treated as transient failures.
fn is_retryable_status(status: u16) -> bool {
    status == 408 || status == 429 || (500..=599).contains(&status)
}

/// Re-sends failed requests as directed by a [`RetryStrategy`].
///
/// Transport errors and 408/429/5xx responses consult the strategy; any other
/// failure (including cancellation) propagates at once.
#[derive(Clone)]
pub struct RetryingHandler {
    strategy: Arc<dyn RetryStrategy>,
}

impl std::fmt::Debug for RetryingHandler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RetryingHandler").finish_non_exhaustive()
    }
}

impl RetryingHandler {
    pub fn new(strategy: Arc<dyn RetryStrategy>) -> Self {
        Self { strategy }
    }
}

#[async_trait]
impl TransportHandler for RetryingHandler {
    fn name(&self) -> &'static str {
        "retry"
    }

    async fn handle(&self, request: HttpRequest, next: &dyn HttpTransport) -> Result<HttpResponse> {
        let cancel = request.ctx.cancel.clone();
        let mut attempt: u32 = 0;

        loop {
            if cancel.as_ref().is_some_and(|c| c.is_cancelled()) {
                return Err(GeneratorError::Cancelled);
            }
            attempt += 1;

            let failure = match next.send(request.clone()).await {
                Ok(response) if !is_retryable_status(response.status) => return Ok(response),
                Ok(response) => classify_http_error(
                    &request.ctx.method,
                    response.status,
                    &response.text(),
                    &response.headers,
                ),
                Err(error) if error.is_retryable() => error,
                Err(error) => return Err(error),
            };

            match self.strategy.should_retry(attempt, &failure) {
                RetryDecision::Stop => {
                    tracing::warn!(
                        target: "clientgen::retry",
                        method = %request.ctx.method,
                        call_id = %request.ctx.invocation_id,
                        attempt,
                        err = %failure,
                        "giving up"
                    );
                    return Err(failure);
                }
                RetryDecision::RetryAfter(delay) => {
                    tracing::warn!(
                        target: "clientgen::retry",
                        method = %request.ctx.method,
                        call_id = %request.ctx.invocation_id,
                        attempt,
                        delay_ms = delay.as_millis() as u64,
                        err = %failure,
                        "attempt failed, retrying"
                    );
                    run_cancellable(cancel.as_ref(), async {
                        tokio::time::sleep(delay).await;
                        Ok(())
                    })
                    .await?;
                }
            }
        }
    }
}
