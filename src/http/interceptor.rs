//! Logging handler
//!
//! A small observability handler backed by `tracing`. It records method,
//! URL, status and elapsed time; header values and bodies are never logged.
//! Add it with `with_additional_transport_handler` to trace traffic.

use async_trait::async_trait;
use tokio::time::Instant;

use crate::error::Result;
use crate::http::{HttpRequest, HttpResponse, HttpTransport, TransportHandler};

#[derive(Clone, Debug, Default)]
pub struct LoggingHandler;

#[async_trait]
impl TransportHandler for LoggingHandler {
    fn name(&self) -> &'static str {
        "logging"
    }

    async fn handle(&self, request: HttpRequest, next: &dyn HttpTransport) -> Result<HttpResponse> {
        let method = request.ctx.method.clone();
        let call_id = request.ctx.invocation_id;
        let url = request.url.to_string();
        tracing::debug!(target: "clientgen::http", %method, %call_id, verb = %request.method, %url, "sending request");

        let started = Instant::now();
        let result = next.send(request).await;
        let elapsed_ms = started.elapsed().as_millis() as u64;

        match &result {
            Ok(response) => {
                tracing::debug!(target: "clientgen::http", %method, %call_id, status = response.status, elapsed_ms, "response received");
            }
            Err(error) => {
                tracing::debug!(target: "clientgen::http", %method, %call_id, err = %error, elapsed_ms, "request error");
            }
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GeneratorError;
    use crate::http::RequestContext;
    use tracing_test::traced_test;

    struct Fails;

    #[async_trait]
    impl HttpTransport for Fails {
        async fn send(&self, _request: HttpRequest) -> Result<HttpResponse> {
            Err(GeneratorError::HttpError("connection reset".into()))
        }
    }

    #[tokio::test]
    #[traced_test]
    async fn logs_failures_and_passes_them_through() {
        let request = HttpRequest::new(
            reqwest::Method::GET,
            reqwest::Url::parse("https://svc.example/ping").unwrap(),
            RequestContext {
                method: "Health::ping".into(),
                ..Default::default()
            },
        );

        let err = LoggingHandler.handle(request, &Fails).await.unwrap_err();

        assert!(matches!(err, GeneratorError::HttpError(_)));
        assert!(logs_contain("sending request"));
        assert!(logs_contain("connection reset"));
    }
}
