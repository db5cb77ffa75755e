//! Transport handler chain.
//!
//! Handlers form a singly-linked chain: each link owns the handler and the
//! transport it delegates to. The chain is built once by folding the ordered
//! handler list right-to-left around the terminal transport, so the first
//! handler runs first.

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::Result;
use crate::http::{HttpRequest, HttpResponse, HttpTransport};

/// Request/response interceptor at the network boundary.
///
/// A handler either mutates the request and delegates to `next`, or
/// short-circuits with its own response or failure.
#[async_trait]
pub trait TransportHandler: Send + Sync {
    /// Short label used in logs and configuration dumps.
    fn name(&self) -> &'static str {
        "custom"
    }

    async fn handle(&self, request: HttpRequest, next: &dyn HttpTransport) -> Result<HttpResponse>;
}

struct ChainLink {
    handler: Arc<dyn TransportHandler>,
    next: Arc<dyn HttpTransport>,
}

#[async_trait]
impl HttpTransport for ChainLink {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse> {
        self.handler.handle(request, self.next.as_ref()).await
    }
}

/// Compose `handlers` (outermost first) in front of `terminal`.
pub fn compose_transport(
    handlers: &[Arc<dyn TransportHandler>],
    terminal: Arc<dyn HttpTransport>,
) -> Arc<dyn HttpTransport> {
    handlers.iter().rev().fold(terminal, |next, handler| {
        Arc::new(ChainLink {
            handler: handler.clone(),
            next,
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GeneratorError;
    use crate::http::RequestContext;
    use reqwest::header::HeaderValue;
    use std::sync::Mutex;

    struct Tag(&'static str);

    #[async_trait]
    impl TransportHandler for Tag {
        async fn handle(&self, mut request: HttpRequest, next: &dyn HttpTransport) -> Result<HttpResponse> {
            request
                .headers
                .append("x-trail", HeaderValue::from_static(self.0));
            next.send(request).await
        }
    }

    struct Reject;

    #[async_trait]
    impl TransportHandler for Reject {
        async fn handle(&self, _request: HttpRequest, _next: &dyn HttpTransport) -> Result<HttpResponse> {
            Err(GeneratorError::api_error(403, "rejected locally"))
        }
    }

    #[derive(Default)]
    struct Sink(Mutex<Vec<Vec<String>>>);

    #[async_trait]
    impl HttpTransport for Sink {
        async fn send(&self, request: HttpRequest) -> Result<HttpResponse> {
            let trail = request
                .headers
                .get_all("x-trail")
                .iter()
                .map(|v| v.to_str().unwrap_or_default().to_string())
                .collect();
            self.0.lock().unwrap().push(trail);
            Ok(HttpResponse::new(204, Vec::new()))
        }
    }

    fn request() -> HttpRequest {
        HttpRequest::new(
            reqwest::Method::GET,
            reqwest::Url::parse("https://svc.example/x").unwrap(),
            RequestContext::default(),
        )
    }

    #[tokio::test]
    async fn handlers_run_outer_to_inner() {
        let sink = Arc::new(Sink::default());
        let handlers: Vec<Arc<dyn TransportHandler>> =
            vec![Arc::new(Tag("first")), Arc::new(Tag("second"))];
        let chain = compose_transport(&handlers, sink.clone());

        let resp = chain.send(request()).await.unwrap();

        assert_eq!(resp.status, 204);
        assert_eq!(*sink.0.lock().unwrap(), vec![vec!["first", "second"]]);
    }

    #[tokio::test]
    async fn handler_can_short_circuit() {
        let sink = Arc::new(Sink::default());
        let handlers: Vec<Arc<dyn TransportHandler>> = vec![Arc::new(Reject), Arc::new(Tag("x"))];
        let chain = compose_transport(&handlers, sink.clone());

        let err = chain.send(request()).await.unwrap_err();

        assert_eq!(err.status_code(), Some(403));
        assert!(sink.0.lock().unwrap().is_empty());
    }
}
