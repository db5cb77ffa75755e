//! Terminal HTTP transport.
//!
//! The transport is the last element of the handler chain: it issues the
//! actual network call and never delegates further. The default
//! implementation uses `reqwest`; any other implementation can be injected
//! through the builder, e.g. to observe requests in tests or to route them
//! through a different client.

use async_trait::async_trait;

use crate::error::Result;
use crate::http::{HttpRequest, HttpResponse};
use crate::utils::run_cancellable;

/// Sends a request and yields a response or a failure.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse>;
}

/// `reqwest`-backed transport.
#[derive(Debug, Clone, Default)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse> {
        let HttpRequest {
            method,
            url,
            headers,
            body,
            ctx,
        } = request;

        let mut builder = self.client.request(method, url).headers(headers);
        if let Some(body) = &body {
            builder = builder.json(body);
        }

        run_cancellable(ctx.cancel.as_ref(), async move {
            let response = builder.send().await?;
            let status = response.status().as_u16();
            let headers = response.headers().clone();
            let body = response.bytes().await?.to_vec();
            Ok(HttpResponse {
                status,
                headers,
                body,
            })
        })
        .await
    }
}
