//! Transport-level request and response data.

use reqwest::Method;
use reqwest::header::HeaderMap;
use uuid::Uuid;

use crate::utils::CancelHandle;

/// Context travelling with a request through the handler chain.
#[derive(Clone, Debug, Default)]
pub struct RequestContext {
    /// `Interface::method` of the originating call.
    pub method: String,
    pub invocation_id: Uuid,
    pub cancel: Option<CancelHandle>,
}

/// An outgoing request. Handlers may mutate it before delegating.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: Method,
    pub url: reqwest::Url,
    pub headers: HeaderMap,
    pub body: Option<serde_json::Value>,
    pub ctx: RequestContext,
}

impl HttpRequest {
    pub fn new(method: Method, url: reqwest::Url, ctx: RequestContext) -> Self {
        Self {
            method,
            url,
            headers: HeaderMap::new(),
            body: None,
            ctx,
        }
    }
}

/// A received response.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn new(status: u16, body: Vec<u8>) -> Self {
        Self {
            status,
            headers: HeaderMap::new(),
            body,
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Body as text, replacing invalid UTF-8.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}
