//! Header injection handlers.
//!
//! Pure request mutation: both handlers always delegate and never retry.

use async_trait::async_trait;
use reqwest::header::{HeaderName, HeaderValue, USER_AGENT};
use secrecy::{ExposeSecret, SecretString};

use crate::error::{GeneratorError, Result};
use crate::http::{HttpRequest, HttpResponse, HttpTransport, TransportHandler};

/// Header carrying the configured api key.
pub const API_KEY_HEADER: &str = "api-key";

/// Adds the api-key header to every request.
#[derive(Clone)]
pub struct ApiKeyHandler {
    value: HeaderValue,
}

impl std::fmt::Debug for ApiKeyHandler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiKeyHandler").finish_non_exhaustive()
    }
}

impl ApiKeyHandler {
    pub fn new(api_key: &SecretString) -> Result<Self> {
        let mut value = HeaderValue::from_str(api_key.expose_secret()).map_err(|e| {
            GeneratorError::ConfigurationError(format!("Invalid API key format: {e}"))
        })?;
        value.set_sensitive(true);
        Ok(Self { value })
    }
}

#[async_trait]
impl TransportHandler for ApiKeyHandler {
    fn name(&self) -> &'static str {
        "api-key"
    }

    async fn handle(&self, mut request: HttpRequest, next: &dyn HttpTransport) -> Result<HttpResponse> {
        request
            .headers
            .insert(HeaderName::from_static(API_KEY_HEADER), self.value.clone());
        next.send(request).await
    }
}

/// Replaces any `User-Agent` with the configured one.
#[derive(Debug, Clone)]
pub struct UserAgentHandler {
    value: HeaderValue,
}

impl UserAgentHandler {
    pub fn new(user_agent: &str) -> Result<Self> {
        let value = HeaderValue::from_str(user_agent)
            .map_err(|e| GeneratorError::ConfigurationError(format!("Invalid user agent: {e}")))?;
        Ok(Self { value })
    }

    pub fn user_agent(&self) -> &str {
        self.value.to_str().unwrap_or_default()
    }
}

#[async_trait]
impl TransportHandler for UserAgentHandler {
    fn name(&self) -> &'static str {
        "user-agent"
    }

    async fn handle(&self, mut request: HttpRequest, next: &dyn HttpTransport) -> Result<HttpResponse> {
        request.headers.insert(USER_AGENT, self.value.clone());
        next.send(request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::RequestContext;
    use reqwest::header::HeaderMap;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Capture(Mutex<Option<HeaderMap>>);

    #[async_trait]
    impl HttpTransport for Capture {
        async fn send(&self, request: HttpRequest) -> Result<HttpResponse> {
            *self.0.lock().unwrap() = Some(request.headers);
            Ok(HttpResponse::new(200, Vec::new()))
        }
    }

    fn request() -> HttpRequest {
        let mut req = HttpRequest::new(
            reqwest::Method::GET,
            reqwest::Url::parse("https://svc.example/").unwrap(),
            RequestContext::default(),
        );
        req.headers
            .insert(USER_AGENT, HeaderValue::from_static("reqwest/0.12"));
        req
    }

    #[tokio::test]
    async fn user_agent_replaces_existing_value() {
        let sink = Capture::default();
        let handler = UserAgentHandler::new("billing v1.2.0").unwrap();
        handler.handle(request(), &sink).await.unwrap();

        let headers = sink.0.lock().unwrap().take().unwrap();
        assert_eq!(headers.get_all(USER_AGENT).iter().count(), 1);
        assert_eq!(headers[USER_AGENT], "billing v1.2.0");
    }

    #[tokio::test]
    async fn api_key_is_added_and_marked_sensitive() {
        let sink = Capture::default();
        let handler = ApiKeyHandler::new(&SecretString::from("secret-key".to_string())).unwrap();
        handler.handle(request(), &sink).await.unwrap();

        let headers = sink.0.lock().unwrap().take().unwrap();
        assert_eq!(headers[API_KEY_HEADER], "secret-key");
        assert!(headers[API_KEY_HEADER].is_sensitive());
        assert!(!format!("{handler:?}").contains("secret-key"));
    }

    #[test]
    fn invalid_header_values_are_configuration_errors() {
        assert!(matches!(
            UserAgentHandler::new("bad\nagent"),
            Err(GeneratorError::ConfigurationError(_))
        ));
        assert!(ApiKeyHandler::new(&SecretString::from("a\u{7f}".to_string())).is_err());
    }
}
