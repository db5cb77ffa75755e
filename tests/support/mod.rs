//! Shared fixtures for the integration tests: a scripted in-memory transport,
//! recording wrappers/handlers and a couple of declared interfaces.
#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use clientgen::{
    CallInvocation, CallInvoker, CallWrapper, GeneratorError, HttpClientGenerator,
    HttpClientGeneratorBuilder, HttpRequest, HttpResponse, HttpTransport, Result,
    TransportHandler,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::time::Instant;

pub const ROOT_URL: &str = "https://svc.example";

clientgen::http_api! {
    /// Greeting service used across the tests.
    pub trait GreetingApi for GreetingClient {
        GET "/greeting/{name}";
        fn greet(name: String) -> String;

        GET "/greeting/{name}/cached", cache = "01:00:00";
        fn greet_cached(name: String) -> String;

        GET "/short/{key}", cache = "00:00:10";
        fn short_lived(key: u32) -> String;

        GET "/instant/{key}", cache = "00:00:00";
        fn instant(key: u32) -> String;

        GET "/lookup", cache = "00:05:00";
        fn lookup(filter: Filter) -> String;

        GET "/count/{name}";
        fn count(name: String) -> u64;
    }
}

clientgen::http_api! {
    pub trait BrokenCachingApi for BrokenCachingClient {
        GET "/broken", cache = "half past nine";
        fn broken() -> String;
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Filter {
    pub country: String,
    pub limit: u32,
}

/// One scripted transport outcome.
#[derive(Debug, Clone)]
pub enum Reply {
    Status(u16, &'static str),
    /// 200 with the request path as a JSON string.
    EchoPath,
    Fail(GeneratorError),
}

impl Reply {
    fn render(&self, request: &HttpRequest) -> Result<HttpResponse> {
        match self {
            Reply::Status(status, body) => Ok(HttpResponse::new(*status, body.as_bytes().to_vec())),
            Reply::EchoPath => Ok(HttpResponse::new(
                200,
                Value::String(request.url.path().to_string())
                    .to_string()
                    .into_bytes(),
            )),
            Reply::Fail(error) => Err(error.clone()),
        }
    }
}

/// In-memory terminal transport replaying a script, then a fallback reply.
pub struct MockTransport {
    script: Mutex<VecDeque<Reply>>,
    fallback: Reply,
    requests: Mutex<Vec<(Instant, HttpRequest)>>,
}

impl MockTransport {
    pub fn always(reply: Reply) -> Arc<Self> {
        Self::scripted(Vec::new(), reply)
    }

    pub fn ok(body: &'static str) -> Arc<Self> {
        Self::always(Reply::Status(200, body))
    }

    pub fn scripted(script: Vec<Reply>, then: Reply) -> Arc<Self> {
        Arc::new(Self {
            script: Mutex::new(script.into()),
            fallback: then,
            requests: Mutex::new(Vec::new()),
        })
    }

    pub fn calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .map(|(_, r)| r.clone())
            .collect()
    }

    pub fn sent_at(&self) -> Vec<Instant> {
        self.requests.lock().unwrap().iter().map(|(t, _)| *t).collect()
    }
}

#[async_trait]
impl HttpTransport for MockTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse> {
        let reply = self
            .script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| self.fallback.clone());
        let outcome = reply.render(&request);
        self.requests
            .lock()
            .unwrap()
            .push((Instant::now(), request));
        outcome
    }
}

/// Generator for [`ROOT_URL`] backed by `transport`, further configured by `configure`.
pub fn generator_with<F>(transport: Arc<MockTransport>, configure: F) -> HttpClientGenerator
where
    F: FnOnce(HttpClientGeneratorBuilder) -> HttpClientGeneratorBuilder,
{
    configure(HttpClientGenerator::build_for_url(ROOT_URL).with_transport(transport))
        .create()
        .expect("generator")
}

pub fn greeting_client(transport: Arc<MockTransport>) -> GreetingClient {
    generator_with(transport, |b| b)
        .generate()
        .expect("proxy")
}

/// Shared log of which wrappers and handlers ran, in order.
pub type Trail = Arc<Mutex<Vec<String>>>;

pub fn trail() -> Trail {
    Arc::new(Mutex::new(Vec::new()))
}

/// Call wrapper appending its label to a trail, then delegating.
pub struct RecordingWrapper {
    pub label: &'static str,
    pub trail: Trail,
}

#[async_trait]
impl CallWrapper for RecordingWrapper {
    fn name(&self) -> &'static str {
        self.label
    }

    async fn intercept(&self, invocation: CallInvocation, next: &dyn CallInvoker) -> Result<Value> {
        self.trail
            .lock()
            .unwrap()
            .push(format!("wrapper:{}:{}", self.label, invocation.method_id()));
        next.invoke(invocation).await
    }
}

/// Transport handler appending its label to a trail, then delegating.
pub struct RecordingHandler {
    pub label: &'static str,
    pub trail: Trail,
}

#[async_trait]
impl TransportHandler for RecordingHandler {
    fn name(&self) -> &'static str {
        self.label
    }

    async fn handle(&self, request: HttpRequest, next: &dyn HttpTransport) -> Result<HttpResponse> {
        self.trail
            .lock()
            .unwrap()
            .push(format!("handler:{}", self.label));
        next.send(request).await
    }
}
