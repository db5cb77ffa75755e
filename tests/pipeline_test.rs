//! Generator construction, chain ordering and concurrent use.

mod support;

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use clientgen::{
    ApiInterface, CallInvocation, CallInvoker, CallWrapper, ErrorCategory, GeneratorError,
    GeneratorSettings, HttpClientGenerator, HttpClientGeneratorBuilder, InterfaceContract,
    MethodDescriptor, ProxyInvoker, RequestTemplate, Result,
};
use serde_json::{Value, json};
use support::{
    GreetingApi, GreetingClient, MockTransport, RecordingHandler, RecordingWrapper, Reply,
    generator_with, greeting_client, trail,
};

#[tokio::test]
async fn empty_chains_pass_raw_results_through() {
    let transport = MockTransport::always(Reply::Status(200, r#""raw result""#));
    let generator = generator_with(transport.clone(), |b| b.without_retries().without_caching());

    assert!(generator.is_direct());
    assert_eq!(generator.config().transport_handler_names(), vec!["user-agent"]);

    let client: GreetingClient = generator.generate().unwrap();
    assert_eq!(client.greet("alice".into()).await.unwrap(), "raw result");
    assert_eq!(client.greet_cached("alice".into()).await.unwrap(), "raw result");
    assert_eq!(transport.calls(), 2);
}

#[tokio::test]
async fn string_methods_receive_text_bodies_verbatim() {
    for body in ["42", "true", "null", "", "plain text"] {
        let client = greeting_client(MockTransport::ok(body));
        assert_eq!(client.greet("alice".into()).await.unwrap(), body, "body {body:?}");
    }
}

#[tokio::test]
async fn scalar_text_bodies_decode_into_typed_results() {
    let client = greeting_client(MockTransport::ok("42"));
    assert_eq!(client.count("alice".into()).await.unwrap(), 42);

    let client = greeting_client(MockTransport::ok("forty-two"));
    let err = client.count("alice".into()).await.unwrap_err();
    assert!(matches!(err, GeneratorError::ParseError(_)), "{err:?}");
}

#[tokio::test]
async fn user_items_run_before_built_ins_in_configured_order() {
    let transport = MockTransport::ok("ok");
    let log = trail();
    let generator = generator_with(transport.clone(), |b| {
        b.with_additional_call_wrapper(Arc::new(RecordingWrapper {
            label: "outer",
            trail: log.clone(),
        }))
        .with_additional_call_wrapper(Arc::new(RecordingWrapper {
            label: "inner",
            trail: log.clone(),
        }))
        .with_additional_transport_handler(Arc::new(RecordingHandler {
            label: "first",
            trail: log.clone(),
        }))
        .with_additional_transport_handler(Arc::new(RecordingHandler {
            label: "second",
            trail: log.clone(),
        }))
        .with_api_key("k")
    });

    assert_eq!(
        generator.config().call_wrapper_names(),
        vec!["outer", "inner", "caching"]
    );
    assert_eq!(
        generator.config().transport_handler_names(),
        vec!["first", "second", "api-key", "user-agent", "retry"]
    );

    let client: GreetingClient = generator.generate().unwrap();
    client.greet_cached("bob".into()).await.unwrap();
    // Served from cache: the user wrappers still run, the transport does not.
    client.greet_cached("bob".into()).await.unwrap();

    assert_eq!(
        *log.lock().unwrap(),
        vec![
            "wrapper:outer:GreetingApi::greet_cached",
            "wrapper:inner:GreetingApi::greet_cached",
            "handler:first",
            "handler:second",
            "wrapper:outer:GreetingApi::greet_cached",
            "wrapper:inner:GreetingApi::greet_cached",
        ]
    );
    assert_eq!(transport.calls(), 1);
}

#[tokio::test(start_paused = true)]
async fn outer_handlers_run_once_per_logical_call() {
    let transport = MockTransport::scripted(
        vec![Reply::Status(500, ""), Reply::Status(500, "")],
        Reply::Status(200, "ok"),
    );
    let log = trail();
    let generator = generator_with(transport.clone(), |b| {
        b.with_additional_transport_handler(Arc::new(RecordingHandler {
            label: "audit",
            trail: log.clone(),
        }))
    });
    let client: GreetingClient = generator.generate().unwrap();

    client.greet("carol".into()).await.unwrap();
    assert_eq!(transport.calls(), 3);
    assert_eq!(*log.lock().unwrap(), vec!["handler:audit"]);
}

struct ShortCircuit;

#[async_trait]
impl CallWrapper for ShortCircuit {
    fn name(&self) -> &'static str {
        "short-circuit"
    }

    async fn intercept(&self, invocation: CallInvocation, next: &dyn CallInvoker) -> Result<Value> {
        match invocation.arg("name") {
            Some(Value::String(name)) if name == "local" => Ok(json!("answered locally")),
            _ => next.invoke(invocation).await,
        }
    }
}

#[tokio::test]
async fn call_wrappers_may_answer_without_the_transport() {
    let transport = MockTransport::ok("remote");
    let client: GreetingClient =
        generator_with(transport.clone(), |b| b.with_additional_call_wrapper(Arc::new(ShortCircuit)))
            .generate()
            .unwrap();

    assert_eq!(client.greet("local".into()).await.unwrap(), "answered locally");
    assert_eq!(client.greet("dave".into()).await.unwrap(), "remote");
    assert_eq!(transport.calls(), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_calls_do_not_interfere() {
    let transport = MockTransport::always(Reply::EchoPath);
    let client: GreetingClient = generator_with(transport.clone(), |b| b).generate().unwrap();

    let calls = (0..32).map(|i| {
        let client = client.clone();
        async move { (i, client.greet(format!("user-{i}")).await) }
    });
    let results = futures::future::join_all(calls).await;

    for (i, result) in results {
        assert_eq!(result.unwrap(), format!("/greeting/user-{i}"));
    }
    assert_eq!(transport.calls(), 32);
}

#[tokio::test]
async fn chains_are_built_once_and_shared() {
    let built = Arc::new(AtomicUsize::new(0));

    struct CountingPrepare(Arc<AtomicUsize>);

    #[async_trait]
    impl CallWrapper for CountingPrepare {
        fn prepare(&self, _contract: &InterfaceContract) -> Result<()> {
            self.0.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }

        async fn intercept(&self, invocation: CallInvocation, next: &dyn CallInvoker) -> Result<Value> {
            next.invoke(invocation).await
        }
    }

    let transport = MockTransport::ok("ok");
    let generator = generator_with(transport, |b| {
        b.with_additional_call_wrapper(Arc::new(CountingPrepare(built.clone())))
    });
    let first: GreetingClient = generator.generate().unwrap();
    let second: GreetingClient = generator.generate().unwrap();
    first.greet("a".into()).await.unwrap();
    second.greet("b".into()).await.unwrap();

    // Once per generated proxy, never per call.
    assert_eq!(built.load(Ordering::SeqCst), 2);
}

/// Hand-written interface with an unsupported verb.
struct Unsupported;

impl ApiInterface for Unsupported {
    fn contract() -> InterfaceContract {
        InterfaceContract::new("Unsupported")
            .method(MethodDescriptor::new("fetch", RequestTemplate::new("FETCH", "/things")))
    }

    fn from_invoker(_invoker: ProxyInvoker) -> Self {
        Unsupported
    }
}

/// Hand-written interface declaring the same method twice.
struct Overloaded;

impl ApiInterface for Overloaded {
    fn contract() -> InterfaceContract {
        InterfaceContract::new("Overloaded")
            .method(
                MethodDescriptor::new("get", RequestTemplate::new("GET", "/things/{id}"))
                    .with_params(&["id"]),
            )
            .method(MethodDescriptor::new("get", RequestTemplate::new("GET", "/things")))
    }

    fn from_invoker(_invoker: ProxyInvoker) -> Self {
        Overloaded
    }
}

#[test]
fn unsupported_interfaces_fail_at_generation() {
    let generator = generator_with(MockTransport::ok("ok"), |b| b);

    for err in [
        generator.generate::<Unsupported>().err(),
        generator.generate::<Overloaded>().err(),
    ] {
        let err = err.expect("generation must fail");
        assert!(
            matches!(err, GeneratorError::ContractViolation { .. }),
            "{err:?}"
        );
        assert_eq!(err.category(), ErrorCategory::Construction);
    }
}

#[test]
fn missing_root_url_fails_at_create() {
    for url in ["", "relative/path"] {
        let err = HttpClientGenerator::build_for_url(url).create().unwrap_err();
        assert!(matches!(err, GeneratorError::ConfigurationError(_)));
    }
}

#[test]
fn one_shot_clients() {
    assert!(HttpClientGenerator::client_for::<GreetingClient>("https://svc.example").is_ok());
    assert!(HttpClientGenerator::client_for::<GreetingClient>("").is_err());
}

#[tokio::test]
async fn one_shot_client_with_configuration() {
    let transport = MockTransport::ok("configured");
    let client: GreetingClient = HttpClientGenerator::client_for_with("https://svc.example", |b| {
        b.with_transport(transport.clone()).with_user_agent("one-shot v1")
    })
    .unwrap();

    assert_eq!(client.greet("erin".into()).await.unwrap(), "configured");
    assert_eq!(transport.requests()[0].headers["user-agent"], "one-shot v1");
}

#[tokio::test]
async fn generator_from_settings() {
    let transport = MockTransport::ok("from settings");
    let settings = GeneratorSettings::from_lookup(|name| match name {
        "CLIENTGEN_ROOT_URL" => Some("https://settings.example/api".to_string()),
        "CLIENTGEN_API_KEY" => Some("env-key".to_string()),
        "CLIENTGEN_DISABLE_CACHING" => Some("1".to_string()),
        _ => None,
    })
    .unwrap();

    let generator = HttpClientGeneratorBuilder::from_settings(settings)
        .with_transport(transport.clone())
        .create()
        .unwrap();
    assert!(!generator.config().caching_enabled());

    let client: GreetingClient = generator.generate().unwrap();
    client.greet_cached("frank".into()).await.unwrap();
    client.greet_cached("frank".into()).await.unwrap();

    let requests = transport.requests();
    assert_eq!(requests.len(), 2);
    assert_eq!(
        requests[0].url.as_str(),
        "https://settings.example/api/greeting/frank/cached"
    );
    assert_eq!(requests[0].headers["api-key"], "env-key");
}
