//! Client proxy generator
//!
//! A generator owns the two chains assembled by the builder: the call wrapper
//! chain (caching, user wrappers) and the transport handler chain (user
//! handlers, api-key, user-agent, retry). Both are built once, in
//! [`HttpClientGenerator::from_config`], and shared unmodified by every proxy
//! the generator creates.

use std::sync::Arc;

use crate::builder::{GeneratorConfig, HttpClientGeneratorBuilder};
use crate::call::{CallInvoker, CallWrapper, RawInvoker, compose_call_chain};
use crate::contract::ApiInterface;
use crate::error::Result;
use crate::http::compose_transport;
use crate::proxy::ProxyInvoker;

/// Generates typed client proxies for [`ApiInterface`]s.
#[derive(Clone)]
pub struct HttpClientGenerator {
    config: Arc<GeneratorConfig>,
    call_wrappers: Vec<Arc<dyn CallWrapper>>,
    pipeline: Arc<dyn CallInvoker>,
}

impl std::fmt::Debug for HttpClientGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpClientGenerator")
            .field("config", &self.config)
            .field("direct", &self.is_direct())
            .finish()
    }
}

impl HttpClientGenerator {
    /// Start configuring a generator for `root_url`.
    ///
    /// Defaults: a `User-Agent` header derived from the running application,
    /// linear retries (6 attempts, 5 seconds apart) and caching for methods
    /// that declare a duration. No api-key header unless one is configured.
    pub fn build_for_url(root_url: impl Into<String>) -> HttpClientGeneratorBuilder {
        HttpClientGeneratorBuilder::new(root_url)
    }

    /// Build both chains from a finalized configuration.
    pub fn from_config(config: GeneratorConfig) -> Self {
        let transport = compose_transport(config.transport_handlers(), config.transport());
        let raw: Arc<dyn CallInvoker> = Arc::new(RawInvoker::new(config.root_url(), transport));
        let call_wrappers = config.call_wrappers().to_vec();
        let pipeline = compose_call_chain(&call_wrappers, raw);

        tracing::debug!(
            target: "clientgen::generator",
            root_url = config.root_url(),
            call_wrappers = ?config.call_wrapper_names(),
            transport_handlers = ?config.transport_handler_names(),
            "generator created"
        );

        Self {
            config: Arc::new(config),
            call_wrappers,
            pipeline,
        }
    }

    /// Generate a proxy for `T`.
    ///
    /// Validates the interface contract and lets every call wrapper inspect it;
    /// unsupported interfaces and malformed caching metadata fail here.
    pub fn generate<T: ApiInterface>(&self) -> Result<T> {
        let contract = T::contract().scoped_to(std::any::type_name::<T>());
        contract.validate()?;
        for wrapper in &self.call_wrappers {
            wrapper.prepare(&contract)?;
        }

        tracing::debug!(
            target: "clientgen::generator",
            interface = contract.name(),
            methods = contract.methods().len(),
            "proxy generated"
        );
        Ok(T::from_invoker(ProxyInvoker::new(
            Arc::new(contract),
            self.pipeline.clone(),
        )))
    }

    /// One-shot proxy for `root_url` with retries disabled.
    pub fn client_for<T: ApiInterface>(root_url: impl Into<String>) -> Result<T> {
        Self::build_for_url(root_url)
            .without_retries()
            .create()?
            .generate()
    }

    /// One-shot proxy for `root_url`, configured by `configure`.
    pub fn client_for_with<T, F>(root_url: impl Into<String>, configure: F) -> Result<T>
    where
        T: ApiInterface,
        F: FnOnce(HttpClientGeneratorBuilder) -> HttpClientGeneratorBuilder,
    {
        configure(Self::build_for_url(root_url)).create()?.generate()
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// True when no call wrapper is configured and proxies call the raw
    /// invoker directly.
    pub fn is_direct(&self) -> bool {
        self.call_wrappers.is_empty()
    }
}
