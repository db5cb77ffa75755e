//! Generator builder
//!
//! A fluent, mutable builder that is finalized into an immutable
//! [`GeneratorConfig`]. Nothing the builder holds is reachable from the
//! generator after `create()` except through that config.

use std::sync::Arc;

use secrecy::SecretString;

use crate::call::CallWrapper;
use crate::caching::{AttributeBasedCachingStrategy, CachingStrategy, CachingWrapper};
use crate::config::GeneratorSettings;
use crate::defaults;
use crate::error::{GeneratorError, Result};
use crate::generator::HttpClientGenerator;
use crate::http::{
    ApiKeyHandler, HttpTransport, ReqwestTransport, RetryingHandler, TransportHandler,
    UserAgentHandler,
};
use crate::retry::{LinearRetryStrategy, RetryStrategy};

/// The assembled, immutable policy set both chains are built from.
pub struct GeneratorConfig {
    root_url: String,
    has_api_key: bool,
    user_agent: String,
    retries_enabled: bool,
    cache: Option<Arc<CachingWrapper>>,
    call_wrappers: Vec<Arc<dyn CallWrapper>>,
    transport_handlers: Vec<Arc<dyn TransportHandler>>,
    transport: Arc<dyn HttpTransport>,
}

impl std::fmt::Debug for GeneratorConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeneratorConfig")
            .field("root_url", &self.root_url)
            .field("has_api_key", &self.has_api_key)
            .field("user_agent", &self.user_agent)
            .field("call_wrappers", &self.call_wrapper_names())
            .field("transport_handlers", &self.transport_handler_names())
            .finish()
    }
}

impl GeneratorConfig {
    pub fn root_url(&self) -> &str {
        &self.root_url
    }

    pub fn has_api_key(&self) -> bool {
        self.has_api_key
    }

    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    pub fn retries_enabled(&self) -> bool {
        self.retries_enabled
    }

    pub fn caching_enabled(&self) -> bool {
        self.cache.is_some()
    }

    /// The built-in caching wrapper, when caching is enabled.
    pub fn cache(&self) -> Option<&Arc<CachingWrapper>> {
        self.cache.as_ref()
    }

    /// Call wrappers, outermost first.
    pub fn call_wrappers(&self) -> &[Arc<dyn CallWrapper>] {
        &self.call_wrappers
    }

    /// Transport handlers, outermost first; the terminal transport follows.
    pub fn transport_handlers(&self) -> &[Arc<dyn TransportHandler>] {
        &self.transport_handlers
    }

    pub fn transport(&self) -> Arc<dyn HttpTransport> {
        self.transport.clone()
    }

    pub fn call_wrapper_names(&self) -> Vec<&'static str> {
        self.call_wrappers.iter().map(|w| w.name()).collect()
    }

    pub fn transport_handler_names(&self) -> Vec<&'static str> {
        self.transport_handlers.iter().map(|h| h.name()).collect()
    }
}

/// Fluent configuration for [`HttpClientGenerator`].
pub struct HttpClientGeneratorBuilder {
    root_url: String,
    api_key: Option<SecretString>,
    user_agent: Option<String>,
    retry_strategy: Option<Arc<dyn RetryStrategy>>,
    caching_strategy: Option<Arc<dyn CachingStrategy>>,
    additional_call_wrappers: Vec<Arc<dyn CallWrapper>>,
    additional_transport_handlers: Vec<Arc<dyn TransportHandler>>,
    transport: Option<Arc<dyn HttpTransport>>,
    http_client: Option<reqwest::Client>,
}

impl std::fmt::Debug for HttpClientGeneratorBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpClientGeneratorBuilder")
            .field("root_url", &self.root_url)
            .field("has_api_key", &self.api_key.is_some())
            .field("user_agent", &self.user_agent)
            .field("has_retry", &self.retry_strategy.is_some())
            .field("has_caching", &self.caching_strategy.is_some())
            .field("call_wrappers", &self.additional_call_wrappers.len())
            .field("transport_handlers", &self.additional_transport_handlers.len())
            .finish()
    }
}

impl HttpClientGeneratorBuilder {
    pub fn new(root_url: impl Into<String>) -> Self {
        Self {
            root_url: root_url.into(),
            api_key: None,
            user_agent: None,
            retry_strategy: Some(Arc::new(LinearRetryStrategy::default())),
            caching_strategy: Some(Arc::new(AttributeBasedCachingStrategy)),
            additional_call_wrappers: Vec::new(),
            additional_transport_handlers: Vec::new(),
            transport: None,
            http_client: None,
        }
    }

    /// Start from loaded settings.
    pub fn from_settings(settings: GeneratorSettings) -> Self {
        let mut builder = Self::new(settings.root_url);
        builder.api_key = settings.api_key;
        if let Some(user_agent) = settings.user_agent {
            builder = builder.with_user_agent(user_agent);
        }
        builder = if settings.retry.enabled {
            builder.with_retry_strategy(Arc::new(settings.retry.strategy()))
        } else {
            builder.without_retries()
        };
        if !settings.caching {
            builder = builder.without_caching();
        }
        builder
    }

    /// Send the key in the `api-key` header of every request.
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(SecretString::from(api_key.into()));
        self
    }

    /// Override the default `"<application> v<version>"` user agent.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Replace the default linear retry strategy.
    pub fn with_retry_strategy(mut self, strategy: Arc<dyn RetryStrategy>) -> Self {
        self.retry_strategy = Some(strategy);
        self
    }

    pub fn without_retries(mut self) -> Self {
        self.retry_strategy = None;
        self
    }

    /// Replace the default attribute-based caching strategy.
    pub fn with_caching_strategy(mut self, strategy: Arc<dyn CachingStrategy>) -> Self {
        self.caching_strategy = Some(strategy);
        self
    }

    pub fn without_caching(mut self) -> Self {
        self.caching_strategy = None;
        self
    }

    /// Add a call wrapper; user wrappers run before the caching wrapper.
    pub fn with_additional_call_wrapper(mut self, wrapper: Arc<dyn CallWrapper>) -> Self {
        self.additional_call_wrappers.push(wrapper);
        self
    }

    /// Add a transport handler; user handlers run before the built-in ones.
    pub fn with_additional_transport_handler(mut self, handler: Arc<dyn TransportHandler>) -> Self {
        self.additional_transport_handlers.push(handler);
        self
    }

    /// Replace the terminal transport.
    pub fn with_transport(mut self, transport: Arc<dyn HttpTransport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Use a preconfigured `reqwest::Client` for the default transport.
    pub fn with_http_client(mut self, client: reqwest::Client) -> Self {
        self.http_client = Some(client);
        self
    }

    /// Validate and finalize the configuration.
    pub fn build_config(self) -> Result<GeneratorConfig> {
        let root_url = validate_root_url(&self.root_url)?;

        let user_agent = self
            .user_agent
            .unwrap_or_else(defaults::default_user_agent);

        let mut transport_handlers = self.additional_transport_handlers;
        if let Some(api_key) = &self.api_key {
            transport_handlers.push(Arc::new(ApiKeyHandler::new(api_key)?));
        }
        transport_handlers.push(Arc::new(UserAgentHandler::new(&user_agent)?));
        let retries_enabled = self.retry_strategy.is_some();
        if let Some(strategy) = self.retry_strategy {
            transport_handlers.push(Arc::new(RetryingHandler::new(strategy)));
        }

        let mut call_wrappers = self.additional_call_wrappers;
        let cache = self
            .caching_strategy
            .map(|strategy| Arc::new(CachingWrapper::new(strategy)));
        if let Some(cache) = &cache {
            call_wrappers.push(cache.clone());
        }

        let transport = match (self.transport, self.http_client) {
            (Some(transport), _) => transport,
            (None, Some(client)) => Arc::new(ReqwestTransport::new(client)),
            (None, None) => Arc::new(ReqwestTransport::default()),
        };

        Ok(GeneratorConfig {
            root_url,
            has_api_key: self.api_key.is_some(),
            user_agent,
            retries_enabled,
            cache,
            call_wrappers,
            transport_handlers,
            transport,
        })
    }

    /// Create the configured generator.
    pub fn create(self) -> Result<HttpClientGenerator> {
        Ok(HttpClientGenerator::from_config(self.build_config()?))
    }
}

fn validate_root_url(root_url: &str) -> Result<String> {
    let trimmed = root_url.trim();
    if trimmed.is_empty() {
        return Err(GeneratorError::ConfigurationError(
            "root URL cannot be empty".to_string(),
        ));
    }
    let url = reqwest::Url::parse(trimmed).map_err(|e| {
        GeneratorError::ConfigurationError(format!("invalid root URL '{trimmed}': {e}"))
    })?;
    if !matches!(url.scheme(), "http" | "https") || url.host_str().is_none() {
        return Err(GeneratorError::ConfigurationError(format!(
            "root URL '{trimmed}' must be an absolute http(s) URL"
        )));
    }
    Ok(trimmed.trim_end_matches('/').to_string())
}
