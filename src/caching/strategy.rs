//! Caching strategies decide, per method, whether and for how long results
//! are cached.

use std::collections::HashMap;
use std::time::Duration;

use crate::caching::ClientCaching;
use crate::contract::MethodDescriptor;
use crate::error::{GeneratorError, Result};

/// Policy mapping a method to its cache duration.
///
/// Called once per method when a proxy is generated; an `Err` fails proxy
/// creation and is never deferred to call time.
pub trait CachingStrategy: Send + Sync {
    /// `Ok(None)` disables caching for the method.
    fn cache_duration(&self, method: &MethodDescriptor) -> Result<Option<Duration>>;
}

/// Reads the caching metadata declared on each method (`cache = "..."` in
/// [`http_api!`](crate::http_api)).
#[derive(Debug, Clone, Copy, Default)]
pub struct AttributeBasedCachingStrategy;

impl CachingStrategy for AttributeBasedCachingStrategy {
    fn cache_duration(&self, method: &MethodDescriptor) -> Result<Option<Duration>> {
        method
            .caching
            .as_ref()
            .map(|caching| resolve(method, caching))
            .transpose()
    }
}

/// Explicit per-method configuration, keyed by `"Interface::method"`.
///
/// Methods absent from the map are not cached, whatever they declare.
#[derive(Debug, Clone, Default)]
pub struct ConfiguredCachingStrategy {
    durations: HashMap<String, ClientCaching>,
}

impl ConfiguredCachingStrategy {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cache `method` (written `"Interface::method"`) for a duration string.
    pub fn with_method(mut self, method: impl Into<String>, duration: &str) -> Self {
        self.durations
            .insert(method.into(), ClientCaching::from_declared(duration));
        self
    }

    pub fn with_method_caching(mut self, method: impl Into<String>, caching: ClientCaching) -> Self {
        self.durations.insert(method.into(), caching);
        self
    }
}

impl CachingStrategy for ConfiguredCachingStrategy {
    fn cache_duration(&self, method: &MethodDescriptor) -> Result<Option<Duration>> {
        self.durations
            .get(&method.id.to_string())
            .map(|caching| resolve(method, caching))
            .transpose()
    }
}

fn resolve(method: &MethodDescriptor, caching: &ClientCaching) -> Result<Duration> {
    caching
        .resolve()
        .map_err(|reason| GeneratorError::InvalidCachingDuration {
            method: method.id.to_string(),
            value: caching.declared().unwrap_or_default().to_string(),
            reason,
        })
}
