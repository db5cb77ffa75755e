//! Call wrapper serving repeated calls from an in-memory cache.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use dashmap::DashMap;
use serde_json::Value;
use tokio::time::Instant;

use crate::call::{CallInvocation, CallInvoker, CallWrapper};
use crate::caching::CachingStrategy;
use crate::contract::{InterfaceContract, MethodId};
use crate::error::Result;

/// Upper bound used when `now + ttl` does not fit in an `Instant`.
const FAR_FUTURE: Duration = Duration::from_secs(100 * 365 * 24 * 60 * 60);

/// Cache key: method identity plus the ordered argument values.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    method: MethodId,
    /// Canonical JSON of the argument values, in call order.
    args: String,
}

impl CacheKey {
    pub fn for_invocation(invocation: &CallInvocation) -> Self {
        let values: Vec<Value> = invocation.args.iter().map(|a| a.value.clone()).collect();
        Self {
            method: invocation.method.id.clone(),
            args: Value::Array(values).to_string(),
        }
    }
}

/// A stored result and the instant it stops being served.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    pub value: Value,
    pub expires_at: Instant,
}

impl CacheEntry {
    pub fn is_fresh(&self, now: Instant) -> bool {
        self.expires_at > now
    }
}

/// Caches successful results of methods the strategy assigns a duration to.
///
/// Concurrent misses on the same key are not deduplicated; every success
/// overwrites the entry.
pub struct CachingWrapper {
    strategy: Arc<dyn CachingStrategy>,
    durations: DashMap<MethodId, Option<Duration>>,
    entries: DashMap<CacheKey, CacheEntry>,
}

impl std::fmt::Debug for CachingWrapper {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CachingWrapper")
            .field("methods", &self.durations.len())
            .field("entries", &self.entries.len())
            .finish()
    }
}

impl CachingWrapper {
    pub fn new(strategy: Arc<dyn CachingStrategy>) -> Self {
        Self {
            strategy,
            durations: DashMap::new(),
            entries: DashMap::new(),
        }
    }

    /// Number of stored entries, expired ones included.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop expired entries; returns how many were removed.
    pub fn purge_expired(&self) -> usize {
        let now = Instant::now();
        let before = self.entries.len();
        self.entries.retain(|_, entry| entry.is_fresh(now));
        before.saturating_sub(self.entries.len())
    }

    fn duration_for(&self, method: &MethodId) -> Option<Duration> {
        self.durations.get(method).and_then(|d| *d)
    }
}

#[async_trait]
impl CallWrapper for CachingWrapper {
    fn name(&self) -> &'static str {
        "caching"
    }

    fn prepare(&self, contract: &InterfaceContract) -> Result<()> {
        for method in contract.methods() {
            if self.durations.contains_key(&method.id) {
                continue;
            }
            let duration = self.strategy.cache_duration(method)?;
            tracing::debug!(
                target: "clientgen::cache",
                method = %method.id,
                ttl_ms = duration.map(|d| d.as_millis() as u64),
                "resolved caching duration"
            );
            self.durations.insert(method.id.clone(), duration);
        }
        Ok(())
    }

    async fn intercept(&self, invocation: CallInvocation, next: &dyn CallInvoker) -> Result<Value> {
        let Some(ttl) = self.duration_for(&invocation.method.id) else {
            return next.invoke(invocation).await;
        };

        let key = CacheKey::for_invocation(&invocation);
        let now = Instant::now();
        let cached = self
            .entries
            .get(&key)
            .filter(|entry| entry.is_fresh(now))
            .map(|entry| entry.value.clone());
        if let Some(value) = cached {
            tracing::debug!(target: "clientgen::cache", method = %invocation.method.id, call_id = %invocation.id, "cache hit");
            return Ok(value);
        }

        tracing::debug!(target: "clientgen::cache", method = %invocation.method.id, call_id = %invocation.id, "cache miss");
        let value = next.invoke(invocation).await?;

        let stored_at = Instant::now();
        let expires_at = stored_at
            .checked_add(ttl)
            .unwrap_or_else(|| stored_at + FAR_FUTURE);
        self.entries.insert(
            key,
            CacheEntry {
                value: value.clone(),
                expires_at,
            },
        );
        Ok(value)
    }
}
