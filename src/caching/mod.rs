//! Result caching
//!
//! - duration.rs: per-method caching metadata and duration parsing
//! - strategy.rs: policies mapping a method to its cache duration
//! - wrapper.rs: the call wrapper that serves cached results

pub mod duration;
pub mod strategy;
pub mod wrapper;

pub use duration::{ClientCaching, parse_caching_duration};
pub use strategy::{AttributeBasedCachingStrategy, CachingStrategy, ConfiguredCachingStrategy};
pub use wrapper::{CacheEntry, CacheKey, CachingWrapper};
