//! Retry module (ergonomic namespace)
//! - strategy.rs: the strategy contract and the default linear strategy
//! - policy.rs: exponential backoff with optional jitter

pub mod policy;
pub mod strategy;

pub use policy::ExponentialRetryStrategy;
pub use strategy::{LinearRetryStrategy, RetryDecision, RetryStrategy};
