//! Error Handling Module
//!
//! This module provides the error type shared by every layer of the generator:
//! - Core error types (`GeneratorError`, `ErrorCategory`)
//! - HTTP status classification (`classify_http_error`)
//! - Type conversions from common error types
//!
//! # Example
//!
//! ```rust,ignore
//! use clientgen::error::{GeneratorError, ErrorCategory};
//!
//! let error = GeneratorError::api_error(404, "Not found");
//! assert_eq!(error.category(), ErrorCategory::Permanent);
//! assert!(!error.is_retryable());
//! ```

mod classify;
mod conversions;
pub mod types;

pub use classify::classify_http_error;
pub use types::*;

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, GeneratorError>;
