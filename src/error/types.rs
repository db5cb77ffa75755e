//! Core error types.

use thiserror::Error;

/// Coarse classification used by retry handlers and callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Raised while building a generator or a proxy; never deferred to call time.
    Construction,
    /// Network failures and retryable statuses.
    Transient,
    /// Non-retryable call failures.
    Permanent,
    /// The caller cancelled the call.
    Cancelled,
}

/// Errors produced by the generator, its proxies and its pipelines.
#[derive(Error, Debug, Clone)]
pub enum GeneratorError {
    /// Invalid or missing configuration (root URL, header values, ...).
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    /// The target interface cannot be proxied.
    #[error("Contract violation in {interface}: {reason}")]
    ContractViolation { interface: String, reason: String },

    /// Declared caching metadata could not be parsed.
    #[error("Invalid caching duration '{value}' on {method}: {reason}")]
    InvalidCachingDuration {
        method: String,
        value: String,
        reason: String,
    },

    /// The transport failed before a response was received.
    #[error("HTTP error: {0}")]
    HttpError(String),

    #[error("Timeout: {0}")]
    TimeoutError(String),

    #[error("Rate limited: {0}")]
    RateLimitError(String),

    /// The remote side answered with a non-success status.
    #[error("API error {code}: {message}")]
    ApiError {
        code: u16,
        message: String,
        details: Option<serde_json::Value>,
    },

    /// Arguments or results could not be (de)serialized.
    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Call cancelled")]
    Cancelled,

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl GeneratorError {
    /// Shorthand for an `ApiError` without details.
    pub fn api_error(code: u16, message: impl Into<String>) -> Self {
        Self::ApiError {
            code,
            message: message.into(),
            details: None,
        }
    }

    /// `ApiError` carrying a structured payload (response body, request ids).
    pub fn api_error_with_details(
        code: u16,
        message: impl Into<String>,
        details: serde_json::Value,
    ) -> Self {
        Self::ApiError {
            code,
            message: message.into(),
            details: Some(details),
        }
    }

    pub fn contract_violation(interface: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::ContractViolation {
            interface: interface.into(),
            reason: reason.into(),
        }
    }

    /// HTTP status associated with this error, if any.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::ApiError { code, .. } => Some(*code),
            Self::RateLimitError(_) => Some(429),
            _ => None,
        }
    }

    /// Whether a retry strategy should be consulted for this failure.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::HttpError(_) | Self::TimeoutError(_) | Self::RateLimitError(_) => true,
            Self::ApiError { code, .. } => *code == 408 || *code == 429 || *code >= 500,
            _ => false,
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::ConfigurationError(_)
            | Self::ContractViolation { .. }
            | Self::InvalidCachingDuration { .. } => ErrorCategory::Construction,
            Self::Cancelled => ErrorCategory::Cancelled,
            e if e.is_retryable() => ErrorCategory::Transient,
            _ => ErrorCategory::Permanent,
        }
    }
}
