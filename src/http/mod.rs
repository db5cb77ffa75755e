//! HTTP Utilities
//!
//! This module contains the transport-level half of the pipeline:
//! - Request/response types
//! - The terminal transport (`reqwest` by default, injectable)
//! - Transport handler chain composition
//! - Header injection, logging and retry handlers

pub mod chain;
pub mod headers;
pub mod interceptor;
pub mod retry;
pub mod transport;
pub mod types;

// Re-export main types
pub use chain::{TransportHandler, compose_transport};
pub use headers::{API_KEY_HEADER, ApiKeyHandler, UserAgentHandler};
pub use interceptor::LoggingHandler;
pub use retry::RetryingHandler;
pub use transport::{HttpTransport, ReqwestTransport};
pub use types::{HttpRequest, HttpResponse, RequestContext};
