//! # clientgen - Typed HTTP client proxies
//!
//! clientgen turns a declared remote interface into a typed async client.
//! Every proxy call flows through two composable chains:
//!
//! - a **call wrapper chain** working on logical method calls (result caching
//!   plus any user wrappers), and
//! - a **transport handler chain** working on HTTP requests (api-key and
//!   user-agent headers, retries, plus any user handlers).
//!
#![deny(unsafe_code)]

//! ## Quick Start
//!
//! ```rust,ignore
//! use clientgen::{HttpClientGenerator, http_api};
//!
//! http_api! {
//!     pub trait AddressApi for AddressClient {
//!         GET "/addresses/{id}", cache = "01:00:00";
//!         fn get_address(id: u64) -> Address;
//!     }
//! }
//!
//! let generator = HttpClientGenerator::build_for_url("https://addresses.example")
//!     .with_api_key("your-api-key")
//!     .create()?;
//! let client: AddressClient = generator.generate()?;
//! let address = client.get_address(42).await?;
//! ```
//!
//! ## Defaults
//!
//! A generator built with no further configuration sends a
//! `"<application> v<version>"` user agent, retries every failed request up to
//! six attempts five seconds apart, and caches the results of methods that
//! declare a caching duration.

pub mod builder;
pub mod call;
pub mod caching;
pub mod config;
pub mod contract;
pub mod defaults;
pub mod error;
pub mod generator;
pub mod http;
mod macros;
pub mod proxy;
pub mod retry;
pub mod utils;

/// Internal re-exports used by `#[macro_export]` macros.
#[doc(hidden)]
pub mod __private {
    pub use async_trait;
}

pub use builder::{GeneratorConfig, HttpClientGeneratorBuilder};
pub use call::{CallArgument, CallInvocation, CallInvoker, CallWrapper};
pub use caching::{
    AttributeBasedCachingStrategy, CachingStrategy, CachingWrapper, ClientCaching,
    ConfiguredCachingStrategy,
};
pub use config::{GeneratorSettings, RetrySettings};
pub use contract::{ApiInterface, InterfaceContract, MethodDescriptor, MethodId, RequestTemplate};
pub use error::{ErrorCategory, GeneratorError, Result};
pub use generator::HttpClientGenerator;
pub use http::{
    HttpRequest, HttpResponse, HttpTransport, LoggingHandler, RequestContext, TransportHandler,
};
pub use proxy::ProxyInvoker;
pub use retry::{ExponentialRetryStrategy, LinearRetryStrategy, RetryDecision, RetryStrategy};
pub use utils::CancelHandle;

/// Convenient pre-import module
pub mod prelude {
    pub use crate::http_api;
    pub use crate::{
        ApiInterface, CancelHandle, GeneratorError, HttpClientGenerator,
        HttpClientGeneratorBuilder, Result,
    };
    pub use crate::{CachingStrategy, ConfiguredCachingStrategy};
    pub use crate::{LinearRetryStrategy, RetryStrategy};
}
