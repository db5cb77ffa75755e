//! Call-level pipeline
//!
//! Call wrappers operate above the transport: they see a whole method
//! invocation (method identity plus argument values) and decide whether to
//! delegate to the rest of the pipeline or answer on their own, e.g. from a
//! cache. Wrappers are folded right-to-left around the raw invoker, so the
//! first configured wrapper is the outermost one.

pub mod raw;

use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use uuid::Uuid;

use crate::contract::{InterfaceContract, MethodDescriptor, MethodId};
use crate::error::{GeneratorError, Result};
use crate::utils::CancelHandle;

pub use raw::RawInvoker;

/// A named argument value captured from a proxy call.
#[derive(Debug, Clone, PartialEq)]
pub struct CallArgument {
    pub name: String,
    pub value: Value,
}

impl CallArgument {
    pub fn new<T: Serialize + ?Sized>(name: impl Into<String>, value: &T) -> Result<Self> {
        let name = name.into();
        let value = serde_json::to_value(value).map_err(|e| {
            GeneratorError::ParseError(format!("cannot serialize argument '{name}': {e}"))
        })?;
        Ok(Self { name, value })
    }
}

/// A single proxy method call travelling through the pipeline.
#[derive(Debug, Clone)]
pub struct CallInvocation {
    /// Correlates log lines of one call, retries included.
    pub id: Uuid,
    pub method: Arc<MethodDescriptor>,
    pub args: Vec<CallArgument>,
    pub cancel: Option<CancelHandle>,
}

impl CallInvocation {
    pub fn new(method: Arc<MethodDescriptor>, args: Vec<CallArgument>) -> Self {
        Self {
            id: Uuid::new_v4(),
            method,
            args,
            cancel: None,
        }
    }

    pub fn with_cancel(mut self, cancel: CancelHandle) -> Self {
        self.cancel = Some(cancel);
        self
    }

    pub fn method_id(&self) -> &MethodId {
        &self.method.id
    }

    pub fn arg(&self, name: &str) -> Option<&Value> {
        self.args.iter().find(|a| a.name == name).map(|a| &a.value)
    }
}

/// "The rest of the pipeline": anything that can complete an invocation.
#[async_trait]
pub trait CallInvoker: Send + Sync {
    async fn invoke(&self, invocation: CallInvocation) -> Result<Value>;
}

/// Call-level interceptor.
#[async_trait]
pub trait CallWrapper: Send + Sync {
    /// Short label used in logs and configuration dumps.
    fn name(&self) -> &'static str {
        "custom"
    }

    /// Called once for every interface a proxy is generated for, before any
    /// call. Errors abort proxy creation.
    fn prepare(&self, _contract: &InterfaceContract) -> Result<()> {
        Ok(())
    }

    /// Handle `invocation`, usually by delegating to `next`.
    async fn intercept(&self, invocation: CallInvocation, next: &dyn CallInvoker) -> Result<Value>;
}

/// One wrapper bound to the remainder of the chain.
struct WrappedInvoker {
    wrapper: Arc<dyn CallWrapper>,
    next: Arc<dyn CallInvoker>,
}

#[async_trait]
impl CallInvoker for WrappedInvoker {
    async fn invoke(&self, invocation: CallInvocation) -> Result<Value> {
        self.wrapper.intercept(invocation, self.next.as_ref()).await
    }
}

/// Fold `wrappers` around `invoker`; with no wrappers the invoker itself is
/// returned.
pub fn compose_call_chain(
    wrappers: &[Arc<dyn CallWrapper>],
    invoker: Arc<dyn CallInvoker>,
) -> Arc<dyn CallInvoker> {
    wrappers.iter().rev().fold(invoker, |next, wrapper| {
        Arc::new(WrappedInvoker {
            wrapper: wrapper.clone(),
            next,
        })
    })
}
