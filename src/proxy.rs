//! Proxy invoker
//!
//! The object every generated proxy wraps: it binds one validated interface
//! contract to the generator's shared call pipeline. Each proxy method turns
//! into a [`ProxyInvoker::call`], which builds a fresh [`CallInvocation`]
//! so concurrent calls on the same proxy share no per-call state.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::call::{CallArgument, CallInvocation, CallInvoker};
use crate::contract::InterfaceContract;
use crate::error::{GeneratorError, Result};
use crate::utils::CancelHandle;

#[derive(Clone)]
pub struct ProxyInvoker {
    contract: Arc<InterfaceContract>,
    pipeline: Arc<dyn CallInvoker>,
    cancel: Option<CancelHandle>,
}

impl std::fmt::Debug for ProxyInvoker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProxyInvoker")
            .field("interface", &self.contract.name())
            .field("methods", &self.contract.methods().len())
            .field("cancellable", &self.cancel.is_some())
            .finish()
    }
}

impl ProxyInvoker {
    pub(crate) fn new(contract: Arc<InterfaceContract>, pipeline: Arc<dyn CallInvoker>) -> Self {
        Self {
            contract,
            pipeline,
            cancel: None,
        }
    }

    pub fn contract(&self) -> &InterfaceContract {
        &self.contract
    }

    /// A copy whose calls observe `cancel` at the retry-delay and
    /// transport-wait suspension points.
    pub fn with_cancel_handle(&self, cancel: CancelHandle) -> Self {
        Self {
            cancel: Some(cancel),
            ..self.clone()
        }
    }

    /// Route a call of `method` through the pipeline and decode its result.
    pub async fn call<T: DeserializeOwned>(&self, method: &str, args: Vec<CallArgument>) -> Result<T> {
        let descriptor = self.contract.find(method).cloned().ok_or_else(|| {
            GeneratorError::contract_violation(
                self.contract.name(),
                format!("no method named '{method}'"),
            )
        })?;

        let mut invocation = CallInvocation::new(descriptor, args);
        if let Some(cancel) = &self.cancel {
            invocation = invocation.with_cancel(cancel.clone());
        }

        let value = self.pipeline.invoke(invocation).await?;
        decode_result(value).map_err(|e| {
            GeneratorError::ParseError(format!(
                "cannot decode result of {}::{method}: {e}",
                self.contract.name()
            ))
        })
    }
}

/// Decode a pipeline result into the method's return type.
///
/// Text results (non-JSON or scalar bodies) are tried as-is first, then
/// parsed as JSON, so `"42"` serves both a `String` and a `u64` method. A
/// `null` result from an empty body serves a `String` method as `""`.
fn decode_result<T: DeserializeOwned>(value: Value) -> serde_json::Result<T> {
    match value {
        Value::String(text) => match serde_json::from_value(Value::String(text.clone())) {
            Ok(decoded) => Ok(decoded),
            Err(e) => serde_json::from_str(&text).map_err(|_| e),
        },
        Value::Null => match serde_json::from_value(Value::Null) {
            Ok(decoded) => Ok(decoded),
            Err(e) => serde_json::from_value(Value::String(String::new())).map_err(|_| e),
        },
        other => serde_json::from_value(other),
    }
}
