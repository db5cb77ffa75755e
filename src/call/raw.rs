//! Raw invoker: turns an invocation into an HTTP request, sends it through the
//! composed transport and decodes the response.

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::call::{CallArgument, CallInvocation, CallInvoker};
use crate::error::{GeneratorError, Result, classify_http_error};
use crate::http::{HttpRequest, HttpTransport, RequestContext};

/// The innermost call invoker. It owns the composed transport chain.
pub struct RawInvoker {
    root_url: String,
    transport: Arc<dyn HttpTransport>,
}

impl std::fmt::Debug for RawInvoker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RawInvoker")
            .field("root_url", &self.root_url)
            .finish()
    }
}

impl RawInvoker {
    pub fn new(root_url: impl Into<String>, transport: Arc<dyn HttpTransport>) -> Self {
        let root_url = root_url.into().trim_end_matches('/').to_string();
        Self {
            root_url,
            transport,
        }
    }

    /// Map an invocation onto its request template.
    ///
    /// Path placeholders consume their arguments; the rest go to the query
    /// string, or to a JSON body for POST/PUT/PATCH. A lone remaining argument
    /// named `body` is sent as the body itself.
    pub fn build_request(&self, invocation: &CallInvocation) -> Result<HttpRequest> {
        let method = &invocation.method;
        let verb = method.template.http_method()?;

        let mut path = method.template.path.clone();
        let mut consumed = HashSet::new();
        for name in method.template.placeholders() {
            let value = invocation.arg(name).ok_or_else(|| {
                GeneratorError::contract_violation(
                    &method.id.interface,
                    format!("no argument for placeholder '{{{name}}}' in '{}'", method.id.name),
                )
            })?;
            path = path.replace(
                &format!("{{{name}}}"),
                &urlencoding::encode(&value_text(value)),
            );
            consumed.insert(name);
        }

        let mut url = reqwest::Url::parse(&format!("{}{}", self.root_url, path))
            .map_err(|e| GeneratorError::ConfigurationError(format!("invalid request URL: {e}")))?;

        let remaining: Vec<&CallArgument> = invocation
            .args
            .iter()
            .filter(|a| !consumed.contains(a.name.as_str()))
            .collect();

        let mut body = None;
        if method.template.carries_body() {
            body = match remaining.as_slice() {
                [] => None,
                [only] if only.name == "body" => Some(only.value.clone()),
                args => {
                    let map: Map<String, Value> = args
                        .iter()
                        .map(|a| (a.name.clone(), a.value.clone()))
                        .collect();
                    Some(Value::Object(map))
                }
            };
        } else {
            let pairs = query_pairs(&remaining);
            if !pairs.is_empty() {
                url.query_pairs_mut().extend_pairs(pairs);
            }
        }

        let ctx = RequestContext {
            method: method.id.to_string(),
            invocation_id: invocation.id,
            cancel: invocation.cancel.clone(),
        };
        let mut request = HttpRequest::new(verb, url, ctx);
        request.body = body;
        Ok(request)
    }
}

#[async_trait]
impl CallInvoker for RawInvoker {
    async fn invoke(&self, invocation: CallInvocation) -> Result<Value> {
        let request = self.build_request(&invocation)?;
        let response = self.transport.send(request).await?;
        if !response.is_success() {
            return Err(classify_http_error(
                &invocation.method.id.to_string(),
                response.status,
                &response.text(),
                &response.headers,
            ));
        }
        Ok(decode_body(&response.body))
    }
}

/// Decode a success body.
///
/// JSON objects, arrays and strings are parsed. Bare scalars (`42`, `true`,
/// `null`) and non-JSON text are kept as their text in a `Value::String`, so
/// a string-typed method receives the content verbatim; typed decoding of a
/// scalar happens in [`ProxyInvoker::call`](crate::ProxyInvoker::call). An
/// empty body is `null`.
pub fn decode_body(body: &[u8]) -> Value {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Value::Null;
    }
    let text = || Value::String(String::from_utf8_lossy(body).into_owned());
    match serde_json::from_slice::<Value>(body) {
        Ok(value @ (Value::Object(_) | Value::Array(_) | Value::String(_))) => value,
        Ok(_) | Err(_) => text(),
    }
}

fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

// Nulls are omitted; arrays repeat the key.
fn query_pairs(args: &[&CallArgument]) -> Vec<(String, String)> {
    let mut pairs = Vec::new();
    for arg in args {
        match &arg.value {
            Value::Null => {}
            Value::Array(items) => {
                for item in items.iter().filter(|v| !v.is_null()) {
                    pairs.push((arg.name.clone(), value_text(item)));
                }
            }
            other => pairs.push((arg.name.clone(), value_text(other))),
        }
    }
    pairs
}
