//! Interface contracts
//!
//! An [`InterfaceContract`] describes the methods a generated proxy implements:
//! each method carries an identity, a request template and optional caching
//! metadata. Contracts are produced by [`ApiInterface::contract`] (usually via
//! the [`http_api!`](crate::http_api) macro) and validated once, when the
//! generator creates a proxy.

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use lazy_static::lazy_static;
use regex::Regex;
use reqwest::Method;

use crate::caching::ClientCaching;
use crate::error::{GeneratorError, Result};
use crate::proxy::ProxyInvoker;

lazy_static! {
    static ref PLACEHOLDER: Regex = Regex::new(r"\{([A-Za-z_][A-Za-z0-9_]*)\}").unwrap();
}

const SUPPORTED_VERBS: [&str; 7] = ["GET", "POST", "PUT", "DELETE", "PATCH", "HEAD", "OPTIONS"];

/// A typed remote interface that the generator can proxy.
pub trait ApiInterface: Sized + Send + Sync + 'static {
    /// Describe the methods of this interface.
    fn contract() -> InterfaceContract;

    /// Wrap a bound invoker into the typed proxy.
    fn from_invoker(invoker: ProxyInvoker) -> Self;
}

/// Identity of a single interface method.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MethodId {
    /// Rust type the contract was generated for; set by
    /// [`HttpClientGenerator::generate`](crate::HttpClientGenerator::generate).
    /// Keeps same-named interfaces from different modules apart.
    pub owner: String,
    pub interface: String,
    pub name: String,
    /// Human-readable signature, e.g. `fn get_item(id: u64) -> Item`.
    pub signature: String,
}

impl fmt::Display for MethodId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}::{}", self.interface, self.name)
    }
}

/// HTTP verb plus path template (`/items/{id}`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestTemplate {
    pub verb: String,
    pub path: String,
}

impl RequestTemplate {
    pub fn new(verb: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            verb: verb.into().to_ascii_uppercase(),
            path: path.into(),
        }
    }

    /// Names of the `{placeholders}` in the path, in order of appearance.
    pub fn placeholders(&self) -> Vec<&str> {
        PLACEHOLDER
            .captures_iter(&self.path)
            .filter_map(|c| c.get(1).map(|m| m.as_str()))
            .collect()
    }

    pub fn http_method(&self) -> Result<Method> {
        if !SUPPORTED_VERBS.contains(&self.verb.as_str()) {
            return Err(GeneratorError::ConfigurationError(format!(
                "unsupported HTTP verb '{}'",
                self.verb
            )));
        }
        Method::from_bytes(self.verb.as_bytes())
            .map_err(|e| GeneratorError::ConfigurationError(format!("invalid HTTP verb: {e}")))
    }

    /// Whether remaining arguments travel in a JSON body rather than the query.
    pub fn carries_body(&self) -> bool {
        matches!(self.verb.as_str(), "POST" | "PUT" | "PATCH")
    }
}

/// One method of an interface.
#[derive(Debug, Clone)]
pub struct MethodDescriptor {
    pub id: MethodId,
    pub template: RequestTemplate,
    pub params: Vec<String>,
    pub caching: Option<ClientCaching>,
}

impl MethodDescriptor {
    pub fn new(name: impl Into<String>, template: RequestTemplate) -> Self {
        let name = name.into();
        Self {
            id: MethodId {
                owner: String::new(),
                interface: String::new(),
                signature: format!("fn {name}()"),
                name,
            },
            template,
            params: Vec::new(),
            caching: None,
        }
    }

    pub fn with_params(mut self, params: &[&str]) -> Self {
        self.params = params.iter().map(|p| p.to_string()).collect();
        self
    }

    pub fn with_signature(mut self, signature: impl Into<String>) -> Self {
        self.id.signature = signature.into();
        self
    }

    /// Attach a caching duration string (`"01:00:00"`, `"00:05"`, `"2"` days).
    pub fn with_caching(mut self, duration: &str) -> Self {
        self.caching = Some(ClientCaching::from_declared(duration));
        self
    }

    pub fn with_caching_metadata(mut self, caching: ClientCaching) -> Self {
        self.caching = Some(caching);
        self
    }

    pub fn name(&self) -> &str {
        &self.id.name
    }
}

/// The full set of methods a proxy must implement.
#[derive(Debug, Clone)]
pub struct InterfaceContract {
    name: String,
    methods: Vec<Arc<MethodDescriptor>>,
}

impl InterfaceContract {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            methods: Vec::new(),
        }
    }

    /// Add a method; its identity is scoped to this interface.
    pub fn method(mut self, mut descriptor: MethodDescriptor) -> Self {
        descriptor.id.interface = self.name.clone();
        self.methods.push(Arc::new(descriptor));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Tie every method identity to `owner`, the implementing type's path.
    pub fn scoped_to(mut self, owner: &str) -> Self {
        for method in &mut self.methods {
            Arc::make_mut(method).id.owner = owner.to_string();
        }
        self
    }

    pub fn methods(&self) -> &[Arc<MethodDescriptor>] {
        &self.methods
    }

    pub fn find(&self, method: &str) -> Option<&Arc<MethodDescriptor>> {
        self.methods.iter().find(|m| m.id.name == method)
    }

    /// Check that every method can be dispatched by the raw invoker.
    pub fn validate(&self) -> Result<()> {
        let violation = |reason: String| GeneratorError::contract_violation(&self.name, reason);

        if self.methods.is_empty() {
            return Err(violation("interface declares no methods".into()));
        }

        let mut seen = HashSet::new();
        for method in &self.methods {
            let name = method.name();
            if !seen.insert(name) {
                return Err(violation(format!("method '{name}' is declared twice")));
            }
            method
                .template
                .http_method()
                .map_err(|e| violation(format!("method '{name}': {e}")))?;
            if !method.template.path.starts_with('/') {
                return Err(violation(format!(
                    "method '{name}': path '{}' must start with '/'",
                    method.template.path
                )));
            }
            for placeholder in method.template.placeholders() {
                if !method.params.iter().any(|p| p == placeholder) {
                    return Err(violation(format!(
                        "method '{name}': path placeholder '{{{placeholder}}}' has no matching parameter"
                    )));
                }
            }
        }
        Ok(())
    }
}
