//! Per-service method surface.
//!
//! A [`ServiceSchema`] is the definition-time description of one RPC service
//! type: the table of named endpoints the dispatcher may invoke, and the
//! table of named helper methods that symbolic filter references resolve
//! against at call time. It is populated once while the service is being
//! defined and read-only afterwards, so concurrent dispatches can share it
//! without locking.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::trace;

use serde_json::Value;

use crate::error::{ServiceError, ServiceResult};
use crate::proceed::Proceed;

/// A registered endpoint body: invoked on the service instance once the
/// filter chain reaches its innermost point.
pub type EndpointFn<S> = Arc<dyn Fn(&S) -> ServiceResult<Value> + Send + Sync>;

/// A registered named method, the target of symbolic filter references.
///
/// The continuation argument is populated only when the method runs in
/// around position; before/after invocations pass `None`.
pub type MethodFn<S> =
    Arc<dyn for<'a, 'b> Fn(&'a S, Option<Proceed<'b>>) -> ServiceResult<Value> + Send + Sync>;

/// The named method surface of one service type.
pub struct ServiceSchema<S> {
    name: String,
    endpoints: HashMap<String, EndpointFn<S>>,
    methods: HashMap<String, MethodFn<S>>,
}

impl<S> ServiceSchema<S> {
    /// Creates an empty schema for the named service.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            endpoints: HashMap::new(),
            methods: HashMap::new(),
        }
    }

    /// The service name, as the dispatcher addresses it.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Registers a named endpoint. A later registration under the same name
    /// replaces the earlier one.
    pub fn add_endpoint<F>(&mut self, name: impl Into<String>, f: F)
    where
        F: Fn(&S) -> ServiceResult<Value> + Send + Sync + 'static,
    {
        let name = name.into();
        trace!(service = %self.name, endpoint = %name, "registered endpoint");
        self.endpoints.insert(name, Arc::new(f));
    }

    /// Registers a named helper method that ignores the chain continuation.
    pub fn add_method<F>(&mut self, name: impl Into<String>, f: F)
    where
        F: Fn(&S) -> ServiceResult<Value> + Send + Sync + 'static,
    {
        let method: MethodFn<S> = Arc::new(move |service, _proceed| f(service));
        self.insert_method(name.into(), method);
    }

    /// Registers a named helper method that wraps the rest of the chain.
    ///
    /// Such a method is only meaningful in around position; if it is ever
    /// invoked without a continuation it fails with
    /// [`ServiceError::NoContinuation`].
    pub fn add_around_method<F>(&mut self, name: impl Into<String>, f: F)
    where
        F: for<'a, 'b> Fn(&'a S, Proceed<'b>) -> ServiceResult<Value> + Send + Sync + 'static,
    {
        let method: MethodFn<S> = Arc::new(move |service, proceed| match proceed {
            Some(proceed) => f(service, proceed),
            None => Err(ServiceError::NoContinuation),
        });
        self.insert_method(name.into(), method);
    }

    fn insert_method(&mut self, name: String, method: MethodFn<S>) {
        trace!(service = %self.name, method = %name, "registered method");
        self.methods.insert(name, method);
    }

    /// Looks up an endpoint by name.
    pub fn endpoint(&self, name: &str) -> Option<&EndpointFn<S>> {
        self.endpoints.get(name)
    }

    /// Looks up a named method.
    pub fn method(&self, name: &str) -> Option<&MethodFn<S>> {
        self.methods.get(name)
    }

    /// Returns `true` if the schema defines an endpoint with this name.
    pub fn has_endpoint(&self, name: &str) -> bool {
        self.endpoints.contains_key(name)
    }

    /// The registered endpoint names, in no particular order.
    pub fn endpoint_names(&self) -> impl Iterator<Item = &str> {
        self.endpoints.keys().map(String::as_str)
    }
}

impl<S> std::fmt::Debug for ServiceSchema<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceSchema")
            .field("name", &self.name)
            .field("endpoints", &self.endpoints.len())
            .field("methods", &self.methods.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    struct Greeter {
        greeting: String,
    }

    #[test]
    fn endpoint_lookup_and_invocation() {
        let mut schema = ServiceSchema::new("greeter");
        schema.add_endpoint("greet", |s: &Greeter| Ok(json!(s.greeting)));

        let service = Greeter {
            greeting: "hello".into(),
        };
        let endpoint = schema.endpoint("greet").expect("endpoint registered");
        assert_eq!(endpoint(&service).unwrap(), json!("hello"));
        assert!(schema.endpoint("missing").is_none());
    }

    #[test]
    fn later_endpoint_registration_replaces() {
        let mut schema = ServiceSchema::new("greeter");
        schema.add_endpoint("greet", |_: &Greeter| Ok(json!("first")));
        schema.add_endpoint("greet", |_: &Greeter| Ok(json!("second")));

        let service = Greeter {
            greeting: String::new(),
        };
        let endpoint = schema.endpoint("greet").unwrap();
        assert_eq!(endpoint(&service).unwrap(), json!("second"));
    }

    #[test]
    fn plain_method_ignores_continuation() {
        let mut schema = ServiceSchema::new("greeter");
        schema.add_method("shout", |s: &Greeter| Ok(json!(s.greeting.to_uppercase())));

        let service = Greeter {
            greeting: "hi".into(),
        };
        let method = schema.method("shout").unwrap();
        let proceed = Proceed::from_fn(|| Ok(json!("inner")));
        assert_eq!(method(&service, Some(proceed)).unwrap(), json!("HI"));
        assert_eq!(method(&service, None).unwrap(), json!("HI"));
    }

    #[test]
    fn around_method_requires_continuation() {
        let mut schema = ServiceSchema::new("greeter");
        schema.add_around_method("wrap", |_: &Greeter, proceed| proceed.call());

        let service = Greeter {
            greeting: String::new(),
        };
        let method = schema.method("wrap").unwrap();
        let proceed = Proceed::from_fn(|| Ok(json!("inner")));
        assert_eq!(method(&service, Some(proceed)).unwrap(), json!("inner"));
        assert!(matches!(
            method(&service, None),
            Err(ServiceError::NoContinuation)
        ));
    }
}
