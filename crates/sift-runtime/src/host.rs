//! Service host: the in-process dispatcher.
//!
//! The [`ServiceHost`] keeps a name-keyed registry of service definitions
//! together with a factory producing a fresh instance per dispatch, the way
//! an RPC server materializes a request-scoped service object. Registration
//! happens during startup; dispatch only reads, so the registry lock is
//! never contended once traffic begins.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use thiserror::Error;
use tracing::{debug, info};

use sift_core::{Outcome, ServiceError, ServiceResult};
use sift_framework::ServiceDescriptor;

/// Errors surfaced by the host around the filter pipeline itself.
#[derive(Debug, Error)]
pub enum HostError {
    /// Dispatch addressed a service that was never registered.
    #[error("service '{0}' is not registered")]
    UnknownService(String),

    /// A second registration under an already-taken service name.
    #[error("service '{0}' is already registered")]
    DuplicateService(String),

    /// Failure from the filter pipeline or the endpoint, unchanged.
    #[error(transparent)]
    Service(#[from] ServiceError),
}

/// Result type for host operations.
pub type HostResult<T> = Result<T, HostError>;

/// Type-erased hosted service, so descriptors over different instance types
/// share one registry.
trait ErasedService: Send + Sync {
    fn name(&self) -> &str;
    fn endpoint_names(&self) -> Vec<String>;
    fn dispatch(&self, endpoint: &str) -> ServiceResult<Outcome>;
}

struct HostedService<S> {
    descriptor: ServiceDescriptor<S>,
    factory: Box<dyn Fn() -> S + Send + Sync>,
}

impl<S: 'static> ErasedService for HostedService<S> {
    fn name(&self) -> &str {
        self.descriptor.name()
    }

    fn endpoint_names(&self) -> Vec<String> {
        self.descriptor
            .schema()
            .endpoint_names()
            .map(str::to_string)
            .collect()
    }

    fn dispatch(&self, endpoint: &str) -> ServiceResult<Outcome> {
        let instance = (self.factory)();
        self.descriptor.run_filters(endpoint, &instance)
    }
}

/// Registry of hosted services and the dispatch entry point.
#[derive(Default)]
pub struct ServiceHost {
    services: RwLock<HashMap<String, Arc<dyn ErasedService>>>,
}

impl ServiceHost {
    /// Creates an empty host.
    pub fn new() -> Self {
        Self {
            services: RwLock::new(HashMap::new()),
        }
    }

    /// Registers a service definition with its per-dispatch instance
    /// factory. Fails if the name is already taken.
    pub fn register<S, F>(&self, descriptor: ServiceDescriptor<S>, factory: F) -> HostResult<()>
    where
        S: 'static,
        F: Fn() -> S + Send + Sync + 'static,
    {
        let name = descriptor.name().to_string();
        let mut services = self.services.write();
        if services.contains_key(&name) {
            return Err(HostError::DuplicateService(name));
        }

        info!(service = %name, filters = descriptor.filters().len(), "registered service");
        services.insert(
            name,
            Arc::new(HostedService {
                descriptor,
                factory: Box::new(factory),
            }),
        );
        Ok(())
    }

    /// Dispatches `endpoint` on the named service: creates a fresh instance
    /// and runs the full filter pipeline around the endpoint invocation.
    pub fn dispatch(&self, service: &str, endpoint: &str) -> HostResult<Outcome> {
        let entry = self
            .services
            .read()
            .get(service)
            .cloned()
            .ok_or_else(|| HostError::UnknownService(service.to_string()))?;

        debug!(service, endpoint, "dispatching");
        Ok(entry.dispatch(endpoint)?)
    }

    /// The registered service names.
    pub fn service_names(&self) -> Vec<String> {
        self.services.read().keys().cloned().collect()
    }

    /// The endpoint names of one registered service, if present.
    pub fn endpoint_names(&self, service: &str) -> Option<Vec<String>> {
        self.services
            .read()
            .get(service)
            .map(|entry| entry.endpoint_names())
    }

    /// Number of registered services.
    pub fn count(&self) -> usize {
        self.services.read().len()
    }
}

impl std::fmt::Debug for ServiceHost {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceHost")
            .field("services", &self.count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use sift_framework::FilterOptions;

    struct Echo {
        payload: String,
    }

    fn echo_descriptor() -> ServiceDescriptor<Echo> {
        ServiceDescriptor::builder("echo")
            .endpoint("say", |e: &Echo| Ok(json!(e.payload)))
            .method("always", |_: &Echo| Ok(json!(true)))
            .before_filter("always", FilterOptions::new())
            .build()
    }

    #[test]
    fn dispatch_creates_an_instance_per_call() {
        let host = ServiceHost::new();
        host.register(echo_descriptor(), || Echo {
            payload: "hi".into(),
        })
        .unwrap();

        let outcome = host.dispatch("echo", "say").unwrap();
        assert_eq!(outcome, Outcome::Completed(json!("hi")));
    }

    #[test]
    fn unknown_service_is_rejected() {
        let host = ServiceHost::new();
        let err = host.dispatch("missing", "say").unwrap_err();
        assert!(matches!(err, HostError::UnknownService(name) if name == "missing"));
    }

    #[test]
    fn duplicate_registration_is_rejected() {
        let host = ServiceHost::new();
        host.register(echo_descriptor(), || Echo {
            payload: String::new(),
        })
        .unwrap();
        let err = host
            .register(echo_descriptor(), || Echo {
                payload: String::new(),
            })
            .unwrap_err();
        assert!(matches!(err, HostError::DuplicateService(name) if name == "echo"));
        assert_eq!(host.count(), 1);
    }

    #[test]
    fn pipeline_errors_pass_through_unchanged() {
        let descriptor = ServiceDescriptor::builder("broken")
            .endpoint("go", |_: &Echo| Ok(json!(null)))
            .before_filter("no_such_method", FilterOptions::new())
            .build();

        let host = ServiceHost::new();
        host.register(descriptor, || Echo {
            payload: String::new(),
        })
        .unwrap();

        let err = host.dispatch("broken", "go").unwrap_err();
        assert!(matches!(
            err,
            HostError::Service(ServiceError::InvalidFilter { .. })
        ));
    }

    #[test]
    fn endpoint_listing_reflects_the_schema() {
        let host = ServiceHost::new();
        host.register(echo_descriptor(), || Echo {
            payload: String::new(),
        })
        .unwrap();

        let mut endpoints = host.endpoint_names("echo").unwrap();
        endpoints.sort();
        assert_eq!(endpoints, ["say"]);
        assert_eq!(host.service_names(), ["echo"]);
        assert!(host.endpoint_names("missing").is_none());
    }
}
