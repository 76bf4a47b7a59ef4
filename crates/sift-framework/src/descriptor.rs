//! Service definition and the dispatch pipeline.
//!
//! A [`ServiceDescriptor`] is the frozen, definition-time artifact for one
//! service type: its method surface (schema) plus its declared filters. It
//! is assembled once through [`DescriptorBuilder`] during startup and shared
//! read-only by every dispatch afterwards — single writer at configuration
//! time, many readers at runtime.
//!
//! [`ServiceDescriptor::run_filters`] is the one entry point a dispatcher
//! calls instead of invoking an endpoint directly: it runs the before
//! filters (which may halt the dispatch), the around chain with the
//! endpoint innermost, and the after filters.

use serde_json::Value;
use tracing::{Level, debug, span, trace};

use sift_core::{Outcome, Proceed, ServiceError, ServiceResult, ServiceSchema};

use crate::callable::CallableList;
use crate::chain::compose;
use crate::conditions::should_invoke;
use crate::options::FilterOptions;
use crate::registry::{FilterKind, FilterSet};

/// A frozen service definition: schema plus filters.
pub struct ServiceDescriptor<S> {
    schema: ServiceSchema<S>,
    filters: FilterSet<S>,
}

impl<S> ServiceDescriptor<S> {
    /// Starts defining a service with the given name.
    pub fn builder(name: impl Into<String>) -> DescriptorBuilder<S> {
        DescriptorBuilder {
            schema: ServiceSchema::new(name),
            filters: FilterSet::new(),
        }
    }

    /// The service name, as the dispatcher addresses it.
    pub fn name(&self) -> &str {
        self.schema.name()
    }

    /// The method surface of this service.
    pub fn schema(&self) -> &ServiceSchema<S> {
        &self.schema
    }

    /// The declared filters.
    pub fn filters(&self) -> &FilterSet<S> {
        &self.filters
    }

    /// Dispatches `endpoint` on `service` through the full filter pipeline.
    ///
    /// Phases run in order:
    ///
    /// 1. **before** — each applicable before filter is invoked; one
    ///    returning exactly `false` halts the dispatch (no further before
    ///    filters, no around chain, no endpoint, no after filters).
    /// 2. **around** — the composed chain executes, endpoint innermost.
    /// 3. **after** — every applicable after filter is invoked; return
    ///    values never stop this phase.
    ///
    /// Errors from filters or the endpoint propagate unchanged; the after
    /// phase only runs when the around chain succeeded.
    pub fn run_filters(&self, endpoint: &str, service: &S) -> ServiceResult<Outcome> {
        let span = span!(Level::DEBUG, "run_filters", service = %self.name(), endpoint);
        let _enter = span.enter();

        let endpoint_fn = self
            .schema
            .endpoint(endpoint)
            .ok_or_else(|| ServiceError::UnknownEndpoint(endpoint.to_string()))?;

        for filter in self.filters.list(FilterKind::Before) {
            if !should_invoke(&self.schema, service, endpoint, filter)? {
                continue;
            }
            trace!(callable = filter.callable().describe(), "before filter");
            let value = filter.callable().invoke(&self.schema, service, None)?;
            if value == Value::Bool(false) {
                debug!(
                    callable = filter.callable().describe(),
                    "before filter halted dispatch"
                );
                return Ok(Outcome::Halted);
            }
        }

        let chain = compose(&self.schema, &self.filters, service, endpoint, endpoint_fn)?;
        let value = chain()?;

        for filter in self.filters.list(FilterKind::After) {
            if should_invoke(&self.schema, service, endpoint, filter)? {
                trace!(callable = filter.callable().describe(), "after filter");
                filter.callable().invoke(&self.schema, service, None)?;
            }
        }

        debug!("dispatch completed");
        Ok(Outcome::Completed(value))
    }
}

impl<S> std::fmt::Debug for ServiceDescriptor<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceDescriptor")
            .field("schema", &self.schema)
            .field("filters", &self.filters)
            .finish()
    }
}

/// Builder for a [`ServiceDescriptor`].
///
/// Everything is declared here — endpoints, named methods, filters — and
/// frozen by [`build`](Self::build). Filter declarations accept a single
/// [`Callable`](crate::Callable), a bare method name, or a collection of
/// callables, followed by the [`FilterOptions`] governing their application.
pub struct DescriptorBuilder<S> {
    schema: ServiceSchema<S>,
    filters: FilterSet<S>,
}

impl<S> DescriptorBuilder<S> {
    /// Registers a named endpoint.
    pub fn endpoint<F>(mut self, name: impl Into<String>, f: F) -> Self
    where
        F: Fn(&S) -> ServiceResult<Value> + Send + Sync + 'static,
    {
        self.schema.add_endpoint(name, f);
        self
    }

    /// Registers a named helper method for symbolic filter references.
    pub fn method<F>(mut self, name: impl Into<String>, f: F) -> Self
    where
        F: Fn(&S) -> ServiceResult<Value> + Send + Sync + 'static,
    {
        self.schema.add_method(name, f);
        self
    }

    /// Registers a named wrapping method for symbolic around references.
    pub fn around_method<F>(mut self, name: impl Into<String>, f: F) -> Self
    where
        F: for<'a, 'b> Fn(&'a S, Proceed<'b>) -> ServiceResult<Value> + Send + Sync + 'static,
    {
        self.schema.add_around_method(name, f);
        self
    }

    /// Declares before filters.
    pub fn before_filter(
        mut self,
        callables: impl CallableList<S>,
        options: FilterOptions<S>,
    ) -> Self {
        self.filters
            .register(FilterKind::Before, callables.into_callables(), options);
        self
    }

    /// Declares after filters.
    pub fn after_filter(
        mut self,
        callables: impl CallableList<S>,
        options: FilterOptions<S>,
    ) -> Self {
        self.filters
            .register(FilterKind::After, callables.into_callables(), options);
        self
    }

    /// Declares around filters. Declaration order is wrapping order: the
    /// first declared filter is outermost.
    pub fn around_filter(
        mut self,
        callables: impl CallableList<S>,
        options: FilterOptions<S>,
    ) -> Self {
        self.filters
            .register(FilterKind::Around, callables.into_callables(), options);
        self
    }

    /// Freezes the definition.
    pub fn build(self) -> ServiceDescriptor<S> {
        debug!(
            service = %self.schema.name(),
            filters = self.filters.len(),
            "service definition frozen"
        );
        ServiceDescriptor {
            schema: self.schema,
            filters: self.filters,
        }
    }
}
