//! Filter callables and their invocation.
//!
//! A [`Callable`] is the polymorphic reference a filter declaration carries:
//! either an inline closure (with or without access to the service
//! instance), or the name of a method registered on the service schema,
//! resolved at call time. One invocation routine ([`Callable::invoke`])
//! covers every variant, so the registry, the condition evaluator, and the
//! chain builder never care which kind they are holding.
//!
//! # Identity
//!
//! Registration deduplicates on callable identity: closure variants compare
//! by `Arc` pointer, named variants by name. Cloning a `Callable` preserves
//! identity, so the same declaration registered twice is recognized as a
//! duplicate, while two closures with identical source text are not.

use std::sync::Arc;

use serde_json::Value;

use sift_core::{Proceed, ServiceError, ServiceResult, ServiceSchema};

/// A detached callable unit: runs without access to the service instance.
pub type FreeFn =
    dyn for<'b> Fn(Option<Proceed<'b>>) -> ServiceResult<Value> + Send + Sync;

/// A callable unit receiving the service instance.
pub type BoundFn<S> =
    dyn for<'a, 'b> Fn(&'a S, Option<Proceed<'b>>) -> ServiceResult<Value> + Send + Sync;

/// Reference to the code a filter runs.
pub enum Callable<S> {
    /// Closure that does not receive the service instance.
    Free(Arc<FreeFn>),
    /// Closure receiving the service instance.
    Bound(Arc<BoundFn<S>>),
    /// Method name looked up on the service schema at call time.
    Named(String),
}

impl<S> Callable<S> {
    /// A detached closure taking no arguments.
    pub fn free<F>(f: F) -> Self
    where
        F: Fn() -> ServiceResult<Value> + Send + Sync + 'static,
    {
        let inner: Arc<FreeFn> = Arc::new(move |_proceed| f());
        Self::Free(inner)
    }

    /// A closure receiving the service instance.
    pub fn bound<F>(f: F) -> Self
    where
        F: Fn(&S) -> ServiceResult<Value> + Send + Sync + 'static,
    {
        let inner: Arc<BoundFn<S>> = Arc::new(move |service, _proceed| f(service));
        Self::Bound(inner)
    }

    /// A wrapping closure receiving the service instance and the chain
    /// continuation. Fails with [`ServiceError::NoContinuation`] if invoked
    /// outside an around chain.
    pub fn wrap<F>(f: F) -> Self
    where
        F: for<'a, 'b> Fn(&'a S, Proceed<'b>) -> ServiceResult<Value> + Send + Sync + 'static,
    {
        let inner: Arc<BoundFn<S>> = Arc::new(move |service, proceed| match proceed {
            Some(proceed) => f(service, proceed),
            None => Err(ServiceError::NoContinuation),
        });
        Self::Bound(inner)
    }

    /// A wrapping closure receiving only the chain continuation.
    pub fn wrap_free<F>(f: F) -> Self
    where
        F: for<'b> Fn(Proceed<'b>) -> ServiceResult<Value> + Send + Sync + 'static,
    {
        let inner: Arc<FreeFn> = Arc::new(move |proceed| match proceed {
            Some(proceed) => f(proceed),
            None => Err(ServiceError::NoContinuation),
        });
        Self::Free(inner)
    }

    /// A symbolic reference to a method registered on the service schema.
    pub fn named(name: impl Into<String>) -> Self {
        Self::Named(name.into())
    }

    /// Invokes this callable against the given service instance.
    ///
    /// Named references are resolved through `schema` here, at call time; an
    /// unknown name fails with [`ServiceError::InvalidFilter`]. The result
    /// value is returned unmodified.
    pub fn invoke<'b>(
        &self,
        schema: &ServiceSchema<S>,
        service: &S,
        proceed: Option<Proceed<'b>>,
    ) -> ServiceResult<Value> {
        match self {
            Self::Free(f) => f(proceed),
            Self::Bound(f) => f(service, proceed),
            Self::Named(name) => match schema.method(name) {
                Some(method) => method(service, proceed),
                None => Err(ServiceError::invalid_filter(name.clone())),
            },
        }
    }

    /// Whether two callables are the same reference for deduplication
    /// purposes.
    pub fn same_callable(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Free(a), Self::Free(b)) => Arc::ptr_eq(a, b),
            (Self::Bound(a), Self::Bound(b)) => Arc::ptr_eq(a, b),
            (Self::Named(a), Self::Named(b)) => a == b,
            _ => false,
        }
    }

    /// Short label for log output.
    pub fn describe(&self) -> &str {
        match self {
            Self::Free(_) | Self::Bound(_) => "{closure}",
            Self::Named(name) => name,
        }
    }
}

impl<S> Clone for Callable<S> {
    fn clone(&self) -> Self {
        match self {
            Self::Free(f) => Self::Free(Arc::clone(f)),
            Self::Bound(f) => Self::Bound(Arc::clone(f)),
            Self::Named(name) => Self::Named(name.clone()),
        }
    }
}

impl<S> std::fmt::Debug for Callable<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Free(_) => f.write_str("Callable::Free"),
            Self::Bound(_) => f.write_str("Callable::Bound"),
            Self::Named(name) => write!(f, "Callable::Named({name})"),
        }
    }
}

impl<S> From<&str> for Callable<S> {
    fn from(name: &str) -> Self {
        Self::named(name)
    }
}

impl<S> From<String> for Callable<S> {
    fn from(name: String) -> Self {
        Self::Named(name)
    }
}

/// Conversion accepted by the filter declaration methods: a single callable,
/// a bare method name, or a collection of callables.
pub trait CallableList<S> {
    /// The callables to register, in declaration order.
    fn into_callables(self) -> Vec<Callable<S>>;
}

impl<S> CallableList<S> for Callable<S> {
    fn into_callables(self) -> Vec<Callable<S>> {
        vec![self]
    }
}

impl<S> CallableList<S> for &str {
    fn into_callables(self) -> Vec<Callable<S>> {
        vec![Callable::named(self)]
    }
}

impl<S> CallableList<S> for Vec<Callable<S>> {
    fn into_callables(self) -> Vec<Callable<S>> {
        self
    }
}

impl<S, const N: usize> CallableList<S> for [Callable<S>; N] {
    fn into_callables(self) -> Vec<Callable<S>> {
        self.into()
    }
}
