//! # Sift Framework
//!
//! Declarative `before` / `after` / `around` filters around RPC service
//! endpoint dispatch.
//!
//! A service definition declares its endpoints, its named helper methods,
//! and the filters that wrap every dispatch. Each filter carries optional
//! application conditions (`only` / `except` / `when` / `unless`), and
//! around filters control continuation of the chain through a `Proceed`
//! handle they may or may not resume.
//!
//! ```rust,ignore
//! let descriptor = ServiceDescriptor::builder("jobs")
//!     .endpoint("do_work", |svc: &Jobs| Ok(json!(svc.result())))
//!     .method("check_auth", |svc: &Jobs| Ok(json!(svc.authorized())))
//!     .around_method("time_it", |svc: &Jobs, proceed| {
//!         let started = Instant::now();
//!         let value = proceed.call()?;
//!         svc.record(started.elapsed());
//!         Ok(value)
//!     })
//!     .before_filter("check_auth", FilterOptions::new())
//!     .around_filter("time_it", FilterOptions::new().only(["do_work"]))
//!     .build();
//!
//! let outcome = descriptor.run_filters("do_work", &instance)?;
//! ```

pub mod callable;
pub mod chain;
pub mod conditions;
pub mod descriptor;
pub mod options;
pub mod registry;

pub use callable::{BoundFn, Callable, CallableList, FreeFn};
pub use conditions::should_invoke;
pub use descriptor::{DescriptorBuilder, ServiceDescriptor};
pub use options::FilterOptions;
pub use registry::{Filter, FilterKind, FilterSet};

pub use sift_core::{Outcome, Proceed, ServiceError, ServiceResult, ServiceSchema, Value};
