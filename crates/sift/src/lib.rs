//! # Sift
//!
//! A declarative filter (middleware) framework for RPC service endpoint
//! dispatch.
//!
//! Services declare `before`, `after`, and `around` filters that run around
//! the invocation of a named endpoint, each with optional application
//! conditions (`only` / `except` / `when` / `unless`). Around filters
//! receive a `Proceed` continuation and decide whether the rest of the
//! chain — inner filters plus the endpoint — runs at all; a before filter
//! returning exactly `false` halts the dispatch before the endpoint is ever
//! invoked.
//!
//! ## Architecture
//!
//! ```text
//! ┌────────────┐     ┌───────────────────────────────────────────────┐
//! │ ServiceHost│────▶│ ServiceDescriptor  (schema + filters, frozen) │
//! │ (dispatch) │     │   before ─▶ around( … endpoint … ) ─▶ after   │
//! └────────────┘     └───────────────────────────────────────────────┘
//! ```
//!
//! - **sift-core**: service schema, continuation primitive, outcome, errors
//! - **sift-framework**: callables, filter registry, conditions, chain
//!   composition, the dispatch pipeline
//! - **sift-runtime**: service host, configuration, logging setup
//!
//! ## Quick start
//!
//! ```rust,ignore
//! use sift::prelude::*;
//!
//! let descriptor = ServiceDescriptor::builder("jobs")
//!     .endpoint("do_work", |jobs: &Jobs| Ok(json!(jobs.run())))
//!     .method("check_auth", |jobs: &Jobs| Ok(json!(jobs.authorized())))
//!     .before_filter("check_auth", FilterOptions::new())
//!     .build();
//!
//! let host = ServiceHost::new();
//! host.register(descriptor, || Jobs::default())?;
//! let outcome = host.dispatch("jobs", "do_work")?;
//! ```

pub use sift_core as core;
pub use sift_framework as framework;
pub use sift_runtime as runtime;

/// Prelude module for convenient imports.
pub mod prelude {
    // Host - main entry point
    pub use sift_runtime::{LoggingBuilder, ServiceHost};

    // Service definition
    pub use sift_framework::{
        Callable, DescriptorBuilder, FilterKind, FilterOptions, ServiceDescriptor,
    };

    // Dispatch vocabulary
    pub use sift_core::{Outcome, Proceed, ServiceError, ServiceResult, Value};
}
