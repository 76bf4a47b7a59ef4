//! # Sift Core
//!
//! Foundation types for the Sift filter framework: the service schema that
//! symbolic filter references resolve against, the continuation primitive
//! handed to around filters, the dispatch outcome, and the shared error
//! taxonomy.
//!
//! Higher-level pieces — filter declaration, conditional application, chain
//! composition, and the dispatch pipeline — live in `sift-framework`.

pub mod error;
pub mod outcome;
pub mod proceed;
pub mod schema;

pub use error::{ServiceError, ServiceResult};
pub use outcome::Outcome;
pub use proceed::{Continuation, Proceed};
pub use schema::{EndpointFn, MethodFn, ServiceSchema};

/// The value domain endpoints and filters produce: JSON payloads as an RPC
/// serialization layer would consume them.
pub use serde_json::Value;
