//! # Sift Runtime
//!
//! Host orchestration for the Sift filter framework: the [`ServiceHost`]
//! registry that dispatches endpoints through their filter pipelines, plus
//! configuration loading and logging setup.
//!
//! Registration is a startup-time activity; once traffic begins the host is
//! read-only, matching the single-writer-then-many-readers discipline of
//! the service descriptors it holds.

pub mod config;
pub mod host;
pub mod logging;

pub use config::{ConfigError, ConfigLoader, ConfigResult, LoggingConfig, SiftConfig, load_config};
pub use host::{HostError, HostResult, ServiceHost};
pub use logging::{LoggingBuilder, init_from_config};
