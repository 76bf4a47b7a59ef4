//! Logging setup built on `tracing` and `tracing-subscriber`.
//!
//! The filter pipeline emits structured events at debug/trace level
//! (registration, condition elision, halted dispatches); this module wires
//! a subscriber so hosts see them without assembling one by hand.
//!
//! ```rust,ignore
//! use sift_runtime::logging::LoggingBuilder;
//!
//! LoggingBuilder::new()
//!     .with_level(tracing::Level::DEBUG)
//!     .directive("sift_framework=trace")
//!     .init();
//! ```

use tracing_subscriber::prelude::*;
use tracing_subscriber::util::TryInitError;
use tracing_subscriber::{EnvFilter, fmt};

use crate::config::LoggingConfig;

/// Initialize logging from a [`LoggingConfig`].
///
/// Safe to call more than once; only the first initialization wins.
pub fn init_from_config(config: &LoggingConfig) {
    let mut builder = LoggingBuilder::new();
    if let Ok(level) = config.level.parse() {
        builder = builder.with_level(level);
    }
    for (module, level) in &config.filters {
        builder = builder.directive(&format!("{module}={level}"));
    }
    builder.init();
}

/// A builder for configuring the tracing subscriber.
#[derive(Default)]
pub struct LoggingBuilder {
    level: Option<tracing::Level>,
    directives: Vec<String>,
    with_target: bool,
}

impl LoggingBuilder {
    /// Creates a builder with target display enabled.
    pub fn new() -> Self {
        Self {
            level: None,
            directives: Vec::new(),
            with_target: true,
        }
    }

    /// Sets the base log level.
    pub fn with_level(mut self, level: tracing::Level) -> Self {
        self.level = Some(level);
        self
    }

    /// Adds a filter directive, e.g. `"sift_framework=trace"`.
    pub fn directive(mut self, directive: &str) -> Self {
        self.directives.push(directive.to_string());
        self
    }

    /// Include the target (module path) in log output.
    pub fn with_target(mut self, enabled: bool) -> Self {
        self.with_target = enabled;
        self
    }

    /// Build the filter from the base level and directives. A `RUST_LOG`
    /// environment variable takes precedence over the configured level.
    fn build_filter(&self) -> EnvFilter {
        let base_level = self.level.unwrap_or(tracing::Level::INFO);
        let base_filter = base_level.to_string().to_lowercase();

        let mut filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&base_filter));

        for directive in &self.directives {
            if let Ok(d) = directive.parse() {
                filter = filter.add_directive(d);
            }
        }

        filter
    }

    /// Initialize the logging system, ignoring a second initialization.
    pub fn init(self) {
        let _ = self.try_init();
    }

    /// Try to initialize the logging system, returning an error on failure.
    pub fn try_init(self) -> Result<(), TryInitError> {
        let filter = self.build_filter();
        let layer = fmt::layer().compact().with_target(self.with_target);

        tracing_subscriber::registry()
            .with(layer)
            .with(filter)
            .try_init()
    }
}
