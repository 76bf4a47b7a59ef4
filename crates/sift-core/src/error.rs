//! Unified error types for the Sift core model.
//!
//! Errors raised while filters or endpoints execute are never recovered
//! locally; they propagate unchanged to the dispatcher, which converts them
//! into a protocol-level failure response.

use thiserror::Error;

/// Errors that can occur while dispatching an endpoint through its filters.
#[derive(Debug, Clone, Error)]
pub enum ServiceError {
    /// A symbolic filter reference named a method the service schema does
    /// not provide.
    ///
    /// Raised lazily, at invocation time: a misspelled filter declaration
    /// surfaces only when the affected endpoint is actually dispatched,
    /// never at definition time.
    #[error("cannot resolve filter '{name}': no such method on the service")]
    InvalidFilter {
        /// The unresolved method name.
        name: String,
    },

    /// Dispatch named an endpoint the schema does not define.
    #[error("no endpoint named '{0}'")]
    UnknownEndpoint(String),

    /// A wrapping callable asked for the chain continuation, but was
    /// invoked outside an around chain (e.g. registered as a before filter).
    #[error("chain continuation requested outside an around chain")]
    NoContinuation,

    /// Failure surfaced by user endpoint or filter code.
    #[error("handler failed: {0}")]
    Handler(String),
}

impl ServiceError {
    /// Creates an unresolved-filter error for the given method name.
    pub fn invalid_filter(name: impl Into<String>) -> Self {
        Self::InvalidFilter { name: name.into() }
    }

    /// Creates a handler failure with the given message.
    pub fn handler(message: impl Into<String>) -> Self {
        Self::Handler(message.into())
    }
}

/// Result type for filter and endpoint invocations.
pub type ServiceResult<T> = Result<T, ServiceError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_filter_names_the_reference() {
        let err = ServiceError::invalid_filter("check_auth");
        assert_eq!(
            err.to_string(),
            "cannot resolve filter 'check_auth': no such method on the service"
        );
    }

    #[test]
    fn handler_error_carries_message() {
        let err = ServiceError::handler("database unavailable");
        assert_eq!(err.to_string(), "handler failed: database unavailable");
    }
}
