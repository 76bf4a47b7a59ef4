//! Observable result of a full filter run.

use serde_json::Value;

/// What a `run_filters` call produced.
///
/// The dispatcher inspects this to decide whether an endpoint response
/// exists to serialize, or whether the request was rejected by a before
/// filter without the endpoint ever running.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// Every phase ran; carries the endpoint's (possibly wrapped) value.
    Completed(Value),
    /// A before filter returned exactly `false`; the around chain, the
    /// endpoint, and the after filters never executed.
    Halted,
}

impl Outcome {
    /// Returns `true` if a before filter stopped the run.
    pub fn is_halted(&self) -> bool {
        matches!(self, Self::Halted)
    }

    /// Returns the completed value, if any.
    pub fn value(&self) -> Option<&Value> {
        match self {
            Self::Completed(value) => Some(value),
            Self::Halted => None,
        }
    }

    /// Consumes the outcome, returning the completed value if any.
    pub fn into_value(self) -> Option<Value> {
        match self {
            Self::Completed(value) => Some(value),
            Self::Halted => None,
        }
    }
}
