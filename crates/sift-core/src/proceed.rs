//! Continuation primitive for around filters.
//!
//! An around filter does not call the endpoint directly; it receives a
//! [`Proceed`] representing "the rest of the chain" — the remaining inner
//! around filters plus the endpoint itself — and decides whether and when to
//! resume it. A filter that drops its `Proceed` without calling it prevents
//! everything inside it from running.

use serde_json::Value;

use crate::error::ServiceResult;

/// A zero-argument deferred computation producing the chain's value.
///
/// Consumed when executed; each link of an around chain runs at most once.
pub type Continuation<'a> = Box<dyn FnOnce() -> ServiceResult<Value> + 'a>;

/// Handle to the rest of an around chain.
///
/// Borrows the service instance for the duration of the dispatch, so it
/// cannot outlive the `run_filters` call that created it.
pub struct Proceed<'a> {
    next: Continuation<'a>,
}

impl<'a> Proceed<'a> {
    /// Wraps a continuation.
    pub fn new(next: Continuation<'a>) -> Self {
        Self { next }
    }

    /// Builds a `Proceed` directly from a closure.
    ///
    /// Mainly useful for exercising wrapping callables in isolation, without
    /// assembling a full chain.
    pub fn from_fn(f: impl FnOnce() -> ServiceResult<Value> + 'a) -> Self {
        Self { next: Box::new(f) }
    }

    /// Resumes the chain, running everything inside this link.
    pub fn call(self) -> ServiceResult<Value> {
        (self.next)()
    }
}

impl std::fmt::Debug for Proceed<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Proceed").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn call_runs_the_continuation_once() {
        let proceed = Proceed::from_fn(|| Ok(json!(42)));
        assert_eq!(proceed.call().unwrap(), json!(42));
    }

    #[test]
    fn dropping_without_calling_runs_nothing() {
        let mut ran = false;
        {
            let _proceed = Proceed::from_fn(|| {
                ran = true;
                Ok(Value::Null)
            });
        }
        assert!(!ran);
    }
}
