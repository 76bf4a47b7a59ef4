//! Per-filter application options.

use crate::callable::Callable;

/// Conditions attached to a single filter declaration.
///
/// All fields are optional; an empty `FilterOptions` means the filter
/// applies to every endpoint unconditionally. `only` and `except` restrict
/// by endpoint name; `when` and `unless` are callables evaluated against the
/// service instance at dispatch time. Every configured condition must pass
/// for the filter to run.
///
/// # Example
///
/// ```rust,ignore
/// FilterOptions::new()
///     .only(["create", "update"])
///     .unless("read_only?")
/// ```
pub struct FilterOptions<S> {
    pub(crate) only: Vec<String>,
    pub(crate) except: Vec<String>,
    pub(crate) when: Option<Callable<S>>,
    pub(crate) unless: Option<Callable<S>>,
}

impl<S> FilterOptions<S> {
    /// Options that always apply.
    pub fn new() -> Self {
        Self {
            only: Vec::new(),
            except: Vec::new(),
            when: None,
            unless: None,
        }
    }

    /// Restricts the filter to the named endpoints.
    pub fn only<I, T>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        self.only.extend(names.into_iter().map(Into::into));
        self
    }

    /// Excludes the named endpoints.
    pub fn except<I, T>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        self.except.extend(names.into_iter().map(Into::into));
        self
    }

    /// The filter applies only when this callable's result is truthy.
    pub fn when(mut self, condition: impl Into<Callable<S>>) -> Self {
        self.when = Some(condition.into());
        self
    }

    /// The filter applies only when this callable's result is falsy.
    pub fn unless(mut self, condition: impl Into<Callable<S>>) -> Self {
        self.unless = Some(condition.into());
        self
    }
}

impl<S> Default for FilterOptions<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S> Clone for FilterOptions<S> {
    fn clone(&self) -> Self {
        Self {
            only: self.only.clone(),
            except: self.except.clone(),
            when: self.when.clone(),
            unless: self.unless.clone(),
        }
    }
}

impl<S> std::fmt::Debug for FilterOptions<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FilterOptions")
            .field("only", &self.only)
            .field("except", &self.except)
            .field("when", &self.when.is_some())
            .field("unless", &self.unless.is_some())
            .finish()
    }
}
