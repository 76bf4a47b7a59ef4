//! Ordered, deduplicated storage of filter declarations.
//!
//! One [`FilterSet`] belongs to each service definition. It is populated
//! while the service is being defined and frozen afterwards; dispatch only
//! ever reads it. Insertion order is semantically significant — it is the
//! before/after execution order and the outer-to-inner around wrapping
//! order — and is preserved exactly as declared.

use tracing::{debug, trace};

use crate::callable::Callable;
use crate::options::FilterOptions;

/// The three positions a filter can occupy around an endpoint invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterKind {
    /// Runs before the endpoint; may halt the dispatch by returning `false`.
    Before,
    /// Runs after the endpoint; return values are ignored.
    After,
    /// Wraps the endpoint; controls continuation via `Proceed`.
    Around,
}

impl FilterKind {
    /// Lowercase label for log output.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Before => "before",
            Self::After => "after",
            Self::Around => "around",
        }
    }
}

/// One registered filter: the callable plus its application options.
pub struct Filter<S> {
    pub(crate) callable: Callable<S>,
    pub(crate) options: FilterOptions<S>,
}

impl<S> Filter<S> {
    /// The callable this filter runs.
    pub fn callable(&self) -> &Callable<S> {
        &self.callable
    }

    /// The conditions attached to this filter.
    pub fn options(&self) -> &FilterOptions<S> {
        &self.options
    }
}

impl<S> std::fmt::Debug for Filter<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Filter")
            .field("callable", &self.callable)
            .field("options", &self.options)
            .finish()
    }
}

/// Per-service filter storage, one ordered list per [`FilterKind`].
pub struct FilterSet<S> {
    before: Vec<Filter<S>>,
    after: Vec<Filter<S>>,
    around: Vec<Filter<S>>,
}

impl<S> FilterSet<S> {
    /// Creates an empty set.
    pub fn new() -> Self {
        Self {
            before: Vec::new(),
            after: Vec::new(),
            around: Vec::new(),
        }
    }

    /// Appends filters for `kind`, one per callable, sharing `options`.
    ///
    /// Registration is idempotent per callable identity: a callable already
    /// present under `kind` is skipped silently, and the options of its
    /// first registration stay in effect.
    pub fn register(
        &mut self,
        kind: FilterKind,
        callables: Vec<Callable<S>>,
        options: FilterOptions<S>,
    ) {
        let list = self.list_mut(kind);
        for callable in callables {
            if list.iter().any(|f| f.callable.same_callable(&callable)) {
                trace!(
                    kind = kind.as_str(),
                    callable = callable.describe(),
                    "duplicate filter registration skipped"
                );
                continue;
            }
            debug!(
                kind = kind.as_str(),
                callable = callable.describe(),
                position = list.len(),
                "registered filter"
            );
            list.push(Filter {
                callable,
                options: options.clone(),
            });
        }
    }

    /// The registered filters of `kind`, in declaration order.
    pub fn list(&self, kind: FilterKind) -> &[Filter<S>] {
        match kind {
            FilterKind::Before => &self.before,
            FilterKind::After => &self.after,
            FilterKind::Around => &self.around,
        }
    }

    /// Total number of registered filters across all kinds.
    pub fn len(&self) -> usize {
        self.before.len() + self.after.len() + self.around.len()
    }

    /// Returns `true` if no filter is registered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn list_mut(&mut self, kind: FilterKind) -> &mut Vec<Filter<S>> {
        match kind {
            FilterKind::Before => &mut self.before,
            FilterKind::After => &mut self.after,
            FilterKind::Around => &mut self.around,
        }
    }
}

impl<S> Default for FilterSet<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S> std::fmt::Debug for FilterSet<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FilterSet")
            .field("before", &self.before.len())
            .field("after", &self.after.len())
            .field("around", &self.around.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Value, json};

    struct Unit;

    #[test]
    fn registration_order_is_preserved() {
        let mut set: FilterSet<Unit> = FilterSet::new();
        set.register(
            FilterKind::Before,
            vec![
                Callable::named("first"),
                Callable::named("second"),
                Callable::named("third"),
            ],
            FilterOptions::new(),
        );

        let names: Vec<&str> = set
            .list(FilterKind::Before)
            .iter()
            .map(|f| f.callable().describe())
            .collect();
        assert_eq!(names, ["first", "second", "third"]);
    }

    #[test]
    fn duplicate_named_registration_is_a_silent_noop() {
        let mut set: FilterSet<Unit> = FilterSet::new();
        set.register(
            FilterKind::Before,
            vec![Callable::named("check")],
            FilterOptions::new().only(["create"]),
        );
        set.register(
            FilterKind::Before,
            vec![Callable::named("check")],
            FilterOptions::new().only(["destroy"]),
        );

        let filters = set.list(FilterKind::Before);
        assert_eq!(filters.len(), 1);
        // First-registered options stay in effect.
        assert_eq!(filters[0].options().only, ["create"]);
    }

    #[test]
    fn duplicate_closure_registration_dedups_by_identity() {
        let mut set: FilterSet<Unit> = FilterSet::new();
        let callable = Callable::free(|| Ok(json!(true)));
        set.register(
            FilterKind::After,
            vec![callable.clone()],
            FilterOptions::new(),
        );
        set.register(FilterKind::After, vec![callable], FilterOptions::new());
        assert_eq!(set.list(FilterKind::After).len(), 1);
    }

    #[test]
    fn distinct_closures_both_register() {
        let mut set: FilterSet<Unit> = FilterSet::new();
        set.register(
            FilterKind::Around,
            vec![
                Callable::free(|| Ok(Value::Null)),
                Callable::free(|| Ok(Value::Null)),
            ],
            FilterOptions::new(),
        );
        assert_eq!(set.list(FilterKind::Around).len(), 2);
    }

    #[test]
    fn same_callable_may_appear_under_different_kinds() {
        let mut set: FilterSet<Unit> = FilterSet::new();
        set.register(
            FilterKind::Before,
            vec![Callable::named("audit")],
            FilterOptions::new(),
        );
        set.register(
            FilterKind::After,
            vec![Callable::named("audit")],
            FilterOptions::new(),
        );
        assert_eq!(set.list(FilterKind::Before).len(), 1);
        assert_eq!(set.list(FilterKind::After).len(), 1);
        assert!(!set.is_empty());
        assert_eq!(set.len(), 2);
    }
}
