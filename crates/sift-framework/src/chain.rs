//! Around-chain composition.
//!
//! Builds a single continuation representing "run the endpoint now, through
//! every applicable around filter". The registered around filters are folded
//! in reverse declaration order over the endpoint call, so the first
//! declared filter ends up outermost. A filter whose condition fails is
//! elided from the chain entirely; a filter that never resumes its
//! `Proceed` prevents everything inside it from running.

use tracing::trace;

use sift_core::{Continuation, EndpointFn, Proceed, ServiceResult, ServiceSchema};

use crate::conditions::should_invoke;
use crate::registry::{FilterKind, FilterSet};

/// Composes the around chain for one dispatch.
///
/// The returned continuation must be executed exactly once; conditions have
/// already been evaluated by the time it runs.
pub(crate) fn compose<'a, S>(
    schema: &'a ServiceSchema<S>,
    filters: &'a FilterSet<S>,
    service: &'a S,
    endpoint: &'a str,
    endpoint_fn: &'a EndpointFn<S>,
) -> ServiceResult<Continuation<'a>> {
    let mut next: Continuation<'a> = Box::new(move || endpoint_fn(service));

    for filter in filters.list(FilterKind::Around).iter().rev() {
        if !should_invoke(schema, service, endpoint, filter)? {
            trace!(
                callable = filter.callable().describe(),
                endpoint,
                "around filter elided from chain"
            );
            continue;
        }
        let callable = filter.callable();
        let inner = next;
        next = Box::new(move || callable.invoke(schema, service, Some(Proceed::new(inner))));
    }

    Ok(next)
}
