//! Conditional filter application.
//!
//! Decides whether one registered filter applies to one dispatch. The four
//! checks — `only`, `except`, `when`, `unless` — are independent and ANDed;
//! each defaults to passing when unconfigured. `when`/`unless` callables run
//! against the live service instance, so a filter can be gated on request
//! state, not just on the endpoint name.

use serde_json::Value;

use sift_core::{ServiceResult, ServiceSchema};

use crate::registry::Filter;

/// Dynamic-language truthiness for condition results: `null` and `false`
/// are falsy, everything else (including `0` and `""`) is truthy.
pub(crate) fn truthy(value: &Value) -> bool {
    !matches!(value, Value::Null | Value::Bool(false))
}

/// Whether `filter` applies to a dispatch of `endpoint` on `service`.
///
/// Condition callables are resolved and invoked like any other filter
/// callable; an unresolvable symbolic reference propagates as
/// [`ServiceError::InvalidFilter`](sift_core::ServiceError::InvalidFilter).
pub fn should_invoke<S>(
    schema: &ServiceSchema<S>,
    service: &S,
    endpoint: &str,
    filter: &Filter<S>,
) -> ServiceResult<bool> {
    let options = filter.options();

    if !options.only.is_empty() && !options.only.iter().any(|name| name == endpoint) {
        return Ok(false);
    }

    if options.except.iter().any(|name| name == endpoint) {
        return Ok(false);
    }

    if let Some(condition) = &options.when {
        let value = condition.invoke(schema, service, None)?;
        if !truthy(&value) {
            return Ok(false);
        }
    }

    if let Some(condition) = &options.unless {
        let value = condition.invoke(schema, service, None)?;
        if truthy(&value) {
            return Ok(false);
        }
    }

    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    use crate::callable::Callable;
    use crate::options::FilterOptions;

    struct Request {
        admin: bool,
    }

    fn schema() -> ServiceSchema<Request> {
        let mut schema = ServiceSchema::new("requests");
        schema.add_method("admin?", |r: &Request| Ok(json!(r.admin)));
        schema
    }

    fn filter(options: FilterOptions<Request>) -> Filter<Request> {
        Filter {
            callable: Callable::free(|| Ok(Value::Null)),
            options,
        }
    }

    fn applies(endpoint: &str, options: FilterOptions<Request>) -> bool {
        should_invoke(&schema(), &Request { admin: false }, endpoint, &filter(options)).unwrap()
    }

    #[test]
    fn empty_options_always_apply() {
        assert!(applies("anything", FilterOptions::new()));
    }

    #[test]
    fn only_restricts_to_listed_endpoints() {
        assert!(applies("x", FilterOptions::new().only(["x"])));
        assert!(!applies("y", FilterOptions::new().only(["x"])));
    }

    #[test]
    fn except_excludes_listed_endpoints() {
        assert!(!applies("x", FilterOptions::new().except(["x"])));
        assert!(applies("y", FilterOptions::new().except(["x"])));
    }

    #[test]
    fn only_and_except_are_anded() {
        let options = || FilterOptions::<Request>::new().only(["x", "y"]).except(["y"]);
        assert!(applies("x", options()));
        assert!(!applies("y", options()));
        assert!(!applies("z", options()));
    }

    #[test]
    fn when_condition_gates_on_instance_state() {
        let schema = schema();
        let f = filter(FilterOptions::new().when("admin?"));
        assert!(should_invoke(&schema, &Request { admin: true }, "x", &f).unwrap());
        assert!(!should_invoke(&schema, &Request { admin: false }, "x", &f).unwrap());
    }

    #[test]
    fn unless_condition_is_the_negation() {
        let schema = schema();
        let f = filter(FilterOptions::new().unless("admin?"));
        assert!(!should_invoke(&schema, &Request { admin: true }, "x", &f).unwrap());
        assert!(should_invoke(&schema, &Request { admin: false }, "x", &f).unwrap());
    }

    #[test]
    fn unresolvable_condition_propagates() {
        let schema = schema();
        let f = filter(FilterOptions::new().when("no_such_method"));
        assert!(should_invoke(&schema, &Request { admin: true }, "x", &f).is_err());
    }

    #[test]
    fn truthiness_follows_null_and_false_only() {
        assert!(!truthy(&Value::Null));
        assert!(!truthy(&json!(false)));
        assert!(truthy(&json!(true)));
        assert!(truthy(&json!(0)));
        assert!(truthy(&json!("")));
        assert!(truthy(&json!([])));
    }
}
