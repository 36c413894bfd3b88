//! Leaf predicates.
//!
//! Any `fn(&Value) -> bool` becomes a protocol-abiding leaf through
//! [`predicate`]; the bundled leaves below are built the same way.

use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::context::Context;
use crate::guard::{report_expected, Guard};

pub type PredicateFn = Arc<dyn Fn(&Value) -> bool + Send + Sync>;

/// Leaf guard: a test over a present value plus the name of what it expects.
#[derive(Clone)]
pub struct Predicate {
    expected: Cow<'static, str>,
    test: PredicateFn,
}

impl fmt::Debug for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Predicate")
            .field("expected", &self.expected)
            .finish_non_exhaustive()
    }
}

impl Guard for Predicate {
    fn check(&self, value: Option<&Value>, ctx: Option<&Context<'_>>) -> bool {
        let ok = value.is_some_and(|v| (self.test)(v));
        if !ok {
            report_expected(ctx, value, &self.expected);
        }
        ok
    }

    fn expected_type(&self) -> Cow<'static, str> {
        self.expected.clone()
    }
}

/// Builds a leaf. An absent value always fails.
pub fn predicate<F>(expected: impl Into<Cow<'static, str>>, test: F) -> Predicate
where
    F: Fn(&Value) -> bool + Send + Sync + 'static,
{
    Predicate {
        expected: expected.into(),
        test: Arc::new(test),
    }
}

pub fn is_string() -> Predicate {
    predicate("string", Value::is_string)
}

pub fn is_number() -> Predicate {
    predicate("number", Value::is_number)
}

pub fn is_integer() -> Predicate {
    predicate("integer", |v| match v {
        Value::Number(n) => {
            n.is_i64() || n.is_u64() || n.as_f64().is_some_and(|f| f.fract() == 0.0)
        }
        _ => false,
    })
}

pub fn is_boolean() -> Predicate {
    predicate("boolean", Value::is_boolean)
}

pub fn is_null() -> Predicate {
    predicate("null", Value::is_null)
}

pub fn is_array() -> Predicate {
    predicate("array", Value::is_array)
}

/// Non-null, non-array object.
pub fn is_object() -> Predicate {
    predicate("object", Value::is_object)
}

/// Accepts everything, including an absent value.
#[derive(Debug, Clone, Copy, Default)]
pub struct Unknown;

impl Guard for Unknown {
    fn check(&self, _value: Option<&Value>, _ctx: Option<&Context<'_>>) -> bool {
        true
    }

    fn expected_type(&self) -> Cow<'static, str> {
        Cow::Borrowed("unknown")
    }
}

pub fn is_unknown() -> Unknown {
    Unknown
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::ErrorCollector;
    use serde_json::json;

    #[test]
    fn leaf_verdicts() {
        assert!(is_string().is(&json!("a")));
        assert!(!is_string().is(&json!(1)));
        assert!(is_number().is(&json!(1.5)));
        assert!(is_integer().is(&json!(3)));
        assert!(is_integer().is(&json!(3.0)));
        assert!(!is_integer().is(&json!(3.5)));
        assert!(is_boolean().is(&json!(false)));
        assert!(is_null().is(&json!(null)));
        assert!(is_array().is(&json!([])));
        assert!(!is_object().is(&json!([])));
        assert!(!is_object().is(&json!(null)));
        assert!(is_object().is(&json!({})));
    }

    #[test]
    fn absent_fails_leaves() {
        assert!(!is_string().check(None, None));
        assert!(!is_null().check(None, None));
        assert!(is_unknown().check(None, None));
    }

    #[test]
    fn reports_only_on_failure() {
        let sink = ErrorCollector::new();
        let ctx = Context::new("user.name", &sink);
        assert!(is_string().check(Some(&json!("ok")), Some(&ctx)));
        assert!(sink.is_empty());
        assert!(!is_string().check(Some(&json!(7)), Some(&ctx)));
        assert_eq!(
            sink.messages(),
            vec!["Expected user.name (7) to be \"string\"".to_string()]
        );
    }

    #[test]
    fn custom_predicate() {
        let even = predicate("even number", |v| v.as_u64().is_some_and(|n| n % 2 == 0));
        assert!(even.is(&json!(4)));
        assert!(!even.is(&json!(5)));
        assert_eq!(even.expected_type(), "even number");
    }
}
