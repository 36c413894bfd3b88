//! The guard protocol shared by leaf predicates and combinators.

use std::borrow::Cow;
use std::sync::Arc;

use serde_json::Value;

use crate::context::Context;
use crate::stringify::stringify;

/// A predicate over an untyped value.
///
/// `value` is `None` when there is nothing there at all (an absent object
/// field). With a context, a failing guard reports through
/// [`Context::report`]; without one it only answers. The verdict never
/// depends on whether a context was supplied.
pub trait Guard: Send + Sync {
    fn check(&self, value: Option<&Value>, ctx: Option<&Context<'_>>) -> bool;

    /// Category named in diagnostics and json-mode trees.
    fn expected_type(&self) -> Cow<'static, str>;

    /// Verdict only.
    fn is(&self, value: &Value) -> bool {
        self.check(Some(value), None)
    }

    fn boxed(self) -> GuardRef
    where
        Self: Sized + 'static,
    {
        Arc::new(self)
    }
}

/// Shared, type-erased guard.
pub type GuardRef = Arc<dyn Guard>;

impl<G: Guard + ?Sized> Guard for Arc<G> {
    fn check(&self, value: Option<&Value>, ctx: Option<&Context<'_>>) -> bool {
        (**self).check(value, ctx)
    }

    fn expected_type(&self) -> Cow<'static, str> {
        (**self).expected_type()
    }
}

impl<G: Guard + ?Sized> Guard for Box<G> {
    fn check(&self, value: Option<&Value>, ctx: Option<&Context<'_>>) -> bool {
        (**self).check(value, ctx)
    }

    fn expected_type(&self) -> Cow<'static, str> {
        (**self).expected_type()
    }
}

/// `Expected <identifier> (<value>) to be "<expected>"`
pub fn expected_message(identifier: &str, value: Option<&Value>, expected: &str) -> String {
    format!(
        "Expected {identifier} ({}) to be \"{expected}\"",
        stringify(value)
    )
}

/// Reports the standard mismatch message when a context is present.
pub(crate) fn report_expected(ctx: Option<&Context<'_>>, value: Option<&Value>, expected: &str) {
    if let Some(ctx) = ctx {
        ctx.report(&expected_message(ctx.identifier(), value, expected));
    }
}

/// Human-readable kind of a value, as used by gatekeeping diagnostics.
pub fn kind_of(value: Option<&Value>) -> &'static str {
    match value {
        None => "undefined",
        Some(Value::Null) => "null",
        Some(Value::Bool(_)) => "boolean",
        Some(Value::Number(_)) => "number",
        Some(Value::String(_)) => "string",
        Some(Value::Array(_)) => "array",
        Some(Value::Object(_)) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::ErrorCollector;
    use serde_json::json;

    struct AlwaysNo;

    impl Guard for AlwaysNo {
        fn check(&self, value: Option<&Value>, ctx: Option<&Context<'_>>) -> bool {
            report_expected(ctx, value, "nothing");
            false
        }

        fn expected_type(&self) -> Cow<'static, str> {
            Cow::Borrowed("nothing")
        }
    }

    #[test]
    fn expected_message_format() {
        assert_eq!(
            expected_message("user.age", Some(&json!("x")), "number"),
            "Expected user.age (\"x\") to be \"number\""
        );
        assert_eq!(
            expected_message("user.age", None, "number"),
            "Expected user.age (undefined) to be \"number\""
        );
    }

    #[test]
    fn wrappers_delegate() {
        let shared: GuardRef = AlwaysNo.boxed();
        let owned: Box<dyn Guard> = Box::new(AlwaysNo);
        assert!(!shared.is(&json!(1)));
        assert!(!owned.is(&json!(1)));
        assert_eq!(shared.expected_type(), "nothing");

        let sink = ErrorCollector::new();
        let ctx = Context::new("v", &sink);
        assert!(!shared.check(Some(&json!(1)), Some(&ctx)));
        assert_eq!(sink.len(), 1);
    }

    #[test]
    fn kind_matrix() {
        assert_eq!(kind_of(None), "undefined");
        assert_eq!(kind_of(Some(&json!(null))), "null");
        assert_eq!(kind_of(Some(&json!([]))), "array");
        assert_eq!(kind_of(Some(&json!({}))), "object");
        assert_eq!(kind_of(Some(&json!(1))), "number");
    }
}
