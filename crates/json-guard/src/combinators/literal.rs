//! Literal-value guards: equality, unions of values, enums, patterns.

use std::borrow::Cow;
use std::fmt;

use regex::Regex;
use serde_json::{Map, Value};

use crate::context::Context;
use crate::error::GuardError;
use crate::guard::{report_expected, Guard};
use crate::stringify::stringify;

/// Strict structural equality. Numbers compare by numeric value, so `1`
/// and `1.0` are equal.
pub fn strict_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Null, Value::Null) => true,
        (Value::Bool(a), Value::Bool(b)) => a == b,
        (Value::Number(a), Value::Number(b)) => match (a.as_i64(), b.as_i64()) {
            (Some(a), Some(b)) => a == b,
            _ => match (a.as_u64(), b.as_u64()) {
                (Some(a), Some(b)) => a == b,
                _ => a.as_f64() == b.as_f64(),
            },
        },
        (Value::String(a), Value::String(b)) => a == b,
        (Value::Array(a), Value::Array(b)) => {
            a.len() == b.len() && a.iter().zip(b).all(|(a, b)| strict_equal(a, b))
        }
        (Value::Object(a), Value::Object(b)) => {
            a.len() == b.len()
                && a.iter()
                    .all(|(key, a)| b.get(key).is_some_and(|b| strict_equal(a, b)))
        }
        _ => false,
    }
}

// -------------------------------------------------------------------------
// EqualTo

#[derive(Debug, Clone)]
pub struct EqualTo {
    expected: Value,
}

impl Guard for EqualTo {
    fn check(&self, value: Option<&Value>, ctx: Option<&Context<'_>>) -> bool {
        let ok = value.is_some_and(|v| strict_equal(v, &self.expected));
        if !ok {
            if let Some(ctx) = ctx {
                ctx.report(&format!(
                    "Expected {} ({}) to be {}",
                    ctx.identifier(),
                    stringify(value),
                    stringify(Some(&self.expected))
                ));
            }
        }
        ok
    }

    fn expected_type(&self) -> Cow<'static, str> {
        Cow::Owned(stringify(Some(&self.expected)))
    }
}

pub fn is_equal_to(expected: Value) -> EqualTo {
    EqualTo { expected }
}

// -------------------------------------------------------------------------
// OneOf

#[derive(Debug, Clone)]
pub struct OneOf {
    values: Vec<Value>,
    label: &'static str,
}

impl OneOf {
    pub fn values(&self) -> &[Value] {
        &self.values
    }

    fn listing(&self, separator: &str) -> String {
        self.values
            .iter()
            .map(|v| stringify(Some(v)))
            .collect::<Vec<_>>()
            .join(separator)
    }
}

impl Guard for OneOf {
    fn check(&self, value: Option<&Value>, ctx: Option<&Context<'_>>) -> bool {
        let ok = value.is_some_and(|v| self.values.iter().any(|allowed| strict_equal(v, allowed)));
        if !ok {
            if let Some(ctx) = ctx {
                ctx.report(&format!(
                    "Expected {} ({}) to be {}: {}",
                    ctx.identifier(),
                    stringify(value),
                    self.label,
                    self.listing(", ")
                ));
            }
        }
        ok
    }

    fn expected_type(&self) -> Cow<'static, str> {
        Cow::Owned(self.listing(" | "))
    }
}

/// Valid iff the value strictly equals one of `values`.
pub fn is_one_of(values: impl IntoIterator<Item = Value>) -> OneOf {
    OneOf {
        values: values.into_iter().collect(),
        label: "one of",
    }
}

/// Valid iff the value equals one of the enumeration object's values.
pub fn is_enum(variants: &Map<String, Value>) -> OneOf {
    OneOf {
        values: variants.values().cloned().collect(),
        label: "one of enum values",
    }
}

// -------------------------------------------------------------------------
// Pattern

#[derive(Clone)]
pub struct PatternGuard {
    regex: Regex,
}

impl fmt::Debug for PatternGuard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("PatternGuard").field(&self.regex.as_str()).finish()
    }
}

impl PatternGuard {
    pub fn as_str(&self) -> &str {
        self.regex.as_str()
    }
}

impl From<Regex> for PatternGuard {
    fn from(regex: Regex) -> Self {
        Self { regex }
    }
}

impl Guard for PatternGuard {
    fn check(&self, value: Option<&Value>, ctx: Option<&Context<'_>>) -> bool {
        let Some(Value::String(text)) = value else {
            report_expected(ctx, value, "string");
            return false;
        };
        if self.regex.is_match(text) {
            return true;
        }
        if let Some(ctx) = ctx {
            ctx.report(&format!(
                "{} ({}) does not match pattern /{}/",
                ctx.identifier(),
                stringify(value),
                self.regex.as_str()
            ));
        }
        false
    }

    fn expected_type(&self) -> Cow<'static, str> {
        Cow::Borrowed("string")
    }
}

/// Compiles `pattern`; the guard accepts text matching it.
pub fn is_pattern(pattern: &str) -> Result<PatternGuard, GuardError> {
    Regex::new(pattern)
        .map(PatternGuard::from)
        .map_err(|err| GuardError::invalid_pattern(pattern, &err))
}
