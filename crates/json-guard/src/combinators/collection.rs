//! Homogeneous collections: arrays and records.
//!
//! The element guard sees each item under a derived identifier (`[i]` for
//! arrays, `.key` for records). Fail-fast versus exhaustive iteration
//! follows the caller's mode; without a context the first failure ends
//! the walk.

use std::borrow::Cow;

use serde_json::Value;

use crate::context::{Context, PathSegment};
use crate::guard::{report_expected, Guard};

fn check_items<'v, G, I>(item: &G, entries: I, ctx: Option<&Context<'_>>) -> bool
where
    G: Guard + ?Sized,
    I: Iterator<Item = (PathSegment, &'v Value)>,
{
    let mut ok = true;
    for (segment, value) in entries {
        let child = ctx.map(|c| c.child(segment));
        if !item.check(Some(value), child.as_ref()) {
            ok = false;
            if ctx.map_or(true, |c| c.mode().is_fail_fast()) {
                break;
            }
        }
    }
    ok
}

#[derive(Debug, Clone)]
pub struct ArrayOf<G> {
    item: G,
}

impl<G> ArrayOf<G> {
    pub fn item(&self) -> &G {
        &self.item
    }
}

impl<G: Guard> Guard for ArrayOf<G> {
    fn check(&self, value: Option<&Value>, ctx: Option<&Context<'_>>) -> bool {
        let Some(Value::Array(items)) = value else {
            report_expected(ctx, value, "array");
            return false;
        };
        check_items(
            &self.item,
            items.iter().enumerate().map(|(i, v)| (PathSegment::Index(i), v)),
            ctx,
        )
    }

    fn expected_type(&self) -> Cow<'static, str> {
        Cow::Borrowed("array")
    }
}

/// Ordered sequence whose every element satisfies `item`.
pub fn is_array_with_each_item<G: Guard>(item: G) -> ArrayOf<G> {
    ArrayOf { item }
}

#[derive(Debug, Clone)]
pub struct RecordOf<G> {
    item: G,
}

impl<G: Guard> Guard for RecordOf<G> {
    fn check(&self, value: Option<&Value>, ctx: Option<&Context<'_>>) -> bool {
        let Some(Value::Object(entries)) = value else {
            report_expected(ctx, value, "object");
            return false;
        };
        check_items(
            &self.item,
            entries.iter().map(|(k, v)| (PathSegment::from(k), v)),
            ctx,
        )
    }

    fn expected_type(&self) -> Cow<'static, str> {
        Cow::Borrowed("object")
    }
}

/// Object whose every own value satisfies `item`. Keys are not checked.
pub fn is_object_with_each_item<G: Guard>(item: G) -> RecordOf<G> {
    RecordOf { item }
}
