//! Unions and intersections of guards.

use std::borrow::Cow;
use std::fmt;

use indexmap::IndexSet;
use serde_json::Value;

use crate::context::{Context, ErrorCollector};
use crate::guard::{expected_message, Guard, GuardRef};
use crate::stringify::stringify;

fn names(guards: &[GuardRef], separator: &str) -> String {
    guards
        .iter()
        .map(|g| g.expected_type().into_owned())
        .collect::<Vec<_>>()
        .join(separator)
}

// -------------------------------------------------------------------------
// OneOfTypes

#[derive(Clone)]
pub struct OneOfTypes {
    guards: Vec<GuardRef>,
}

impl fmt::Debug for OneOfTypes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OneOfTypes")
            .field("types", &names(&self.guards, " | "))
            .finish()
    }
}

impl OneOfTypes {
    /// Re-runs every candidate against a private sink to explain the
    /// rejection. Never affects the verdict.
    fn explain(&self, value: Option<&Value>, ctx: &Context<'_>) -> String {
        let mut reasons: IndexSet<String> = IndexSet::new();
        for guard in &self.guards {
            let collector = ErrorCollector::new();
            let private = ctx.redirect(&collector).with_mode(ctx.mode().for_children());
            guard.check(value, Some(&private));
            let messages = collector.take_messages();
            if messages.is_empty() {
                reasons.insert(expected_message(
                    ctx.identifier(),
                    value,
                    &guard.expected_type(),
                ));
            } else {
                reasons.extend(messages);
            }
        }
        let mut message = format!(
            "Expected {} ({}) to be one of types: {}",
            ctx.identifier(),
            stringify(value),
            names(&self.guards, " | ")
        );
        for reason in reasons {
            message.push_str("\n- ");
            message.push_str(&reason);
        }
        message
    }
}

impl Guard for OneOfTypes {
    fn check(&self, value: Option<&Value>, ctx: Option<&Context<'_>>) -> bool {
        if self.guards.iter().any(|g| g.check(value, None)) {
            return true;
        }
        if let Some(ctx) = ctx {
            ctx.report(&self.explain(value, ctx));
        }
        false
    }

    fn expected_type(&self) -> Cow<'static, str> {
        Cow::Owned(names(&self.guards, " | "))
    }
}

/// Valid iff at least one of `guards` accepts. An empty union accepts nothing.
pub fn is_one_of_types(guards: impl IntoIterator<Item = GuardRef>) -> OneOfTypes {
    OneOfTypes {
        guards: guards.into_iter().collect(),
    }
}

// -------------------------------------------------------------------------
// IntersectionOf

#[derive(Clone)]
pub struct IntersectionOf {
    guards: Vec<GuardRef>,
}

impl fmt::Debug for IntersectionOf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IntersectionOf")
            .field("types", &names(&self.guards, " & "))
            .finish()
    }
}

impl Guard for IntersectionOf {
    fn check(&self, value: Option<&Value>, ctx: Option<&Context<'_>>) -> bool {
        let Some(ctx) = ctx else {
            return self.guards.iter().all(|g| g.check(value, None));
        };
        let mut ok = true;
        for guard in &self.guards {
            if !guard.check(value, Some(ctx)) {
                ok = false;
                if ctx.mode().is_fail_fast() {
                    break;
                }
            }
        }
        ok
    }

    fn expected_type(&self) -> Cow<'static, str> {
        Cow::Owned(names(&self.guards, " & "))
    }
}

/// Valid iff every one of `guards` accepts.
pub fn is_intersection_of(guards: impl IntoIterator<Item = GuardRef>) -> IntersectionOf {
    IntersectionOf {
        guards: guards.into_iter().collect(),
    }
}
