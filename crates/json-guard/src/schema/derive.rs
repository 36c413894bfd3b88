//! Presence-only guards derived from a schema's key set.
//!
//! [`is_pick`] and [`is_omit`] look at own-key existence and nothing else;
//! compose them with the base schema when type correctness matters too.

use std::borrow::Cow;

use serde_json::Value;

use super::engine::ObjectSchema;
use crate::context::Context;
use crate::error::GuardError;
use crate::guard::{report_expected, Guard};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PresenceRule {
    /// Every key must be present.
    Required,
    /// No key may be present.
    Forbidden,
}

#[derive(Debug, Clone)]
pub struct KeyPresence {
    keys: Vec<String>,
    rule: PresenceRule,
}

impl KeyPresence {
    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    pub fn rule(&self) -> PresenceRule {
        self.rule
    }

    fn violates(&self, present: bool) -> bool {
        match self.rule {
            PresenceRule::Required => !present,
            PresenceRule::Forbidden => present,
        }
    }

    fn message(&self, identifier: &str, key: &str) -> String {
        match self.rule {
            PresenceRule::Required => format!("Expected {identifier} to have key \"{key}\""),
            PresenceRule::Forbidden => format!("Expected {identifier} to omit key \"{key}\""),
        }
    }
}

impl Guard for KeyPresence {
    fn check(&self, value: Option<&Value>, ctx: Option<&Context<'_>>) -> bool {
        let Some(Value::Object(map)) = value else {
            report_expected(ctx, value, "object");
            return false;
        };
        let mut violations = self
            .keys
            .iter()
            .filter(|key| self.violates(map.contains_key(key.as_str())));
        let Some(ctx) = ctx else {
            return violations.next().is_none();
        };
        let mut ok = true;
        for key in violations {
            ok = false;
            ctx.report(&self.message(ctx.identifier(), key));
            if ctx.mode().is_fail_fast() {
                break;
            }
        }
        ok
    }

    fn expected_type(&self) -> Cow<'static, str> {
        Cow::Borrowed("object")
    }
}

/// Object that has every one of `keys`. Values are not checked.
pub fn is_pick<I, S>(base: &ObjectSchema, keys: I) -> Result<KeyPresence, GuardError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    Ok(KeyPresence {
        keys: base.ensure_declared(keys)?,
        rule: PresenceRule::Required,
    })
}

/// Object that has none of `keys`.
pub fn is_omit<I, S>(base: &ObjectSchema, keys: I) -> Result<KeyPresence, GuardError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    Ok(KeyPresence {
        keys: base.ensure_declared(keys)?,
        rule: PresenceRule::Forbidden,
    })
}
