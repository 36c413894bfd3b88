//! Structural schema engine.
//!
//! A compiled [`ObjectSchema`] gatekeeps on "is this a plain object", then
//! walks its declared fields in order. How far it walks and what it reports
//! depends on the context's [`DiagnosticMode`]:
//!
//! - `Single`: stop at the first failing field, report its message.
//! - `Multi`: visit every field, report all messages joined by `"; "`.
//! - `Json`: as `Multi`, and report a one-level tree instead of text.
//!
//! Field guards always report into a private collector; only the engine
//! talks to the caller's sink.

use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use serde_json::{Map, Value};

use super::shape::{SchemaNode, Shape};
use crate::combinators::is_array_with_each_item;
use crate::context::{Context, DiagnosticMode, ErrorCollector};
use crate::error::GuardError;
use crate::guard::{expected_message, kind_of, Guard, GuardRef};
use crate::result::{
    make_error, make_result, make_tree_node, report_result, ValidationError, ValidationResult,
    ValidationTree, MESSAGE_SEPARATOR,
};
use crate::stringify::stringify;

#[derive(Clone)]
struct Field {
    name: String,
    guard: GuardRef,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Presence {
    Required,
    /// Absent fields are skipped.
    Optional,
}

/// Guard compiled from a [`Shape`].
#[derive(Clone)]
pub struct ObjectSchema {
    fields: Arc<[Field]>,
    presence: Presence,
}

impl fmt::Debug for ObjectSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(
                self.fields
                    .iter()
                    .map(|field| (&field.name, field.guard.expected_type())),
            )
            .finish()
    }
}

fn compile_node(node: SchemaNode) -> GuardRef {
    match node {
        SchemaNode::Leaf(guard) => guard,
        SchemaNode::Nested(shape) => Arc::new(ObjectSchema::compile(shape)),
        SchemaNode::ArrayOf(item) => Arc::new(is_array_with_each_item(ObjectSchema::compile(item))),
    }
}

/// Gatekeeping diagnostic: names both the expected and the actual shape.
fn shape_message(identifier: &str, value: Option<&Value>) -> String {
    format!(
        "Expected {identifier} ({}) to be \"object\", got \"{}\"",
        stringify(value),
        kind_of(value)
    )
}

impl ObjectSchema {
    pub fn compile(shape: Shape) -> Self {
        let fields: Vec<Field> = shape
            .into_fields()
            .into_iter()
            .map(|(name, node)| Field {
                name,
                guard: compile_node(node),
            })
            .collect();
        Self {
            fields: fields.into(),
            presence: Presence::Required,
        }
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|f| f.name.as_str())
    }

    pub fn contains_field(&self, name: &str) -> bool {
        self.fields.iter().any(|f| f.name == name)
    }

    /// Guard of the declared field `name`.
    pub fn field(&self, name: &str) -> Option<&GuardRef> {
        self.fields.iter().find(|f| f.name == name).map(|f| &f.guard)
    }

    pub fn is_partial(&self) -> bool {
        self.presence == Presence::Optional
    }

    /// Same fields, absent ones tolerated.
    pub fn partial(&self) -> Self {
        Self {
            fields: Arc::clone(&self.fields),
            presence: Presence::Optional,
        }
    }

    pub(crate) fn ensure_declared<I, S>(&self, keys: I) -> Result<Vec<String>, GuardError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        keys.into_iter()
            .map(|key| {
                let key = key.as_ref();
                if self.contains_field(key) {
                    Ok(key.to_string())
                } else {
                    Err(GuardError::UnknownField {
                        field: key.to_string(),
                    })
                }
            })
            .collect()
    }

    fn retain(&self, keep: impl Fn(&str) -> bool) -> Self {
        let fields: Vec<Field> = self
            .fields
            .iter()
            .filter(|f| keep(f.name.as_str()))
            .cloned()
            .collect();
        Self {
            fields: fields.into(),
            presence: self.presence,
        }
    }

    /// Sub-schema with only `keys`, in declaration order.
    pub fn pick<I, S>(&self, keys: I) -> Result<Self, GuardError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let keys = self.ensure_declared(keys)?;
        Ok(self.retain(|name| keys.iter().any(|k| k == name)))
    }

    /// Sub-schema without `keys`.
    pub fn omit<I, S>(&self, keys: I) -> Result<Self, GuardError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let keys = self.ensure_declared(keys)?;
        Ok(self.retain(|name| !keys.iter().any(|k| k == name)))
    }

    fn skips(&self, value: Option<&Value>) -> bool {
        value.is_none() && self.presence == Presence::Optional
    }

    /// Verdict without diagnostics.
    fn matches(&self, value: Option<&Value>) -> bool {
        let Some(Value::Object(map)) = value else {
            return false;
        };
        self.fields.iter().all(|field| {
            let field_value = map.get(&field.name);
            self.skips(field_value) || field.guard.check(field_value, None)
        })
    }

    /// Walks the value and assembles a result without touching the
    /// caller's sink.
    pub fn evaluate(&self, value: Option<&Value>, ctx: &Context<'_>) -> ValidationResult {
        let mode = ctx.mode();
        let identifier = ctx.identifier();
        tracing::trace!(identifier, %mode, fields = self.fields.len(), "evaluating object schema");

        let Some(Value::Object(map)) = value else {
            tracing::debug!(identifier, kind = kind_of(value), "object gatekeeping failed");
            let error = make_error(
                identifier,
                "object",
                value.cloned(),
                shape_message(identifier, value),
            );
            let tree = (mode == DiagnosticMode::Json).then(|| {
                make_tree_node(false, identifier, value.cloned(), Some("object".into()), [])
            });
            return make_result(false, [error], tree);
        };

        let walk = self.walk(map, ctx);
        let valid = walk.errors.is_empty();
        let tree = (mode == DiagnosticMode::Json).then(|| {
            make_tree_node(
                valid,
                identifier,
                value.cloned(),
                (!valid).then(|| "object".to_string()),
                walk.children,
            )
        });
        make_result(valid, walk.errors, tree)
    }

    /// Checks each declared field through a private collector.
    ///
    /// A field guard that fails without reporting (a tolerance narrowing,
    /// say) gets an engine-authored `Expected <path> (<value>) to be
    /// "<type>"` message, so `errors` holds one entry per failing field.
    /// The field guard itself still reports nothing.
    fn walk(&self, map: &Map<String, Value>, ctx: &Context<'_>) -> Walk {
        let mode = ctx.mode();
        let child_mode = mode.for_children();
        let mut walk = Walk::default();

        for field in self.fields.iter() {
            let field_value = map.get(&field.name);
            let field_ctx = ctx.child(field.name.as_str()).with_mode(child_mode);
            if self.skips(field_value) {
                if mode == DiagnosticMode::Json {
                    walk.children.insert(
                        field.name.clone(),
                        make_tree_node(true, field_ctx.identifier(), None, None, []),
                    );
                }
                continue;
            }

            let collector = ErrorCollector::new();
            let ok = field
                .guard
                .check(field_value, Some(&field_ctx.redirect(&collector)));
            let expected = field.guard.expected_type();

            if mode == DiagnosticMode::Json {
                walk.children.insert(
                    field.name.clone(),
                    make_tree_node(
                        ok,
                        field_ctx.identifier(),
                        field_value.cloned(),
                        (!ok).then(|| expected.to_string()),
                        [],
                    ),
                );
            }
            if ok {
                continue;
            }

            tracing::debug!(path = field_ctx.identifier(), expected = %expected, "field failed");
            let messages = collector.take_messages();
            let message = if messages.is_empty() {
                expected_message(field_ctx.identifier(), field_value, &expected)
            } else {
                messages.join(MESSAGE_SEPARATOR)
            };
            walk.errors.push(make_error(
                field_ctx.identifier(),
                expected.into_owned(),
                field_value.cloned(),
                message,
            ));
            if mode.is_fail_fast() {
                break;
            }
        }
        walk
    }

    /// Evaluates, reports through `ctx`, and returns the result.
    ///
    /// Without a context the value is evaluated against a detached root
    /// named `value` and nothing is reported.
    pub fn validate(&self, value: Option<&Value>, ctx: Option<&Context<'_>>) -> ValidationResult {
        match ctx {
            Some(ctx) => {
                let result = self.evaluate(value, ctx);
                report_result(&result, Some(ctx));
                result
            }
            None => self.evaluate(value, &Context::detached()),
        }
    }
}

#[derive(Default)]
struct Walk {
    errors: Vec<ValidationError>,
    children: IndexMap<String, ValidationTree>,
}

impl Guard for ObjectSchema {
    fn check(&self, value: Option<&Value>, ctx: Option<&Context<'_>>) -> bool {
        match ctx {
            None => self.matches(value),
            Some(_) => self.validate(value, ctx).is_valid(),
        }
    }

    fn expected_type(&self) -> Cow<'static, str> {
        Cow::Borrowed("object")
    }
}

/// Compiles `shape` into a guard.
pub fn is_type(shape: Shape) -> ObjectSchema {
    ObjectSchema::compile(shape)
}

/// Same fields as `schema`; missing keys tolerated, present ones checked.
pub fn is_partial_of(schema: &ObjectSchema) -> ObjectSchema {
    schema.partial()
}
