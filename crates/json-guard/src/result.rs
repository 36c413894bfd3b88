//! Validation records and the reporter that turns them into sink calls.
//!
//! All three records are created fresh per validation call. Constructors
//! take ownership of their inputs, so nothing a caller still holds can
//! alias a stored record.

use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::context::{Context, DiagnosticMode};

/// A serialized key is always a present value, `null` included. Only a
/// missing key reads back as absent.
fn present<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Value>, D::Error> {
    Value::deserialize(deserializer).map(Some)
}

/// One concrete mismatch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationError {
    path: String,
    expected_type: String,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "present"
    )]
    actual_value: Option<Value>,
    message: String,
}

impl ValidationError {
    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn expected_type(&self) -> &str {
        &self.expected_type
    }

    /// `None` when the value was absent.
    pub fn actual_value(&self) -> Option<&Value> {
        self.actual_value.as_ref()
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

pub fn make_error(
    path: impl Into<String>,
    expected_type: impl Into<String>,
    actual_value: Option<Value>,
    message: impl Into<String>,
) -> ValidationError {
    ValidationError {
        path: path.into(),
        expected_type: expected_type.into(),
        actual_value,
        message: message.into(),
    }
}

/// One level of a json-mode diagnostic tree.
///
/// A field guarded by a nested schema is a single node carrying the raw
/// value; its inner fields are not expanded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationTree {
    valid: bool,
    path: String,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "present"
    )]
    value: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    expected_type: Option<String>,
    #[serde(default)]
    children: IndexMap<String, ValidationTree>,
}

impl ValidationTree {
    pub fn valid(&self) -> bool {
        self.valid
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn value(&self) -> Option<&Value> {
        self.value.as_ref()
    }

    pub fn expected_type(&self) -> Option<&str> {
        self.expected_type.as_deref()
    }

    pub fn children(&self) -> &IndexMap<String, ValidationTree> {
        &self.children
    }

    pub fn child(&self, key: &str) -> Option<&ValidationTree> {
        self.children.get(key)
    }
}

pub fn make_tree_node<I>(
    valid: bool,
    path: impl Into<String>,
    value: Option<Value>,
    expected_type: Option<String>,
    children: I,
) -> ValidationTree
where
    I: IntoIterator<Item = (String, ValidationTree)>,
{
    ValidationTree {
        valid,
        path: path.into(),
        value,
        expected_type,
        children: children.into_iter().collect(),
    }
}

/// Outcome of one validation call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationResult {
    valid: bool,
    #[serde(default)]
    errors: Vec<ValidationError>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    tree: Option<ValidationTree>,
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        self.valid
    }

    pub fn errors(&self) -> &[ValidationError] {
        &self.errors
    }

    /// Present only for json-mode evaluations.
    pub fn tree(&self) -> Option<&ValidationTree> {
        self.tree.as_ref()
    }

    /// Bridges to `?`-style control flow.
    pub fn into_result(self) -> Result<(), ValidationFailure> {
        if self.valid {
            Ok(())
        } else {
            Err(ValidationFailure {
                errors: self.errors,
            })
        }
    }
}

pub fn make_result<I>(valid: bool, errors: I, tree: Option<ValidationTree>) -> ValidationResult
where
    I: IntoIterator<Item = ValidationError>,
{
    ValidationResult {
        valid,
        errors: errors.into_iter().collect(),
        tree,
    }
}

/// A rejected value, as an error.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{}", join_messages(.errors))]
pub struct ValidationFailure {
    errors: Vec<ValidationError>,
}

impl ValidationFailure {
    pub fn errors(&self) -> &[ValidationError] {
        &self.errors
    }

    pub fn into_errors(self) -> Vec<ValidationError> {
        self.errors
    }
}

pub(crate) const MESSAGE_SEPARATOR: &str = "; ";

fn join_messages(errors: &[ValidationError]) -> String {
    if errors.is_empty() {
        return "validation failed".to_string();
    }
    errors
        .iter()
        .map(ValidationError::message)
        .collect::<Vec<_>>()
        .join(MESSAGE_SEPARATOR)
}

/// Performs the sink calls appropriate to the context's mode.
///
/// No-op for a valid result or an absent context.
pub fn report_result(result: &ValidationResult, ctx: Option<&Context<'_>>) {
    let Some(ctx) = ctx else { return };
    if result.valid {
        return;
    }
    match ctx.mode() {
        DiagnosticMode::Single => {
            if let Some(first) = result.errors.first() {
                ctx.report(first.message());
            }
        }
        DiagnosticMode::Multi => {
            if !result.errors.is_empty() {
                ctx.report(&join_messages(&result.errors));
            }
        }
        DiagnosticMode::Json => match result.tree.as_ref().map(|t| tree_report(ctx.identifier(), t)) {
            Some(Ok(serialized)) => ctx.report(&serialized),
            Some(Err(err)) => {
                tracing::warn!(identifier = ctx.identifier(), %err, "diagnostic tree not serializable");
                ctx.report(&join_messages(&result.errors));
            }
            None => ctx.report(&join_messages(&result.errors)),
        },
    }
}

fn tree_report(identifier: &str, tree: &ValidationTree) -> serde_json::Result<String> {
    let mut root = IndexMap::with_capacity(1);
    root.insert(identifier, tree);
    serde_json::to_string(&root)
}
