//! Diagnostic context threaded through every guard invocation.
//!
//! A [`Context`] names *where* in the overall value a check happens, where
//! messages go, and how many of them the caller wants. Contexts are values:
//! deriving a child never touches the parent.

use std::cell::RefCell;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::GuardError;
use crate::stringify::stringify;

/// Diagnostic strategy for a validation call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagnosticMode {
    /// Fail fast, report the first failing field only.
    #[default]
    Single,
    /// Visit every field, report one combined message.
    Multi,
    /// Like `Multi`, plus a JSON-serialized diagnostic tree.
    Json,
}

impl DiagnosticMode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Single => "single",
            Self::Multi => "multi",
            Self::Json => "json",
        }
    }

    /// Mode handed to nested guards. Only the outermost engine of a json
    /// call emits a tree; everything beneath it aggregates plain text.
    pub fn for_children(self) -> Self {
        match self {
            Self::Json => Self::Multi,
            other => other,
        }
    }

    pub fn is_fail_fast(self) -> bool {
        matches!(self, Self::Single)
    }
}

impl fmt::Display for DiagnosticMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DiagnosticMode {
    type Err = GuardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "single" => Ok(Self::Single),
            "multi" => Ok(Self::Multi),
            "json" => Ok(Self::Json),
            other => Err(GuardError::UnknownMode(other.to_string())),
        }
    }
}

/// Receiver of diagnostic messages.
pub trait ErrorSink {
    fn report(&self, message: &str);
}

impl<F> ErrorSink for F
where
    F: Fn(&str),
{
    fn report(&self, message: &str) {
        self(message)
    }
}

/// Sink that drops every message.
#[derive(Debug, Clone, Copy, Default)]
pub struct Discard;

impl ErrorSink for Discard {
    fn report(&self, _message: &str) {}
}

/// Sink that keeps messages in arrival order.
#[derive(Debug, Default)]
pub struct ErrorCollector {
    messages: RefCell<Vec<String>>,
}

impl ErrorCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the messages collected so far.
    pub fn messages(&self) -> Vec<String> {
        self.messages.borrow().clone()
    }

    /// Drains the collected messages.
    pub fn take_messages(&self) -> Vec<String> {
        self.messages.take()
    }

    pub fn len(&self) -> usize {
        self.messages.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.borrow().is_empty()
    }
}

impl ErrorSink for ErrorCollector {
    fn report(&self, message: &str) {
        self.messages.borrow_mut().push(message.to_string());
    }
}

/// One step of an identifier path.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathSegment {
    Key(String),
    Index(usize),
}

impl From<&str> for PathSegment {
    fn from(value: &str) -> Self {
        Self::Key(value.to_string())
    }
}

impl From<String> for PathSegment {
    fn from(value: String) -> Self {
        Self::Key(value)
    }
}

impl From<&String> for PathSegment {
    fn from(value: &String) -> Self {
        Self::Key(value.clone())
    }
}

impl From<usize> for PathSegment {
    fn from(value: usize) -> Self {
        Self::Index(value)
    }
}

/// `true` for keys that read unambiguously after a `.`.
fn is_plain_key(key: &str) -> bool {
    let mut chars = key.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_' || c == '$')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}

/// Appends `segment` to `identifier` using `.key` / `[index]` notation.
///
/// Keys that are not plain identifiers use `["key"]`, so `a.b` as a key
/// never reads as two steps.
pub fn extend_identifier(identifier: &str, segment: &PathSegment) -> String {
    match segment {
        PathSegment::Key(key) if !is_plain_key(key) => {
            let quoted = stringify(Some(&serde_json::Value::String(key.clone())));
            format!("{identifier}[{quoted}]")
        }
        PathSegment::Key(key) if identifier.is_empty() => key.clone(),
        PathSegment::Key(key) => format!("{identifier}.{key}"),
        PathSegment::Index(index) => format!("{identifier}[{index}]"),
    }
}

/// Name given to the root of a validation that was started without a context.
pub const DETACHED_IDENTIFIER: &str = "value";

static DISCARD: Discard = Discard;

/// Per-call diagnostic configuration.
#[derive(Clone)]
pub struct Context<'a> {
    identifier: String,
    sink: &'a dyn ErrorSink,
    mode: DiagnosticMode,
}

impl<'a> Context<'a> {
    pub fn new(identifier: impl Into<String>, sink: &'a dyn ErrorSink) -> Self {
        Self {
            identifier: identifier.into(),
            sink,
            mode: DiagnosticMode::default(),
        }
    }

    pub fn with_mode(mut self, mode: DiagnosticMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    pub fn mode(&self) -> DiagnosticMode {
        self.mode
    }

    pub fn report(&self, message: &str) {
        self.sink.report(message);
    }

    /// Context for a sub-part of the current value.
    pub fn child(&self, segment: impl Into<PathSegment>) -> Context<'a> {
        Context {
            identifier: extend_identifier(&self.identifier, &segment.into()),
            sink: self.sink,
            mode: self.mode,
        }
    }

    /// Same location and mode, different sink.
    pub fn redirect<'b>(&self, sink: &'b dyn ErrorSink) -> Context<'b> {
        Context {
            identifier: self.identifier.clone(),
            sink,
            mode: self.mode,
        }
    }
}

impl Context<'static> {
    /// Root context that reports nowhere.
    pub fn detached() -> Self {
        Context::new(DETACHED_IDENTIFIER, &DISCARD)
    }
}

impl fmt::Debug for Context<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Context")
            .field("identifier", &self.identifier)
            .field("mode", &self.mode)
            .finish_non_exhaustive()
    }
}
