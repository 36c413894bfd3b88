//! Declarative schema description, compiled by [`super::is_type`].

use std::fmt;
use std::sync::Arc;

use crate::guard::{Guard, GuardRef};

/// What a declared field must satisfy.
#[derive(Clone)]
pub enum SchemaNode {
    /// Any guard, leaf or composite.
    Leaf(GuardRef),
    /// A nested object with its own shape.
    Nested(Shape),
    /// An array whose every element has the given shape.
    ArrayOf(Shape),
}

impl SchemaNode {
    pub fn leaf<G: Guard + 'static>(guard: G) -> Self {
        Self::Leaf(Arc::new(guard))
    }
}

impl From<GuardRef> for SchemaNode {
    fn from(guard: GuardRef) -> Self {
        Self::Leaf(guard)
    }
}

impl From<Shape> for SchemaNode {
    fn from(shape: Shape) -> Self {
        Self::Nested(shape)
    }
}

impl fmt::Debug for SchemaNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Leaf(g) => f.debug_tuple("Leaf").field(&g.expected_type()).finish(),
            Self::Nested(s) => f.debug_tuple("Nested").field(s).finish(),
            Self::ArrayOf(s) => f.debug_tuple("ArrayOf").field(s).finish(),
        }
    }
}

/// Ordered mapping of field name to [`SchemaNode`].
#[derive(Debug, Clone, Default)]
pub struct Shape {
    fields: Vec<(String, SchemaNode)>,
}

impl Shape {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares `name`. Re-declaring keeps the original position.
    pub fn node(mut self, name: impl Into<String>, node: SchemaNode) -> Self {
        let name = name.into();
        match self.fields.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => slot.1 = node,
            None => self.fields.push((name, node)),
        }
        self
    }

    pub fn field<G: Guard + 'static>(self, name: impl Into<String>, guard: G) -> Self {
        self.node(name, SchemaNode::leaf(guard))
    }

    pub fn nested(self, name: impl Into<String>, shape: Shape) -> Self {
        self.node(name, SchemaNode::Nested(shape))
    }

    pub fn array_of(self, name: impl Into<String>, item: Shape) -> Self {
        self.node(name, SchemaNode::ArrayOf(item))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(n, _)| n.as_str())
    }

    pub(crate) fn into_fields(self) -> Vec<(String, SchemaNode)> {
        self.fields
    }
}

impl<S: Into<String>> FromIterator<(S, SchemaNode)> for Shape {
    fn from_iter<T: IntoIterator<Item = (S, SchemaNode)>>(iter: T) -> Self {
        iter.into_iter()
            .fold(Shape::new(), |shape, (name, node)| shape.node(name, node))
    }
}
