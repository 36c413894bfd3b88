//! Object schemas: declaration, compilation, and derived variants.

pub mod derive;
pub mod engine;
pub mod shape;

pub use derive::{is_omit, is_pick, KeyPresence, PresenceRule};
pub use engine::{is_partial_of, is_type, ObjectSchema};
pub use shape::{SchemaNode, Shape};
