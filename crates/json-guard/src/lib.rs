//! json-guard - composable runtime type guards for JSON values.
//!
//! A [`Guard`] answers "does this value have the expected shape?" and, when
//! handed a [`Context`], explains why not. Combinators build new guards
//! from existing ones; [`is_type`] compiles a declarative [`Shape`] into an
//! object guard with three diagnostic modes (fail-fast, aggregated, and a
//! JSON diagnostic tree).
//!
//! ```
//! use json_guard::{is_number, is_string, is_type, Context, DiagnosticMode, ErrorCollector, Guard, Shape};
//! use serde_json::json;
//!
//! let user = is_type(
//!     Shape::new()
//!         .field("name", is_string())
//!         .field("age", is_number()),
//! );
//!
//! let sink = ErrorCollector::new();
//! let ctx = Context::new("user", &sink).with_mode(DiagnosticMode::Multi);
//! assert!(!user.check(Some(&json!({"name": 1, "age": "x"})), Some(&ctx)));
//! assert_eq!(
//!     sink.messages(),
//!     vec![r#"Expected user.name (1) to be "string"; Expected user.age ("x") to be "number""#]
//! );
//! ```

pub mod combinators;
pub mod context;
pub mod error;
pub mod guard;
pub mod primitives;
pub mod result;
pub mod schema;
pub mod stringify;

pub use combinators::{
    guard_with_tolerance, is_array_with_each_item, is_branded, is_enum, is_equal_to,
    is_intersection_of, is_null_or, is_object_with_each_item, is_one_of, is_one_of_types,
    is_pattern, is_undefined_or, strict_equal,
};
pub use context::{Context, DiagnosticMode, Discard, ErrorCollector, ErrorSink, PathSegment};
pub use error::GuardError;
pub use guard::{expected_message, Guard, GuardRef};
pub use primitives::{
    is_array, is_boolean, is_integer, is_null, is_number, is_object, is_string, is_unknown,
    predicate, Predicate,
};
pub use result::{
    make_error, make_result, make_tree_node, report_result, ValidationError, ValidationFailure,
    ValidationResult, ValidationTree,
};
pub use schema::{
    is_omit, is_partial_of, is_pick, is_type, KeyPresence, ObjectSchema, PresenceRule, SchemaNode,
    Shape,
};
pub use stringify::stringify;
