//! Higher-order guards. Each combinator returns a new guard and leaves its
//! inputs untouched.

pub mod collection;
pub mod literal;
pub mod union;
pub mod wrap;

pub use collection::{is_array_with_each_item, is_object_with_each_item, ArrayOf, RecordOf};
pub use literal::{is_enum, is_equal_to, is_one_of, is_pattern, strict_equal, EqualTo, OneOf, PatternGuard};
pub use union::{is_intersection_of, is_one_of_types, IntersectionOf, OneOfTypes};
pub use wrap::{
    guard_with_tolerance, is_branded, is_null_or, is_undefined_or, BrandFn, Branded, NullOr,
    Tolerance, ToleranceFn, UndefinedOr,
};
