//! Combinators composed with schemas and with each other.

use std::sync::Arc;
use std::thread;

use json_guard::{
    guard_with_tolerance, is_branded, is_enum, is_equal_to, is_integer, is_null_or, is_number,
    is_object_with_each_item, is_omit, is_one_of, is_one_of_types, is_partial_of, is_pattern,
    is_pick, is_string, is_type, make_error, make_result, Context, DiagnosticMode,
    ErrorCollector, Guard, GuardRef, Shape,
};
use serde_json::{json, Value};

fn base() -> json_guard::ObjectSchema {
    is_type(
        Shape::new()
            .field("name", is_string())
            .field("age", is_number()),
    )
}

// ---------------------------------------------------------------------------
// Unions
// ---------------------------------------------------------------------------

#[test]
fn one_of_types_on_boolean_lists_each_reason() {
    let g = is_one_of_types([is_string().boxed(), is_number().boxed()]);
    let sink = ErrorCollector::new();
    let ctx = Context::new("value", &sink);
    assert!(!g.check(Some(&json!(true)), Some(&ctx)));
    let messages = sink.messages();
    let lines: Vec<&str> = messages[0].lines().collect();
    assert_eq!(lines.len(), 3);
    assert!(lines[1].starts_with("- ") && lines[1].contains("\"string\""));
    assert!(lines[2].starts_with("- ") && lines[2].contains("\"number\""));
}

#[test]
fn union_of_schemas_explains_each_branch() {
    let cat = is_type(Shape::new().field("kind", is_equal_to(json!("cat"))).field("lives", is_integer()));
    let dog = is_type(Shape::new().field("kind", is_equal_to(json!("dog"))).field("bark", is_string()));
    let pet = is_one_of_types([cat.boxed(), dog.boxed()]);

    assert!(pet.is(&json!({"kind": "cat", "lives": 9})));
    assert!(pet.is(&json!({"kind": "dog", "bark": "woof"})));

    let sink = ErrorCollector::new();
    let ctx = Context::new("pet", &sink);
    assert!(!pet.check(Some(&json!({"kind": "cow"})), Some(&ctx)));
    let messages = sink.messages();
    assert_eq!(messages.len(), 1);
    assert!(messages[0].starts_with("Expected pet ({\"kind\":\"cow\"}) to be one of types: object | object"));
    assert!(messages[0].contains("- Expected pet.kind (\"cow\") to be \"cat\""));
    assert!(messages[0].contains("- Expected pet.kind (\"cow\") to be \"dog\""));
}

#[test]
fn union_inside_schema_field() {
    let schema = is_type(Shape::new().field(
        "id",
        is_one_of_types([is_string().boxed(), is_integer().boxed()]),
    ));
    let sink = ErrorCollector::new();
    let ctx = Context::new("req", &sink).with_mode(DiagnosticMode::Multi);
    let r = schema.validate(Some(&json!({"id": 1.5})), Some(&ctx));
    assert_eq!(r.errors()[0].expected_type(), "string | integer");
    assert!(r.errors()[0].message().starts_with("Expected req.id (1.5) to be one of types"));
}

#[test]
fn one_of_values_and_enums_in_schema() {
    let roles = json!({"Admin": "admin", "User": "user"});
    let schema = is_type(
        Shape::new()
            .field("role", is_enum(roles.as_object().unwrap()))
            .field("size", is_one_of([json!("s"), json!("m"), json!("l")])),
    );
    assert!(schema.is(&json!({"role": "admin", "size": "m"})));
    assert!(!schema.is(&json!({"role": "root", "size": "m"})));
    assert!(!schema.is(&json!({"role": "user", "size": "xl"})));
}

// ---------------------------------------------------------------------------
// Partial / pick / omit
// ---------------------------------------------------------------------------

#[test]
fn partial_drops_requiredness_keeps_types() {
    let partial = is_partial_of(&base());
    assert!(partial.is(&json!({})));
    assert!(partial.is(&json!({"name": "x"})));
    assert!(!partial.is(&json!({"name": 1})));
}

#[test]
fn partial_json_tree_marks_missing_as_valid() {
    let partial = is_partial_of(&base());
    let sink = ErrorCollector::new();
    let ctx = Context::new("patch", &sink).with_mode(DiagnosticMode::Json);
    assert!(!partial.check(Some(&json!({"age": "x"})), Some(&ctx)));
    let report: Value = serde_json::from_str(&sink.messages()[0]).unwrap();
    assert_eq!(report["patch"]["children"]["name"]["valid"], json!(true));
    assert_eq!(report["patch"]["children"]["age"]["valid"], json!(false));
}

#[test]
fn pick_is_presence_only() {
    let g = is_pick(&base(), ["age"]).unwrap();
    assert!(!g.is(&json!({})));
    assert!(g.is(&json!({"age": "not-a-number"})));
}

#[test]
fn pick_composed_with_base_checks_types() {
    let picked = base().pick(["age"]).unwrap();
    let both = json_guard::is_intersection_of([
        is_pick(&base(), ["age"]).unwrap().boxed(),
        picked.boxed(),
    ]);
    assert!(both.is(&json!({"age": 3})));
    assert!(!both.is(&json!({"age": "3"})));
    assert!(!both.is(&json!({})));
}

#[test]
fn omit_forbids_presence() {
    let g = is_omit(&base(), ["age"]).unwrap();
    assert!(g.is(&json!({"name": "x"})));
    assert!(!g.is(&json!({"name": "x", "age": 1})));
}

// ---------------------------------------------------------------------------
// Wrappers
// ---------------------------------------------------------------------------

#[test]
fn nullable_field_in_schema() {
    let schema = is_type(Shape::new().field("nick", is_null_or(is_string())));
    assert!(schema.is(&json!({"nick": null})));
    assert!(schema.is(&json!({"nick": "n"})));
    assert!(!schema.is(&json!({})));
}

#[test]
fn tolerance_failure_inside_schema_still_yields_error_entry() {
    let schema = is_type(Shape::new().field(
        "qty",
        guard_with_tolerance(is_integer(), |n| (1.0..=99.0).contains(&n)),
    ));
    let sink = ErrorCollector::new();
    let ctx = Context::new("order", &sink).with_mode(DiagnosticMode::Multi);
    let r = schema.validate(Some(&json!({"qty": 500})), Some(&ctx));
    assert!(!r.is_valid());
    assert_eq!(
        r.errors()[0].message(),
        "Expected order.qty (500) to be \"integer\""
    );
}

#[test]
fn branded_field_in_schema() {
    let email = is_branded("Email", |v| match v.and_then(Value::as_str) {
        Some(s) if s.contains('@') => Ok(()),
        Some(_) => Err("missing @".to_string()),
        None => Err("not text".to_string()),
    });
    let schema = is_type(Shape::new().field("email", email));
    let sink = ErrorCollector::new();
    let ctx = Context::new("signup", &sink);
    assert!(!schema.check(Some(&json!({"email": "nope"})), Some(&ctx)));
    assert_eq!(
        sink.messages(),
        vec!["branded type validation failed: missing @".to_string()]
    );
}

#[test]
fn pattern_in_record_of() {
    let slug = is_pattern("^[a-z-]+$").unwrap();
    let g = is_object_with_each_item(slug);
    let sink = ErrorCollector::new();
    let ctx = Context::new("slugs", &sink).with_mode(DiagnosticMode::Multi);
    assert!(!g.check(Some(&json!({"a": "ok-slug", "b": "Bad Slug", "c": 3})), Some(&ctx)));
    assert_eq!(
        sink.messages(),
        vec![
            "slugs.b (\"Bad Slug\") does not match pattern /^[a-z-]+$/".to_string(),
            "Expected slugs.c (3) to be \"string\"".to_string(),
        ]
    );
}

#[test]
fn record_keys_that_are_not_identifiers_use_brackets() {
    let g = is_object_with_each_item(is_number());
    let sink = ErrorCollector::new();
    let ctx = Context::new("scores", &sink).with_mode(DiagnosticMode::Multi);
    assert!(!g.check(Some(&json!({"a.b": "x", "plain": "y"})), Some(&ctx)));
    assert_eq!(
        sink.messages(),
        vec![
            "Expected scores[\"a.b\"] (\"x\") to be \"number\"".to_string(),
            "Expected scores.plain (\"y\") to be \"number\"".to_string(),
        ]
    );
}

// ---------------------------------------------------------------------------
// Records and sharing
// ---------------------------------------------------------------------------

#[test]
fn results_from_identical_inputs_are_equal() {
    let a = make_error("u.age", "number", Some(json!("x")), "bad");
    let b = make_error("u.age", "number", Some(json!("x")), "bad");
    let r = make_result(false, [a], None);
    assert_eq!(r.errors()[0], b);
}

#[test]
fn guards_are_shareable_across_threads() {
    let schema: GuardRef = Arc::new(base());
    thread::scope(|s| {
        for i in 0..4 {
            let schema = Arc::clone(&schema);
            s.spawn(move || {
                let sink = ErrorCollector::new();
                let ctx = Context::new(format!("t{i}"), &sink).with_mode(DiagnosticMode::Multi);
                assert!(!schema.check(Some(&json!({"name": i})), Some(&ctx)));
                let messages = sink.messages();
                assert_eq!(messages.len(), 1);
                assert!(messages[0].starts_with(&format!("Expected t{i}.name")));
            });
        }
    });
}
