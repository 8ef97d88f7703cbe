//! Declaration failures: unknown targets, recursion, and cycles.
//!
//! Every failure here must abort resolution before any task runs, so each
//! test also asserts the context was never touched.

use muster::{Error, Priority, Registry};

use crate::fixtures::emit;

#[test]
fn unknown_target_fails_with_unresolvable_reference() {
    let mut registry: Registry<String> = Registry::new();
    registry.attach("foo", emit("foo"));
    registry.attach_with_priority("bar", Priority::before("baz"), emit("bar"));

    let mut out = String::new();
    let err = registry.execute(&mut out).unwrap_err();

    assert!(matches!(
        err,
        Error::UnresolvableReference { name, target } if name == "bar" && target == "baz"
    ));
    assert_eq!(out, "");
}

#[test]
fn self_recursion_fails_and_nothing_executes() {
    let mut registry: Registry<String> = Registry::new();
    registry.attach("innocent", emit("ran"));
    registry.attach_with_priority("narcissus", Priority::after("narcissus"), emit("loop"));

    let mut out = String::new();
    let err = registry.execute(&mut out).unwrap_err();

    assert!(matches!(err, Error::SelfRecursion { name } if name == "narcissus"));
    assert_eq!(out, "");
}

#[test]
fn mutual_recursion_fails_with_direct_recursion() {
    let mut registry: Registry<String> = Registry::new();
    registry.attach_with_priority("foo", Priority::before("bar"), emit("foo"));
    registry.attach_with_priority("bar", Priority::before("foo"), emit("bar"));

    let mut out = String::new();
    let err = registry.execute(&mut out).unwrap_err();

    assert!(matches!(err, Error::DirectRecursion { .. }));
    assert_eq!(out, "");
}

#[test]
fn mutual_recursion_across_directions_also_fails() {
    let mut registry: Registry<String> = Registry::new();
    registry.attach_with_priority("foo", Priority::after("bar"), emit("foo"));
    registry.attach_with_priority("bar", Priority::before("foo"), emit("bar"));

    let err = registry.execute(&mut String::new()).unwrap_err();

    assert!(matches!(err, Error::DirectRecursion { .. }));
}

#[test]
fn three_member_cycle_is_reported_with_its_members() {
    let mut registry: Registry<String> = Registry::new();
    registry.attach_with_priority("a", Priority::before("b"), emit("a"));
    registry.attach_with_priority("b", Priority::before("c"), emit("b"));
    registry.attach_with_priority("c", Priority::before("a"), emit("c"));

    let mut out = String::new();
    let err = registry.execute(&mut out).unwrap_err();

    match err {
        Error::PriorityCycle { names } => {
            assert_eq!(names, vec!["a", "b", "c"]);
        }
        other => panic!("expected PriorityCycle, got {:?}", other),
    }
    assert_eq!(out, "");
}

#[test]
fn cycle_is_found_even_with_resolvable_entries_present() {
    let mut registry: Registry<String> = Registry::new();
    registry.attach("ok", emit("ok"));
    registry.attach_with_priority("x", Priority::after("y"), emit("x"));
    registry.attach_with_priority("y", Priority::after("z"), emit("y"));
    registry.attach_with_priority("z", Priority::after("x"), emit("z"));

    let mut out = String::new();
    let err = registry.execute(&mut out).unwrap_err();

    match err {
        Error::PriorityCycle { names } => {
            assert_eq!(names.len(), 3);
            assert!(!names.contains(&"ok".to_string()));
        }
        other => panic!("expected PriorityCycle, got {:?}", other),
    }
    assert_eq!(out, "");
}

#[test]
fn resolution_errors_reference_the_offending_names_in_their_message() {
    let mut registry: Registry<String> = Registry::new();
    registry.attach_with_priority("widget", Priority::after("gadget"), emit("w"));

    let err = registry.execute(&mut String::new()).unwrap_err();
    let message = err.to_string();

    assert!(message.contains("widget"));
    assert!(message.contains("gadget"));
}
