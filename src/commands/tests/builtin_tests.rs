//! Tests for the built-in command set, driven through resolution the way
//! the VM would.

use crate::commands::{builtin, CommandRegistry, HostCtx};
use crate::runtime::{ArrayRef, RuntimeError, Type, Value};

fn call(
    registry: &CommandRegistry,
    name: &str,
    operands: &[Value],
    out: &mut Vec<String>,
) -> Result<Value, RuntimeError> {
    let tags: Vec<Type> = operands.iter().map(Value::ty).collect();
    let resolved = registry.resolve(name, &tags)?;
    (resolved.handler)(&mut HostCtx { out }, operands)
}

fn scalars(values: &[f64]) -> ArrayRef {
    values.iter().map(|n| Value::from(*n)).collect()
}

#[test]
fn test_count() {
    let registry = builtin();
    let mut out = Vec::new();

    let array = Value::Array(scalars(&[1.0, 2.0, 3.0]));
    assert_eq!(
        call(&registry, "count", &[array], &mut out).unwrap(),
        Value::from(3.0)
    );
    assert_eq!(
        call(&registry, "count", &[Value::from("four")], &mut out).unwrap(),
        Value::from(4.0)
    );
}

#[test]
fn test_select_surfaces_index_errors() {
    let registry = builtin();
    let mut out = Vec::new();
    let array = Value::Array(scalars(&[10.0, 20.0, 30.0]));

    assert_eq!(
        call(&registry, "select", &[array.clone(), Value::from(2.0)], &mut out).unwrap(),
        Value::from(30.0)
    );
    assert_eq!(
        call(&registry, "select", &[array, Value::from(3.0)], &mut out).unwrap_err(),
        RuntimeError::IndexOutOfRange { index: 3, len: 3 }
    );
}

#[test]
fn test_reverse_mutates_operand() {
    let registry = builtin();
    let mut out = Vec::new();
    let array = scalars(&[1.0, 2.0]);

    call(&registry, "reverse", &[Value::Array(array.clone())], &mut out).unwrap();
    assert_eq!(array.values(), scalars(&[2.0, 1.0]).values());
}

#[test]
fn test_scalar_arithmetic() {
    let registry = builtin();
    let mut out = Vec::new();

    assert_eq!(
        call(&registry, "plus", &[Value::from(2.0), Value::from(3.0)], &mut out).unwrap(),
        Value::from(5.0)
    );
    assert_eq!(
        call(&registry, "minus", &[Value::from(2.0), Value::from(3.0)], &mut out).unwrap(),
        Value::from(-1.0)
    );
    assert_eq!(
        call(&registry, "less", &[Value::from(2.0), Value::from(3.0)], &mut out).unwrap(),
        Value::from(true)
    );
}

#[test]
fn test_plus_concatenates_arrays_into_fresh_payload() {
    let registry = builtin();
    let mut out = Vec::new();
    let left = scalars(&[1.0]);
    let right = scalars(&[2.0]);

    let joined = call(
        &registry,
        "plus",
        &[Value::Array(left.clone()), Value::Array(right)],
        &mut out,
    )
    .unwrap();

    let joined = joined.as_array().unwrap();
    assert_eq!(joined.values(), scalars(&[1.0, 2.0]).values());

    // The result is a new payload, not an alias of an operand.
    left.push(Value::from(9.0)).unwrap();
    assert_eq!(joined.len(), 2);
}

#[test]
fn test_str_renders_literal_forms() {
    let registry = builtin();
    let mut out = Vec::new();

    assert_eq!(
        call(&registry, "str", &[Value::from("hi")], &mut out).unwrap(),
        Value::from("\"hi\"")
    );
    assert_eq!(
        call(&registry, "str", &[Value::from(2.5)], &mut out).unwrap(),
        Value::from("2.5")
    );
    assert_eq!(
        call(&registry, "str", &[Value::Nil], &mut out).unwrap(),
        Value::from("nil")
    );
    let nested = Value::Array(ArrayRef::from_values(vec![
        Value::from(1.0),
        Value::from("a"),
    ]));
    assert_eq!(
        call(&registry, "str", &[nested], &mut out).unwrap(),
        Value::from("[1,\"a\"]")
    );
}

#[test]
fn test_output_commands_write_to_host_sink() {
    let registry = builtin();
    let mut out = Vec::new();

    call(&registry, "tick", &[], &mut out).unwrap();
    call(&registry, "emit", &[Value::from("hello")], &mut out).unwrap();

    assert_eq!(out, vec!["tick".to_string(), "hello".to_string()]);
}
