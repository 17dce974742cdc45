//! End-to-end VM tests: whole programs through spawn/run, abrupt exits,
//! and script-level failure isolation.

use super::helpers::{build_vm, scalar_array};
use crate::commands::Arity;
use crate::exec::Instruction;
use crate::runtime::{Code, RuntimeError, Value};

#[test]
fn test_foreach_accumulates_into_outer_scope() {
    // total = 0; [1,2,3] forEach { total = total plus _x }; return total
    let body = Code::new(
        "total = total plus _x",
        vec![
            Instruction::load("total"),
            Instruction::load("_x"),
            Instruction::call("plus", Arity::Binary),
            Instruction::store("total"),
        ],
    );
    let program = Code::new(
        "sum",
        vec![
            Instruction::push(0.0),
            Instruction::store("total"),
            Instruction::push(Value::Array(scalar_array(&[1.0, 2.0, 3.0]))),
            Instruction::push(Value::Code(body)),
            Instruction::Iterate,
            Instruction::load("total"),
            Instruction::Return,
        ],
    );

    let mut vm = build_vm();
    let id = vm.spawn(program);
    vm.run_until_done();

    let thread = vm.thread(id).unwrap();
    assert_eq!(thread.error, None);
    assert_eq!(thread.result, Some(Value::from(6.0)));
}

#[test]
fn test_foreach_binds_element_and_index() {
    // ["a","b"] forEach { emit _x }
    let body = Code::new(
        "emit _x",
        vec![
            Instruction::load("_x"),
            Instruction::call("emit", Arity::Unary),
            Instruction::ClearStack,
        ],
    );
    let program = Code::new(
        "greet",
        vec![
            Instruction::push(Value::Array(
                vec![Value::from("a"), Value::from("b")].into_iter().collect(),
            )),
            Instruction::push(Value::Code(body)),
            Instruction::Iterate,
        ],
    );

    let mut vm = build_vm();
    vm.spawn(program);
    vm.run_until_done();

    assert_eq!(vm.out, vec!["a".to_string(), "b".to_string()]);
}

#[test]
fn test_break_halts_loop_but_not_thread() {
    // [1,2,3] forEach { tick; break }; emit "done"
    let body = Code::new(
        "tick; break",
        vec![
            Instruction::call("tick", Arity::Nullary),
            Instruction::ClearStack,
            Instruction::Break,
        ],
    );
    let program = Code::new(
        "breaker",
        vec![
            Instruction::push(Value::Array(scalar_array(&[1.0, 2.0, 3.0]))),
            Instruction::push(Value::Code(body)),
            Instruction::Iterate,
            Instruction::push(Value::from("done")),
            Instruction::call("emit", Arity::Unary),
            Instruction::ClearStack,
        ],
    );

    let mut vm = build_vm();
    let id = vm.spawn(program);
    vm.run_until_done();

    // The body ran exactly once, and the statement after the loop ran.
    assert_eq!(vm.out, vec!["tick".to_string(), "done".to_string()]);
    assert_eq!(vm.thread(id).unwrap().error, None);
}

#[test]
fn test_while_loop_counts_down() {
    // i = 3; while (0 less i) { i = i minus 1 }; return i
    let condition = Code::new(
        "0 less i",
        vec![
            Instruction::push(0.0),
            Instruction::load("i"),
            Instruction::call("less", Arity::Binary),
        ],
    );
    let body = Code::new(
        "i = i minus 1",
        vec![
            Instruction::load("i"),
            Instruction::push(1.0),
            Instruction::call("minus", Arity::Binary),
            Instruction::store("i"),
        ],
    );
    let program = Code::new(
        "countdown",
        vec![
            Instruction::push(3.0),
            Instruction::store("i"),
            Instruction::push(Value::Code(condition)),
            Instruction::push(Value::Code(body)),
            Instruction::Repeat,
            Instruction::load("i"),
            Instruction::Return,
        ],
    );

    let mut vm = build_vm();
    let id = vm.spawn(program);
    vm.run_until_done();

    let thread = vm.thread(id).unwrap();
    assert_eq!(thread.error, None);
    assert_eq!(thread.result, Some(Value::from(0.0)));
}

#[test]
fn test_exit_finishes_thread_without_result() {
    let program = Code::new(
        "early",
        vec![
            Instruction::call("tick", Arity::Nullary),
            Instruction::ClearStack,
            Instruction::Exit,
            Instruction::call("tick", Arity::Nullary),
        ],
    );

    let mut vm = build_vm();
    let id = vm.spawn(program);
    vm.run_until_done();

    let thread = vm.thread(id).unwrap();
    assert!(thread.is_finished());
    assert_eq!(thread.result, None);
    assert_eq!(vm.out, vec!["tick".to_string()]);
}

#[test]
fn test_return_with_empty_stack_yields_nil() {
    let program = Code::new("bare return", vec![Instruction::Return]);

    let mut vm = build_vm();
    let id = vm.spawn(program);
    vm.run_until_done();

    assert_eq!(vm.thread(id).unwrap().result, Some(Value::Nil));
}

#[test]
fn test_unknown_command_aborts_only_offending_thread() {
    let failing = Code::new("bogus", vec![Instruction::call("bogus", Arity::Nullary)]);
    let healthy = Code::new(
        "tick",
        vec![Instruction::call("tick", Arity::Nullary), Instruction::ClearStack],
    );

    let mut vm = build_vm();
    let bad = vm.spawn(failing);
    let good = vm.spawn(healthy);
    vm.run_until_done();

    assert_eq!(
        vm.thread(bad).unwrap().error,
        Some(RuntimeError::UnknownCommand {
            signature: "bogus".to_string(),
        })
    );
    assert_eq!(vm.thread(good).unwrap().error, None);
    assert_eq!(vm.out, vec!["tick".to_string()]);
}

#[test]
fn test_undefined_variable_is_a_script_error() {
    let program = Code::new("ghost", vec![Instruction::load("ghost")]);

    let mut vm = build_vm();
    let id = vm.spawn(program);
    vm.run_until_done();

    assert_eq!(
        vm.thread(id).unwrap().error,
        Some(RuntimeError::UndefinedVariable {
            name: "ghost".to_string(),
        })
    );
}

#[test]
fn test_container_violation_surfaces_on_thread() {
    // [1] select 5 is out of range.
    let program = Code::new(
        "oob",
        vec![
            Instruction::push(Value::Array(scalar_array(&[1.0]))),
            Instruction::push(5.0),
            Instruction::call("select", Arity::Binary),
        ],
    );

    let mut vm = build_vm();
    let id = vm.spawn(program);
    vm.run_until_done();

    assert_eq!(
        vm.thread(id).unwrap().error,
        Some(RuntimeError::IndexOutOfRange { index: 5, len: 1 })
    );
}

#[test]
fn test_commands_mutate_shared_payloads() {
    // reverse mutates the same payload the host still holds.
    let array = scalar_array(&[1.0, 2.0, 3.0]);
    let program = Code::new(
        "reverse arr",
        vec![
            Instruction::push(Value::Array(array.clone())),
            Instruction::call("reverse", Arity::Unary),
            Instruction::ClearStack,
        ],
    );

    let mut vm = build_vm();
    vm.spawn(program);
    vm.run_until_done();

    assert_eq!(array.values(), scalar_array(&[3.0, 2.0, 1.0]).values());
}
