//! Built-in command set
//!
//! A small demonstration library: enough to exercise dispatch, array
//! traffic and the host output sink. The full command library of a shipped
//! engine registers through the same mechanism.

use crate::runtime::{ArrayRef, RuntimeError, Type, Value};

use super::registry::{CommandDef, CommandRegistry, Signature};
use super::HostCtx;

/// Build a registry populated with the built-in commands.
///
/// Duplicate signatures in this table are a programming error, so
/// registration failures abort startup.
pub fn builtin() -> CommandRegistry {
    let mut registry = CommandRegistry::new();
    let defs = [
        CommandDef {
            signature: Signature::nullary("tick"),
            result: Type::Nil,
            handler: cmd_tick,
            description: "write a heartbeat line to the host output",
        },
        CommandDef {
            signature: Signature::unary("emit", Type::String),
            result: Type::Nil,
            handler: cmd_emit,
            description: "write a string to the host output",
        },
        CommandDef {
            signature: Signature::unary("count", Type::Array),
            result: Type::Scalar,
            handler: cmd_count,
            description: "number of elements in an array",
        },
        CommandDef {
            signature: Signature::unary("count", Type::String),
            result: Type::Scalar,
            handler: cmd_count_string,
            description: "number of characters in a string",
        },
        CommandDef {
            signature: Signature::unary("reverse", Type::Array),
            result: Type::Nil,
            handler: cmd_reverse,
            description: "reverse an array in place",
        },
        CommandDef {
            signature: Signature::unary("str", Type::Nil),
            result: Type::String,
            handler: cmd_str,
            description: "literal form of nil",
        },
        CommandDef {
            signature: Signature::unary("str", Type::Boolean),
            result: Type::String,
            handler: cmd_str,
            description: "literal form of a boolean",
        },
        CommandDef {
            signature: Signature::unary("str", Type::Scalar),
            result: Type::String,
            handler: cmd_str,
            description: "literal form of a scalar",
        },
        CommandDef {
            signature: Signature::unary("str", Type::String),
            result: Type::String,
            handler: cmd_str,
            description: "literal form of a string",
        },
        CommandDef {
            signature: Signature::unary("str", Type::Array),
            result: Type::String,
            handler: cmd_str,
            description: "literal form of an array",
        },
        CommandDef {
            signature: Signature::binary("select", Type::Array, Type::Scalar),
            result: Type::Nil,
            handler: cmd_select,
            description: "element of an array at an index",
        },
        CommandDef {
            signature: Signature::binary("plus", Type::Scalar, Type::Scalar),
            result: Type::Scalar,
            handler: cmd_plus_scalar,
            description: "sum of two scalars",
        },
        CommandDef {
            signature: Signature::binary("minus", Type::Scalar, Type::Scalar),
            result: Type::Scalar,
            handler: cmd_minus_scalar,
            description: "difference of two scalars",
        },
        CommandDef {
            signature: Signature::binary("less", Type::Scalar, Type::Scalar),
            result: Type::Boolean,
            handler: cmd_less_scalar,
            description: "numeric less-than",
        },
        CommandDef {
            signature: Signature::binary("plus", Type::Array, Type::Array),
            result: Type::Array,
            handler: cmd_plus_array,
            description: "concatenation of two arrays",
        },
    ];
    for def in defs {
        registry
            .register(def)
            .expect("built-in command table contains a duplicate signature");
    }
    tracing::info!(commands = registry.len(), "built-in command set registered");
    registry
}

/* ===================== Operand guards ===================== */

fn operand(args: &[Value], index: usize) -> Result<&Value, RuntimeError> {
    args.get(index).ok_or(RuntimeError::StackUnderflow)
}

fn array_operand(args: &[Value], index: usize) -> Result<&ArrayRef, RuntimeError> {
    let value = operand(args, index)?;
    value.as_array().ok_or(RuntimeError::TypeMismatch {
        expected: Type::Array,
        actual: value.ty(),
    })
}

fn scalar_operand(args: &[Value], index: usize) -> Result<f64, RuntimeError> {
    let value = operand(args, index)?;
    value.as_scalar().ok_or(RuntimeError::TypeMismatch {
        expected: Type::Scalar,
        actual: value.ty(),
    })
}

/* ===================== Handlers ===================== */

fn cmd_tick(ctx: &mut HostCtx<'_>, _args: &[Value]) -> Result<Value, RuntimeError> {
    ctx.out.push("tick".to_string());
    Ok(Value::Nil)
}

fn cmd_emit(ctx: &mut HostCtx<'_>, args: &[Value]) -> Result<Value, RuntimeError> {
    let value = operand(args, 0)?;
    ctx.out.push(value.to_string());
    Ok(Value::Nil)
}

fn cmd_count(_ctx: &mut HostCtx<'_>, args: &[Value]) -> Result<Value, RuntimeError> {
    let array = array_operand(args, 0)?;
    Ok(Value::Scalar(array.len() as f64))
}

fn cmd_count_string(_ctx: &mut HostCtx<'_>, args: &[Value]) -> Result<Value, RuntimeError> {
    let value = operand(args, 0)?;
    match value {
        Value::String(s) => Ok(Value::Scalar(s.chars().count() as f64)),
        _ => Err(RuntimeError::TypeMismatch {
            expected: Type::String,
            actual: value.ty(),
        }),
    }
}

fn cmd_reverse(_ctx: &mut HostCtx<'_>, args: &[Value]) -> Result<Value, RuntimeError> {
    array_operand(args, 0)?.reverse();
    Ok(Value::Nil)
}

fn cmd_str(_ctx: &mut HostCtx<'_>, args: &[Value]) -> Result<Value, RuntimeError> {
    Ok(Value::string(operand(args, 0)?.to_literal()))
}

fn cmd_select(_ctx: &mut HostCtx<'_>, args: &[Value]) -> Result<Value, RuntimeError> {
    let array = array_operand(args, 0)?;
    let index = scalar_operand(args, 1)?;
    if index < 0.0 {
        return Err(RuntimeError::IndexOutOfRange {
            index: 0,
            len: array.len(),
        });
    }
    array.at(index as usize)
}

fn cmd_plus_scalar(_ctx: &mut HostCtx<'_>, args: &[Value]) -> Result<Value, RuntimeError> {
    Ok(Value::Scalar(
        scalar_operand(args, 0)? + scalar_operand(args, 1)?,
    ))
}

fn cmd_minus_scalar(_ctx: &mut HostCtx<'_>, args: &[Value]) -> Result<Value, RuntimeError> {
    Ok(Value::Scalar(
        scalar_operand(args, 0)? - scalar_operand(args, 1)?,
    ))
}

fn cmd_less_scalar(_ctx: &mut HostCtx<'_>, args: &[Value]) -> Result<Value, RuntimeError> {
    Ok(Value::Boolean(
        scalar_operand(args, 0)? < scalar_operand(args, 1)?,
    ))
}

fn cmd_plus_array(_ctx: &mut HostCtx<'_>, args: &[Value]) -> Result<Value, RuntimeError> {
    let left = array_operand(args, 0)?;
    let right = array_operand(args, 1)?;
    let joined = ArrayRef::new();
    for value in left.values().into_iter().chain(right.values()) {
        joined.push(value)?;
    }
    Ok(Value::Array(joined))
}
