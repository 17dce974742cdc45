//! Test helpers for the execution layer

use std::sync::Arc;

use crate::commands::builtin;
use crate::exec::Vm;
use crate::runtime::{ArrayRef, Value};

/// A VM over a private built-in registry, leaving process-wide state
/// untouched so tests stay order-independent.
pub fn build_vm() -> Vm {
    Vm::with_registry(Arc::new(builtin()))
}

pub fn scalar_array(values: &[f64]) -> ArrayRef {
    values.iter().map(|n| Value::from(*n)).collect()
}
