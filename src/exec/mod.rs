//! Resumable stack-driven execution
//!
//! Control constructs are explicit state machines (frames) held on an
//! explicit stack and stepped by an external driver, one instruction per
//! scheduling turn. Suspension is parking the call stack; no native stack
//! frames survive across host ticks.

pub mod callstack;
pub mod control;
pub mod frame;
pub mod instruction;
pub mod vm;

#[cfg(test)]
mod tests;

pub use callstack::CallStack;
pub use control::Control;
pub use frame::{Frame, FrameKind, WhilePhase, FOREACH_ELEMENT, FOREACH_INDEX};
pub use instruction::Instruction;
pub use vm::{Step, Vm};
