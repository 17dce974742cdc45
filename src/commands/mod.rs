//! Native command dispatch
//!
//! Scripts reach the host through commands. Each command is a
//! (name, arity, operand type tags) signature bound to a native handler;
//! the registry resolves call sites and the handlers run against a host
//! context. The table is built once at startup and read-only afterwards.

pub mod builtin;
pub mod registry;

#[cfg(test)]
mod tests;

pub use builtin::builtin;
pub use registry::{
    global, install_global, Arity, CommandDef, CommandRegistry, Handler, Signature, SignatureInfo,
};

/// Host-side context handed to command handlers.
///
/// Carries the engine output sink; handlers never see VM internals.
#[derive(Debug)]
pub struct HostCtx<'a> {
    pub out: &'a mut Vec<String>,
}
