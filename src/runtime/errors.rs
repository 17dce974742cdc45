//! Runtime error taxonomy
//!
//! Every condition here is recoverable at the call site: rejected mutations
//! leave the affected data in its pre-call state, and script-level failures
//! abort only the offending thread, never the host.

use super::tag::Type;
use thiserror::Error;

/// Errors surfaced by the runtime and execution layers.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RuntimeError {
    /// Indexed array access beyond bounds. Never clamped.
    #[error("index {index} out of range for array of length {len}")]
    IndexOutOfRange { index: usize, len: usize },

    /// Pop from an empty array.
    #[error("cannot pop from an empty array")]
    EmptyContainer,

    /// A mutation would make an array contain itself. The mutation was
    /// rolled back.
    #[error("mutation rejected: array would contain itself")]
    CycleRejected,

    /// Command dispatch could not resolve a signature. A script-level
    /// failure, not a host fault.
    #[error("unknown command: {signature}")]
    UnknownCommand { signature: String },

    /// Registration conflict. A programming error caught at startup.
    #[error("duplicate command registration: {signature}")]
    DuplicateCommand { signature: String },

    /// The process-wide registry was installed twice.
    #[error("global command registry already installed")]
    AlreadyInstalled,

    /// Load of a name with no binding in any enclosing scope.
    #[error("undefined variable: {name}")]
    UndefinedVariable { name: String },

    /// An instruction needed more operands than the operand stack holds.
    /// Indicates a malformed code body.
    #[error("operand stack underflow")]
    StackUnderflow,

    /// A handler received an operand of the wrong kind.
    #[error("type mismatch: expected {expected}, got {actual}")]
    TypeMismatch { expected: Type, actual: Type },
}
