pub mod commands;
pub mod config;
pub mod exec;
pub mod runtime;

// Re-export main types
pub use config::EngineConfig;
pub use exec::{CallStack, Control, Frame, FrameKind, Instruction, Step, Vm};
pub use runtime::{ArrayRef, Code, Equality, ObjectRef, RuntimeError, Type, Value};

// Re-export the registry API for convenience
pub use commands::{global, install_global, Arity, CommandDef, CommandRegistry, Signature};
