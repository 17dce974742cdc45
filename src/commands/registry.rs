//! Command registry
//!
//! Maps command signatures (name, operand arity, operand type tags) to
//! native handler functions. The table is populated once at startup and is
//! read-only afterwards; lookups during script execution never lock.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, OnceLock};

use serde::Serialize;

use crate::runtime::{RuntimeError, Type, Value};

use super::HostCtx;

/// Operand arity of a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Arity {
    Nullary,
    Unary,
    Binary,
}

/// A command signature: lower-cased name plus operand type tags.
///
/// Lookup is case-insensitive on the name and exact on the operand tags.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Signature {
    Nullary { name: String },
    Unary { name: String, right: Type },
    Binary { name: String, left: Type, right: Type },
}

impl Signature {
    pub fn nullary(name: &str) -> Self {
        Self::Nullary {
            name: name.to_ascii_lowercase(),
        }
    }

    pub fn unary(name: &str, right: Type) -> Self {
        Self::Unary {
            name: name.to_ascii_lowercase(),
            right,
        }
    }

    pub fn binary(name: &str, left: Type, right: Type) -> Self {
        Self::Binary {
            name: name.to_ascii_lowercase(),
            left,
            right,
        }
    }

    /// Build the signature a call site would resolve: `operands` are the
    /// type tags of the actual operands, left to right.
    pub fn from_operands(name: &str, operands: &[Type]) -> Option<Self> {
        match operands {
            [] => Some(Self::nullary(name)),
            [right] => Some(Self::unary(name, *right)),
            [left, right] => Some(Self::binary(name, *left, *right)),
            _ => None,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Self::Nullary { name } => name,
            Self::Unary { name, .. } => name,
            Self::Binary { name, .. } => name,
        }
    }

    pub fn arity(&self) -> Arity {
        match self {
            Self::Nullary { .. } => Arity::Nullary,
            Self::Unary { .. } => Arity::Unary,
            Self::Binary { .. } => Arity::Binary,
        }
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Nullary { name } => f.write_str(name),
            Self::Unary { name, right } => write!(f, "{name} {right}"),
            Self::Binary { name, left, right } => write!(f, "{left} {name} {right}"),
        }
    }
}

/// Native handler invoked when a resolved command executes.
pub type Handler = fn(&mut HostCtx<'_>, &[Value]) -> Result<Value, RuntimeError>;

/// One registered command: signature, result tag, handler, help line.
#[derive(Clone)]
pub struct CommandDef {
    pub signature: Signature,
    pub result: Type,
    pub handler: Handler,
    pub description: &'static str,
}

impl fmt::Debug for CommandDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandDef")
            .field("signature", &self.signature)
            .field("result", &self.result)
            .field("description", &self.description)
            .finish()
    }
}

/// Listing entry for one registered command, as shown by the CLI.
#[derive(Debug, Clone, Serialize)]
pub struct SignatureInfo {
    pub signature: String,
    pub result: String,
    pub description: String,
}

/// Name+arity-indexed table of native commands.
#[derive(Debug, Default)]
pub struct CommandRegistry {
    table: HashMap<Signature, CommandDef>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a command.
    ///
    /// A duplicate signature fails loudly and keeps the first registration;
    /// silent overwrites would hide registration bugs.
    pub fn register(&mut self, def: CommandDef) -> Result<(), RuntimeError> {
        let signature = def.signature.clone();
        if self.table.contains_key(&signature) {
            return Err(RuntimeError::DuplicateCommand {
                signature: signature.to_string(),
            });
        }
        tracing::debug!(%signature, "registered command");
        self.table.insert(signature, def);
        Ok(())
    }

    /// Resolve a call site: command name plus the actual operand type tags.
    pub fn resolve(&self, name: &str, operands: &[Type]) -> Result<&CommandDef, RuntimeError> {
        let attempted =
            Signature::from_operands(name, operands).ok_or(RuntimeError::UnknownCommand {
                signature: render_attempt(name, operands),
            })?;
        self.table
            .get(&attempted)
            .ok_or(RuntimeError::UnknownCommand {
                signature: attempted.to_string(),
            })
    }

    pub fn contains(&self, signature: &Signature) -> bool {
        self.table.contains_key(signature)
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Sorted listing of every registered signature.
    pub fn signatures(&self) -> Vec<SignatureInfo> {
        let mut infos: Vec<SignatureInfo> = self
            .table
            .values()
            .map(|def| SignatureInfo {
                signature: def.signature.to_string(),
                result: def.result.to_string(),
                description: def.description.to_string(),
            })
            .collect();
        infos.sort_by(|a, b| a.signature.cmp(&b.signature));
        infos
    }
}

fn render_attempt(name: &str, operands: &[Type]) -> String {
    let tags: Vec<&str> = operands.iter().map(|t| t.name()).collect();
    format!("{} [{}]", name.to_ascii_lowercase(), tags.join(", "))
}

/* ===================== Process-wide registry ===================== */

static GLOBAL: OnceLock<Arc<CommandRegistry>> = OnceLock::new();

/// Install the process-wide registry. Must happen before any script
/// executes and at most once; a second call (or a call after `global()`
/// already materialized the built-in table) is `AlreadyInstalled`.
pub fn install_global(registry: CommandRegistry) -> Result<(), RuntimeError> {
    GLOBAL
        .set(Arc::new(registry))
        .map_err(|_| RuntimeError::AlreadyInstalled)?;
    tracing::info!("installed global command registry");
    Ok(())
}

/// The process-wide registry. Created on first use (with the built-in
/// command set) and identical thereafter; lookups never lock.
pub fn global() -> Arc<CommandRegistry> {
    GLOBAL.get_or_init(|| Arc::new(super::builtin())).clone()
}
