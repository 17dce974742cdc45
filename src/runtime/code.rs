//! Executable code bodies
//!
//! A `Code` value is a shared, immutable handle over a compiled instruction
//! sequence plus the source text it was compiled from. The runtime treats
//! code as opaque data; only call-stack frames walk its instructions.

use std::fmt;
use std::rc::Rc;

use crate::exec::instruction::Instruction;

use super::value::Equality;

/// Shared handle to a compiled code body.
#[derive(Debug, Clone, Default)]
pub struct Code {
    body: Rc<CodeBody>,
}

#[derive(Debug, Default)]
struct CodeBody {
    source: String,
    instructions: Vec<Instruction>,
}

impl Code {
    pub fn new(source: impl Into<String>, instructions: Vec<Instruction>) -> Self {
        Self {
            body: Rc::new(CodeBody {
                source: source.into(),
                instructions,
            }),
        }
    }

    /// The source text this body was compiled from.
    pub fn source(&self) -> &str {
        &self.body.source
    }

    pub fn instructions(&self) -> &[Instruction] {
        &self.body.instructions
    }

    pub fn len(&self) -> usize {
        self.body.instructions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.body.instructions.is_empty()
    }

    /// Code equality compares source text; two bodies compiled from the
    /// same text are interchangeable.
    pub fn equals(&self, other: &Self, eq: Equality) -> bool {
        match eq {
            Equality::Strict => self.body.source == other.body.source,
            Equality::IgnoreCase => self.body.source.eq_ignore_ascii_case(&other.body.source),
        }
    }

    /// Render as a source literal: the source wrapped in braces.
    pub fn to_literal(&self) -> String {
        format!("{{{}}}", self.body.source)
    }
}

impl fmt::Display for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{{}}}", self.body.source)
    }
}

impl PartialEq for Code {
    fn eq(&self, other: &Self) -> bool {
        self.equals(other, Equality::Strict)
    }
}
