//! Dynamic type tags
//!
//! Every runtime payload kind carries a tag. Tags drive command dispatch and
//! the cross-type equality short-circuit: values of different tags never
//! compare equal.

use std::fmt;

/// Identity marker for a payload kind.
///
/// Two tags are equal iff they name the same kind. Tags are never mutated
/// after creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Type {
    Nil,
    Boolean,
    Scalar,
    String,
    Array,
    Code,
    Object,
}

impl Type {
    /// Canonical upper-case name of the tag.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Nil => "NIL",
            Self::Boolean => "BOOLEAN",
            Self::Scalar => "SCALAR",
            Self::String => "STRING",
            Self::Array => "ARRAY",
            Self::Code => "CODE",
            Self::Object => "OBJECT",
        }
    }

    /// Resolve a canonical name back to a tag (case-insensitive).
    ///
    /// Used by host-side registration tables that describe command
    /// signatures as text.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_uppercase().as_str() {
            "NIL" => Some(Self::Nil),
            "BOOLEAN" => Some(Self::Boolean),
            "SCALAR" => Some(Self::Scalar),
            "STRING" => Some(Self::String),
            "ARRAY" => Some(Self::Array),
            "CODE" => Some(Self::Code),
            "OBJECT" => Some(Self::Object),
            _ => None,
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
