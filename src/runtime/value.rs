//! Runtime values
//!
//! A `Value` is a cheap-to-clone handle over a dynamically typed payload.
//! Scalar kinds are stored inline; composite kinds (array, code, object)
//! live behind shared reference-counted handles, so cloning a `Value` never
//! deep-copies and mutation through one clone is visible through every
//! other. Arrays rely on this: elements are stored by shared handle.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use super::array::ArrayRef;
use super::code::Code;
use super::tag::Type;

/// Equality mode for structural comparison.
///
/// `IgnoreCase` is the looser mode: string and code payloads compare
/// case-insensitively. Scalar comparison is numeric in both modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Equality {
    Strict,
    IgnoreCase,
}

/// A dynamically typed runtime value.
///
/// The default value is Nil.
#[derive(Debug, Clone, Default)]
pub enum Value {
    #[default]
    Nil,
    Boolean(bool),
    Scalar(f64),
    String(Rc<str>),
    Array(ArrayRef),
    Code(Code),
    Object(ObjectRef),
}

impl Value {
    pub fn string(s: impl Into<Rc<str>>) -> Self {
        Self::String(s.into())
    }

    /// Type tag of the payload.
    pub fn ty(&self) -> Type {
        match self {
            Self::Nil => Type::Nil,
            Self::Boolean(_) => Type::Boolean,
            Self::Scalar(_) => Type::Scalar,
            Self::String(_) => Type::String,
            Self::Array(_) => Type::Array,
            Self::Code(_) => Type::Code,
            Self::Object(_) => Type::Object,
        }
    }

    /// Structural equality under the given mode.
    ///
    /// Payloads of different type tags are unequal, never an error.
    /// Array comparison recurses pairwise; object comparison is identity.
    pub fn equals(&self, other: &Self, eq: Equality) -> bool {
        match (self, other) {
            (Self::Nil, Self::Nil) => true,
            (Self::Boolean(a), Self::Boolean(b)) => a == b,
            (Self::Scalar(a), Self::Scalar(b)) => a == b,
            (Self::String(a), Self::String(b)) => match eq {
                Equality::Strict => a == b,
                Equality::IgnoreCase => a.eq_ignore_ascii_case(b),
            },
            (Self::Array(a), Self::Array(b)) => a.equals(b, eq),
            (Self::Code(a), Self::Code(b)) => a.equals(b, eq),
            (Self::Object(a), Self::Object(b)) => a.same(b),
            _ => false,
        }
    }

    /// Truthiness for loop and branch conditions.
    pub fn is_truthy(&self) -> bool {
        match self {
            Self::Boolean(b) => *b,
            Self::Nil => false,
            _ => true,
        }
    }

    /// Render as a re-parseable source literal.
    ///
    /// Differs from `Display`: strings are quoted with internal quotes
    /// doubled, and array elements render in literal form recursively.
    pub fn to_literal(&self) -> String {
        match self {
            Self::Nil => "nil".to_string(),
            Self::Boolean(b) => b.to_string(),
            Self::Scalar(n) => n.to_string(),
            Self::String(s) => format!("\"{}\"", s.replace('"', "\"\"")),
            Self::Array(a) => a.to_literal(),
            Self::Code(c) => c.to_literal(),
            Self::Object(o) => o.name(),
        }
    }

    pub fn as_array(&self) -> Option<&ArrayRef> {
        match self {
            Self::Array(a) => Some(a),
            _ => None,
        }
    }

    pub fn as_scalar(&self) -> Option<f64> {
        match self {
            Self::Scalar(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_code(&self) -> Option<&Code> {
        match self {
            Self::Code(c) => Some(c),
            _ => None,
        }
    }
}

/// Debug rendering: strings unquoted, everything else as it reads.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Nil => f.write_str("nil"),
            Self::Boolean(b) => write!(f, "{b}"),
            Self::Scalar(n) => write!(f, "{n}"),
            Self::String(s) => f.write_str(s),
            Self::Array(a) => write!(f, "{a}"),
            Self::Code(c) => write!(f, "{c}"),
            Self::Object(o) => f.write_str(&o.name()),
        }
    }
}

/// Strict structural equality. Tests and collections use this; scripts go
/// through `equals` to pick the mode.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        self.equals(other, Equality::Strict)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Boolean(b)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Self::Scalar(n)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::String(s.into())
    }
}

impl From<ArrayRef> for Value {
    fn from(a: ArrayRef) -> Self {
        Self::Array(a)
    }
}

impl From<Code> for Value {
    fn from(c: Code) -> Self {
        Self::Code(c)
    }
}

/* ===================== Objects ===================== */

/// Shared handle to a host-world object.
///
/// Objects compare by identity: two handles are equal iff they alias the
/// same payload.
#[derive(Debug, Clone)]
pub struct ObjectRef {
    data: Rc<RefCell<ObjectData>>,
}

#[derive(Debug)]
struct ObjectData {
    name: String,
}

impl ObjectRef {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            data: Rc::new(RefCell::new(ObjectData { name: name.into() })),
        }
    }

    pub fn name(&self) -> String {
        self.data.borrow().name.clone()
    }

    pub fn rename(&self, name: impl Into<String>) {
        self.data.borrow_mut().name = name.into();
    }

    /// Identity comparison: same payload allocation.
    pub fn same(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.data, &other.data)
    }
}
