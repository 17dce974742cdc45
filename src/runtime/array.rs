//! Composite arrays
//!
//! An `ArrayRef` is a shared, mutable, ordered sequence of values. Identity
//! is the allocation, not the contents: clones alias the same storage.
//!
//! The hard invariant is acyclicity. No array may contain itself, directly
//! or through any chain of nested arrays; that is what guarantees recursive
//! traversal (equality, printing) always terminates. Every mutation that
//! could introduce an array-typed element re-runs the cycle check and rolls
//! itself back if the check fails, leaving the array exactly as it was.

use std::cell::RefCell;
use std::fmt;
use std::ops::Range;
use std::rc::Rc;

use super::errors::RuntimeError;
use super::value::{Equality, Value};

/// Shared handle to an ordered sequence of values.
#[derive(Debug, Clone, Default)]
pub struct ArrayRef {
    cells: Rc<RefCell<Vec<Value>>>,
}

impl ArrayRef {
    pub fn new() -> Self {
        Self::default()
    }

    /// A fresh array of `len` Nil values.
    pub fn with_len(len: usize) -> Self {
        Self::from_values(vec![Value::Nil; len])
    }

    /// Wrap an existing element vector.
    ///
    /// The allocation is new, so none of `values` can already contain it;
    /// no cycle check is needed here.
    pub fn from_values(values: Vec<Value>) -> Self {
        Self {
            cells: Rc::new(RefCell::new(values)),
        }
    }

    pub fn len(&self) -> usize {
        self.cells.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.borrow().is_empty()
    }

    /// Element at `index`.
    pub fn at(&self, index: usize) -> Result<Value, RuntimeError> {
        self.cells
            .borrow()
            .get(index)
            .cloned()
            .ok_or(RuntimeError::IndexOutOfRange {
                index,
                len: self.len(),
            })
    }

    /// Replace the element at `index`.
    ///
    /// Rolls the replacement back if it would introduce a cycle.
    pub fn set(&self, index: usize, value: Value) -> Result<(), RuntimeError> {
        let len = self.len();
        if index >= len {
            return Err(RuntimeError::IndexOutOfRange { index, len });
        }
        let guarded = matches!(value, Value::Array(_));
        let previous = {
            let mut cells = self.cells.borrow_mut();
            std::mem::replace(&mut cells[index], value)
        };
        if guarded && !self.is_acyclic() {
            self.cells.borrow_mut()[index] = previous;
            return Err(RuntimeError::CycleRejected);
        }
        Ok(())
    }

    /// Append a value.
    ///
    /// If the new state would contain a cycle the append is rolled back and
    /// `CycleRejected` is returned with the array unchanged.
    pub fn push(&self, value: Value) -> Result<(), RuntimeError> {
        let guarded = matches!(value, Value::Array(_));
        self.cells.borrow_mut().push(value);
        if guarded && !self.is_acyclic() {
            self.cells.borrow_mut().pop();
            return Err(RuntimeError::CycleRejected);
        }
        Ok(())
    }

    /// Remove and return the last element.
    pub fn pop(&self) -> Result<Value, RuntimeError> {
        self.cells
            .borrow_mut()
            .pop()
            .ok_or(RuntimeError::EmptyContainer)
    }

    /// Grow with Nil fill or truncate.
    ///
    /// Nil cannot self-reference, so growth needs no cycle check.
    pub fn resize(&self, len: usize) {
        self.cells.borrow_mut().resize(len, Value::Nil);
    }

    /// Splice `values` in before `pos`. `pos == len` appends.
    ///
    /// Inserted elements may themselves be arrays, so the cycle check
    /// re-runs after the splice; on failure the splice is removed again.
    pub fn insert(&self, pos: usize, values: &[Value]) -> Result<(), RuntimeError> {
        let len = self.len();
        if pos > len {
            return Err(RuntimeError::IndexOutOfRange { index: pos, len });
        }
        {
            let mut cells = self.cells.borrow_mut();
            cells.splice(pos..pos, values.iter().cloned());
        }
        let guarded = values.iter().any(|v| matches!(v, Value::Array(_)));
        if guarded && !self.is_acyclic() {
            self.cells.borrow_mut().drain(pos..pos + values.len());
            return Err(RuntimeError::CycleRejected);
        }
        Ok(())
    }

    /// Remove the elements in `[range.start, range.end)`.
    pub fn erase(&self, range: Range<usize>) -> Result<(), RuntimeError> {
        let len = self.len();
        if range.start > range.end || range.end > len {
            return Err(RuntimeError::IndexOutOfRange {
                index: range.end,
                len,
            });
        }
        self.cells.borrow_mut().drain(range);
        Ok(())
    }

    /// In-place order reversal. No cycle implications.
    pub fn reverse(&self) {
        self.cells.borrow_mut().reverse();
    }

    /// Pairwise structural equality: equal length and element-wise `equals`
    /// under the given mode. Length mismatch short-circuits.
    pub fn equals(&self, other: &Self, eq: Equality) -> bool {
        if Rc::ptr_eq(&self.cells, &other.cells) {
            return true;
        }
        let a = self.cells.borrow();
        let b = other.cells.borrow();
        if a.len() != b.len() {
            return false;
        }
        a.iter().zip(b.iter()).all(|(x, y)| x.equals(y, eq))
    }

    /// Snapshot of the current elements.
    pub fn values(&self) -> Vec<Value> {
        self.cells.borrow().clone()
    }

    /// Render as a source literal: `[e0,e1,...]`, `[]` when empty.
    pub fn to_literal(&self) -> String {
        let cells = self.cells.borrow();
        let parts: Vec<String> = cells.iter().map(Value::to_literal).collect();
        format!("[{}]", parts.join(","))
    }

    /// True if no array in this subtree contains itself.
    ///
    /// Depth-first walk over array-typed elements keeping the set of
    /// payloads on the current path, keyed by allocation identity. A child
    /// already on the path proves a cycle. The child is pushed before
    /// descending and popped after returning, so the same sub-array shared
    /// by two siblings (a diamond, not a cycle) passes.
    pub fn is_acyclic(&self) -> bool {
        let mut path: Vec<*const RefCell<Vec<Value>>> = Vec::new();
        self.walk_acyclic(&mut path)
    }

    fn walk_acyclic(&self, path: &mut Vec<*const RefCell<Vec<Value>>>) -> bool {
        let cells = self.cells.borrow();
        for value in cells.iter() {
            if let Value::Array(child) = value {
                let id = Rc::as_ptr(&child.cells);
                if path.contains(&id) {
                    return false;
                }
                path.push(id);
                if !child.walk_acyclic(path) {
                    return false;
                }
                path.pop();
            }
        }
        true
    }
}

impl fmt::Display for ArrayRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cells = self.cells.borrow();
        write!(f, "[")?;
        for (i, value) in cells.iter().enumerate() {
            if i > 0 {
                write!(f, ",")?;
            }
            write!(f, "{value}")?;
        }
        write!(f, "]")
    }
}

impl PartialEq for ArrayRef {
    fn eq(&self, other: &Self) -> bool {
        self.equals(other, Equality::Strict)
    }
}

impl FromIterator<Value> for ArrayRef {
    fn from_iter<I: IntoIterator<Item = Value>>(iter: I) -> Self {
        Self::from_values(iter.into_iter().collect())
    }
}
