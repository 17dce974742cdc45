//! Abrupt-exit control state
//!
//! One `Control` value per call stack. While it is not `None` the driver
//! unwinds frames instead of stepping them: `Break` halts the nearest loop
//! frame, `Return`/`Exit` finish the whole thread. A halted loop frame
//! never re-enters its body.

use crate::runtime::Value;

/// Active abrupt-exit state for one script thread.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Control {
    #[default]
    None,
    /// Leave the nearest enclosing loop.
    Break,
    /// Finish the thread with a result value.
    Return(Value),
    /// Finish the thread with no result.
    Exit,
}
