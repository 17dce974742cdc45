//! Call stacks
//!
//! One `CallStack` is one logical script thread: the stack of suspended
//! frames (innermost last), the operand stack, the abrupt-exit state and
//! the completion result. Parking the struct suspends the thread across
//! host ticks; no native execution stack is consumed.

use crate::runtime::{Code, RuntimeError, Value};

use super::control::Control;
use super::frame::Frame;
use super::instruction::Instruction;

/// One script thread's pending continuations.
#[derive(Debug, Default)]
pub struct CallStack {
    frames: Vec<Frame>,
    /// Operand stack shared by all frames of the thread.
    pub stack: Vec<Value>,
    /// Abrupt-exit state; while not `None` the driver unwinds.
    pub control: Control,
    /// Value recorded by a `Return` once the thread finishes.
    pub result: Option<Value>,
    /// Script-level failure that aborted the thread, if any.
    pub error: Option<RuntimeError>,
}

impl CallStack {
    /// A thread that starts by executing `code`.
    pub fn new(code: Code) -> Self {
        Self {
            frames: vec![Frame::code(code)],
            ..Self::default()
        }
    }

    pub fn push_frame(&mut self, frame: Frame) {
        self.frames.push(frame);
    }

    pub fn pop_frame(&mut self) -> Option<Frame> {
        self.frames.pop()
    }

    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    /// A thread with no frames left has finished.
    pub fn is_finished(&self) -> bool {
        self.frames.is_empty()
    }

    /// Ask the top frame for its next instruction, popping exhausted
    /// frames until one produces or the stack empties.
    pub fn next_instruction(&mut self) -> Option<Instruction> {
        loop {
            let frame = self.frames.last_mut()?;
            match frame.pop_instruction(&mut self.stack) {
                Some(instruction) => return Some(instruction),
                None => {
                    self.frames.pop();
                }
            }
        }
    }

    /// Look a variable up, innermost scope first.
    pub fn lookup(&self, name: &str) -> Option<Value> {
        self.frames
            .iter()
            .rev()
            .find_map(|frame| frame.scope.get(name).cloned())
    }

    /// Assign a variable: overwrite the innermost binding of `name`, or
    /// create one in the current frame's scope.
    pub fn assign(&mut self, name: &str, value: Value) {
        for frame in self.frames.iter_mut().rev() {
            if let Some(slot) = frame.scope.get_mut(name) {
                *slot = value;
                return;
            }
        }
        if let Some(frame) = self.frames.last_mut() {
            frame.scope.insert(name.to_string(), value);
        }
    }

    /// Resolve the active abrupt-exit state.
    ///
    /// `Break` pops frames down to the nearest loop frame and halts it, so
    /// the loop body is never re-entered but the code below the loop still
    /// runs. `Return` records the thread result; `Return` and `Exit` both
    /// clear every remaining frame.
    pub fn unwind(&mut self) {
        match std::mem::take(&mut self.control) {
            Control::None => {}
            Control::Break => {
                while let Some(frame) = self.frames.last_mut() {
                    if frame.is_loop() {
                        frame.halt();
                        break;
                    }
                    self.frames.pop();
                }
            }
            Control::Return(value) => {
                self.result = Some(value);
                self.frames.clear();
            }
            Control::Exit => {
                self.frames.clear();
            }
        }
    }
}
