//! Call-stack frames
//!
//! A frame is one unit of suspended execution state: a control construct's
//! progress plus its private scope. Frames are explicit state machines
//! rather than native stack recursion, so a parked call stack survives
//! host-tick boundaries. Everything needed to resume lives in the frame's
//! own fields.

use std::collections::HashMap;

use crate::runtime::{ArrayRef, Code, Value};

use super::instruction::Instruction;

/// Magic variable bound to the current foreach element.
pub const FOREACH_ELEMENT: &str = "_x";
/// Magic variable bound to the current foreach index.
pub const FOREACH_INDEX: &str = "_forEachIndex";

/// Progress of a while frame between steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WhilePhase {
    /// Schedule the condition body next.
    Test,
    /// Consume the condition result and decide whether to run the body.
    Decide,
}

/// The kind and continuation state of a frame.
#[derive(Debug, Clone)]
pub enum FrameKind {
    /// Straight-line body: yields its instructions in order.
    Code { code: Code, pc: usize },
    /// foreach loop: runs the body once per array element, one element per
    /// scheduling step. The array length is re-read every step, so a body
    /// that shrinks the array ends the loop early rather than reading past
    /// the end.
    ForEach {
        array: ArrayRef,
        body: Code,
        index: usize,
        halted: bool,
    },
    /// while loop: alternates between the condition body and, if the
    /// condition left a truthy value on the operand stack, the loop body.
    While {
        condition: Code,
        body: Code,
        phase: WhilePhase,
        halted: bool,
    },
}

/// One call-stack frame: continuation state plus its private scope.
#[derive(Debug, Clone)]
pub struct Frame {
    pub scope: HashMap<String, Value>,
    pub kind: FrameKind,
}

impl Frame {
    pub fn code(code: Code) -> Self {
        Self::code_with_bindings(code, Vec::new())
    }

    /// A code frame whose scope is pre-seeded with bindings.
    pub fn code_with_bindings(code: Code, bindings: Vec<(String, Value)>) -> Self {
        Self {
            scope: bindings.into_iter().collect(),
            kind: FrameKind::Code { code, pc: 0 },
        }
    }

    pub fn for_each(array: ArrayRef, body: Code) -> Self {
        Self {
            scope: HashMap::new(),
            kind: FrameKind::ForEach {
                array,
                body,
                index: 0,
                halted: false,
            },
        }
    }

    pub fn while_loop(condition: Code, body: Code) -> Self {
        Self {
            scope: HashMap::new(),
            kind: FrameKind::While {
                condition,
                body,
                phase: WhilePhase::Test,
                halted: false,
            },
        }
    }

    /// True for loop frames, the targets of `Break` unwinding.
    pub fn is_loop(&self) -> bool {
        matches!(
            self.kind,
            FrameKind::ForEach { .. } | FrameKind::While { .. }
        )
    }

    /// Tell the frame to terminate. Idempotent; after this, the frame
    /// produces no further instructions and never re-enters a loop body.
    pub fn halt(&mut self) {
        match &mut self.kind {
            FrameKind::Code { code, pc } => *pc = code.len(),
            FrameKind::ForEach { halted, .. } => *halted = true,
            FrameKind::While { halted, .. } => *halted = true,
        }
    }

    /// Produce the next instruction, or `None` when the frame is
    /// exhausted and should be popped by the driver.
    ///
    /// `stack` is the thread's operand stack; loop frames read their
    /// condition results from it. Each call yields at most one
    /// instruction so the driver can interleave other threads between
    /// iterations.
    pub fn pop_instruction(&mut self, stack: &mut Vec<Value>) -> Option<Instruction> {
        match &mut self.kind {
            FrameKind::Code { code, pc } => {
                let instruction = code.instructions().get(*pc).cloned()?;
                *pc += 1;
                Some(instruction)
            }

            FrameKind::ForEach {
                array,
                body,
                index,
                halted,
            } => {
                if *halted || *index >= array.len() {
                    return None;
                }
                let element = array.at(*index).ok()?;
                let bindings = vec![
                    (FOREACH_ELEMENT.to_string(), element),
                    (FOREACH_INDEX.to_string(), Value::Scalar(*index as f64)),
                ];
                *index += 1;
                Some(Instruction::Enter {
                    code: body.clone(),
                    bindings,
                })
            }

            FrameKind::While {
                condition,
                body,
                phase,
                halted,
            } => {
                if *halted {
                    return None;
                }
                match phase {
                    WhilePhase::Test => {
                        *phase = WhilePhase::Decide;
                        Some(Instruction::Enter {
                            code: condition.clone(),
                            bindings: Vec::new(),
                        })
                    }
                    WhilePhase::Decide => {
                        // The condition body left its result on the operand
                        // stack; a missing result ends the loop.
                        let verdict = stack.pop()?;
                        if !verdict.is_truthy() {
                            return None;
                        }
                        *phase = WhilePhase::Test;
                        Some(Instruction::Enter {
                            code: body.clone(),
                            bindings: Vec::new(),
                        })
                    }
                }
            }
        }
    }
}
