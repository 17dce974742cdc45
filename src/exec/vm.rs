//! Virtual machine driver
//!
//! The facade over the execution core. The VM owns the script threads and
//! the command registry handle, and advances execution one instruction per
//! scheduling step: ask the top frame of a thread for its next
//! instruction, interpret it, move on. Scheduling is cooperative and
//! single-threaded; `run_tick` time-slices runnable threads round-robin
//! until the configured budget is spent, then yields to the host.

use std::sync::Arc;

use crate::commands::{self, Arity, CommandRegistry, HostCtx};
use crate::config::EngineConfig;
use crate::runtime::{ArrayRef, Code, RuntimeError, Type, Value};

use super::callstack::CallStack;
use super::control::Control;
use super::frame::Frame;
use super::instruction::Instruction;

/// Result of advancing one thread by one step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// The thread can take another step.
    Continue,
    /// The thread has finished (normally, by abrupt exit, or on error).
    Done,
}

/// The engine driver: all live script threads plus shared host state.
#[derive(Debug)]
pub struct Vm {
    registry: Arc<CommandRegistry>,
    threads: Vec<CallStack>,
    cursor: usize,
    tick_budget: usize,
    stack_capacity: usize,
    /// Host-visible output sink written by commands.
    pub out: Vec<String>,
}

impl Vm {
    /// A VM over the process-wide command registry.
    pub fn new() -> Self {
        Self::with_registry(commands::global())
    }

    /// A VM over an explicitly constructed registry. Tests inject their
    /// own tables through this without touching process-wide state.
    pub fn with_registry(registry: Arc<CommandRegistry>) -> Self {
        Self::with_config(EngineConfig::default(), registry)
    }

    pub fn with_config(config: EngineConfig, registry: Arc<CommandRegistry>) -> Self {
        Self {
            registry,
            threads: Vec::new(),
            cursor: 0,
            tick_budget: config.tick_budget,
            stack_capacity: config.stack_capacity,
            out: Vec::new(),
        }
    }

    /// Start a new script thread executing `code`. Returns its id.
    pub fn spawn(&mut self, code: Code) -> usize {
        let mut thread = CallStack::new(code);
        thread.stack.reserve(self.stack_capacity);
        self.threads.push(thread);
        self.threads.len() - 1
    }

    pub fn thread(&self, id: usize) -> Option<&CallStack> {
        self.threads.get(id)
    }

    /// Advance one thread by exactly one step.
    ///
    /// A pending abrupt-exit state is resolved as a step of its own.
    /// Script-level failures abort only this thread: the error is recorded
    /// on it and logged, never propagated to the host.
    pub fn step_thread(&mut self, id: usize) -> Step {
        let Self {
            registry,
            threads,
            out,
            ..
        } = self;
        let Some(thread) = threads.get_mut(id) else {
            return Step::Done;
        };
        if thread.is_finished() {
            return Step::Done;
        }
        if thread.control != Control::None {
            thread.unwind();
            return step_of(thread);
        }
        let Some(instruction) = thread.next_instruction() else {
            return Step::Done;
        };
        tracing::trace!(thread = id, ?instruction, "step");
        if let Err(error) = execute(registry, out, thread, instruction) {
            tracing::warn!(thread = id, %error, "script thread aborted");
            thread.error = Some(error);
            while thread.pop_frame().is_some() {}
            thread.stack.clear();
            return Step::Done;
        }
        step_of(thread)
    }

    /// Advance runnable threads round-robin until the tick budget is spent
    /// or nothing is left to run. Returns whether runnable threads remain,
    /// so the host knows to schedule another tick.
    pub fn run_tick(&mut self) -> bool {
        for _ in 0..self.tick_budget {
            let Some(id) = self.next_runnable() else {
                return false;
            };
            self.step_thread(id);
            self.cursor = id + 1;
        }
        self.threads.iter().any(|t| !t.is_finished())
    }

    /// Drive ticks until every thread has finished.
    pub fn run_until_done(&mut self) {
        while self.run_tick() {}
    }

    fn next_runnable(&self) -> Option<usize> {
        let n = self.threads.len();
        if n == 0 {
            return None;
        }
        (0..n)
            .map(|offset| (self.cursor + offset) % n)
            .find(|&id| !self.threads[id].is_finished())
    }
}

impl Default for Vm {
    fn default() -> Self {
        Self::new()
    }
}

fn step_of(thread: &CallStack) -> Step {
    if thread.is_finished() && thread.control == Control::None {
        Step::Done
    } else {
        Step::Continue
    }
}

/* ===================== Instruction execution ===================== */

fn execute(
    registry: &CommandRegistry,
    out: &mut Vec<String>,
    thread: &mut CallStack,
    instruction: Instruction,
) -> Result<(), RuntimeError> {
    match instruction {
        Instruction::Push(value) => thread.stack.push(value),

        Instruction::Load(name) => {
            let value = thread
                .lookup(&name)
                .ok_or(RuntimeError::UndefinedVariable { name })?;
            thread.stack.push(value);
        }

        Instruction::Store(name) => {
            let value = thread.stack.pop().ok_or(RuntimeError::StackUnderflow)?;
            thread.assign(&name, value);
        }

        Instruction::Call { name, arity } => {
            let count = match arity {
                Arity::Nullary => 0,
                Arity::Unary => 1,
                Arity::Binary => 2,
            };
            if thread.stack.len() < count {
                return Err(RuntimeError::StackUnderflow);
            }
            let operands: Vec<Value> = thread.stack.split_off(thread.stack.len() - count);
            let tags: Vec<Type> = operands.iter().map(Value::ty).collect();
            let def = registry.resolve(&name, &tags)?;
            let mut ctx = HostCtx { out };
            let result = (def.handler)(&mut ctx, &operands)?;
            thread.stack.push(result);
        }

        Instruction::Enter { code, bindings } => {
            thread.push_frame(Frame::code_with_bindings(code, bindings));
        }

        Instruction::Iterate => {
            let body = pop_code(thread)?;
            let array = pop_array(thread)?;
            thread.push_frame(Frame::for_each(array, body));
        }

        Instruction::Repeat => {
            let body = pop_code(thread)?;
            let condition = pop_code(thread)?;
            thread.push_frame(Frame::while_loop(condition, body));
        }

        Instruction::Break => thread.control = Control::Break,

        Instruction::Return => {
            let value = thread.stack.pop().unwrap_or_default();
            thread.control = Control::Return(value);
        }

        Instruction::Exit => thread.control = Control::Exit,

        Instruction::ClearStack => thread.stack.clear(),
    }
    Ok(())
}

fn pop_code(thread: &mut CallStack) -> Result<Code, RuntimeError> {
    let value = thread.stack.pop().ok_or(RuntimeError::StackUnderflow)?;
    value.as_code().cloned().ok_or(RuntimeError::TypeMismatch {
        expected: Type::Code,
        actual: value.ty(),
    })
}

fn pop_array(thread: &mut CallStack) -> Result<ArrayRef, RuntimeError> {
    let value = thread.stack.pop().ok_or(RuntimeError::StackUnderflow)?;
    value
        .as_array()
        .cloned()
        .ok_or(RuntimeError::TypeMismatch {
            expected: Type::Array,
            actual: value.ty(),
        })
}
