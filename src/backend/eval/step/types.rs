//! Step Types for Evaluation
//!
//! These types represent the result of running a single step in the
//! trampoline. A step either hands back another node to run, raises a
//! loop-control signal for the nearest enclosing loop, or finishes with a
//! terminal value.

use std::fmt;

use crate::backend::error::EvalError;
use crate::backend::models::Value;

use super::super::trampoline::Lambdak;

/// Result of running a continuation once
pub type StepResult = Result<Step, EvalError>;

/// Loop-control signal, recognized only by `for_`/`while_` and their `else`
/// variants
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopSignal {
    Break,
    Continue,
}

impl fmt::Display for LoopSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoopSignal::Break => write!(f, "break"),
            LoopSignal::Continue => write!(f, "continue"),
        }
    }
}

/// What a step produced
#[derive(Debug)]
pub enum Step {
    /// Keep going: the trampoline runs this node next
    Defer(Lambdak),
    /// Loop control for the nearest enclosing loop
    Signal(LoopSignal),
    /// Chain finished with this value
    Done(Value),
}

impl Step {
    pub fn done(value: impl Into<Value>) -> Self {
        Step::Done(value.into())
    }

    /// Terminal "no value"
    pub fn nil() -> Self {
        Step::Done(Value::Nil)
    }
}

impl From<Lambdak> for Step {
    fn from(node: Lambdak) -> Self {
        Step::Defer(node)
    }
}

impl From<LoopSignal> for Step {
    fn from(signal: LoopSignal) -> Self {
        Step::Signal(signal)
    }
}

impl From<Value> for Step {
    fn from(value: Value) -> Self {
        Step::Done(value)
    }
}

/// How a whole chain ended, as seen by the trampoline engine
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Value(Value),
    Signal(LoopSignal),
}
