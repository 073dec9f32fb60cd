//! Iteration with break / continue / else.
//!
//! Each iteration body runs in its own nested trampoline, so a signal
//! raised anywhere in the body's chain ends that chain and reaches the loop.
//! Nesting depth is one level per loop, independent of the number of
//! iterations.

use tracing::trace;

use crate::backend::error::EvalError;
use crate::backend::models::Value;

use super::sequence::call_;
use super::step::{LoopSignal, Outcome, Step, StepResult};
use super::trampoline::{eval_bounded, Lambdak, Test, Thunk, Unary};

/// Leave the nearest enclosing loop, skipping its `else_` clause
pub fn break_() -> StepResult {
    Ok(Step::Signal(LoopSignal::Break))
}

/// Skip the rest of the current iteration
pub fn continue_() -> StepResult {
    Ok(Step::Signal(LoopSignal::Continue))
}

/// Run `body` once per element of `seq`, in order
pub fn for_(seq: Vec<Value>, body: Unary, k: Option<Thunk>) -> Lambdak {
    for_else_(seq, body, None, k)
}

/// `for_` with an `else_` clause that runs only when no iteration breaks
pub fn for_else_(seq: Vec<Value>, body: Unary, else_: Option<Thunk>, k: Option<Thunk>) -> Lambdak {
    Lambdak::nullary(move || {
        for (index, item) in seq.iter().enumerate() {
            let outcome = eval_bounded(Lambdak::with_value(body.clone(), item.clone()))?;
            if is_break(&outcome) {
                trace!(target: "lambdak::backend::eval::loops", index, "for_ break");
                return call_(k.as_ref());
            }
        }
        finish(else_.as_ref(), k.as_ref())
    })
}

/// Run `body` while `test` holds
pub fn while_(test: Test, body: Thunk, k: Option<Thunk>) -> Lambdak {
    while_else_(test, body, None, k)
}

/// `while_` with an `else_` clause that runs only when the loop ends because
/// `test` stopped holding
pub fn while_else_(test: Test, body: Thunk, else_: Option<Thunk>, k: Option<Thunk>) -> Lambdak {
    Lambdak::nullary(move || {
        let mut iterations: u64 = 0;
        while test() {
            iterations += 1;
            let outcome = eval_bounded(Lambdak::from_thunk(body.clone()))?;
            if is_break(&outcome) {
                trace!(target: "lambdak::backend::eval::loops", iterations, "while_ break");
                return call_(k.as_ref());
            }
        }
        finish(else_.as_ref(), k.as_ref())
    })
}

fn is_break(outcome: &Outcome) -> bool {
    matches!(outcome, Outcome::Signal(LoopSignal::Break))
}

/// Normal loop exit: run `else_`, then continue with `k`. A signal raised by
/// `else_` belongs to an enclosing loop and is passed outward.
fn finish(else_: Option<&Thunk>, k: Option<&Thunk>) -> Result<Step, EvalError> {
    if let Some(else_) = else_ {
        if let Outcome::Signal(signal) = eval_bounded(Lambdak::from_thunk(else_.clone()))? {
            return Ok(Step::Signal(signal));
        }
    }
    call_(k)
}
