use tracing::trace;

use crate::backend::error::EvalError;
use crate::backend::models::Value;

use super::step::{Outcome, Step, StepResult};
use super::trampoline::{settle, Lambdak, Test, Thunk, Unary};

/// Conditional: (if test then else)
///
/// `test` is already evaluated. Only the chosen branch runs, and only when
/// the node runs. Without `k` the branch is the tail of the chain; with `k`
/// the branch is evaluated and its value is handed to `k`.
pub fn if_(test: bool, then: Thunk, otherwise: Thunk, k: Option<Unary>) -> Lambdak {
    Lambdak::nullary(move || {
        let branch = if test { &then } else { &otherwise };
        feed(branch()?, k.as_ref())
    })
}

/// Multi-way conditional.
///
/// Tests run in order when the node runs; the producer of the first test
/// that holds supplies the value. Later tests and producers never run. If no
/// test holds, `default` supplies the value (`Nil` when there is no default).
pub fn cond_(clauses: Vec<(Test, Thunk)>, default: Option<Thunk>, k: Option<Unary>) -> Lambdak {
    Lambdak::nullary(move || {
        let chosen = clauses
            .iter()
            .position(|(test, _)| test())
            .map(|index| {
                trace!(target: "lambdak::backend::eval::cond", index, "clause matched");
                &clauses[index].1
            });

        match chosen.or(default.as_ref()) {
            Some(produce) => feed(produce()?, k.as_ref()),
            None => feed(Step::nil(), k.as_ref()),
        }
    })
}

/// Hand the value of `step` to `k`.
///
/// With no `k` the step itself is returned, keeping it in tail position.
/// A loop signal is passed through untouched.
fn feed(step: Step, k: Option<&Unary>) -> StepResult {
    let Some(k) = k else {
        return Ok(step);
    };
    match settle(step)? {
        Outcome::Value(value) => Ok(Lambdak::with_value(k.clone(), value).into()),
        Outcome::Signal(signal) => Ok(Step::Signal(signal)),
    }
}

/// Read a boolean out of a value produced by a chain
pub fn truthy(value: &Value) -> Result<bool, EvalError> {
    match value {
        Value::Bool(b) => Ok(*b),
        Value::Nil => Ok(false),
        other => Err(EvalError::Type(format!(
            "expected Bool, got {}",
            other.type_name()
        ))),
    }
}
