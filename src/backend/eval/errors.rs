use std::rc::Rc;

use tracing::debug;

use crate::backend::error::EvalError;
use crate::backend::models::Value;

use super::sequence::call_;
use super::step::{Outcome, Step, StepResult};
use super::trampoline::{eval_bounded, settle, Lambdak, Thunk, Unary};

/// Error handler: receives the error that the guarded body raised
pub type Rescue = Rc<dyn Fn(EvalError) -> StepResult>;

/// Box a closure as a [`Rescue`]
pub fn rescue<F>(f: F) -> Rescue
where
    F: Fn(EvalError) -> StepResult + 'static,
{
    Rc::new(f)
}

/// Structured error handling: (try body except else finally)
///
/// - `body` raises: `except` runs with the error, `else_` does not.
/// - `body` completes: `else_` runs if present, `except` does not. The
///   value of `else_` (or of `body` when there is no `else_`) is the result.
/// - `body` ends with a loop signal: neither `except` nor `else_` runs and
///   the signal is the result.
/// - `finally` always runs last and receives the result (`Nil` when the
///   path raised). Its own result becomes the result of the whole form,
///   except that a pending error or signal is passed on after it runs. An
///   error raised by `finally` replaces any pending error. A loop signal
///   from `finally` is discarded when an error or signal is pending.
pub fn try_(body: Thunk, except: Rescue, else_: Option<Thunk>, finally: Option<Unary>) -> Lambdak {
    Lambdak::nullary(move || {
        let path = match eval_bounded(Lambdak::from_thunk(body.clone())) {
            Err(err) => {
                debug!(target: "lambdak::backend::eval::try", kind = err.kind(), %err, "try_ body raised");
                except(err).and_then(settle)
            }
            Ok(Outcome::Value(value)) => match &else_ {
                Some(else_) => eval_bounded(Lambdak::from_thunk(else_.clone())),
                None => Ok(Outcome::Value(value)),
            },
            Ok(signal @ Outcome::Signal(_)) => Ok(signal),
        };

        let Some(finally) = &finally else {
            return match path? {
                Outcome::Value(value) => Ok(Step::Done(value)),
                Outcome::Signal(signal) => Ok(Step::Signal(signal)),
            };
        };

        match path {
            // Tail position: the finally clause's chain is the result
            Ok(Outcome::Value(value)) => Ok(Lambdak::with_value(finally.clone(), value).into()),
            Ok(Outcome::Signal(signal)) => {
                eval_bounded(Lambdak::with_value(finally.clone(), Value::Nil))?;
                Ok(Step::Signal(signal))
            }
            Err(err) => {
                eval_bounded(Lambdak::with_value(finally.clone(), Value::Nil))?;
                Err(err)
            }
        }
    })
}

/// Node that raises a new error of `kind` with `message`
pub fn raise_(kind: impl Into<String>, message: impl Into<String>) -> Lambdak {
    reraise_(EvalError::raised(kind, message))
}

/// Node that raises `err` again. A handler passes the error it received.
pub fn reraise_(err: EvalError) -> Lambdak {
    Lambdak::nullary(move || Err(err.clone()))
}

/// Fail with an assertion error unless `condition` holds, then continue with `k`
pub fn assert_(condition: bool, k: Option<Thunk>) -> Lambdak {
    Lambdak::nullary(move || {
        if !condition {
            return Err(EvalError::Assertion("condition was false".to_string()));
        }
        call_(k.as_ref())
    })
}
