//! Scoped resource acquisition: (with acquire body)
//!
//! The resource's `exit` runs on every way out of the body (normal
//! completion, error, loop signal) before `with_` produces its own result.

use std::rc::Rc;

use tracing::trace;

use crate::backend::error::EvalError;
use crate::backend::models::Value;

use super::sequence::call_;
use super::step::{Outcome, Step};
use super::trampoline::{eval_bounded, Continuation, Lambdak, Thunk};

/// A resource with paired acquisition and release
pub trait ContextManager {
    /// Acquire; optionally yield a value to bind for the body
    fn enter(&mut self) -> Result<Option<Value>, EvalError>;

    /// Release. `error` is the body's error, if it raised one.
    fn exit(&mut self, error: Option<&EvalError>) -> Result<(), EvalError>;
}

/// Capability producing a fresh context manager per run
pub type Acquire = Rc<dyn Fn() -> Result<Box<dyn ContextManager>, EvalError>>;

/// Box a closure as an [`Acquire`]
pub fn acquire<F>(f: F) -> Acquire
where
    F: Fn() -> Result<Box<dyn ContextManager>, EvalError> + 'static,
{
    Rc::new(f)
}

/// Context manager built from an enter closure and an exit closure
pub struct Scoped<En, Ex> {
    enter: En,
    exit: Ex,
}

impl<En, Ex> Scoped<En, Ex>
where
    En: FnMut() -> Result<Option<Value>, EvalError>,
    Ex: FnMut(Option<&EvalError>) -> Result<(), EvalError>,
{
    pub fn new(enter: En, exit: Ex) -> Self {
        Scoped { enter, exit }
    }
}

impl<En, Ex> ContextManager for Scoped<En, Ex>
where
    En: FnMut() -> Result<Option<Value>, EvalError>,
    Ex: FnMut(Option<&EvalError>) -> Result<(), EvalError>,
{
    fn enter(&mut self) -> Result<Option<Value>, EvalError> {
        (self.enter)()
    }

    fn exit(&mut self, error: Option<&EvalError>) -> Result<(), EvalError> {
        (self.exit)(error)
    }
}

/// [`Acquire`] that builds a fresh [`Scoped`] from clones of the closures on
/// every run
pub fn scoped<En, Ex>(enter: En, exit: Ex) -> Acquire
where
    En: FnMut() -> Result<Option<Value>, EvalError> + Clone + 'static,
    Ex: FnMut(Option<&EvalError>) -> Result<(), EvalError> + Clone + 'static,
{
    Rc::new(move || {
        let manager: Box<dyn ContextManager> = Box::new(Scoped::new(enter.clone(), exit.clone()));
        Ok(manager)
    })
}

/// Acquire a resource, run `body` with the bound value (or with no argument
/// when `enter` binds nothing), release, then continue with `k`.
///
/// An error from `exit` replaces the body's error.
pub fn with_(acquire: Acquire, body: Continuation, k: Option<Thunk>) -> Lambdak {
    Lambdak::nullary(move || {
        let mut manager = acquire()?;
        let bound = manager.enter()?;
        trace!(target: "lambdak::backend::eval::with", bound = ?bound, "resource entered");

        let outcome = eval_bounded(Lambdak::new(Some(body.clone()), bound));
        match outcome {
            Ok(outcome) => {
                manager.exit(None)?;
                if let Outcome::Signal(signal) = outcome {
                    return Ok(Step::Signal(signal));
                }
                call_(k.as_ref())
            }
            Err(err) => {
                trace!(target: "lambdak::backend::eval::with", %err, "releasing after error");
                manager.exit(Some(&err))?;
                Err(err)
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;
    use crate::backend::eval::trampoline::{thunk, unary};

    fn counting_resource(counter: &Rc<Cell<i64>>, bind: Option<Value>) -> Acquire {
        let on_enter = Rc::clone(counter);
        let on_exit = Rc::clone(counter);
        scoped(
            move || {
                on_enter.set(on_enter.get() + 1);
                Ok(bind.clone())
            },
            move |_| {
                on_exit.set(on_exit.get() + 1);
                Ok(())
            },
        )
    }

    #[test]
    fn test_with_not_entered_before_run() {
        let counter = Rc::new(Cell::new(0));
        let _node = with_(
            counting_resource(&counter, None),
            Continuation::Nullary(thunk(|| Ok(Step::nil()))),
            None,
        );
        assert_eq!(counter.get(), 0);
    }

    #[test]
    fn test_with_enters_and_exits() {
        let counter = Rc::new(Cell::new(0));
        with_(
            counting_resource(&counter, None),
            Continuation::Nullary(thunk(|| Ok(Step::nil()))),
            None,
        )
        .run()
        .unwrap();
        assert_eq!(counter.get(), 2);
    }

    #[test]
    fn test_with_passes_bound_value() {
        let seen = Rc::new(Cell::new(0));
        let sink = Rc::clone(&seen);
        let counter = Rc::new(Cell::new(0));
        with_(
            counting_resource(&counter, Some(Value::Long(9))),
            Continuation::Unary(unary(move |v| {
                sink.set(v.as_long().unwrap_or(-1));
                Ok(Step::nil())
            })),
            None,
        )
        .run()
        .unwrap();
        assert_eq!(seen.get(), 9);
    }

    #[test]
    fn test_with_releases_on_error() {
        let counter = Rc::new(Cell::new(0));
        let err = with_(
            counting_resource(&counter, None),
            Continuation::Nullary(thunk(|| Err(EvalError::raised("Boom", "inside")))),
            None,
        )
        .run()
        .unwrap_err();
        assert_eq!(err.kind(), "Boom");
        assert_eq!(counter.get(), 2);
    }

    #[test]
    fn test_exit_sees_body_error() {
        let saw_error = Rc::new(Cell::new(false));
        let flag = Rc::clone(&saw_error);
        let resource = scoped(
            || Ok(None),
            move |err: Option<&EvalError>| {
                flag.set(err.is_some());
                Ok(())
            },
        );
        let _ = with_(
            resource,
            Continuation::Nullary(thunk(|| Err(EvalError::raised("Boom", "")))),
            None,
        )
        .run();
        assert!(saw_error.get());
    }

    #[test]
    fn test_exit_error_supersedes() {
        let resource = scoped(|| Ok(None), |_| Err(EvalError::raised("ReleaseError", "")));
        let err = with_(
            resource,
            Continuation::Nullary(thunk(|| Err(EvalError::raised("Boom", "")))),
            None,
        )
        .run()
        .unwrap_err();
        assert_eq!(err.kind(), "ReleaseError");
    }

    #[test]
    fn test_bound_value_with_nullary_body_is_arity_error() {
        let counter = Rc::new(Cell::new(0));
        let err = with_(
            counting_resource(&counter, Some(Value::Nil)),
            Continuation::Nullary(thunk(|| Ok(Step::nil()))),
            None,
        )
        .run()
        .unwrap_err();
        assert!(matches!(err, EvalError::Arity { .. }));
        assert_eq!(counter.get(), 2);
    }
}
