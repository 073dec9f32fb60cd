//! Trampoline Types
//!
//! `Lambdak` is the deferred-computation node: a next-step continuation
//! paired with an optional carried value. Building one runs nothing; the
//! trampoline engine consumes it.

use std::fmt;
use std::rc::Rc;

use crate::backend::error::EvalError;
use crate::backend::models::Value;

use super::super::step::{Step, StepResult};

/// Zero-argument capability
pub type Thunk = Rc<dyn Fn() -> StepResult>;

/// One-argument capability
pub type Unary = Rc<dyn Fn(Value) -> StepResult>;

/// Zero-argument boolean test
pub type Test = Rc<dyn Fn() -> bool>;

/// Box a closure as a [`Thunk`]
pub fn thunk<F>(f: F) -> Thunk
where
    F: Fn() -> StepResult + 'static,
{
    Rc::new(f)
}

/// Box a closure as a [`Unary`]
pub fn unary<F>(f: F) -> Unary
where
    F: Fn(Value) -> StepResult + 'static,
{
    Rc::new(f)
}

/// Box a closure as a [`Test`]
pub fn pred<F>(f: F) -> Test
where
    F: Fn() -> bool + 'static,
{
    Rc::new(f)
}

/// The next step of a node
#[derive(Clone)]
pub enum Continuation {
    Nullary(Thunk),
    Unary(Unary),
}

impl Continuation {
    pub fn arity(&self) -> usize {
        match self {
            Continuation::Nullary(_) => 0,
            Continuation::Unary(_) => 1,
        }
    }

    /// Invoke with the carried value if there is one, else with no argument
    pub fn invoke(&self, arg: Option<Value>) -> StepResult {
        match (self, arg) {
            (Continuation::Nullary(f), None) => f(),
            (Continuation::Unary(f), Some(value)) => f(value),
            (Continuation::Nullary(_), Some(_)) => Err(EvalError::Arity {
                expected: 0,
                got: 1,
            }),
            (Continuation::Unary(_), None) => Err(EvalError::Arity {
                expected: 1,
                got: 0,
            }),
        }
    }
}

impl From<Thunk> for Continuation {
    fn from(f: Thunk) -> Self {
        Continuation::Nullary(f)
    }
}

impl From<Unary> for Continuation {
    fn from(f: Unary) -> Self {
        Continuation::Unary(f)
    }
}

impl fmt::Debug for Continuation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Continuation::Nullary(_) => write!(f, "Continuation::Nullary"),
            Continuation::Unary(_) => write!(f, "Continuation::Unary"),
        }
    }
}

/// A deferred computation.
///
/// The carried value is tri-state together with the continuation:
/// - `next = Some(_)`, `carried = None`: invoke with no argument
/// - `next = Some(_)`, `carried = Some(v)`: invoke with `v` (`Value::Nil`
///   counts as a value)
/// - `next = None`: nothing to run, the carried value is the result
///
/// Fields are fixed at construction. Running consumes the node; cloning
/// only clones the `Rc` handles, so a clone runs the same computation again.
#[derive(Clone, Debug)]
pub struct Lambdak {
    next: Option<Continuation>,
    carried: Option<Value>,
}

impl Lambdak {
    pub fn new(next: Option<Continuation>, carried: Option<Value>) -> Self {
        Lambdak { next, carried }
    }

    /// Node whose step takes no argument
    pub fn nullary<F>(f: F) -> Self
    where
        F: Fn() -> StepResult + 'static,
    {
        Self::from_thunk(Rc::new(f))
    }

    /// Node whose step takes one argument, supplied at `call` time
    pub fn unary<F>(f: F) -> Self
    where
        F: Fn(Value) -> StepResult + 'static,
    {
        Lambdak::new(Some(Continuation::Unary(Rc::new(f))), None)
    }

    pub fn from_thunk(k: Thunk) -> Self {
        Lambdak::new(Some(Continuation::Nullary(k)), None)
    }

    /// Node that feeds `value` to `k`
    pub fn with_value(k: Unary, value: impl Into<Value>) -> Self {
        Lambdak::new(Some(Continuation::Unary(k)), Some(value.into()))
    }

    /// Node with no continuation; running it yields `value`
    pub fn value(value: impl Into<Value>) -> Self {
        Lambdak::new(None, Some(value.into()))
    }

    /// Node with neither continuation nor value; running it yields `Nil`
    pub fn empty() -> Self {
        Lambdak::new(None, None)
    }

    pub fn next(&self) -> Option<&Continuation> {
        self.next.as_ref()
    }

    pub fn carried(&self) -> Option<&Value> {
        self.carried.as_ref()
    }

    pub fn into_parts(self) -> (Option<Continuation>, Option<Value>) {
        (self.next, self.carried)
    }

    /// Same continuation, with `arg` in place of the carried value
    pub fn with_arg(self, arg: impl Into<Value>) -> Self {
        Lambdak::new(self.next, Some(arg.into()))
    }
}

impl From<Value> for Lambdak {
    fn from(value: Value) -> Self {
        Lambdak::value(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn test_construction_runs_nothing() {
        let calls = Rc::new(Cell::new(0));
        let counter = Rc::clone(&calls);
        let _node = Lambdak::nullary(move || {
            counter.set(counter.get() + 1);
            Ok(Step::nil())
        });
        assert_eq!(calls.get(), 0);
    }

    #[test]
    fn test_nil_carried_is_not_absent() {
        let k = unary(|v| Ok(Step::Done(v)));
        let node = Lambdak::with_value(k, Value::Nil);
        assert_eq!(node.carried(), Some(&Value::Nil));
        assert_eq!(Lambdak::unary(|v| Ok(Step::Done(v))).carried(), None);
    }

    #[test]
    fn test_invoke_arity_mismatch() {
        let k = Continuation::Nullary(thunk(|| Ok(Step::nil())));
        assert_eq!(
            k.invoke(Some(Value::Long(1))).unwrap_err(),
            EvalError::Arity {
                expected: 0,
                got: 1
            }
        );

        let k = Continuation::Unary(unary(|v| Ok(Step::Done(v))));
        assert!(matches!(
            k.invoke(None),
            Err(EvalError::Arity {
                expected: 1,
                got: 0
            })
        ));
    }

    #[test]
    fn test_with_arg_replaces_carried() {
        let node = Lambdak::with_value(unary(|v| Ok(Step::Done(v))), 1).with_arg(2);
        assert_eq!(node.carried(), Some(&Value::Long(2)));
        assert_eq!(node.next().map(Continuation::arity), Some(1));
    }
}
