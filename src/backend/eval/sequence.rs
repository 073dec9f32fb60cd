use std::rc::Rc;

use crate::backend::error::EvalError;
use crate::backend::models::Value;

use super::step::{Step, StepResult};
use super::trampoline::{Lambdak, Thunk, Unary};

/// Invoke an optional zero-argument continuation; no continuation means the
/// chain ends with `Nil`.
pub fn call_(k: Option<&Thunk>) -> StepResult {
    match k {
        Some(k) => k(),
        None => Ok(Step::nil()),
    }
}

/// Invoke an optional one-argument continuation; no continuation means the
/// chain ends with `value`.
pub fn call_with_(k: Option<&Unary>, value: Value) -> StepResult {
    match k {
        Some(k) => k(value),
        None => Ok(Step::Done(value)),
    }
}

/// Identity continuation: ends the chain with whatever it is given
pub fn return_() -> Unary {
    Rc::new(|value| Ok(Step::Done(value)))
}

/// Zero-argument continuation that resumes with `node`
pub fn chain_(node: Lambdak) -> Thunk {
    Rc::new(move || Ok(Step::Defer(node.clone())))
}

/// One-argument continuation that ignores its argument and resumes with `node`
pub fn const_(node: Lambdak) -> Unary {
    Rc::new(move |_| Ok(Step::Defer(node.clone())))
}

/// Run `effect` once when the node runs, then continue with `k`
pub fn do_<E>(effect: E, k: Option<Thunk>) -> Lambdak
where
    E: Fn() -> Result<(), EvalError> + 'static,
{
    Lambdak::nullary(move || {
        effect()?;
        call_(k.as_ref())
    })
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;
    use crate::backend::models::Object;

    #[test]
    fn test_call_none() {
        assert!(matches!(call_(None), Ok(Step::Done(Value::Nil))));
    }

    #[test]
    fn test_call_with_none_returns_value() {
        assert!(matches!(
            call_with_(None, Value::Long(3)),
            Ok(Step::Done(Value::Long(3)))
        ));
    }

    #[test]
    fn test_do_not_run_until_invoked() {
        let a = Object::from_pairs([("x", 2)]);
        let target = a.clone();
        let _node = do_(
            move || {
                target.set("x", 1);
                Ok(())
            },
            None,
        );
        assert_eq!(a.get("x"), Some(Value::Long(2)));
    }

    #[test]
    fn test_do_sequence_order() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let (log_a, log_b) = (Rc::clone(&log), Rc::clone(&log));
        let second = do_(
            move || {
                log_b.borrow_mut().push("b");
                Ok(())
            },
            None,
        );
        let first = do_(
            move || {
                log_a.borrow_mut().push("a");
                Ok(())
            },
            Some(chain_(second)),
        );
        assert!(log.borrow().is_empty());

        assert_eq!(first.run().unwrap(), Value::Nil);
        assert_eq!(*log.borrow(), vec!["a", "b"]);
    }

    #[test]
    fn test_do_error_skips_continuation() {
        let ran = Rc::new(RefCell::new(false));
        let flag = Rc::clone(&ran);
        let node = do_(
            || Err(EvalError::raised("Boom", "")),
            Some(Rc::new(move || {
                *flag.borrow_mut() = true;
                Ok(Step::nil())
            })),
        );
        assert!(node.run().is_err());
        assert!(!*ran.borrow());
    }

    #[test]
    fn test_const_ignores_argument() {
        let k = const_(Lambdak::value("fixed"));
        assert_eq!(Lambdak::with_value(k, 99).run().unwrap(), Value::from("fixed"));
    }
}
