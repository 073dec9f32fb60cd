//! Value binding and self-referential binding.
//!
//! `recur_` is the fixed point that lets a step name "the same logical call"
//! again. The step returns a fresh node for the next call instead of calling
//! itself, so a recursion of any depth runs through the trampoline loop with
//! constant native stack.

use std::cell::OnceCell;
use std::rc::{Rc, Weak};

use crate::backend::error::EvalError;
use crate::backend::models::Value;

use super::step::StepResult;
use super::trampoline::{Continuation, Lambdak, Unary};

/// Node whose one-argument step receives the value supplied at call time:
/// `given_(k).call(v)`.
pub fn given_(k: Unary) -> Lambdak {
    Lambdak::new(Some(Continuation::Unary(k)), None)
}

/// Bind `value` as the argument of `k`
pub fn let_(value: impl Into<Value>, k: Unary) -> Lambdak {
    Lambdak::with_value(k, value)
}

/// Build a one-argument continuation that receives a handle to itself.
///
/// The slot is allocated first, the closure capturing the slot second, and
/// the slot is filled exactly once with a weak handle to that closure. The
/// weak handle keeps the closure from owning itself; any node that refers to
/// the continuation holds a strong handle for as long as it needs it.
///
/// ```
/// use lambdak::{given_, recur_, Lambdak, Step, Value};
///
/// let sum_to = recur_(|me, args| {
///     let (n, acc) = match args.as_list() {
///         Some([Value::Long(n), Value::Long(acc)]) => (*n, *acc),
///         _ => return Err(lambdak::EvalError::Type("expected [n, acc]".into())),
///     };
///     if n == 0 {
///         Ok(Step::done(acc))
///     } else {
///         Ok(Lambdak::with_value(me.clone(), vec![Value::Long(n - 1), Value::Long(acc + n)]).into())
///     }
/// });
///
/// let total = given_(sum_to).call(vec![Value::Long(100_000), Value::Long(0)]).unwrap();
/// assert_eq!(total, Value::Long(5_000_050_000));
/// ```
pub fn recur_<F>(f: F) -> Unary
where
    F: Fn(&Unary, Value) -> StepResult + 'static,
{
    let slot: Rc<OnceCell<Weak<dyn Fn(Value) -> StepResult>>> = Rc::new(OnceCell::new());
    let own_slot = Rc::clone(&slot);

    // The slot holds a weak handle so the closure does not own itself; a
    // strong one would form an Rc cycle and leak. Every caller reaches the
    // closure through a strong handle that outlives the call, so the
    // upgrade succeeds whenever the closure runs.
    let this: Unary = Rc::new(move |args: Value| {
        let me: Unary = own_slot
            .get()
            .and_then(Weak::upgrade)
            .ok_or(EvalError::Detached)?;
        f(&me, args)
    });

    // Filled once here and never again
    let _ = slot.set(Rc::downgrade(&this));
    this
}
