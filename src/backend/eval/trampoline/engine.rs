//! Trampoline Engine - Iterative Evaluation
//!
//! Runs a chain of deferred nodes in a flat loop. Every step hands back the
//! next node as data instead of calling it, so the loop carries the chain and
//! native stack depth stays constant no matter how many steps run.
//!
//! Combinators re-enter the engine through [`eval_bounded`] only for nested,
//! bounded work (one loop iteration, one handler, one resource body), so
//! stack depth tracks static nesting rather than iteration count.

use tracing::{debug, trace, warn};

use crate::backend::error::EvalError;
use crate::backend::models::Value;

use super::super::step::{Outcome, Step};
use super::config::TrampolineConfig;
use super::types::Lambdak;

/// Run `node` to completion.
///
/// A loop-control signal that reaches the engine ends the chain like a
/// terminal value would; the caller decides what it means.
pub fn eval_trampoline(node: Lambdak, config: &TrampolineConfig) -> Result<Outcome, EvalError> {
    let (mut next, mut carried) = node.into_parts();
    let mut steps: u64 = 0;

    while let Some(k) = next {
        if let Some(limit) = config.step_limit {
            if steps >= limit {
                warn!(
                    target: "lambdak::backend::eval::trampoline",
                    limit, "Step limit exceeded - possible runaway recursion"
                );
                return Err(EvalError::StepLimitExceeded(limit));
            }
        }
        steps += 1;

        trace!(
            target: "lambdak::backend::eval::trampoline",
            steps,
            arity = k.arity(),
            carried = ?carried,
            "invoke step"
        );
        if let Some(interval) = config.progress_interval {
            if interval > 0 && steps % interval == 0 {
                debug!(target: "lambdak::backend::eval::trampoline", steps, "trampoline progress");
            }
        }

        match k.invoke(carried.take())? {
            Step::Defer(node) => {
                let (following, value) = node.into_parts();
                next = following;
                carried = value;
            }
            Step::Done(value) => {
                trace!(target: "lambdak::backend::eval::trampoline", steps, ?value, "chain done");
                return Ok(Outcome::Value(value));
            }
            Step::Signal(signal) => {
                trace!(target: "lambdak::backend::eval::trampoline", steps, %signal, "chain signalled");
                return Ok(Outcome::Signal(signal));
            }
        }
    }

    // Ran out of continuations: the last carried value is the result
    Ok(Outcome::Value(carried.unwrap_or(Value::Nil)))
}

/// Nested evaluation used inside combinators. Runs unlimited.
pub(crate) fn eval_bounded(node: Lambdak) -> Result<Outcome, EvalError> {
    eval_trampoline(node, &TrampolineConfig::unlimited())
}

/// Finish a step that a combinator obtained by calling a capability directly
pub(crate) fn settle(step: Step) -> Result<Outcome, EvalError> {
    match step {
        Step::Defer(node) => eval_bounded(node),
        Step::Done(value) => Ok(Outcome::Value(value)),
        Step::Signal(signal) => Ok(Outcome::Signal(signal)),
    }
}

impl Lambdak {
    /// Run this node under the default (unlimited) configuration.
    ///
    /// A `break_`/`continue_` that escapes every loop is reported as
    /// [`EvalError::StraySignal`].
    pub fn run(self) -> Result<Value, EvalError> {
        self.run_with(&TrampolineConfig::unlimited())
    }

    pub fn run_with(self, config: &TrampolineConfig) -> Result<Value, EvalError> {
        match eval_trampoline(self, config)? {
            Outcome::Value(value) => Ok(value),
            Outcome::Signal(signal) => {
                warn!(target: "lambdak::backend::eval::trampoline", %signal, "loop signal escaped all loops");
                Err(EvalError::StraySignal(signal))
            }
        }
    }

    /// Run with `arg` supplied to the first step in place of the carried value
    pub fn call(self, arg: impl Into<Value>) -> Result<Value, EvalError> {
        self.with_arg(arg).run()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::backend::eval::step::LoopSignal;
    use crate::backend::eval::trampoline::types::unary;

    #[test]
    fn test_empty_node_is_nil() {
        assert_eq!(Lambdak::empty().run().unwrap(), Value::Nil);
    }

    #[test]
    fn test_value_node_returns_carried() {
        assert_eq!(Lambdak::value(7).run().unwrap(), Value::Long(7));
    }

    #[test]
    fn test_deferred_chain_runs_in_order() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let second_log = Rc::clone(&log);
        let second = unary(move |v| {
            second_log.borrow_mut().push(format!("second {}", v));
            Ok(Step::done("finished"))
        });
        let first_log = Rc::clone(&log);
        let first = Lambdak::nullary(move || {
            first_log.borrow_mut().push("first".to_string());
            Ok(Lambdak::with_value(second.clone(), 2).into())
        });

        assert_eq!(first.run().unwrap(), Value::from("finished"));
        assert_eq!(*log.borrow(), vec!["first".to_string(), "second 2".to_string()]);
    }

    #[test]
    fn test_deferred_node_without_continuation_ends_chain() {
        let node = Lambdak::nullary(|| Ok(Lambdak::value("carried").into()));
        assert_eq!(node.run().unwrap(), Value::from("carried"));
    }

    #[test]
    fn test_error_propagates_unmodified() {
        let err = EvalError::raised("ValueError", "bad");
        let raised = err.clone();
        let node = Lambdak::nullary(move || Err(raised.clone()));
        assert_eq!(node.run().unwrap_err(), err);
    }

    #[test]
    fn test_engine_returns_signal_as_outcome() {
        let node = Lambdak::nullary(|| Ok(LoopSignal::Continue.into()));
        assert_eq!(
            eval_bounded(node).unwrap(),
            Outcome::Signal(LoopSignal::Continue)
        );
    }

    #[test]
    fn test_run_reports_stray_signal() {
        let node = Lambdak::nullary(|| Ok(LoopSignal::Break.into()));
        assert_eq!(
            node.run().unwrap_err(),
            EvalError::StraySignal(LoopSignal::Break)
        );
    }

    #[test]
    fn test_call_overrides_carried_value() {
        let node = Lambdak::with_value(unary(|v| Ok(Step::Done(v))), 1);
        assert_eq!(node.call(5).unwrap(), Value::Long(5));
    }

    #[test]
    fn test_step_limit() {
        fn spin() -> Lambdak {
            Lambdak::nullary(|| Ok(spin().into()))
        }
        let config = TrampolineConfig::unlimited().with_step_limit(100);
        assert_eq!(
            spin().run_with(&config).unwrap_err(),
            EvalError::StepLimitExceeded(100)
        );
    }

    #[test]
    fn test_long_chain_does_not_grow_stack() {
        fn countdown(n: i64) -> Lambdak {
            Lambdak::nullary(move || {
                if n == 0 {
                    Ok(Step::done("landed"))
                } else {
                    Ok(countdown(n - 1).into())
                }
            })
        }
        assert_eq!(countdown(200_000).run().unwrap(), Value::from("landed"));
    }
}
