/// lambdak - Trampolined Continuation Evaluator
///
/// This library expresses sequencing, bindings, recursion, conditionals, loops,
/// exception handling and scoped resources as chains of deferred nodes. A node
/// runs nothing when it is built; a driver loop (the trampoline) evaluates it
/// one step at a time, so arbitrarily long chains and deep recursion run in
/// constant native stack depth.
///
/// # Architecture
///
/// 1. **Models** (`backend::models`)
///    - `Value`: dynamic runtime value passed between continuations
///    - `Object`: shared attribute object used by the effect helpers
///
/// 2. **Evaluation** (`backend::eval`)
///    - `Lambdak`: a deferred node holding a continuation and an optional carried value
///    - `Step`: what a continuation yields: keep going, finish, or a loop signal
///    - `eval_trampoline`: the driver loop, with an optional step limit
///    - Combinators: `do_`, `given_`, `let_`, `recur_`, `if_`, `cond_`, `for_`,
///      `while_`, `try_`, `raise_`, `assert_`, `with_`
///
/// 3. **Effects** (`backend::effects`)
///    - Attribute and keyed-table mutation, module import, printing
///
/// # Example
///
/// ```rust
/// use lambdak::backend::*;
///
/// // n! with an accumulator: each step defers the next call instead of
/// // making it, so depth costs no native stack
/// let fact = recur_(|fact, args| {
///     let (n, acc) = match args.as_list() {
///         Some([Value::Long(n), Value::Long(acc)]) => (*n, *acc),
///         _ => return Err(EvalError::Type("expected [n, acc]".into())),
///     };
///     if n <= 1 {
///         return Ok(Step::done(acc));
///     }
///     let next = vec![Value::Long(n - 1), Value::Long(n * acc)];
///     Ok(Step::Defer(Lambdak::with_value(fact.clone(), next)))
/// });
///
/// let args = vec![Value::Long(10), Value::Long(1)];
/// assert_eq!(given_(fact).call(args).unwrap(), Value::Long(3_628_800));
/// ```
///
/// # Evaluation Strategy
///
/// - **Deferred Construction**: building a node never runs user code
/// - **Constant Stack**: every `Defer` returns to the driver loop before the next step
/// - **Error Propagation**: the first uncaught error ends the run
/// - **Loop Signals**: `break_`/`continue_` are values caught by the nearest loop

pub mod backend;

pub use backend::{
    effects::{
        assign_, del_, delattr_, get_, getattr_, import_, mod_, modattr_, print_, print_to,
        setattr_, stdout_sink, ModuleRegistry, Sink,
    },
    error::EvalError,
    eval::{
        acquire, assert_, break_, call_, call_with_, chain_, cond_, const_, continue_, do_,
        eval_trampoline, for_, for_else_, given_, if_, let_, pred, raise_, recur_, reraise_,
        rescue, return_, scoped, thunk, truthy, try_, unary, while_, while_else_, with_, Acquire,
        ConfigError, ContextManager, Continuation, Lambdak, LoopSignal, Outcome, Rescue, Scoped,
        Step, StepResult, Test, Thunk, TrampolineConfig, Unary, PROGRESS_INTERVAL_ENV,
        STEP_LIMIT_ENV,
    },
    models::{Object, Value},
};

#[cfg(test)]
mod tests {
    use super::*;
    use std::rc::Rc;

    #[test]
    fn test_do_then_value() {
        let node = do_(|| Ok(()), Some(chain_(Lambdak::value(7))));
        assert_eq!(node.run().unwrap(), Value::Long(7));
    }

    #[test]
    fn test_deep_recursion_constant_stack() {
        // count down through 100_000 deferred steps
        let countdown = recur_(|again, n| {
            let n = n.as_long().unwrap_or(0);
            if n == 0 {
                Ok(Step::done("done"))
            } else {
                Ok(Step::Defer(Lambdak::with_value(again.clone(), n - 1)))
            }
        });
        assert_eq!(
            given_(countdown).call(100_000).unwrap(),
            Value::String("done".to_string())
        );
    }

    #[test]
    fn test_error_propagation() {
        let node = do_(
            || Err(EvalError::raised("ValueError", "bad")),
            Some(thunk(|| panic!("continuation must not run"))),
        );
        assert_eq!(node.run().unwrap_err().kind(), "ValueError");
    }

    #[test]
    fn test_if_control_flow() {
        let node = if_(
            5 < 10,
            thunk(|| Ok(Step::done("yes"))),
            thunk(|| Ok(Step::done("no"))),
            None,
        );
        assert_eq!(node.run().unwrap(), Value::from("yes"));
    }

    #[test]
    fn test_import_through_root_exports() {
        let registry = ModuleRegistry::with_builtins();
        let node = import_(&registry, "math", Rc::new(|m: Value| Ok(Step::Done(m))));
        assert!(node.run().unwrap().as_object().is_some());
    }
}
