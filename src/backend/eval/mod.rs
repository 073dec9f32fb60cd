// Trampolined evaluation of deferred nodes
//
// run(node):
//   k, x = node.next, node.carried
//   while k: r = k(x?)
//     r = Defer(n)  -> k, x = n.next, n.carried
//     r = Done(v)   -> return v
//     r = Signal(s) -> return s   (loops catch it; `run` reports it)
//   return x or Nil
//
// Every combinator below returns a node and runs nothing until the node runs.

mod bindings;
mod control_flow;
mod errors;
mod loops;
mod scoped;
mod sequence;
mod step;
mod trampoline;

pub use bindings::{given_, let_, recur_};
pub use control_flow::{cond_, if_, truthy};
pub use errors::{assert_, raise_, reraise_, rescue, try_, Rescue};
pub use loops::{break_, continue_, for_, for_else_, while_, while_else_};
pub use scoped::{acquire, scoped, with_, Acquire, ContextManager, Scoped};
pub use sequence::{call_, call_with_, chain_, const_, do_, return_};
pub use step::{LoopSignal, Outcome, Step, StepResult};
pub use trampoline::{
    eval_trampoline, pred, thunk, unary, ConfigError, Continuation, Lambdak, Test, Thunk,
    TrampolineConfig, Unary, PROGRESS_INTERVAL_ENV, STEP_LIMIT_ENV,
};
