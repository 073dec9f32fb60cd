// Backend of the lambdak evaluator
//
// - `models`: runtime values and shared attribute objects
// - `error`: evaluation failures
// - `eval`: deferred nodes, the trampoline and the control-flow combinators
// - `effects`: attribute, table, module and output side effects

pub mod effects;
pub mod error;
pub mod eval;
pub mod models;

pub use effects::*;
pub use error::EvalError;
pub use eval::*;
pub use models::*;
