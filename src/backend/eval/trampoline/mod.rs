//! Trampoline-based Iterative Evaluation
//!
//! The deferred-computation node, its configuration, and the engine that
//! runs chains of nodes in a loop instead of on the native call stack.

mod config;
mod engine;
mod types;

pub use config::{ConfigError, TrampolineConfig, PROGRESS_INTERVAL_ENV, STEP_LIMIT_ENV};
pub use engine::eval_trampoline;
pub(crate) use engine::{eval_bounded, settle};
pub use types::{pred, thunk, unary, Continuation, Lambdak, Test, Thunk, Unary};
