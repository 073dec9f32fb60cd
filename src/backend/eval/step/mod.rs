//! Step-based Evaluation
//!
//! The types a single trampoline step produces.

mod types;

pub use types::{LoopSignal, Outcome, Step, StepResult};
