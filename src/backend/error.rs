//! Errors raised while running a trampoline chain.
//!
//! Construction of nodes never fails; every variant here is produced while
//! a step runs and propagates unchanged to the outermost `run` unless a
//! `try_` handler intercepts it.

use std::fmt;

use super::eval::LoopSignal;

/// Error type for step execution
#[derive(Debug, Clone, PartialEq)]
pub enum EvalError {
    /// User-raised error (`raise_`), identified by kind and message
    Raised { kind: String, message: String },

    /// `assert_` failed
    Assertion(String),

    /// A continuation was invoked with the wrong number of arguments
    Arity { expected: usize, got: usize },

    /// Attribute lookup on an object failed
    AttributeNotFound(String),

    /// Key lookup in a mapping failed
    KeyNotFound(String),

    /// `import_` could not resolve a module name
    ModuleNotFound(String),

    /// A value had the wrong type for the operation
    Type(String),

    /// Writing output failed
    Io(String),

    /// A loop-control signal escaped every enclosing loop
    StraySignal(LoopSignal),

    /// The configured step limit was reached
    StepLimitExceeded(u64),

    /// A self-referential continuation could not reach itself. `recur_`
    /// only invokes its closure through a live strong handle, so this marks
    /// a broken invariant rather than a user error.
    Detached,
}

impl EvalError {
    /// Shorthand for a user-raised error
    pub fn raised(kind: impl Into<String>, message: impl Into<String>) -> Self {
        EvalError::Raised {
            kind: kind.into(),
            message: message.into(),
        }
    }

    /// Short kind name, used by handlers that dispatch on error kind
    pub fn kind(&self) -> &str {
        match self {
            EvalError::Raised { kind, .. } => kind,
            EvalError::Assertion(_) => "AssertionError",
            EvalError::Arity { .. } => "ArityError",
            EvalError::AttributeNotFound(_) => "AttributeError",
            EvalError::KeyNotFound(_) => "KeyError",
            EvalError::ModuleNotFound(_) => "ImportError",
            EvalError::Type(_) => "TypeError",
            EvalError::Io(_) => "IOError",
            EvalError::StraySignal(_) => "SignalError",
            EvalError::StepLimitExceeded(_) => "StepLimitError",
            EvalError::Detached => "InternalError",
        }
    }
}

impl fmt::Display for EvalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EvalError::Raised { kind, message } if message.is_empty() => write!(f, "{}", kind),
            EvalError::Raised { kind, message } => write!(f, "{}: {}", kind, message),
            EvalError::Assertion(msg) => write!(f, "Assertion failed: {}", msg),
            EvalError::Arity { expected, got } => write!(
                f,
                "Continuation takes {} argument(s) but was given {}",
                expected, got
            ),
            EvalError::AttributeNotFound(name) => write!(f, "No attribute '{}'", name),
            EvalError::KeyNotFound(key) => write!(f, "No key '{}'", key),
            EvalError::ModuleNotFound(name) => write!(f, "No module named '{}'", name),
            EvalError::Type(msg) => write!(f, "Type error: {}", msg),
            EvalError::Io(msg) => write!(f, "I/O error: {}", msg),
            EvalError::StraySignal(signal) => {
                write!(f, "'{}' signal outside of any loop", signal)
            }
            EvalError::StepLimitExceeded(limit) => {
                write!(f, "Step limit ({}) exceeded", limit)
            }
            EvalError::Detached => write!(f, "Recursive continuation used after it was dropped"),
        }
    }
}

impl std::error::Error for EvalError {}

impl From<std::io::Error> for EvalError {
    fn from(err: std::io::Error) -> Self {
        EvalError::Io(err.to_string())
    }
}
