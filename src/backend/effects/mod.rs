// Side effects that touch collaborators outside the evaluator:
// object attributes, keyed tables, the module registry and output sinks.
// Each mutating helper is a `do_` node and runs only when evaluated.

mod attrs;
mod mapping;
mod modules;
mod output;

pub use attrs::{delattr_, getattr_, modattr_, setattr_};
pub use mapping::{assign_, del_, get_, mod_};
pub use modules::{import_, ModuleRegistry};
pub use output::{print_, print_to, stdout_sink, Sink};

#[cfg(test)]
pub(crate) fn inc(
    value: crate::backend::models::Value,
) -> Result<crate::backend::models::Value, crate::backend::error::EvalError> {
    value
        .as_long()
        .map(|n| (n + 1).into())
        .ok_or_else(|| crate::backend::error::EvalError::Type(value.type_name().to_string()))
}
