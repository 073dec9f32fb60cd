use std::collections::HashMap;

use tracing::debug;

use crate::backend::error::EvalError;
use crate::backend::eval::{Lambdak, Unary};
use crate::backend::models::{Object, Value};

/// Name → module table consulted by `import_`.
///
/// Passed explicitly; there is no process-wide module table.
#[derive(Debug, Clone, Default)]
pub struct ModuleRegistry {
    modules: HashMap<String, Value>,
}

impl ModuleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry preloaded with the built-in modules (`math`)
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register(
            "math",
            Object::from_pairs([
                ("pi", std::f64::consts::PI),
                ("e", std::f64::consts::E),
                ("tau", std::f64::consts::TAU),
            ]),
        );
        registry
    }

    pub fn register(&mut self, name: impl Into<String>, module: impl Into<Value>) {
        self.modules.insert(name.into(), module.into());
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.modules.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.modules.contains_key(name)
    }
}

/// Resolve module `name` when the node runs and pass it to `k`.
///
/// The node keeps a snapshot of `registry` taken at construction; modules
/// registered afterwards are not visible to it.
pub fn import_(registry: &ModuleRegistry, name: &str, k: Unary) -> Lambdak {
    let (registry, name) = (registry.clone(), name.to_string());
    Lambdak::nullary(move || {
        let module = registry
            .get(&name)
            .cloned()
            .ok_or_else(|| EvalError::ModuleNotFound(name.clone()))?;
        debug!(target: "lambdak::backend::effects::import", module = %name, "module imported");
        k(module)
    })
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use super::*;
    use crate::backend::eval::Step;

    #[test]
    fn test_import_math() {
        let registry = ModuleRegistry::with_builtins();
        let pi_floor = import_(
            &registry,
            "math",
            Rc::new(|m: Value| {
                let pi = m
                    .as_object()
                    .and_then(|obj| obj.get("pi"))
                    .and_then(|pi| pi.as_float())
                    .ok_or_else(|| EvalError::AttributeNotFound("pi".to_string()))?;
                Ok(Step::done(pi.floor() as i64))
            }),
        );
        assert_eq!(pi_floor.run().unwrap(), Value::Long(3));
    }

    #[test]
    fn test_import_missing() {
        let node = import_(&ModuleRegistry::new(), "nope", Rc::new(|m: Value| Ok(Step::Done(m))));
        assert_eq!(
            node.run().unwrap_err(),
            EvalError::ModuleNotFound("nope".to_string())
        );
    }
}
