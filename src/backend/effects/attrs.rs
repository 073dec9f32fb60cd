use crate::backend::error::EvalError;
use crate::backend::eval::{do_, Lambdak, Thunk};
use crate::backend::models::{Object, Value};

/// Set attribute `name` on `obj`, then continue with `k`
pub fn setattr_(obj: &Object, name: &str, value: impl Into<Value>, k: Option<Thunk>) -> Lambdak {
    let (obj, name, value) = (obj.clone(), name.to_string(), value.into());
    do_(
        move || {
            obj.set(name.clone(), value.clone());
            Ok(())
        },
        k,
    )
}

/// Read attribute `name` from `obj` now
pub fn getattr_(obj: &Object, name: &str) -> Result<Value, EvalError> {
    obj.get(name)
        .ok_or_else(|| EvalError::AttributeNotFound(name.to_string()))
}

/// Delete attribute `name` from `obj`, then continue with `k`
pub fn delattr_(obj: &Object, name: &str, k: Option<Thunk>) -> Lambdak {
    let (obj, name) = (obj.clone(), name.to_string());
    do_(
        move || {
            obj.remove(&name)
                .map(|_| ())
                .ok_or_else(|| EvalError::AttributeNotFound(name.clone()))
        },
        k,
    )
}

/// Replace attribute `name` with `f(current)`, then continue with `k`
pub fn modattr_<F>(obj: &Object, name: &str, f: F, k: Option<Thunk>) -> Lambdak
where
    F: Fn(Value) -> Result<Value, EvalError> + 'static,
{
    let (obj, name) = (obj.clone(), name.to_string());
    do_(
        move || {
            let current = getattr_(&obj, &name)?;
            obj.set(name.clone(), f(current)?);
            Ok(())
        },
        k,
    )
}
