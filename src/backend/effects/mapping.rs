use crate::backend::error::EvalError;
use crate::backend::eval::{do_, Lambdak, Thunk};
use crate::backend::models::{Object, Value};

/// `d[key] = value`, then continue with `k`
pub fn assign_(key: &str, value: impl Into<Value>, d: &Object, k: Option<Thunk>) -> Lambdak {
    let (key, value, d) = (key.to_string(), value.into(), d.clone());
    do_(
        move || {
            d.set(key.clone(), value.clone());
            Ok(())
        },
        k,
    )
}

/// `d[key]`, read now
pub fn get_(key: &str, d: &Object) -> Result<Value, EvalError> {
    d.get(key).ok_or_else(|| EvalError::KeyNotFound(key.to_string()))
}

/// `del d[key]`, then continue with `k`
pub fn del_(key: &str, d: &Object, k: Option<Thunk>) -> Lambdak {
    let (key, d) = (key.to_string(), d.clone());
    do_(
        move || {
            d.remove(&key)
                .map(|_| ())
                .ok_or_else(|| EvalError::KeyNotFound(key.clone()))
        },
        k,
    )
}

/// `d[key] = f(d[key])`, then continue with `k`
pub fn mod_<F>(key: &str, f: F, d: &Object, k: Option<Thunk>) -> Lambdak
where
    F: Fn(Value) -> Result<Value, EvalError> + 'static,
{
    let (key, d) = (key.to_string(), d.clone());
    do_(
        move || {
            let current = get_(&key, &d)?;
            d.set(key.clone(), f(current)?);
            Ok(())
        },
        k,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::effects::inc;

    fn table() -> Object {
        Object::from_pairs([("x", 1)])
    }

    #[test]
    fn test_assign_() {
        let d = table();
        assign_("x", 2, &d, None).run().unwrap();
        assert_eq!(get_("x", &d), Ok(Value::Long(2)));
    }

    #[test]
    fn test_get_missing() {
        assert_eq!(
            get_("y", &table()),
            Err(EvalError::KeyNotFound("y".to_string()))
        );
    }

    #[test]
    fn test_del_() {
        let d = table();
        del_("x", &d, None).run().unwrap();
        assert!(!d.contains("x"));
    }

    #[test]
    fn test_mod_() {
        let d = table();
        mod_("x", inc, &d, None).run().unwrap();
        assert_eq!(get_("x", &d), Ok(Value::Long(2)));
    }

    #[test]
    fn test_mod_missing_key() {
        let err = mod_("nope", inc, &table(), None).run().unwrap_err();
        assert_eq!(err.kind(), "KeyError");
    }
}
