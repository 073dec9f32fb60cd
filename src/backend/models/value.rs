use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

type Slots = BTreeMap<String, Value>;

thread_local! {
    /// Objects whose slots are being formatted on this thread
    static FORMATTING: RefCell<Vec<*const RefCell<Slots>>> = RefCell::new(Vec::new());
}

/// Pops the entry pushed by `Object::fmt_slots`, even if formatting panics
struct FormattingGuard;

impl Drop for FormattingGuard {
    fn drop(&mut self) {
        FORMATTING.with(|active| {
            active.borrow_mut().pop();
        });
    }
}

/// A value carried between trampoline steps
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// The "no value" marker
    Nil,
    /// A boolean
    Bool(bool),
    /// An integer
    Long(i64),
    /// A floating point number
    Float(f64),
    /// A string
    String(String),
    /// An ordered list of values (also used to pass several arguments)
    List(Vec<Value>),
    /// A shared attribute/key bag (attribute targets, mappings, modules)
    Object(Object),
}

impl Value {
    pub fn is_nil(&self) -> bool {
        matches!(self, Value::Nil)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_long(&self) -> Option<i64> {
        match self {
            Value::Long(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(x) => Some(*x),
            Value::Long(n) => Some(*n as f64),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&Object> {
        match self {
            Value::Object(obj) => Some(obj),
            _ => None,
        }
    }

    /// Friendly type name for error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Nil => "Nil",
            Value::Bool(_) => "Bool",
            Value::Long(_) => "Number (integer)",
            Value::Float(_) => "Number (float)",
            Value::String(_) => "String",
            Value::List(_) => "List",
            Value::Object(_) => "Object",
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Nil => write!(f, "Nil"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Long(n) => write!(f, "{}", n),
            Value::Float(x) => write!(f, "{}", x),
            Value::String(s) => write!(f, "{}", s),
            Value::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, "]")
            }
            Value::Object(obj) => obj.fmt_slots(f, |attrs, f| {
                write!(f, "{{")?;
                for (i, (name, value)) in attrs.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}: {}", name, value)?;
                }
                write!(f, "}}")
            }),
        }
    }
}

impl From<()> for Value {
    fn from(_: ()) -> Self {
        Value::Nil
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Long(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Long(n as i64)
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Value::Float(x)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::List(items)
    }
}

impl From<Object> for Value {
    fn from(obj: Object) -> Self {
        Value::Object(obj)
    }
}

/// Named slots behind a shared handle.
///
/// Cloning an `Object` clones the handle, not the slots, so every clone
/// observes mutations made through any other. Equality is identity.
///
/// An object may hold itself, directly or through other objects. Formatting
/// prints a slot that leads back to an object already being printed as
/// `{..}`. Such a cycle is never freed; remove the slot to release it.
#[derive(Clone, Default)]
pub struct Object {
    attrs: Rc<RefCell<Slots>>,
}

impl Object {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an object from `(name, value)` pairs
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        let obj = Object::new();
        for (name, value) in pairs {
            obj.set(name, value);
        }
        obj
    }

    pub fn get(&self, name: &str) -> Option<Value> {
        self.attrs.borrow().get(name).cloned()
    }

    /// Set a slot, returning the previous value if there was one
    pub fn set(&self, name: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.attrs.borrow_mut().insert(name.into(), value.into())
    }

    pub fn remove(&self, name: &str) -> Option<Value> {
        self.attrs.borrow_mut().remove(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.attrs.borrow().contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.attrs.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.attrs.borrow().is_empty()
    }

    /// Slot names in sorted order
    pub fn names(&self) -> Vec<String> {
        self.attrs.borrow().keys().cloned().collect()
    }

    /// Format the slots with `body`, or write `{..}` when this object is
    /// already being formatted further up the stack
    fn fmt_slots<F>(&self, f: &mut fmt::Formatter<'_>, body: F) -> fmt::Result
    where
        F: FnOnce(&Slots, &mut fmt::Formatter<'_>) -> fmt::Result,
    {
        let ptr = Rc::as_ptr(&self.attrs);
        let entered = FORMATTING.with(|active| {
            let mut active = active.borrow_mut();
            if active.contains(&ptr) {
                false
            } else {
                active.push(ptr);
                true
            }
        });
        if !entered {
            return write!(f, "{{..}}");
        }
        let _guard = FormattingGuard;
        body(&self.attrs.borrow(), f)
    }
}

impl PartialEq for Object {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.attrs, &other.attrs)
    }
}

impl fmt::Debug for Object {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_slots(f, |attrs, f| f.debug_map().entries(attrs.iter()).finish())
    }
}
