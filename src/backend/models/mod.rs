pub mod value;

pub use value::{Object, Value};
