use std::cell::RefCell;
use std::io::Write;
use std::rc::Rc;

use crate::backend::eval::{do_, Lambdak, Thunk};
use crate::backend::models::Value;

/// Shared output destination
pub type Sink = Rc<RefCell<dyn Write>>;

pub fn stdout_sink() -> Sink {
    Rc::new(RefCell::new(std::io::stdout()))
}

/// Print `value` on its own line to stdout, then continue with `k`
pub fn print_(value: impl Into<Value>, k: Option<Thunk>) -> Lambdak {
    print_to(stdout_sink(), value, k)
}

/// Print `value` on its own line to `sink`, then continue with `k`
pub fn print_to(sink: Sink, value: impl Into<Value>, k: Option<Thunk>) -> Lambdak {
    let value = value.into();
    do_(
        move || {
            writeln!(sink.borrow_mut(), "{}", value)?;
            Ok(())
        },
        k,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::eval::chain_;

    #[test]
    fn test_print_to_captures_lines() {
        let buffer = Rc::new(RefCell::new(Vec::<u8>::new()));
        let sink: Sink = buffer.clone();
        let node = print_to(
            sink.clone(),
            "hello",
            Some(chain_(print_to(sink, 42, None))),
        );
        assert!(buffer.borrow().is_empty());

        node.run().unwrap();
        assert_eq!(String::from_utf8_lossy(&buffer.borrow()), "hello\n42\n");
    }
}
