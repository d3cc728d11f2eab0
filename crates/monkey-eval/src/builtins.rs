//! Native functions reachable by name when no binding shadows them.
//!
//! | Name | Arguments | Result |
//! |---|---|---|
//! | `len` | string or array | character or element count |
//! | `first` | array | first element, `null` if empty |
//! | `last` | array | last element, `null` if empty |
//! | `rest` | array | new array without the first element, `null` if empty |
//! | `push` | array, value | new array with `value` appended |
//!
//! Arrays are never mutated in place.

use crate::error::{EvalError, EvalResult};
use crate::value::Value;
use std::fmt;

type BuiltinFn = fn(&[Value]) -> EvalResult<Value>;

/// A native function. Compares by name.
#[derive(Clone, Copy)]
pub struct Builtin {
    name: &'static str,
    func: BuiltinFn,
}

/// Every builtin, in lookup order.
pub static BUILTINS: &[Builtin] = &[
    Builtin { name: "len", func: len },
    Builtin { name: "first", func: first },
    Builtin { name: "last", func: last },
    Builtin { name: "rest", func: rest },
    Builtin { name: "push", func: push },
];

impl Builtin {
    /// Find a builtin by name.
    pub fn lookup(name: &str) -> Option<Builtin> {
        BUILTINS.iter().find(|builtin| builtin.name == name).copied()
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn call(&self, args: &[Value]) -> EvalResult<Value> {
        (self.func)(args)
    }
}

impl PartialEq for Builtin {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for Builtin {}

impl fmt::Debug for Builtin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Builtin({})", self.name)
    }
}

// ── Argument Helpers ──────────────────────────────────────────────────────────

fn single_arg<'a>(name: &'static str, args: &'a [Value]) -> EvalResult<&'a Value> {
    match args {
        [arg] => Ok(arg),
        _ => Err(EvalError::BuiltinArity {
            name,
            expected: "one arg",
            got: args.len(),
        }),
    }
}

fn single_array<'a>(name: &'static str, args: &'a [Value]) -> EvalResult<&'a [Value]> {
    match single_arg(name, args)? {
        Value::Array(elements) => Ok(&elements[..]),
        other => Err(EvalError::BuiltinArgument {
            name,
            got: other.type_name(),
        }),
    }
}

// ── Builtins ──────────────────────────────────────────────────────────────────

fn len(args: &[Value]) -> EvalResult<Value> {
    let count = match single_arg("len", args)? {
        Value::String(s) => s.chars().count(),
        Value::Array(elements) => elements.len(),
        other => {
            return Err(EvalError::BuiltinArgument {
                name: "len",
                got: other.type_name(),
            })
        }
    };
    Ok(Value::Integer(count as i64))
}

fn first(args: &[Value]) -> EvalResult<Value> {
    let elements = single_array("first", args)?;
    Ok(elements.first().cloned().unwrap_or(Value::Null))
}

fn last(args: &[Value]) -> EvalResult<Value> {
    let elements = single_array("last", args)?;
    Ok(elements.last().cloned().unwrap_or(Value::Null))
}

fn rest(args: &[Value]) -> EvalResult<Value> {
    match single_array("rest", args)? {
        [] => Ok(Value::Null),
        [_, tail @ ..] => Ok(Value::array(tail)),
    }
}

fn push(args: &[Value]) -> EvalResult<Value> {
    let [array, value] = args else {
        return Err(EvalError::BuiltinArity {
            name: "push",
            expected: "two args",
            got: args.len(),
        });
    };
    let Value::Array(elements) = array else {
        return Err(EvalError::BuiltinFirstArgument {
            name: "push",
            got: array.type_name(),
        });
    };
    let mut pushed = elements.to_vec();
    pushed.push(value.clone());
    Ok(Value::array(pushed))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ints(ns: &[i64]) -> Value {
        Value::array(ns.iter().copied().map(Value::Integer).collect::<Vec<_>>())
    }

    fn call(name: &str, args: &[Value]) -> EvalResult<Value> {
        Builtin::lookup(name)
            .unwrap_or_else(|| panic!("no builtin {name}"))
            .call(args)
    }

    #[test]
    fn test_lookup() {
        for name in ["len", "first", "last", "rest", "push"] {
            assert_eq!(Builtin::lookup(name).map(|b| b.name()), Some(name));
        }
        assert!(Builtin::lookup("puts").is_none());
    }

    #[test]
    fn test_len() {
        assert_eq!(call("len", &[Value::from("")]), Ok(Value::Integer(0)));
        assert_eq!(call("len", &[Value::from("four")]), Ok(Value::Integer(4)));
        assert_eq!(call("len", &[Value::from("héllo")]), Ok(Value::Integer(5)));
        assert_eq!(call("len", &[ints(&[1, 2, 3])]), Ok(Value::Integer(3)));
    }

    #[test]
    fn test_len_errors() {
        assert_eq!(
            call("len", &[Value::Integer(1)]).unwrap_err().to_string(),
            "argument to len() not supported, got INTEGER"
        );
        assert_eq!(
            call("len", &[Value::from("one"), Value::from("two")])
                .unwrap_err()
                .to_string(),
            "len() takes one arg, got 2"
        );
    }

    #[test]
    fn test_first_last_rest() {
        let xs = ints(&[1, 2, 3]);
        assert_eq!(call("first", &[xs.clone()]), Ok(Value::Integer(1)));
        assert_eq!(call("last", &[xs.clone()]), Ok(Value::Integer(3)));
        assert_eq!(call("rest", &[xs]), Ok(ints(&[2, 3])));
    }

    #[test]
    fn test_empty_array_yields_null() {
        for name in ["first", "last", "rest"] {
            assert_eq!(call(name, &[ints(&[])]), Ok(Value::Null), "{name}");
        }
    }

    #[test]
    fn test_array_builtins_reject_other_types() {
        for name in ["first", "last", "rest"] {
            assert_eq!(
                call(name, &[Value::Integer(1)]).unwrap_err().to_string(),
                format!("argument to {name}() not supported, got INTEGER")
            );
            assert_eq!(
                call(name, &[]).unwrap_err().to_string(),
                format!("{name}() takes one arg, got 0")
            );
        }
    }

    #[test]
    fn test_push_returns_new_array() {
        let xs = ints(&[1]);
        let pushed = call("push", &[xs.clone(), Value::Integer(2)]).unwrap();
        assert_eq!(pushed, ints(&[1, 2]));
        assert_eq!(xs, ints(&[1]));
    }

    #[test]
    fn test_push_errors() {
        assert_eq!(
            call("push", &[Value::Integer(1), Value::Integer(1)])
                .unwrap_err()
                .to_string(),
            "first argument to push() not supported, got INTEGER"
        );
        assert_eq!(
            call("push", &[ints(&[])]).unwrap_err().to_string(),
            "push() takes two args, got 1"
        );
    }
}
