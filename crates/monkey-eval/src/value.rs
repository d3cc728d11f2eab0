//! Runtime values.

use crate::builtins::Builtin;
use crate::env::Environment;
use monkey_types::ast::{BlockStatement, Expression, FunctionLiteral, Identifier};
use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

/// A runtime value.
///
/// Strings, arrays, hashes, functions and quotes are reference values:
/// cloning a `Value` shares the payload, and the language's `==` compares
/// them by identity (see [`Value::is_identical`]). Rust-level `PartialEq`
/// compares contents and exists for hosts and tests.
#[derive(Debug, Clone)]
pub enum Value {
    Integer(i64),
    Boolean(bool),
    String(Rc<str>),
    Array(Rc<[Value]>),
    Hash(Rc<BTreeMap<HashKey, Value>>),
    Null,
    /// Carries a `return` value out of nested blocks up to the enclosing
    /// call or program. Never escapes a completed evaluation.
    ReturnSignal(Box<Value>),
    Function(Rc<Function>),
    Builtin(Builtin),
    /// An unevaluated expression produced by `quote`.
    Quote(Rc<Expression>),
}

impl Value {
    pub fn string(s: impl Into<Rc<str>>) -> Self {
        Value::String(s.into())
    }

    pub fn array(elements: impl Into<Rc<[Value]>>) -> Self {
        Value::Array(elements.into())
    }

    /// The type name used in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Integer(_) => "INTEGER",
            Value::Boolean(_) => "BOOLEAN",
            Value::String(_) => "STRING",
            Value::Array(_) => "ARRAY",
            Value::Hash(_) => "HASH",
            Value::Null => "NULL",
            Value::ReturnSignal(_) => "RETURN_VALUE",
            Value::Function(_) => "FUNCTION",
            Value::Builtin(_) => "BUILTIN",
            Value::Quote(_) => "QUOTE",
        }
    }

    /// `false` and `null` are falsy; everything else is truthy.
    pub fn is_truthy(&self) -> bool {
        !matches!(self, Value::Boolean(false) | Value::Null)
    }

    /// Equality as seen by the language's `==`.
    ///
    /// Integers, booleans and null compare by value, builtins by name. All
    /// other values compare by identity, so two separately built strings
    /// with the same text are not identical.
    pub fn is_identical(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Integer(a), Value::Integer(b)) => a == b,
            (Value::Boolean(a), Value::Boolean(b)) => a == b,
            (Value::Null, Value::Null) => true,
            (Value::String(a), Value::String(b)) => Rc::ptr_eq(a, b),
            (Value::Array(a), Value::Array(b)) => Rc::ptr_eq(a, b),
            (Value::Hash(a), Value::Hash(b)) => Rc::ptr_eq(a, b),
            (Value::Function(a), Value::Function(b)) => Rc::ptr_eq(a, b),
            (Value::Quote(a), Value::Quote(b)) => Rc::ptr_eq(a, b),
            (Value::Builtin(a), Value::Builtin(b)) => a.name() == b.name(),
            (Value::ReturnSignal(a), Value::ReturnSignal(b)) => a.is_identical(b),
            _ => false,
        }
    }

    /// Strip a [`Value::ReturnSignal`] wrapper, if any.
    pub fn unwrap_return(self) -> Value {
        match self {
            Value::ReturnSignal(inner) => *inner,
            other => other,
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Integer(a), Value::Integer(b)) => a == b,
            (Value::Boolean(a), Value::Boolean(b)) => a == b,
            (Value::Null, Value::Null) => true,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Array(a), Value::Array(b)) => a == b,
            (Value::Hash(a), Value::Hash(b)) => a == b,
            (Value::Function(a), Value::Function(b)) => Rc::ptr_eq(a, b),
            (Value::Quote(a), Value::Quote(b)) => a == b,
            (Value::Builtin(a), Value::Builtin(b)) => a == b,
            (Value::ReturnSignal(a), Value::ReturnSignal(b)) => a == b,
            _ => false,
        }
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Integer(n)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::string(s)
    }
}

impl From<Vec<Value>> for Value {
    fn from(elements: Vec<Value>) -> Self {
        Value::array(elements)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Integer(n) => write!(f, "{n}"),
            Value::Boolean(b) => write!(f, "{b}"),
            Value::String(s) => f.write_str(s),
            Value::Array(elements) => {
                f.write_str("[")?;
                for (i, element) in elements.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{element}")?;
                }
                f.write_str("]")
            }
            Value::Hash(pairs) => {
                f.write_str("{")?;
                for (i, (key, value)) in pairs.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{key}: {value}")?;
                }
                f.write_str("}")
            }
            Value::Null => f.write_str("null"),
            Value::ReturnSignal(inner) => write!(f, "{inner}"),
            Value::Function(func) => write!(f, "{func}"),
            Value::Builtin(builtin) => write!(f, "builtin {}", builtin.name()),
            Value::Quote(node) => write!(f, "QUOTE({node})"),
        }
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// Functions
// ══════════════════════════════════════════════════════════════════════════════

/// A user-defined function together with the environment it was defined in.
///
/// The literal is shared with the syntax tree, so building a closure copies
/// no code.
pub struct Function {
    pub literal: Rc<FunctionLiteral>,
    pub env: Environment,
}

impl Function {
    pub fn parameters(&self) -> &[Identifier] {
        &self.literal.parameters
    }

    pub fn body(&self) -> &BlockStatement {
        &self.literal.body
    }
}

// The captured environment can hold this function, so it is left out.
impl fmt::Debug for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Function")
            .field("literal", &self.literal)
            .finish_non_exhaustive()
    }
}

impl fmt::Display for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.literal)
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// Hash Keys
// ══════════════════════════════════════════════════════════════════════════════

/// The subset of values usable as hash keys. Keys compare by value.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum HashKey {
    Integer(i64),
    Boolean(bool),
    String(Rc<str>),
}

impl HashKey {
    /// The key for `value`, or `None` if values of its type cannot be keys.
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Integer(n) => Some(HashKey::Integer(*n)),
            Value::Boolean(b) => Some(HashKey::Boolean(*b)),
            Value::String(s) => Some(HashKey::String(Rc::clone(s))),
            _ => None,
        }
    }
}

impl fmt::Display for HashKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HashKey::Integer(n) => write!(f, "{n}"),
            HashKey::Boolean(b) => write!(f, "{b}"),
            HashKey::String(s) => f.write_str(s),
        }
    }
}
