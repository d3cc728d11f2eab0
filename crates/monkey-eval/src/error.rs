//! Runtime error types for the Monkey evaluator.

use thiserror::Error;

/// Evaluation failure. Aborts the whole evaluation it occurs in.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EvalError {
    /// An infix operator applied to operand types it does not accept.
    #[error("invalid operation: {left} {operator} {right}")]
    InvalidOperation {
        left: &'static str,
        operator: &'static str,
        right: &'static str,
    },

    /// A prefix operator applied to an operand type it does not accept.
    #[error("unknown operator: {operator}{operand}")]
    UnknownOperator {
        operator: &'static str,
        operand: &'static str,
    },

    /// Name bound neither in scope nor as a builtin.
    #[error("undefined name {0}")]
    UndefinedName(String),

    #[error("calling non-callable value: type {0}")]
    NotCallable(&'static str),

    #[error("wrong number of arguments: want={want}, got={got}")]
    WrongArgumentCount { want: usize, got: usize },

    #[error("index operator not supported: {left}[{index}]")]
    IndexNotSupported {
        left: &'static str,
        index: &'static str,
    },

    #[error("unusable as hash key: {0}")]
    UnusableHashKey(&'static str),

    #[error("division by zero: {0} / 0")]
    DivisionByZero(i64),

    #[error("integer overflow: {left} {operator} {right}")]
    IntegerOverflow {
        left: i64,
        operator: &'static str,
        right: i64,
    },

    /// A builtin was called with the wrong number of arguments.
    #[error("{name}() takes {expected}, got {got}")]
    BuiltinArity {
        name: &'static str,
        expected: &'static str,
        got: usize,
    },

    /// A builtin was handed an argument of a type it cannot work with.
    #[error("argument to {name}() not supported, got {got}")]
    BuiltinArgument {
        name: &'static str,
        got: &'static str,
    },

    /// Like [`EvalError::BuiltinArgument`], for the first of several arguments.
    #[error("first argument to {name}() not supported, got {got}")]
    BuiltinFirstArgument {
        name: &'static str,
        got: &'static str,
    },

    #[error("quote() takes one arg, got {0}")]
    QuoteArity(usize),

    /// `unquote` produced a value with no syntax form.
    #[error("unquote() cannot convert {0} to syntax")]
    Unquote(&'static str),

    #[error("maximum call depth of {0} exceeded")]
    CallDepthExceeded(usize),
}

/// Result alias for evaluator operations.
pub type EvalResult<T> = Result<T, EvalError>;
