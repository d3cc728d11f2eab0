//! `quote` / `unquote`.
//!
//! `quote(expr)` evaluates to the syntax of `expr` instead of its value,
//! except that every `unquote(inner)` call inside it is replaced by the
//! syntax form of `inner`'s value. The replacement runs bottom-up over the
//! whole tree via [`monkey_types::modify`].

use crate::env::Environment;
use crate::error::{EvalError, EvalResult};
use crate::evaluator::Evaluator;
use crate::value::Value;
use monkey_types::ast::{Expression, InfixOperator, PrefixOperator};
use monkey_types::modify::modify_expression;
use monkey_types::Modifier;
use std::rc::Rc;
use tracing::debug;

/// Build the [`Value::Quote`] for `node`, splicing in unquoted values
/// evaluated against `env`.
pub(crate) fn quote(
    evaluator: &mut Evaluator,
    node: &Expression,
    env: &Environment,
) -> EvalResult<Value> {
    let mut unquoter = Unquoter { evaluator, env };
    let node = modify_expression(node.clone(), &mut unquoter)?;
    Ok(Value::Quote(Rc::new(node)))
}

struct Unquoter<'a> {
    evaluator: &'a mut Evaluator,
    env: &'a Environment,
}

impl Modifier for Unquoter<'_> {
    type Error = EvalError;

    fn expression(&mut self, expression: Expression) -> EvalResult<Expression> {
        match expression {
            Expression::Call {
                function,
                arguments,
            } if is_unquote_call(&function, &arguments) => {
                let value = self.evaluator.eval_expression(&arguments[0], self.env)?;
                let node = value_to_syntax(value)?;
                debug!(%node, "spliced unquote");
                Ok(node)
            }
            other => Ok(other),
        }
    }
}

fn is_unquote_call(function: &Expression, arguments: &[Expression]) -> bool {
    arguments.len() == 1
        && matches!(function, Expression::Identifier(ident) if ident.as_str() == "unquote")
}

/// The literal syntax that evaluates back to `value`.
fn value_to_syntax(value: Value) -> EvalResult<Expression> {
    match value {
        Value::Integer(n) => Ok(integer_syntax(n)),
        Value::Boolean(b) => Ok(Expression::Boolean(b)),
        Value::Quote(node) => Ok(Rc::unwrap_or_clone(node)),
        other => Err(EvalError::Unquote(other.type_name())),
    }
}

/// Integer literals are never negative, so a negative value becomes a
/// negation. `i64::MIN` has no positive counterpart and is built as
/// `-i64::MAX - 1`.
fn integer_syntax(n: i64) -> Expression {
    if n >= 0 {
        return Expression::Integer(n);
    }
    match n.checked_neg() {
        Some(abs) => Expression::prefix(PrefixOperator::Minus, Expression::Integer(abs)),
        None => Expression::infix(
            Expression::prefix(PrefixOperator::Minus, Expression::Integer(i64::MAX)),
            InfixOperator::Minus,
            Expression::Integer(1),
        ),
    }
}
