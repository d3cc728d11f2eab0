//! Core expression and statement evaluator.

use crate::builtins::Builtin;
use crate::config::EvalConfig;
use crate::env::Environment;
use crate::error::{EvalError, EvalResult};
use crate::quote;
use crate::value::{Function, HashKey, Value};
use monkey_types::ast::*;
use std::collections::BTreeMap;
use std::rc::Rc;
use tracing::trace;

/// Stack kept free before descending into a nested expression.
const RED_ZONE: usize = 64 * 1024;

/// Stack allocated whenever the red zone is reached.
const STACK_PER_RECURSION: usize = 1024 * 1024;

/// Walks AST nodes and produces values.
///
/// Holds no bindings itself: every operation takes the environment to
/// evaluate in, so one evaluator can serve many environments.
#[derive(Debug, Default)]
pub struct Evaluator {
    config: EvalConfig,
    /// Function calls currently in progress.
    depth: usize,
}

impl Evaluator {
    pub fn new(config: EvalConfig) -> Self {
        Self { config, depth: 0 }
    }

    // ══════════════════════════════════════════════════════════════════════
    // Statements
    // ══════════════════════════════════════════════════════════════════════

    /// Evaluate a whole program. A top-level `return` ends it early with
    /// the returned value.
    pub fn eval_program(&mut self, program: &Program, env: &Environment) -> EvalResult<Value> {
        let mut result = Value::Null;
        for statement in &program.statements {
            result = self.eval_statement(statement, env)?;
            if let Value::ReturnSignal(inner) = result {
                return Ok(*inner);
            }
        }
        Ok(result)
    }

    /// Evaluate a block in `env`. A `return` inside stops the block and is
    /// handed back still wrapped, for the enclosing call to unwrap.
    pub fn eval_block(&mut self, block: &BlockStatement, env: &Environment) -> EvalResult<Value> {
        let mut result = Value::Null;
        for statement in &block.statements {
            result = self.eval_statement(statement, env)?;
            if matches!(result, Value::ReturnSignal(_)) {
                break;
            }
        }
        Ok(result)
    }

    pub fn eval_statement(&mut self, statement: &Statement, env: &Environment) -> EvalResult<Value> {
        match statement {
            Statement::Let { name, value } => {
                let value = self.eval_expression(value, env)?;
                env.define(name.as_str(), value.clone());
                Ok(value)
            }
            Statement::Return(value) => {
                let value = self.eval_expression(value, env)?;
                Ok(Value::ReturnSignal(Box::new(value)))
            }
            Statement::Expression(expr) => self.eval_expression(expr, env),
        }
    }

    // ══════════════════════════════════════════════════════════════════════
    // Expressions
    // ══════════════════════════════════════════════════════════════════════

    /// Evaluate an expression in `env`.
    pub fn eval_expression(&mut self, expr: &Expression, env: &Environment) -> EvalResult<Value> {
        stacker::maybe_grow(RED_ZONE, STACK_PER_RECURSION, || {
            self.eval_expression_inner(expr, env)
        })
    }

    fn eval_expression_inner(&mut self, expr: &Expression, env: &Environment) -> EvalResult<Value> {
        match expr {
            Expression::Integer(n) => Ok(Value::Integer(*n)),
            Expression::Boolean(b) => Ok(Value::Boolean(*b)),
            Expression::String(s) => Ok(Value::string(s.as_str())),
            Expression::Identifier(ident) => eval_identifier(ident, env),

            Expression::Array(elements) => {
                let elements = self.eval_expressions(elements, env)?;
                Ok(Value::array(elements))
            }
            Expression::Hash(pairs) => self.eval_hash_literal(pairs, env),

            Expression::Prefix { operator, right } => {
                let right = self.eval_expression(right, env)?;
                eval_prefix(*operator, right)
            }
            Expression::Infix {
                left,
                operator,
                right,
            } => {
                let left = self.eval_expression(left, env)?;
                let right = self.eval_expression(right, env)?;
                eval_infix(*operator, &left, &right)
            }

            Expression::If(if_expr) => self.eval_if(if_expr, env),

            Expression::Function(literal) => Ok(Value::Function(Rc::new(Function {
                literal: Rc::clone(literal),
                env: env.clone(),
            }))),
            Expression::Call {
                function,
                arguments,
            } => self.eval_call(function, arguments, env),
            Expression::Index { left, index } => {
                let left = self.eval_expression(left, env)?;
                let index = self.eval_expression(index, env)?;
                eval_index(&left, &index)
            }
        }
    }

    /// Evaluate expressions left to right.
    fn eval_expressions(
        &mut self,
        exprs: &[Expression],
        env: &Environment,
    ) -> EvalResult<Vec<Value>> {
        exprs
            .iter()
            .map(|expr| self.eval_expression(expr, env))
            .collect()
    }

    fn eval_hash_literal(&mut self, pairs: &[HashPair], env: &Environment) -> EvalResult<Value> {
        let mut hash = BTreeMap::new();
        for pair in pairs {
            let key = self.eval_expression(&pair.key, env)?;
            let key = HashKey::from_value(&key)
                .ok_or_else(|| EvalError::UnusableHashKey(key.type_name()))?;
            let value = self.eval_expression(&pair.value, env)?;
            hash.insert(key, value);
        }
        Ok(Value::Hash(Rc::new(hash)))
    }

    /// Branches run in the enclosing environment; only calls open a scope.
    fn eval_if(&mut self, if_expr: &IfExpression, env: &Environment) -> EvalResult<Value> {
        let condition = self.eval_expression(&if_expr.condition, env)?;
        if condition.is_truthy() {
            self.eval_block(&if_expr.consequence, env)
        } else if let Some(alternative) = &if_expr.alternative {
            self.eval_block(alternative, env)
        } else {
            Ok(Value::Null)
        }
    }

    // ══════════════════════════════════════════════════════════════════════
    // Calls
    // ══════════════════════════════════════════════════════════════════════

    fn eval_call(
        &mut self,
        function: &Expression,
        arguments: &[Expression],
        env: &Environment,
    ) -> EvalResult<Value> {
        if matches!(function, Expression::Identifier(ident) if ident.as_str() == "quote") {
            return match arguments {
                [node] => quote::quote(self, node, env),
                _ => Err(EvalError::QuoteArity(arguments.len())),
            };
        }

        let callee = self.eval_expression(function, env)?;
        let args = self.eval_expressions(arguments, env)?;
        self.apply_function(&callee, args)
    }

    /// Call `callee` with already evaluated arguments.
    pub fn apply_function(&mut self, callee: &Value, args: Vec<Value>) -> EvalResult<Value> {
        match callee {
            Value::Function(func) => self.call_function(func, args),
            Value::Builtin(builtin) => {
                trace!(builtin = builtin.name(), args = args.len(), "call builtin");
                builtin.call(&args)
            }
            other => Err(EvalError::NotCallable(other.type_name())),
        }
    }

    fn call_function(&mut self, func: &Function, args: Vec<Value>) -> EvalResult<Value> {
        let parameters = func.parameters();
        if args.len() != parameters.len() {
            return Err(EvalError::WrongArgumentCount {
                want: parameters.len(),
                got: args.len(),
            });
        }
        if self.depth >= self.config.max_call_depth {
            return Err(EvalError::CallDepthExceeded(self.config.max_call_depth));
        }

        let call_env = Environment::enclosed(&func.env);
        for (param, arg) in parameters.iter().zip(args) {
            call_env.define(param.as_str(), arg);
        }

        self.depth += 1;
        trace!(depth = self.depth, "call function");
        let result = self.eval_block(func.body(), &call_env);
        self.depth -= 1;

        Ok(result?.unwrap_return())
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// Operators
// ══════════════════════════════════════════════════════════════════════════════

/// Look a name up in scope, then among the builtins.
fn eval_identifier(ident: &Identifier, env: &Environment) -> EvalResult<Value> {
    if let Some(value) = env.get(ident.as_str()) {
        return Ok(value);
    }
    Builtin::lookup(ident.as_str())
        .map(Value::Builtin)
        .ok_or_else(|| EvalError::UndefinedName(ident.name.clone()))
}

fn eval_prefix(operator: PrefixOperator, right: Value) -> EvalResult<Value> {
    match (operator, right) {
        (PrefixOperator::Bang, right) => Ok(Value::Boolean(!right.is_truthy())),
        (PrefixOperator::Minus, Value::Integer(n)) => {
            n.checked_neg()
                .map(Value::Integer)
                .ok_or(EvalError::IntegerOverflow {
                    left: 0,
                    operator: "-",
                    right: n,
                })
        }
        (PrefixOperator::Minus, right) => Err(EvalError::UnknownOperator {
            operator: "-",
            operand: right.type_name(),
        }),
    }
}

fn eval_infix(operator: InfixOperator, left: &Value, right: &Value) -> EvalResult<Value> {
    match (left, right) {
        (Value::Integer(l), Value::Integer(r)) => eval_integer_infix(operator, *l, *r),
        (Value::String(l), Value::String(r)) if operator == InfixOperator::Plus => {
            Ok(Value::string(format!("{l}{r}")))
        }
        _ => match operator {
            InfixOperator::Eq => Ok(Value::Boolean(left.is_identical(right))),
            InfixOperator::NotEq => Ok(Value::Boolean(!left.is_identical(right))),
            _ => Err(EvalError::InvalidOperation {
                left: left.type_name(),
                operator: operator.as_str(),
                right: right.type_name(),
            }),
        },
    }
}

fn eval_integer_infix(operator: InfixOperator, l: i64, r: i64) -> EvalResult<Value> {
    let checked = match operator {
        InfixOperator::Plus => l.checked_add(r),
        InfixOperator::Minus => l.checked_sub(r),
        InfixOperator::Asterisk => l.checked_mul(r),
        InfixOperator::Slash if r == 0 => return Err(EvalError::DivisionByZero(l)),
        InfixOperator::Slash => l.checked_div(r),
        InfixOperator::Lt => return Ok(Value::Boolean(l < r)),
        InfixOperator::Gt => return Ok(Value::Boolean(l > r)),
        InfixOperator::Eq => return Ok(Value::Boolean(l == r)),
        InfixOperator::NotEq => return Ok(Value::Boolean(l != r)),
    };
    checked.map(Value::Integer).ok_or(EvalError::IntegerOverflow {
        left: l,
        operator: operator.as_str(),
        right: r,
    })
}

/// `array[integer]` or `hash[key]`. Missing elements and keys yield `null`.
fn eval_index(left: &Value, index: &Value) -> EvalResult<Value> {
    match (left, index) {
        (Value::Array(elements), Value::Integer(i)) => Ok(usize::try_from(*i)
            .ok()
            .and_then(|i| elements.get(i))
            .cloned()
            .unwrap_or(Value::Null)),
        (Value::Hash(pairs), key) => {
            let key = HashKey::from_value(key)
                .ok_or_else(|| EvalError::UnusableHashKey(key.type_name()))?;
            Ok(pairs.get(&key).cloned().unwrap_or(Value::Null))
        }
        _ => Err(EvalError::IndexNotSupported {
            left: left.type_name(),
            index: index.type_name(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integer_arithmetic_is_checked() {
        assert_eq!(
            eval_integer_infix(InfixOperator::Plus, i64::MAX, 1),
            Err(EvalError::IntegerOverflow {
                left: i64::MAX,
                operator: "+",
                right: 1
            })
        );
        assert_eq!(
            eval_integer_infix(InfixOperator::Slash, i64::MIN, -1)
                .unwrap_err()
                .to_string(),
            "integer overflow: -9223372036854775808 / -1"
        );
        assert_eq!(
            eval_integer_infix(InfixOperator::Slash, 7, 0),
            Err(EvalError::DivisionByZero(7))
        );
        assert_eq!(
            eval_integer_infix(InfixOperator::Slash, 7, 2),
            Ok(Value::Integer(3))
        );
    }

    #[test]
    fn test_negating_minimum_integer_overflows() {
        assert_eq!(
            eval_prefix(PrefixOperator::Minus, Value::Integer(i64::MIN))
                .unwrap_err()
                .to_string(),
            "integer overflow: 0 - -9223372036854775808"
        );
    }

    #[test]
    fn test_equality_falls_back_to_identity() {
        let s = Value::from("a");
        assert_eq!(
            eval_infix(InfixOperator::Eq, &s, &s.clone()),
            Ok(Value::Boolean(true))
        );
        assert_eq!(
            eval_infix(InfixOperator::Eq, &s, &Value::from("a")),
            Ok(Value::Boolean(false))
        );
        assert_eq!(
            eval_infix(InfixOperator::NotEq, &Value::Integer(1), &Value::Boolean(true)),
            Ok(Value::Boolean(true))
        );
    }

    #[test]
    fn test_index_out_of_range() {
        let xs = Value::from(vec![Value::Integer(1)]);
        assert_eq!(eval_index(&xs, &Value::Integer(1)), Ok(Value::Null));
        assert_eq!(eval_index(&xs, &Value::Integer(-1)), Ok(Value::Null));
        assert_eq!(eval_index(&xs, &Value::Integer(0)), Ok(Value::Integer(1)));
    }

    #[test]
    fn test_call_depth_is_restored_after_error() {
        let mut evaluator = Evaluator::new(EvalConfig::default().with_max_call_depth(3));
        let env = Environment::new();
        let Expression::Function(literal) = Expression::function(
            vec![],
            BlockStatement::new(vec![Statement::Expression(Expression::ident("missing"))]),
        ) else {
            unreachable!()
        };
        let func = Value::Function(Rc::new(Function {
            literal,
            env: env.clone(),
        }));
        for _ in 0..5 {
            assert_eq!(
                evaluator.apply_function(&func, vec![]),
                Err(EvalError::UndefinedName("missing".into()))
            );
        }
        assert_eq!(evaluator.depth, 0);
    }

    #[test]
    fn test_closures_share_the_function_literal() {
        let expr = Expression::function(vec![Identifier::new("x")], BlockStatement::default());
        let Expression::Function(literal) = &expr else {
            unreachable!()
        };
        let mut evaluator = Evaluator::default();
        let env = Environment::new();
        for _ in 0..3 {
            let Ok(Value::Function(func)) = evaluator.eval_expression(&expr, &env) else {
                panic!("expected a function value");
            };
            assert!(Rc::ptr_eq(&func.literal, literal));
            assert!(func.env.ptr_eq(&env));
        }
    }
}
