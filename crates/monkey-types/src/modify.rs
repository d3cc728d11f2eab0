//! Generic bottom-up AST rewriting.
//!
//! A [`Modifier`] supplies one hook per node family. The `modify_*` walkers
//! rebuild every child slot of a node first, then hand the node itself to
//! the matching hook (post-order), so a rewrite sees children that have
//! already been rewritten.
//!
//! Child slots visited:
//!
//! | Node | Slots |
//! |---|---|
//! | `Program`, `BlockStatement` | statements |
//! | `Let` | name, value |
//! | `Return`, expression statement | expression |
//! | `Prefix` | right |
//! | `Infix` | left, right |
//! | `Index` | left, index |
//! | `If` | condition, consequence, alternative |
//! | `Function` | parameters, body |
//! | `Call` | function, arguments |
//! | `Array` | elements |
//! | `Hash` | each key and value |

use crate::ast::*;
use std::rc::Rc;

/// Stack kept free before descending into a nested expression.
const RED_ZONE: usize = 64 * 1024;

/// Stack allocated whenever the red zone is reached.
const STACK_PER_RECURSION: usize = 1024 * 1024;

/// Per-node-family rewrite hooks. Every hook defaults to the identity.
pub trait Modifier {
    type Error;

    fn expression(&mut self, expression: Expression) -> Result<Expression, Self::Error> {
        Ok(expression)
    }

    fn statement(&mut self, statement: Statement) -> Result<Statement, Self::Error> {
        Ok(statement)
    }

    fn block(&mut self, block: BlockStatement) -> Result<BlockStatement, Self::Error> {
        Ok(block)
    }

    fn identifier(&mut self, identifier: Identifier) -> Result<Identifier, Self::Error> {
        Ok(identifier)
    }
}

pub fn modify_program<M: Modifier + ?Sized>(
    program: Program,
    modifier: &mut M,
) -> Result<Program, M::Error> {
    let statements = modify_statements(program.statements, modifier)?;
    Ok(Program::new(statements))
}

pub fn modify_block<M: Modifier + ?Sized>(
    block: BlockStatement,
    modifier: &mut M,
) -> Result<BlockStatement, M::Error> {
    let statements = modify_statements(block.statements, modifier)?;
    modifier.block(BlockStatement::new(statements))
}

pub fn modify_statement<M: Modifier + ?Sized>(
    statement: Statement,
    modifier: &mut M,
) -> Result<Statement, M::Error> {
    let statement = match statement {
        Statement::Let { name, value } => Statement::Let {
            name: modifier.identifier(name)?,
            value: modify_expression(value, modifier)?,
        },
        Statement::Return(value) => Statement::Return(modify_expression(value, modifier)?),
        Statement::Expression(expr) => Statement::Expression(modify_expression(expr, modifier)?),
    };
    modifier.statement(statement)
}

pub fn modify_expression<M: Modifier + ?Sized>(
    expression: Expression,
    modifier: &mut M,
) -> Result<Expression, M::Error> {
    stacker::maybe_grow(RED_ZONE, STACK_PER_RECURSION, || {
        modify_expression_inner(expression, modifier)
    })
}

fn modify_expression_inner<M: Modifier + ?Sized>(
    expression: Expression,
    modifier: &mut M,
) -> Result<Expression, M::Error> {
    let expression = match expression {
        Expression::Identifier(ident) => Expression::Identifier(modifier.identifier(ident)?),
        literal @ (Expression::Integer(_) | Expression::Boolean(_) | Expression::String(_)) => {
            literal
        }
        Expression::Array(elements) => Expression::Array(modify_expressions(elements, modifier)?),
        Expression::Hash(pairs) => Expression::Hash(
            pairs
                .into_iter()
                .map(|pair| {
                    Ok::<_, M::Error>(HashPair {
                        key: modify_expression(pair.key, modifier)?,
                        value: modify_expression(pair.value, modifier)?,
                    })
                })
                .collect::<Result<_, _>>()?,
        ),
        Expression::Prefix { operator, right } => Expression::Prefix {
            operator,
            right: modify_boxed(right, modifier)?,
        },
        Expression::Infix {
            left,
            operator,
            right,
        } => Expression::Infix {
            left: modify_boxed(left, modifier)?,
            operator,
            right: modify_boxed(right, modifier)?,
        },
        Expression::If(if_expr) => {
            let IfExpression {
                condition,
                consequence,
                alternative,
            } = *if_expr;
            Expression::If(Box::new(IfExpression {
                condition: modify_expression(condition, modifier)?,
                consequence: modify_block(consequence, modifier)?,
                alternative: alternative
                    .map(|alt| modify_block(alt, modifier))
                    .transpose()?,
            }))
        }
        Expression::Function(func) => {
            let FunctionLiteral { parameters, body } = Rc::unwrap_or_clone(func);
            Expression::function(
                parameters
                    .into_iter()
                    .map(|param| modifier.identifier(param))
                    .collect::<Result<_, _>>()?,
                modify_block(body, modifier)?,
            )
        }
        Expression::Call {
            function,
            arguments,
        } => Expression::Call {
            function: modify_boxed(function, modifier)?,
            arguments: modify_expressions(arguments, modifier)?,
        },
        Expression::Index { left, index } => Expression::Index {
            left: modify_boxed(left, modifier)?,
            index: modify_boxed(index, modifier)?,
        },
    };
    modifier.expression(expression)
}

fn modify_statements<M: Modifier + ?Sized>(
    statements: Vec<Statement>,
    modifier: &mut M,
) -> Result<Vec<Statement>, M::Error> {
    statements
        .into_iter()
        .map(|stmt| modify_statement(stmt, modifier))
        .collect()
}

fn modify_expressions<M: Modifier + ?Sized>(
    expressions: Vec<Expression>,
    modifier: &mut M,
) -> Result<Vec<Expression>, M::Error> {
    expressions
        .into_iter()
        .map(|expr| modify_expression(expr, modifier))
        .collect()
}

fn modify_boxed<M: Modifier + ?Sized>(
    expression: Box<Expression>,
    modifier: &mut M,
) -> Result<Box<Expression>, M::Error> {
    modify_expression(*expression, modifier).map(Box::new)
}
