//! AST node types for the Monkey language.
//!
//! Statements and expressions are separate enums, so an expression can only
//! ever sit where the grammar expects one. Large recursive variants are boxed
//! to keep enum sizes reasonable.
//!
//! The [`Display`](std::fmt::Display) impls produce the canonical printed
//! form: fully parenthesised operators, braces around blocks and `; `
//! between statements. Parsing that text again yields the same tree.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::rc::Rc;

// ══════════════════════════════════════════════════════════════════════════════
// Top Level
// ══════════════════════════════════════════════════════════════════════════════

/// A complete Monkey program: the statements of one source text, in order.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Program {
    pub statements: Vec<Statement>,
}

impl Program {
    pub fn new(statements: Vec<Statement>) -> Self {
        Self { statements }
    }

    /// The tree as plain JSON, each node tagged with its kind.
    pub fn to_json(&self) -> serde_json::Result<serde_json::Value> {
        serde_json::to_value(self)
    }
}

/// `{ statements... }`, the body of an `if` branch or a function.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct BlockStatement {
    pub statements: Vec<Statement>,
}

impl BlockStatement {
    pub fn new(statements: Vec<Statement>) -> Self {
        Self { statements }
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// Identifiers
// ══════════════════════════════════════════════════════════════════════════════

/// A bound or referenced name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Identifier {
    pub name: String,
}

impl Identifier {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    pub fn as_str(&self) -> &str {
        &self.name
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// Statements
// ══════════════════════════════════════════════════════════════════════════════

/// A statement inside a program or block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "node", content = "value", rename_all = "snake_case")]
pub enum Statement {
    /// `let name = value;`
    Let { name: Identifier, value: Expression },
    /// `return value;`
    Return(Expression),
    /// `expr;` with the semicolon optional
    Expression(Expression),
}

// ══════════════════════════════════════════════════════════════════════════════
// Expressions
// ══════════════════════════════════════════════════════════════════════════════

/// An expression node. Uses `Box` for recursive variants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "node", content = "value", rename_all = "snake_case")]
pub enum Expression {
    // ── Literals ──
    /// `my_var`
    Identifier(Identifier),
    /// `42`
    Integer(i64),
    /// `true` / `false`
    Boolean(bool),
    /// `"hello"`
    String(String),
    /// `[expr, ...]`
    Array(Vec<Expression>),
    /// `{key: value, ...}`
    Hash(Vec<HashPair>),

    // ── Operators ──
    /// `-x`, `!x`
    Prefix {
        operator: PrefixOperator,
        right: Box<Expression>,
    },
    /// `a + b`, `a == b`, etc.
    Infix {
        left: Box<Expression>,
        operator: InfixOperator,
        right: Box<Expression>,
    },

    // ── Control Flow ──
    /// `if (cond) { ... } [else { ... }]`
    If(Box<IfExpression>),

    // ── Functions ──
    /// `fn(params) { body }`, shared with every closure built from it
    Function(Rc<FunctionLiteral>),
    /// `callee(args...)`
    Call {
        function: Box<Expression>,
        arguments: Vec<Expression>,
    },
    /// `left[index]`
    Index {
        left: Box<Expression>,
        index: Box<Expression>,
    },
}

impl Expression {
    /// Shorthand for an identifier reference.
    pub fn ident(name: impl Into<String>) -> Self {
        Self::Identifier(Identifier::new(name))
    }

    pub fn prefix(operator: PrefixOperator, right: Expression) -> Self {
        Self::Prefix {
            operator,
            right: Box::new(right),
        }
    }

    pub fn infix(left: Expression, operator: InfixOperator, right: Expression) -> Self {
        Self::Infix {
            left: Box::new(left),
            operator,
            right: Box::new(right),
        }
    }

    pub fn function(parameters: Vec<Identifier>, body: BlockStatement) -> Self {
        Self::Function(Rc::new(FunctionLiteral { parameters, body }))
    }

    pub fn call(function: Expression, arguments: Vec<Expression>) -> Self {
        Self::Call {
            function: Box::new(function),
            arguments,
        }
    }

    pub fn index(left: Expression, index: Expression) -> Self {
        Self::Index {
            left: Box::new(left),
            index: Box::new(index),
        }
    }
}

/// One `key: value` entry of a hash literal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HashPair {
    pub key: Expression,
    pub value: Expression,
}

/// `if (condition) { consequence } else { alternative }`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IfExpression {
    pub condition: Expression,
    pub consequence: BlockStatement,
    pub alternative: Option<BlockStatement>,
}

/// `fn(parameters) { body }`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionLiteral {
    pub parameters: Vec<Identifier>,
    pub body: BlockStatement,
}

// ── Operators ─────────────────────────────────────────────────────────────────

/// Unary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PrefixOperator {
    /// `!x`
    #[serde(rename = "!")]
    Bang,
    /// `-x`
    #[serde(rename = "-")]
    Minus,
}

impl PrefixOperator {
    /// Returns the operator symbol for printing and error messages.
    pub fn as_str(&self) -> &'static str {
        match self {
            PrefixOperator::Bang => "!",
            PrefixOperator::Minus => "-",
        }
    }
}

/// Binary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InfixOperator {
    #[serde(rename = "+")]
    Plus,
    #[serde(rename = "-")]
    Minus,
    #[serde(rename = "*")]
    Asterisk,
    #[serde(rename = "/")]
    Slash,
    #[serde(rename = "<")]
    Lt,
    #[serde(rename = ">")]
    Gt,
    #[serde(rename = "==")]
    Eq,
    #[serde(rename = "!=")]
    NotEq,
}

impl InfixOperator {
    /// Returns the operator symbol for printing and error messages.
    pub fn as_str(&self) -> &'static str {
        match self {
            InfixOperator::Plus => "+",
            InfixOperator::Minus => "-",
            InfixOperator::Asterisk => "*",
            InfixOperator::Slash => "/",
            InfixOperator::Lt => "<",
            InfixOperator::Gt => ">",
            InfixOperator::Eq => "==",
            InfixOperator::NotEq => "!=",
        }
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// Canonical printing
// ══════════════════════════════════════════════════════════════════════════════

/// Write `items` separated by `sep`.
fn write_joined<T: fmt::Display>(f: &mut fmt::Formatter<'_>, items: &[T], sep: &str) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(sep)?;
        }
        write!(f, "{item}")?;
    }
    Ok(())
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_joined(f, &self.statements, "; ")
    }
}

impl fmt::Display for BlockStatement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.statements.is_empty() {
            return f.write_str("{ }");
        }
        f.write_str("{ ")?;
        write_joined(f, &self.statements, "; ")?;
        f.write_str(" }")
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Statement::Let { name, value } => write!(f, "let {name} = {value}"),
            Statement::Return(value) => write!(f, "return {value}"),
            Statement::Expression(expr) => write!(f, "{expr}"),
        }
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expression::Identifier(ident) => write!(f, "{ident}"),
            Expression::Integer(n) => write!(f, "{n}"),
            Expression::Boolean(b) => write!(f, "{b}"),
            Expression::String(s) => write!(f, "\"{s}\""),
            Expression::Array(elements) => {
                f.write_str("[")?;
                write_joined(f, elements, ", ")?;
                f.write_str("]")
            }
            Expression::Hash(pairs) => {
                f.write_str("{")?;
                write_joined(f, pairs, ", ")?;
                f.write_str("}")
            }
            Expression::Prefix { operator, right } => write!(f, "({}{right})", operator.as_str()),
            Expression::Infix {
                left,
                operator,
                right,
            } => write!(f, "({left} {} {right})", operator.as_str()),
            Expression::If(if_expr) => {
                write!(f, "if ({}) {}", if_expr.condition, if_expr.consequence)?;
                if let Some(alt) = &if_expr.alternative {
                    write!(f, " else {alt}")?;
                }
                Ok(())
            }
            Expression::Function(func) => write!(f, "{func}"),
            Expression::Call {
                function,
                arguments,
            } => {
                write!(f, "{function}(")?;
                write_joined(f, arguments, ", ")?;
                f.write_str(")")
            }
            Expression::Index { left, index } => write!(f, "({left}[{index}])"),
        }
    }
}

impl fmt::Display for HashPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.key, self.value)
    }
}

impl fmt::Display for FunctionLiteral {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("fn(")?;
        write_joined(f, &self.parameters, ", ")?;
        write!(f, ") {}", self.body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn int(n: i64) -> Expression {
        Expression::Integer(n)
    }

    #[test]
    fn test_let_statement_display() {
        let program = Program::new(vec![Statement::Let {
            name: Identifier::new("myVar"),
            value: Expression::ident("anotherVar"),
        }]);
        assert_eq!(program.to_string(), "let myVar = anotherVar");
    }

    #[test]
    fn test_statements_joined_with_semicolons() {
        let program = Program::new(vec![
            Statement::Let {
                name: Identifier::new("x"),
                value: int(1),
            },
            Statement::Return(Expression::ident("x")),
        ]);
        assert_eq!(program.to_string(), "let x = 1; return x");
    }

    #[test]
    fn test_operator_display_is_parenthesised() {
        let expr = Expression::infix(
            Expression::prefix(PrefixOperator::Minus, Expression::ident("a")),
            InfixOperator::Asterisk,
            Expression::ident("b"),
        );
        assert_eq!(expr.to_string(), "((-a) * b)");
    }

    #[test]
    fn test_if_and_function_display() {
        let func = Expression::function(
            vec![Identifier::new("x"), Identifier::new("y")],
            BlockStatement::new(vec![Statement::Expression(Expression::infix(
                Expression::ident("x"),
                InfixOperator::Plus,
                Expression::ident("y"),
            ))]),
        );
        assert_eq!(func.to_string(), "fn(x, y) { (x + y) }");

        let if_expr = Expression::If(Box::new(IfExpression {
            condition: Expression::ident("c"),
            consequence: BlockStatement::new(vec![Statement::Expression(int(1))]),
            alternative: Some(BlockStatement::default()),
        }));
        assert_eq!(if_expr.to_string(), "if (c) { 1 } else { }");
    }

    #[test]
    fn test_collection_display() {
        let array = Expression::Array(vec![int(1), Expression::String("two".into())]);
        assert_eq!(array.to_string(), "[1, \"two\"]");

        let hash = Expression::Hash(vec![HashPair {
            key: Expression::String("one".into()),
            value: int(1),
        }]);
        assert_eq!(hash.to_string(), "{\"one\": 1}");
        assert_eq!(Expression::Hash(vec![]).to_string(), "{}");

        let index = Expression::index(Expression::ident("xs"), int(0));
        assert_eq!(index.to_string(), "(xs[0])");

        let call = Expression::call(Expression::ident("add"), vec![int(1), int(2)]);
        assert_eq!(call.to_string(), "add(1, 2)");
    }

    #[test]
    fn test_json_form_is_tagged_by_node_kind() {
        let program = Program::new(vec![Statement::Expression(Expression::infix(
            int(1),
            InfixOperator::Plus,
            Expression::ident("x"),
        ))]);
        let json = program.to_json().unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "statements": [{
                    "node": "expression",
                    "value": {
                        "node": "infix",
                        "value": {
                            "left": { "node": "integer", "value": 1 },
                            "operator": "+",
                            "right": { "node": "identifier", "value": "x" },
                        }
                    }
                }]
            })
        );
        let back: Program = serde_json::from_value(json).unwrap();
        assert_eq!(back, program);
    }
}
