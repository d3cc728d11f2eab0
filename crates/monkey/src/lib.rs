//! Monkey interpreter: orchestrates the parse and evaluate pipeline.
//!
//! ```text
//! Monkey Source → Lexer → Parser → Evaluator → Value
//! ```
//!
//! A [`Session`] owns the environment that successive inputs evaluate in,
//! which is what an interactive prompt needs: a `let` in one input stays
//! visible to the next. Source with syntax errors is never evaluated.

mod error;
mod session;

pub use error::SessionError;
pub use session::Session;

pub use monkey_eval::{EvalConfig, EvalError, Environment, Value};
pub use monkey_types::{Diagnostics, ParseError};

/// Parse and evaluate `source` in a fresh session.
pub fn run(source: &str) -> Result<Value, SessionError> {
    Session::new().eval(source)
}

/// Parse `source` and return its syntax tree as JSON.
pub fn dump_ast(source: &str) -> Result<serde_json::Value, SessionError> {
    let program = monkey_parser::parse(source)
        .into_result()
        .map_err(SessionError::Parse)?;
    Ok(program.to_json()?)
}
