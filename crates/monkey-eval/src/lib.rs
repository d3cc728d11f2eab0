//! Monkey tree-walking evaluator.
//!
//! Evaluates a parsed [`Program`] against an [`Environment`] that the
//! caller owns and may reuse across programs, so definitions persist from
//! one input to the next.
//!
//! ```text
//! let env = Environment::new();
//! evaluate(&parse("let x = 2;").program, &env)?;
//! evaluate(&parse("x * 21").program, &env)?; // Integer(42)
//! ```

mod builtins;
mod config;
mod env;
mod error;
mod evaluator;
mod quote;
mod value;

pub use builtins::{Builtin, BUILTINS};
pub use config::{EvalConfig, DEFAULT_MAX_CALL_DEPTH};
pub use env::Environment;
pub use error::{EvalError, EvalResult};
pub use evaluator::Evaluator;
pub use value::{Function, HashKey, Value};

use monkey_types::ast::Program;
use tracing::debug;

/// Evaluate `program` in `env` with the default configuration.
pub fn evaluate(program: &Program, env: &Environment) -> EvalResult<Value> {
    let result = Evaluator::default().eval_program(program, env);
    if let Err(error) = &result {
        debug!(%error, "evaluation failed");
    }
    result
}
