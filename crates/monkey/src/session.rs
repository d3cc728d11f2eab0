use crate::error::SessionError;
use monkey_eval::{EvalConfig, Environment, Evaluator, Value};
use tracing::debug;

/// A persistent evaluation context.
///
/// Every call to [`Session::eval`] runs in the same top-level environment.
/// A failed evaluation keeps whatever bindings it made before failing.
#[derive(Debug, Default)]
pub struct Session {
    env: Environment,
    evaluator: Evaluator,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: EvalConfig) -> Self {
        Self {
            env: Environment::new(),
            evaluator: Evaluator::new(config),
        }
    }

    /// The top-level environment shared by every input.
    pub fn environment(&self) -> &Environment {
        &self.env
    }

    /// Parse `source` and, if it is free of syntax errors, evaluate it.
    #[tracing::instrument(level = "debug", skip(self))]
    pub fn eval(&mut self, source: &str) -> Result<Value, SessionError> {
        let program = monkey_parser::parse(source)
            .into_result()
            .map_err(SessionError::Parse)?;
        match self.evaluator.eval_program(&program, &self.env) {
            Ok(value) => Ok(value),
            Err(error) => {
                debug!(%error, "evaluation failed");
                Err(error.into())
            }
        }
    }
}
