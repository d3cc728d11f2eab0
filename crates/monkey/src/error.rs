use monkey_eval::EvalError;
use monkey_types::Diagnostics;
use thiserror::Error;

/// Why a source text produced no value.
#[derive(Debug, Error)]
pub enum SessionError {
    /// The source did not parse; nothing was evaluated.
    #[error("parser errors:\n{0}")]
    Parse(Diagnostics),

    #[error(transparent)]
    Eval(#[from] EvalError),

    #[error("could not serialize syntax tree: {0}")]
    Json(#[from] serde_json::Error),
}

impl SessionError {
    /// The parser diagnostics, if parsing failed.
    pub fn diagnostics(&self) -> Option<&Diagnostics> {
        match self {
            SessionError::Parse(diagnostics) => Some(diagnostics),
            _ => None,
        }
    }
}
