//! Shared types for the Monkey interpreter.
//!
//! This crate defines the AST node types and their canonical printed form,
//! source spans, parser diagnostics, and the generic AST rewrite used by
//! quote/unquote.

mod diagnostics;
mod span;
pub mod ast;
pub mod modify;

pub use diagnostics::{Diagnostics, ParseError};
pub use modify::Modifier;
pub use span::Span;
