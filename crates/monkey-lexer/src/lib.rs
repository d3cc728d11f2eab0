//! Monkey lexer: converts source text into a lazy stream of tokens.

pub mod lexer;
pub mod token;

pub use lexer::Lexer;
pub use token::{lookup_ident, Token, TokenKind, ALL_KEYWORDS};
