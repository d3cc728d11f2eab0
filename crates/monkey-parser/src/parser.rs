//! Core parser infrastructure: two-token lookahead, error reporting, helpers.

use monkey_lexer::{Lexer, Token, TokenKind};
use monkey_types::ast::Program;
use monkey_types::{Diagnostics, ParseError, Span};
use tracing::debug;

/// The Monkey parser.
///
/// Pulls tokens from a [`Lexer`] on demand, keeping the current token and
/// one token of lookahead. Syntax errors are recorded and the malformed
/// statement is dropped; parsing then resumes with the next token.
pub struct Parser<'src> {
    /// Token source.
    lexer: Lexer<'src>,
    /// The token under examination.
    pub(crate) cur: Token,
    /// One token of lookahead.
    pub(crate) peek: Token,
    /// Collected errors.
    errors: Diagnostics,
}

/// Result of parsing: the program built from every well-formed statement,
/// plus the errors found along the way.
#[derive(Debug, Clone)]
pub struct ParseResult {
    pub program: Program,
    pub errors: Diagnostics,
}

impl ParseResult {
    /// Returns `true` if no errors were recorded.
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }

    /// The program, or the errors if there were any.
    pub fn into_result(self) -> Result<Program, Diagnostics> {
        if self.errors.is_empty() {
            Ok(self.program)
        } else {
            Err(self.errors)
        }
    }
}

/// Parse a complete source text.
pub fn parse(source: &str) -> ParseResult {
    Parser::new(Lexer::new(source)).parse()
}

impl<'src> Parser<'src> {
    /// Create a new parser, priming the current and lookahead tokens.
    pub fn new(mut lexer: Lexer<'src>) -> Self {
        let cur = lexer.next_token();
        let peek = lexer.next_token();
        Self {
            lexer,
            cur,
            peek,
            errors: Diagnostics::new(),
        }
    }

    /// Parse statements until end of input.
    pub fn parse_program(&mut self) -> Program {
        let mut statements = Vec::new();
        while !self.cur_is(TokenKind::Eof) {
            if let Some(statement) = self.parse_statement() {
                statements.push(statement);
            }
            self.next_token();
        }
        debug!(
            statements = statements.len(),
            errors = self.errors.len(),
            "parsed program"
        );
        Program::new(statements)
    }

    /// Errors recorded so far, in the order they were found.
    pub fn errors(&self) -> &Diagnostics {
        &self.errors
    }

    /// Parse the whole input and hand back the program with its errors.
    pub fn parse(mut self) -> ParseResult {
        let program = self.parse_program();
        ParseResult {
            program,
            errors: self.errors,
        }
    }

    // ── Token Cursor ──────────────────────────────────────────────────────────

    /// Shift the lookahead into the current slot and pull a new lookahead.
    pub(crate) fn next_token(&mut self) {
        let next = self.lexer.next_token();
        self.cur = std::mem::replace(&mut self.peek, next);
    }

    pub(crate) fn cur_is(&self, kind: TokenKind) -> bool {
        self.cur.kind == kind
    }

    pub(crate) fn peek_is(&self, kind: TokenKind) -> bool {
        self.peek.kind == kind
    }

    // ── Expect Helpers ────────────────────────────────────────────────────────

    /// Advance if the lookahead is `kind`; otherwise record an error and stay put.
    pub(crate) fn expect_peek(&mut self, kind: TokenKind) -> bool {
        if self.peek_is(kind) {
            self.next_token();
            true
        } else {
            self.peek_error(kind);
            false
        }
    }

    fn peek_error(&mut self, expected: TokenKind) {
        let message = format!(
            "expected next token to be {expected}, got {} instead",
            self.peek.kind
        );
        let span = self.peek.span;
        self.error_at(message, span);
    }

    // ── Error Reporting ───────────────────────────────────────────────────────

    /// Report an error at the current token.
    pub(crate) fn error_at_current(&mut self, message: impl Into<String>) {
        let span = self.cur.span;
        self.error_at(message, span);
    }

    /// Report an error at a specific span.
    pub(crate) fn error_at(&mut self, message: impl Into<String>, span: Span) {
        let error = ParseError::new(message, span);
        debug!(%error, "syntax error");
        self.errors.push(error);
    }
}
