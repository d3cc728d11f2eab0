//! Core Monkey lexer: converts source text to tokens on demand.
//!
//! Features:
//! - Lazy: each [`Lexer::next_token`] call scans exactly one token
//! - Identifiers are runs of ASCII letters and `_`; keywords are looked up afterwards
//! - `=`/`!` look one character ahead for `==`/`!=`
//! - Strings run to the next `"` with no escapes; an unterminated string
//!   silently takes the rest of the input
//! - Never fails: unknown characters become [`TokenKind::Illegal`]

use monkey_types::Span;
use tracing::trace;

use crate::token::{lookup_ident, Token, TokenKind};

/// The Monkey lexer.
///
/// Produces [`Token`]s one at a time. Once the end of input is reached every
/// further call returns another [`TokenKind::Eof`].
pub struct Lexer<'src> {
    /// The full source text.
    source: &'src str,
    /// Current byte offset into `source`.
    pos: usize,
    /// Current line number (1-based).
    line: u32,
    /// Current column number (1-based, in characters).
    col: u32,
    /// Set once the iterator has yielded `Eof`.
    finished: bool,
}

impl<'src> Lexer<'src> {
    /// Create a new lexer over the given source text.
    pub fn new(source: &'src str) -> Self {
        Self {
            source,
            pos: 0,
            line: 1,
            col: 1,
            finished: false,
        }
    }

    /// Scan and return the next token.
    pub fn next_token(&mut self) -> Token {
        let token = self.scan_token();
        trace!(kind = %token.kind, literal = %token.literal, span = %token.span, "token");
        token
    }

    // ─────────────────────────────────────────────────────────────
    // Character-level helpers
    // ─────────────────────────────────────────────────────────────

    fn peek(&self) -> Option<char> {
        self.source[self.pos..].chars().next()
    }

    fn advance(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.pos += ch.len_utf8();
        if ch == '\n' {
            self.line += 1;
            self.col = 1;
        } else {
            self.col += 1;
        }
        Some(ch)
    }

    /// Consume the next character only if it equals `expected`.
    fn eat(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Consume characters while `predicate` holds.
    fn advance_while(&mut self, predicate: impl Fn(char) -> bool) {
        while let Some(ch) = self.peek() {
            if !predicate(ch) {
                break;
            }
            self.advance();
        }
    }

    fn span_from(&self, start_line: u32, start_col: u32) -> Span {
        Span::new(
            start_line,
            start_col,
            self.line,
            self.col.saturating_sub(1).max(1),
        )
    }

    fn skip_whitespace(&mut self) {
        self.advance_while(|ch| matches!(ch, ' ' | '\t' | '\n' | '\r'));
    }

    // ─────────────────────────────────────────────────────────────
    // Scanning
    // ─────────────────────────────────────────────────────────────

    fn scan_token(&mut self) -> Token {
        self.skip_whitespace();

        let start = self.pos;
        let start_line = self.line;
        let start_col = self.col;

        let Some(ch) = self.advance() else {
            return Token::new(TokenKind::Eof, "", Span::point(start_line, start_col));
        };

        let kind = match ch {
            // ── One or two characters ──
            '=' if self.eat('=') => TokenKind::Eq,
            '=' => TokenKind::Assign,
            '!' if self.eat('=') => TokenKind::NotEq,
            '!' => TokenKind::Bang,

            // ── Single character ──
            '+' => TokenKind::Plus,
            '-' => TokenKind::Minus,
            '*' => TokenKind::Asterisk,
            '/' => TokenKind::Slash,
            '<' => TokenKind::Lt,
            '>' => TokenKind::Gt,
            ',' => TokenKind::Comma,
            ';' => TokenKind::Semicolon,
            ':' => TokenKind::Colon,
            '(' => TokenKind::LParen,
            ')' => TokenKind::RParen,
            '{' => TokenKind::LBrace,
            '}' => TokenKind::RBrace,
            '[' => TokenKind::LBracket,
            ']' => TokenKind::RBracket,

            // ── Literals & words ──
            '"' => return self.scan_string(start_line, start_col),
            c if is_letter(c) => {
                self.advance_while(is_letter);
                let text = &self.source[start..self.pos];
                return Token::new(lookup_ident(text), text, self.span_from(start_line, start_col));
            }
            c if c.is_ascii_digit() => {
                self.advance_while(|c| c.is_ascii_digit());
                TokenKind::Int
            }

            _ => TokenKind::Illegal,
        };

        Token::new(
            kind,
            &self.source[start..self.pos],
            self.span_from(start_line, start_col),
        )
    }

    /// Scan a string literal whose opening `"` was already consumed.
    fn scan_string(&mut self, start_line: u32, start_col: u32) -> Token {
        let body_start = self.pos;
        self.advance_while(|c| c != '"');
        let body = &self.source[body_start..self.pos];
        // Closing quote, if any. Without one the literal is the rest of the input.
        self.eat('"');
        Token::new(TokenKind::String, body, self.span_from(start_line, start_col))
    }
}

fn is_letter(ch: char) -> bool {
    ch.is_ascii_alphabetic() || ch == '_'
}

/// Yields every token up to and including the first `Eof`, then stops.
impl Iterator for Lexer<'_> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        if self.finished {
            return None;
        }
        let token = self.next_token();
        self.finished = token.kind == TokenKind::Eof;
        Some(token)
    }
}

impl std::iter::FusedIterator for Lexer<'_> {}
