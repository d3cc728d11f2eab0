//! Source positions attached to tokens and parser diagnostics.

use serde::{Deserialize, Serialize};
use std::fmt;

/// First and last character of a token, 1-based.
///
/// Columns count characters, not bytes. The end is inclusive, so a
/// one-character token starts and ends on the same column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Span {
    pub start_line: u32,
    pub start_col: u32,
    pub end_line: u32,
    pub end_col: u32,
}

impl Span {
    pub fn new(start_line: u32, start_col: u32, end_line: u32, end_col: u32) -> Self {
        Self {
            start_line,
            start_col,
            end_line,
            end_col,
        }
    }

    /// A span covering the single position `line:col`, used for end of input.
    pub fn point(line: u32, col: u32) -> Self {
        Self::new(line, col, line, col)
    }
}

// Diagnostics only ever report where a problem starts.
impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.start_line, self.start_col)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_has_equal_ends() {
        let at = Span::point(4, 2);
        assert_eq!(at, Span::new(4, 2, 4, 2));
        assert_ne!(at, Span::default());
    }

    #[test]
    fn test_display_shows_start_only() {
        assert_eq!(Span::new(2, 9, 5, 1).to_string(), "2:9");
    }

    #[test]
    fn test_serializes_as_flat_fields() {
        let json = serde_json::to_value(Span::new(1, 3, 1, 5)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "start_line": 1, "start_col": 3, "end_line": 1, "end_col": 5 })
        );
    }
}
