//! Lexical errors.

use thiserror::Error;

/// A lexical error, always carrying the 1-based line/column of the
/// character that triggered it. `Display` renders the `"Line L:C: <detail>"`
/// form callers are expected to show verbatim.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LexError {
    #[error("Line {line}:{column}: unterminated string literal")]
    UnterminatedString { line: u32, column: u32 },

    #[error("Line {line}:{column}: unterminated command (missing '>>')")]
    UnterminatedCommand { line: u32, column: u32 },

    #[error("Line {line}:{column}: unterminated option (missing ']]')")]
    UnterminatedOption { line: u32, column: u32 },

    #[error("Line {line}:{column}: unexpected character '{found}'")]
    UnexpectedCharacter { line: u32, column: u32, found: char },

    #[error("Line {line}:{column}: inconsistent indentation")]
    IndentMismatch { line: u32, column: u32 },
}

impl LexError {
    pub fn line(&self) -> u32 {
        match self {
            LexError::UnterminatedString { line, .. }
            | LexError::UnterminatedCommand { line, .. }
            | LexError::UnterminatedOption { line, .. }
            | LexError::UnexpectedCharacter { line, .. }
            | LexError::IndentMismatch { line, .. } => *line,
        }
    }

    pub fn column(&self) -> u32 {
        match self {
            LexError::UnterminatedString { column, .. }
            | LexError::UnterminatedCommand { column, .. }
            | LexError::UnterminatedOption { column, .. }
            | LexError::UnexpectedCharacter { column, .. }
            | LexError::IndentMismatch { column, .. } => *column,
        }
    }
}
