//! Parse errors.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    #[error("Line {line}:{column}: expected {expected}, found {found}")]
    UnexpectedToken {
        line: u32,
        column: u32,
        expected: String,
        found: String,
    },

    #[error("Line {line}:{column}: unbalanced parentheses")]
    UnbalancedParens { line: u32, column: u32 },

    #[error("Line {line}:{column}: empty expression")]
    EmptyExpression { line: u32, column: u32 },

    #[error(transparent)]
    Lex(#[from] weave_lex::LexError),
}

impl ParseError {
    pub fn line(&self) -> u32 {
        match self {
            ParseError::UnexpectedToken { line, .. } => *line,
            ParseError::UnbalancedParens { line, .. } => *line,
            ParseError::EmptyExpression { line, .. } => *line,
            ParseError::Lex(e) => e.line(),
        }
    }

    pub fn column(&self) -> u32 {
        match self {
            ParseError::UnexpectedToken { column, .. } => *column,
            ParseError::UnbalancedParens { column, .. } => *column,
            ParseError::EmptyExpression { column, .. } => *column,
            ParseError::Lex(e) => e.column(),
        }
    }
}
