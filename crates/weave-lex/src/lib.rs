//! weave-lex - the mode-switching lexer for dialogue source text.
//!
//! Converts a UTF-8 source string into a flat token stream, handling three
//! scanning modes (free-form dialogue text, `<<…>>` commands, `[[…]]`
//! options) and synthesizing `Indent`/`Dedent` tokens from leading
//! whitespace. [`tokenize`] is the crate's sole entry point; it is eager,
//! producing the full token vector the parser then reads lazily.

pub mod cursor;
pub mod error;
mod lexer;
pub mod token;
pub mod unicode;

pub use error::LexError;
pub use lexer::{Lexer, Mode};
pub use token::{Token, TokenKind};

/// Tokenize `source` in one pass. See [`Lexer::tokenize`].
pub fn tokenize(source: &str) -> Result<Vec<Token>, LexError> {
    Lexer::tokenize(source)
}
