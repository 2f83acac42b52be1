//! A read-only cursor over an already-lexed token slice.
//!
//! The parser never mutates or re-tokenizes; it walks the slice produced by
//! [`weave_lex::tokenize`] with a plain index, which makes speculative
//! parsing (fork a parse attempt, merge back on success) an O(1) snapshot of
//! that index rather than a copy of the remaining tokens.

use weave_lex::{Token, TokenKind};

pub struct TokenCursor<'t> {
    tokens: &'t [Token],
    position: usize,
}

impl<'t> TokenCursor<'t> {
    pub fn new(tokens: &'t [Token]) -> Self {
        Self { tokens, position: 0 }
    }

    /// The token `n` positions ahead of the cursor, or the final token
    /// (always `EndOfInput`) once the stream is exhausted.
    pub fn peek(&self, n: usize) -> &'t Token {
        self.tokens
            .get(self.position + n)
            .unwrap_or_else(|| self.tokens.last().expect("token stream is never empty"))
    }

    pub fn current(&self) -> &'t Token {
        self.peek(0)
    }

    pub fn check(&self, kind: TokenKind) -> bool {
        self.current().kind == kind
    }

    pub fn advance(&mut self) -> &'t Token {
        let token = self.peek(0);
        if token.kind != TokenKind::EndOfInput {
            self.position += 1;
        }
        token
    }

    /// O(1) save point for speculative parsing. Unused by the current
    /// grammar, whose statement dispatch never needs more than one token of
    /// lookahead beyond `peek`; kept as part of the cursor's contract.
    #[allow(dead_code)]
    pub fn snapshot(&self) -> usize {
        self.position
    }

    #[allow(dead_code)]
    pub fn restore(&mut self, snapshot: usize) {
        self.position = snapshot;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use weave_lex::tokenize;

    #[test]
    fn advance_past_end_keeps_returning_end_of_input() {
        let tokens = tokenize("Hi").unwrap();
        let mut cursor = TokenCursor::new(&tokens);
        for _ in 0..10 {
            cursor.advance();
        }
        assert_eq!(cursor.current().kind, TokenKind::EndOfInput);
    }

    #[test]
    fn snapshot_restore_rewinds_position() {
        let tokens = tokenize("<<set $x = 1>>").unwrap();
        let mut cursor = TokenCursor::new(&tokens);
        let snap = cursor.snapshot();
        cursor.advance();
        cursor.advance();
        assert_ne!(cursor.current().kind, TokenKind::BeginCommand);
        cursor.restore(snap);
        assert_eq!(cursor.current().kind, TokenKind::BeginCommand);
    }
}
