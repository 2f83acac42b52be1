//! Option-mode scanning: one or two text runs inside `[[…]]`, separated by `|`.

use weave_util::Symbol;

use super::core::{Lexer, UnterminatedKind};
use crate::error::LexError;
use crate::token::{Token, TokenKind};

impl<'a> Lexer<'a> {
    pub(crate) fn scan_option_mode(&mut self, tokens: &mut Vec<Token>) -> Result<(), LexError> {
        let (line, column) = (self.cursor.line(), self.cursor.column());

        if self.cursor.current_char() == ']' && self.cursor.peek_char(1) == ']' {
            self.cursor.advance_n(2);
            tokens.push(Token::new(TokenKind::OptionEnd, line, column));
            self.pop_mode();
            return Ok(());
        }

        if self.cursor.current_char() == '|' {
            self.cursor.advance();
            tokens.push(Token::new(TokenKind::OptionDelimit, line, column));
            return Ok(());
        }

        let start = self.cursor.position();
        while !self.cursor.is_at_end()
            && self.cursor.current_char() != '\n'
            && self.cursor.current_char() != '|'
            && !(self.cursor.current_char() == ']' && self.cursor.peek_char(1) == ']')
        {
            self.cursor.advance();
        }
        if self.cursor.is_at_end() || self.cursor.current_char() == '\n' {
            return Err(self.report_unterminated(UnterminatedKind::Option));
        }
        let text = self.cursor.slice_from(start).trim();
        tokens.push(Token::with_value(
            TokenKind::Text,
            Symbol::intern(text),
            line,
            column,
        ));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::core::Lexer;

    #[test]
    fn option_with_label_and_destination() {
        let tokens = Lexer::tokenize("[[Go north|NorthRoom]]").unwrap();
        let texts: Vec<&str> = tokens
            .iter()
            .filter(|t| t.kind == TokenKind::Text)
            .map(|t| t.text().unwrap())
            .collect();
        assert_eq!(texts, vec!["Go north", "NorthRoom"]);
    }

    #[test]
    fn option_with_destination_only() {
        let tokens = Lexer::tokenize("[[NorthRoom]]").unwrap();
        let kinds: Vec<TokenKind> = tokens.iter().map(|t| t.kind).collect();
        assert_eq!(
            kinds,
            vec![
                TokenKind::OptionStart,
                TokenKind::Text,
                TokenKind::OptionEnd,
                TokenKind::EndOfInput,
            ]
        );
    }

    #[test]
    fn unterminated_option_is_an_error() {
        let err = Lexer::tokenize("[[NorthRoom\n").unwrap_err();
        assert!(matches!(err, LexError::UnterminatedOption { .. }));
    }
}
