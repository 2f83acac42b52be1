//! Command-mode scanning: everything recognized inside `<<…>>`.

use weave_util::Symbol;

use super::core::{Lexer, UnterminatedKind};
use crate::error::LexError;
use crate::token::{Token, TokenKind};

impl<'a> Lexer<'a> {
    pub(crate) fn scan_command_mode(&mut self, tokens: &mut Vec<Token>) -> Result<(), LexError> {
        self.skip_inline_whitespace();
        if self.cursor.is_at_end() {
            return Err(self.report_unterminated(UnterminatedKind::Command));
        }

        let (line, column) = (self.cursor.line(), self.cursor.column());
        let c = self.cursor.current_char();

        if c == '>' && self.cursor.peek_char(1) == '>' {
            self.cursor.advance_n(2);
            tokens.push(Token::new(TokenKind::EndCommand, line, column));
            self.pop_mode();
            return Ok(());
        }

        match c {
            '(' => {
                self.cursor.advance();
                tokens.push(Token::new(TokenKind::LeftParen, line, column));
            }
            ')' => {
                self.cursor.advance();
                tokens.push(Token::new(TokenKind::RightParen, line, column));
            }
            ',' => {
                self.cursor.advance();
                tokens.push(Token::new(TokenKind::Comma, line, column));
            }
            '+' => tokens.push(self.lex_assignable_op(
                TokenKind::Plus,
                TokenKind::PlusAssign,
                line,
                column,
            )),
            '-' => tokens.push(self.lex_assignable_op(
                TokenKind::Minus,
                TokenKind::MinusAssign,
                line,
                column,
            )),
            '*' => tokens.push(self.lex_assignable_op(
                TokenKind::Star,
                TokenKind::StarAssign,
                line,
                column,
            )),
            '/' => tokens.push(self.lex_assignable_op(
                TokenKind::Slash,
                TokenKind::SlashAssign,
                line,
                column,
            )),
            '^' => {
                self.cursor.advance();
                tokens.push(Token::new(TokenKind::Caret, line, column));
            }
            '=' => {
                self.cursor.advance();
                if self.cursor.match_char('=') {
                    tokens.push(Token::new(TokenKind::EqEq, line, column));
                } else {
                    tokens.push(Token::new(TokenKind::Assign, line, column));
                }
            }
            '!' => {
                self.cursor.advance();
                if self.cursor.match_char('=') {
                    tokens.push(Token::new(TokenKind::NotEq, line, column));
                } else {
                    tokens.push(Token::new(TokenKind::Bang, line, column));
                }
            }
            '<' => {
                self.cursor.advance();
                if self.cursor.match_char('=') {
                    tokens.push(Token::new(TokenKind::Le, line, column));
                } else {
                    tokens.push(Token::new(TokenKind::Lt, line, column));
                }
            }
            '>' => {
                self.cursor.advance();
                if self.cursor.match_char('=') {
                    tokens.push(Token::new(TokenKind::Ge, line, column));
                } else {
                    tokens.push(Token::new(TokenKind::Gt, line, column));
                }
            }
            '&' if self.cursor.peek_char(1) == '&' => {
                self.cursor.advance_n(2);
                tokens.push(Token::new(TokenKind::AndAnd, line, column));
            }
            '|' if self.cursor.peek_char(1) == '|' => {
                self.cursor.advance_n(2);
                tokens.push(Token::new(TokenKind::OrOr, line, column));
            }
            '"' => tokens.push(self.lex_string()?),
            '$' => tokens.push(self.lex_variable()),
            '0'..='9' => tokens.push(self.lex_number()),
            c if crate::unicode::is_ident_start(c) => tokens.push(self.lex_identifier_or_keyword()),
            other => {
                return Err(LexError::UnexpectedCharacter {
                    line,
                    column,
                    found: other,
                })
            }
        }

        Ok(())
    }

    fn skip_inline_whitespace(&mut self) {
        while matches!(self.cursor.current_char(), ' ' | '\t') {
            self.cursor.advance();
        }
    }

    fn lex_assignable_op(
        &mut self,
        plain: TokenKind,
        assign: TokenKind,
        line: u32,
        column: u32,
    ) -> Token {
        self.cursor.advance();
        if self.cursor.match_char('=') {
            Token::new(assign, line, column)
        } else {
            Token::new(plain, line, column)
        }
    }

    /// `$` followed by an identifier: a variable reference.
    fn lex_variable(&mut self) -> Token {
        let (line, column) = (self.cursor.line(), self.cursor.column());
        let start = self.cursor.position();
        self.cursor.advance(); // '$'
        while crate::unicode::is_ident_continue(self.cursor.current_char()) {
            self.cursor.advance();
        }
        let name = self.cursor.slice_from(start);
        Token::with_value(TokenKind::Variable, Symbol::intern(name), line, column)
    }

    /// An identifier, keyword, literal (`true`/`false`/`null`), or — when
    /// immediately followed by `(` — a function name.
    fn lex_identifier_or_keyword(&mut self) -> Token {
        let (line, column) = (self.cursor.line(), self.cursor.column());
        let start = self.cursor.position();
        while crate::unicode::is_ident_continue(self.cursor.current_char()) {
            self.cursor.advance();
        }
        let text = self.cursor.slice_from(start);

        let kind = match text {
            "if" => Some(TokenKind::If),
            "elseif" => Some(TokenKind::ElseIf),
            "else" => Some(TokenKind::Else),
            "endif" => Some(TokenKind::EndIf),
            "set" => Some(TokenKind::Set),
            "true" => Some(TokenKind::True),
            "false" => Some(TokenKind::False),
            "null" => Some(TokenKind::Null),
            _ => None,
        };
        if let Some(kind) = kind {
            return Token::new(kind, line, column);
        }

        let symbol = Symbol::intern_known(text);
        if self.cursor.current_char() == '(' {
            Token::with_value(TokenKind::Function, symbol, line, column)
        } else {
            Token::with_value(TokenKind::Identifier, symbol, line, column)
        }
    }

    /// `-?[0-9]+(\.[0-9]+)?`, retained as its textual form; the sign is
    /// handled by the expression parser as unary minus, not lexed here.
    fn lex_number(&mut self) -> Token {
        let (line, column) = (self.cursor.line(), self.cursor.column());
        let start = self.cursor.position();
        while self.cursor.current_char().is_ascii_digit() {
            self.cursor.advance();
        }
        if self.cursor.current_char() == '.' && self.cursor.peek_char(1).is_ascii_digit() {
            self.cursor.advance();
            while self.cursor.current_char().is_ascii_digit() {
                self.cursor.advance();
            }
        }
        let text = self.cursor.slice_from(start);
        Token::with_value(TokenKind::Number, Symbol::intern(text), line, column)
    }

    /// A double-quoted string with backslash escapes for `"` and `\` only.
    fn lex_string(&mut self) -> Result<Token, LexError> {
        let (line, column) = (self.cursor.line(), self.cursor.column());
        self.cursor.advance(); // opening quote

        let mut content = String::new();
        loop {
            if self.cursor.is_at_end() || self.cursor.current_char() == '\n' {
                return Err(LexError::UnterminatedString { line, column });
            }
            match self.cursor.current_char() {
                '"' => {
                    self.cursor.advance();
                    break;
                }
                '\\' => {
                    self.cursor.advance();
                    match self.cursor.current_char() {
                        '"' => content.push('"'),
                        '\\' => content.push('\\'),
                        other => {
                            content.push('\\');
                            content.push(other);
                        }
                    }
                    self.cursor.advance();
                }
                c => {
                    content.push(c);
                    self.cursor.advance();
                }
            }
        }

        Ok(Token::with_value(
            TokenKind::String,
            Symbol::intern(&content),
            line,
            column,
        ))
    }
}
