//! Core lexer: mode stack, indentation protocol, and the main driving loop.

use weave_util::Symbol;

use crate::cursor::Cursor;
use crate::error::LexError;
use crate::token::{Token, TokenKind};

/// One of the three scanning modes the lexer switches between.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    Text,
    Command,
    Option,
}

/// Converts a source string into a token stream.
///
/// The lexer is eager: [`Lexer::tokenize`] consumes the entire input in one
/// call and returns the full token vector. The parser then pulls from that
/// buffer lazily through its own cursor.
pub struct Lexer<'a> {
    pub(crate) cursor: Cursor<'a>,
    pub(crate) mode_stack: Vec<Mode>,
    indent_stack: Vec<u32>,
    at_line_start: bool,
    /// Set after indentation is measured for a `Text`-mode line; consumed by
    /// the first call to `scan_text_mode` on that line, since `->` only
    /// introduces a shortcut option at the very start of a statement.
    after_indent: bool,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            cursor: Cursor::new(source),
            mode_stack: vec![Mode::Text],
            indent_stack: vec![0],
            at_line_start: true,
            after_indent: false,
        }
    }

    /// Tokenizes the full source, returning every token up to and including
    /// exactly one `EndOfInput`.
    pub fn tokenize(source: &'a str) -> Result<Vec<Token>, LexError> {
        let normalized;
        let source = if source.contains('\r') {
            normalized = source.replace("\r\n", "\n");
            normalized.as_str()
        } else {
            source
        };

        let mut lexer = Lexer::new(source);
        let tokens = lexer.run()?;
        tracing::debug!(
            source_len = source.len(),
            token_count = tokens.len(),
            "tokenized source"
        );
        Ok(tokens)
    }

    fn mode(&self) -> Mode {
        *self.mode_stack.last().expect("mode stack is never empty")
    }

    pub(crate) fn push_mode(&mut self, mode: Mode) {
        self.mode_stack.push(mode);
    }

    pub(crate) fn pop_mode(&mut self) {
        if self.mode_stack.len() > 1 {
            self.mode_stack.pop();
        }
    }

    fn run(&mut self) -> Result<Vec<Token>, LexError> {
        let mut tokens = Vec::new();

        loop {
            if self.at_line_start && self.mode() == Mode::Text {
                self.handle_indentation(&mut tokens)?;
                self.after_indent = true;
            }
            self.at_line_start = false;

            if self.cursor.is_at_end() {
                break;
            }

            if self.cursor.current_char() == '\n' {
                self.cursor.advance();
                self.at_line_start = true;
                continue;
            }

            match self.mode() {
                Mode::Text => self.scan_text_mode(&mut tokens)?,
                Mode::Command => self.scan_command_mode(&mut tokens)?,
                Mode::Option => self.scan_option_mode(&mut tokens)?,
            }
        }

        match self.mode() {
            Mode::Command => return Err(self.report_unterminated(UnterminatedKind::Command)),
            Mode::Option => return Err(self.report_unterminated(UnterminatedKind::Option)),
            Mode::Text => {}
        }

        for _ in 0..self.indent_stack.len() - 1 {
            tokens.push(Token::new(TokenKind::Dedent, self.cursor.line(), 1));
        }
        tokens.push(Token::new(
            TokenKind::EndOfInput,
            self.cursor.line(),
            self.cursor.column(),
        ));
        Ok(tokens)
    }

    /// Measures leading whitespace on a fresh line and emits Indent/Dedent
    /// tokens to bring the indent stack in line with it. Blank and
    /// whitespace-only lines are skipped entirely.
    fn handle_indentation(&mut self, tokens: &mut Vec<Token>) -> Result<(), LexError> {
        let line_start = self.cursor.position();
        let mut width = 0u32;
        while matches!(self.cursor.current_char(), ' ' | '\t') {
            width += 1;
            self.cursor.advance();
        }

        let rest = self.cursor.current_char();
        if rest == '\n' || self.cursor.is_at_end() {
            // Blank or whitespace-only line: no indentation event.
            return Ok(());
        }
        let _ = line_start;

        let line = self.cursor.line();
        let top = *self.indent_stack.last().unwrap();

        if width > top {
            self.indent_stack.push(width);
            tokens.push(Token::new(TokenKind::Indent, line, 1));
        } else if width < top {
            while *self.indent_stack.last().unwrap() > width {
                self.indent_stack.pop();
                tokens.push(Token::new(TokenKind::Dedent, line, 1));
            }
            if *self.indent_stack.last().unwrap() != width {
                return Err(LexError::IndentMismatch { line, column: 1 });
            }
        }

        Ok(())
    }

    fn scan_text_mode(&mut self, tokens: &mut Vec<Token>) -> Result<(), LexError> {
        let at_statement_start = self.after_indent;
        self.after_indent = false;
        if at_statement_start
            && self.cursor.current_char() == '-'
            && self.cursor.peek_char(1) == '>'
        {
            let (line, column) = (self.cursor.line(), self.cursor.column());
            self.cursor.advance_n(2);
            tokens.push(Token::new(TokenKind::ShortcutOption, line, column));
            return Ok(());
        }

        if self.cursor.current_char() == '<' && self.cursor.peek_char(1) == '<' {
            let (line, column) = (self.cursor.line(), self.cursor.column());
            self.cursor.advance_n(2);
            tokens.push(Token::new(TokenKind::BeginCommand, line, column));
            self.push_mode(Mode::Command);
            return Ok(());
        }
        if self.cursor.current_char() == '[' && self.cursor.peek_char(1) == '[' {
            let (line, column) = (self.cursor.line(), self.cursor.column());
            self.cursor.advance_n(2);
            tokens.push(Token::new(TokenKind::OptionStart, line, column));
            self.push_mode(Mode::Option);
            return Ok(());
        }

        let (line, column) = (self.cursor.line(), self.cursor.column());
        let start = self.cursor.position();
        // Each disjunct names one of the three ways a Text run can end, kept
        // separate rather than folded into a single negated clause.
        #[allow(clippy::nonminimal_bool)]
        while !self.cursor.is_at_end()
            && self.cursor.current_char() != '\n'
            && !(self.cursor.current_char() == '<' && self.cursor.peek_char(1) == '<')
            && !(self.cursor.current_char() == '[' && self.cursor.peek_char(1) == '[')
        {
            self.cursor.advance();
        }
        let text = self.cursor.slice_from(start).trim();
        if !text.is_empty() {
            tokens.push(Token::with_value(
                TokenKind::Text,
                Symbol::intern(text),
                line,
                column,
            ));
        }
        Ok(())
    }

    pub(crate) fn report_unterminated(&self, kind: UnterminatedKind) -> LexError {
        let line = self.cursor.line();
        let column = self.cursor.column();
        match kind {
            UnterminatedKind::Command => LexError::UnterminatedCommand { line, column },
            UnterminatedKind::Option => LexError::UnterminatedOption { line, column },
        }
    }
}

pub(crate) enum UnterminatedKind {
    Command,
    Option,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        Lexer::tokenize(source)
            .unwrap()
            .into_iter()
            .map(|t| t.kind)
            .collect()
    }

    #[test]
    fn minimal_line_is_one_text_token() {
        assert_eq!(
            kinds("Hello, world!"),
            vec![TokenKind::Text, TokenKind::EndOfInput]
        );
    }

    #[test]
    fn blank_lines_produce_no_indent_events() {
        assert_eq!(
            kinds("Hello\n\n\nWorld"),
            vec![TokenKind::Text, TokenKind::Text, TokenKind::EndOfInput]
        );
    }

    #[test]
    fn nested_block_emits_balanced_indent_dedent() {
        let ks = kinds("<<if $a>>\n  A\n<<endif>>");
        let indents = ks.iter().filter(|k| **k == TokenKind::Indent).count();
        let dedents = ks.iter().filter(|k| **k == TokenKind::Dedent).count();
        assert_eq!(indents, dedents);
        assert_eq!(indents, 1);
    }

    #[test]
    fn indent_mismatch_is_an_error() {
        let err = Lexer::tokenize("A\n  B\n C").unwrap_err();
        assert!(matches!(err, LexError::IndentMismatch { .. }));
    }

    #[test]
    fn crlf_is_normalized() {
        assert_eq!(
            kinds("Hello\r\nWorld"),
            vec![TokenKind::Text, TokenKind::Text, TokenKind::EndOfInput]
        );
    }

    #[test]
    fn shortcut_marker_only_at_statement_start() {
        assert_eq!(
            kinds("-> Yes"),
            vec![TokenKind::ShortcutOption, TokenKind::Text, TokenKind::EndOfInput]
        );
        assert_eq!(
            kinds("The sign says -> that way"),
            vec![TokenKind::Text, TokenKind::EndOfInput]
        );
    }
}
