//! weave-par - the recursive-descent parser and AST for dialogue source.
//!
//! Consumes the token stream produced by [`weave_lex`] and yields an AST
//! rooted at a single top-level [`ast::Node`] named `Start`. Dispatch at each
//! statement position needs no backtracking; the expression sub-parser
//! (`expr`) is a two-stack shunting-yard reduction. Speculative lookahead,
//! where the grammar needs it, is a cheap snapshot/restore of the token
//! cursor's index rather than a copy of the remaining tokens.

pub mod ast;
mod cursor;
pub mod error;
mod expr;
mod stmt;

use weave_lex::{Token, TokenKind};
use weave_util::Symbol;

pub use ast::Node;
pub use error::ParseError;

use cursor::TokenCursor;

/// Parses a complete source string into a [`Node`] named `Start`. The sole
/// entry point of this crate: tokenizes and parses in one call.
pub fn parse(source: &str) -> Result<Node, ParseError> {
    let tokens = weave_lex::tokenize(source)?;
    let mut parser = Parser::new(&tokens);
    let root = Symbol::intern("Start");
    let statements = parser.parse_body(root, Parser::at_block_boundary)?;
    parser.expect(TokenKind::EndOfInput)?;
    tracing::debug!(
        token_count = tokens.len(),
        statement_count = statements.len(),
        "parsed source"
    );
    Ok(Node {
        name: root,
        statements,
    })
}

pub struct Parser<'t> {
    cursor: TokenCursor<'t>,
}

impl<'t> Parser<'t> {
    pub fn new(tokens: &'t [Token]) -> Self {
        Self {
            cursor: TokenCursor::new(tokens),
        }
    }

    /// Consumes the current token if it has `kind`, else raises an error
    /// naming what was expected.
    fn expect(&mut self, kind: TokenKind) -> Result<Token, ParseError> {
        let tok = *self.cursor.current();
        if tok.kind == kind {
            self.cursor.advance();
            Ok(tok)
        } else {
            Err(ParseError::UnexpectedToken {
                line: tok.line,
                column: tok.column,
                expected: format!("{kind:?}"),
                found: format!("{:?}", tok.kind),
            })
        }
    }

    fn at(&self, kind: TokenKind) -> bool {
        self.cursor.check(kind)
    }

    /// True at the boundary of any plain statement list: a `Block`, a
    /// shortcut-option epilogue, or the top-level node.
    fn at_block_boundary(&self) -> bool {
        matches!(
            self.cursor.current().kind,
            TokenKind::Dedent | TokenKind::EndOfInput
        )
    }

    /// True at the boundary of an if-clause body: in addition to a block
    /// boundary, the next `<<elseif|else|endif>>` also ends the clause.
    fn at_clause_boundary(&self) -> bool {
        if self.at_block_boundary() {
            return true;
        }
        self.cursor.current().kind == TokenKind::BeginCommand
            && matches!(
                self.cursor.peek(1).kind,
                TokenKind::ElseIf | TokenKind::Else | TokenKind::EndIf
            )
    }

    /// Renders a single command-mode token back to its canonical source
    /// text, for reassembling the raw text of a [`ast::CustomCommand`].
    fn render_token(tok: &Token) -> String {
        match tok.kind {
            TokenKind::Plus => "+".into(),
            TokenKind::Minus => "-".into(),
            TokenKind::Star => "*".into(),
            TokenKind::Slash => "/".into(),
            TokenKind::Lt => "<".into(),
            TokenKind::Le => "<=".into(),
            TokenKind::Gt => ">".into(),
            TokenKind::Ge => ">=".into(),
            TokenKind::EqEq => "==".into(),
            TokenKind::NotEq => "!=".into(),
            TokenKind::AndAnd => "&&".into(),
            TokenKind::OrOr => "||".into(),
            TokenKind::Caret => "^".into(),
            TokenKind::Bang => "!".into(),
            TokenKind::Assign => "=".into(),
            TokenKind::PlusAssign => "+=".into(),
            TokenKind::MinusAssign => "-=".into(),
            TokenKind::StarAssign => "*=".into(),
            TokenKind::SlashAssign => "/=".into(),
            TokenKind::LeftParen => "(".into(),
            TokenKind::RightParen => ")".into(),
            TokenKind::Comma => ",".into(),
            TokenKind::If => "if".into(),
            TokenKind::ElseIf => "elseif".into(),
            TokenKind::Else => "else".into(),
            TokenKind::EndIf => "endif".into(),
            TokenKind::Set => "set".into(),
            TokenKind::True => "true".into(),
            TokenKind::False => "false".into(),
            TokenKind::Null => "null".into(),
            TokenKind::String => format!("\"{}\"", tok.text().unwrap_or_default()),
            _ => tok.text().unwrap_or_default().to_string(),
        }
    }
}
