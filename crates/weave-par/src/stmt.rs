//! Statement-level parsing: the recursive-descent half of the grammar.
//!
//! ```text
//! Node        := Statement*  (terminated by Dedent or EndOfInput)
//! Statement   := Block | IfStatement | OptionStatement | AssignmentStatement
//!              | ShortcutOptionGroup | CustomCommand | Line
//! Block       := Indent Statement+ Dedent
//! IfStatement := '<<' 'if' Expression '>>' Statement*
//!                ( '<<' 'elseif' Expression '>>' Statement* )*
//!                ( '<<' 'else' '>>' Statement* )?
//!                '<<' 'endif' '>>'
//! OptionStmt  := '[[' Text ('|' Text)? ']]'
//! AssignStmt  := '<<' 'set' Variable AssignOp Expression '>>'
//! ShortcutGrp := ShortcutOpt+ EpilogueNode
//! ShortcutOpt := '->' Text ( '<<' 'if' Expression '>>' )? ( Indent Node Dedent )?
//! CustomCmd   := '<<' Text '>>'
//! Line        := Text
//! ```

use weave_lex::TokenKind;
use weave_util::Symbol;

use crate::ast::{
    AssignOp, AssignmentStatement, Block, Clause, CustomCommand, IfStatement, Node,
    OptionStatement, ShortcutOption, ShortcutOptionGroup, Statement,
};
use crate::error::ParseError;
use crate::Parser;

impl<'t> Parser<'t> {
    /// Collects statements until `boundary` holds, threading `enclosing`
    /// through for node-name synthesis (shortcut-option bodies, epilogues).
    pub(crate) fn parse_body(
        &mut self,
        enclosing: Symbol,
        boundary: fn(&Self) -> bool,
    ) -> Result<Vec<Statement>, ParseError> {
        let mut statements = Vec::new();
        while !boundary(self) {
            statements.push(self.parse_statement(enclosing, boundary)?);
        }
        Ok(statements)
    }

    fn parse_statement(
        &mut self,
        enclosing: Symbol,
        boundary: fn(&Self) -> bool,
    ) -> Result<Statement, ParseError> {
        match self.cursor.current().kind {
            TokenKind::Indent => self.parse_block(enclosing),
            TokenKind::BeginCommand => self.parse_command_statement(enclosing),
            TokenKind::OptionStart => self.parse_option_statement(),
            TokenKind::ShortcutOption => self.parse_shortcut_group(enclosing, boundary),
            TokenKind::Text => {
                let tok = self.expect(TokenKind::Text)?;
                Ok(Statement::Line(
                    tok.value.expect("Text token always carries its line"),
                ))
            }
            other => {
                let tok = self.cursor.current();
                Err(ParseError::UnexpectedToken {
                    line: tok.line,
                    column: tok.column,
                    expected: "a statement".into(),
                    found: format!("{other:?}"),
                })
            }
        }
    }

    fn parse_block(&mut self, enclosing: Symbol) -> Result<Statement, ParseError> {
        self.expect(TokenKind::Indent)?;
        let statements = self.parse_body(enclosing, Self::at_block_boundary)?;
        self.expect(TokenKind::Dedent)?;
        Ok(Statement::Block(Block { statements }))
    }

    fn parse_command_statement(&mut self, enclosing: Symbol) -> Result<Statement, ParseError> {
        self.expect(TokenKind::BeginCommand)?;
        match self.cursor.current().kind {
            TokenKind::If => self.parse_if_statement(enclosing),
            TokenKind::Set => self.parse_assignment_statement(),
            TokenKind::ElseIf | TokenKind::Else | TokenKind::EndIf => {
                let tok = self.cursor.current();
                Err(ParseError::UnexpectedToken {
                    line: tok.line,
                    column: tok.column,
                    expected: "a statement".into(),
                    found: format!("{:?}", tok.kind),
                })
            }
            _ => self.parse_custom_command(),
        }
    }

    fn parse_if_statement(&mut self, enclosing: Symbol) -> Result<Statement, ParseError> {
        self.expect(TokenKind::If)?;
        let condition = self.parse_expression()?;
        self.expect(TokenKind::EndCommand)?;
        let body = self.parse_body(enclosing, Self::at_clause_boundary)?;
        let mut clauses = vec![Clause {
            condition: Some(condition),
            body,
        }];

        while self.at(TokenKind::BeginCommand) && self.cursor.peek(1).kind == TokenKind::ElseIf {
            self.expect(TokenKind::BeginCommand)?;
            self.expect(TokenKind::ElseIf)?;
            let condition = self.parse_expression()?;
            self.expect(TokenKind::EndCommand)?;
            let body = self.parse_body(enclosing, Self::at_clause_boundary)?;
            clauses.push(Clause {
                condition: Some(condition),
                body,
            });
        }

        if self.at(TokenKind::BeginCommand) && self.cursor.peek(1).kind == TokenKind::Else {
            self.expect(TokenKind::BeginCommand)?;
            self.expect(TokenKind::Else)?;
            self.expect(TokenKind::EndCommand)?;
            let body = self.parse_body(enclosing, Self::at_clause_boundary)?;
            // The else clause must be appended to the clause list: an
            // earlier version of this parser built it and discarded it.
            clauses.push(Clause {
                condition: None,
                body,
            });
        }

        self.expect(TokenKind::BeginCommand)?;
        self.expect(TokenKind::EndIf)?;
        self.expect(TokenKind::EndCommand)?;

        Ok(Statement::If(IfStatement { clauses }))
    }

    fn parse_assignment_statement(&mut self) -> Result<Statement, ParseError> {
        self.expect(TokenKind::Set)?;
        let variable_tok = self.expect(TokenKind::Variable)?;
        let variable = variable_tok
            .value
            .expect("Variable token always carries a name");

        let op_tok = *self.cursor.current();
        let operator = match op_tok.kind {
            TokenKind::Assign => AssignOp::Assign,
            TokenKind::PlusAssign => AssignOp::AddAssign,
            TokenKind::MinusAssign => AssignOp::SubAssign,
            TokenKind::StarAssign => AssignOp::MulAssign,
            TokenKind::SlashAssign => AssignOp::DivAssign,
            other => {
                return Err(ParseError::UnexpectedToken {
                    line: op_tok.line,
                    column: op_tok.column,
                    expected: "an assignment operator".into(),
                    found: format!("{other:?}"),
                })
            }
        };
        self.cursor.advance();

        let value = self.parse_expression()?;
        self.expect(TokenKind::EndCommand)?;

        Ok(Statement::Assignment(AssignmentStatement {
            variable,
            operator,
            value,
        }))
    }

    fn parse_custom_command(&mut self) -> Result<Statement, ParseError> {
        let mut parts = Vec::new();
        while !self.at(TokenKind::EndCommand) && !self.at(TokenKind::EndOfInput) {
            let tok = *self.cursor.current();
            parts.push(Self::render_token(&tok));
            self.cursor.advance();
        }
        self.expect(TokenKind::EndCommand)?;
        Ok(Statement::Command(CustomCommand {
            text: Symbol::intern(&parts.join(" ")),
        }))
    }

    fn parse_option_statement(&mut self) -> Result<Statement, ParseError> {
        self.expect(TokenKind::OptionStart)?;
        let first = self.expect(TokenKind::Text)?;
        let first = first.value.expect("Text token always carries its text");

        let (label, destination) = if self.at(TokenKind::OptionDelimit) {
            self.expect(TokenKind::OptionDelimit)?;
            let second = self.expect(TokenKind::Text)?;
            (
                Some(first),
                second.value.expect("Text token always carries its text"),
            )
        } else {
            (None, first)
        };
        self.expect(TokenKind::OptionEnd)?;

        Ok(Statement::Option(OptionStatement { label, destination }))
    }

    fn parse_shortcut_group(
        &mut self,
        enclosing: Symbol,
        boundary: fn(&Self) -> bool,
    ) -> Result<Statement, ParseError> {
        let mut options = Vec::new();
        let mut index = 1u32;
        while self.at(TokenKind::ShortcutOption) {
            self.expect(TokenKind::ShortcutOption)?;
            let label_tok = self.expect(TokenKind::Text)?;
            let label = label_tok
                .value
                .expect("Text token always carries its text");

            let condition = if self.at(TokenKind::BeginCommand)
                && self.cursor.peek(1).kind == TokenKind::If
            {
                self.expect(TokenKind::BeginCommand)?;
                self.expect(TokenKind::If)?;
                let expr = self.parse_expression()?;
                self.expect(TokenKind::EndCommand)?;
                Some(expr)
            } else {
                None
            };

            let body = if self.at(TokenKind::Indent) {
                self.expect(TokenKind::Indent)?;
                let body_name = Symbol::intern(&format!("{}.{}", enclosing.as_str(), index));
                let statements = self.parse_body(body_name, Self::at_block_boundary)?;
                self.expect(TokenKind::Dedent)?;
                Some(Box::new(Node {
                    name: body_name,
                    statements,
                }))
            } else {
                None
            };

            options.push(ShortcutOption {
                label,
                condition,
                body,
            });
            index += 1;
        }

        // The group swallows the rest of the statement list it appears in as
        // its epilogue, so it must be the last statement collected there.
        let epilogue_name = Symbol::intern(&format!("{}.Epilogue", enclosing.as_str()));
        let epilogue_statements = self.parse_body(epilogue_name, boundary)?;

        Ok(Statement::ShortcutGroup(ShortcutOptionGroup {
            options,
            epilogue: Box::new(Node {
                name: epilogue_name,
                statements: epilogue_statements,
            }),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{Expression, Operator, Value};

    #[test]
    fn minimal_line() {
        let node = crate::parse("Hello, world!").unwrap();
        assert_eq!(node.name.as_str(), "Start");
        assert_eq!(node.statements.len(), 1);
        match &node.statements[0] {
            Statement::Line(text) => assert_eq!(text.as_str(), "Hello, world!"),
            other => panic!("expected a Line, got {other:?}"),
        }
    }

    #[test]
    fn set_statement_respects_precedence() {
        let node = crate::parse("<<set $x = 1 + 2 * 3>>").unwrap();
        let Statement::Assignment(assign) = &node.statements[0] else {
            panic!("expected an assignment statement");
        };
        assert_eq!(assign.variable.as_str(), "$x");
        assert_eq!(assign.operator, AssignOp::Assign);
        match &assign.value {
            Expression::Compound(c) => {
                assert_eq!(c.op, Operator::Add);
                assert!(matches!(
                    *c.lhs.as_ref().unwrap().as_ref(),
                    Expression::Value(Value::Number(n)) if n == 1.0
                ));
                match c.rhs.as_ref() {
                    Expression::Compound(inner) => assert_eq!(inner.op, Operator::Mul),
                    other => panic!("expected nested multiply, got {other:?}"),
                }
            }
            other => panic!("expected a compound expression, got {other:?}"),
        }
    }

    #[test]
    fn if_elseif_else_appends_the_else_clause() {
        let src = "<<if $a == 1>>\n  A\n<<elseif $a == 2>>\n  B\n<<else>>\n  C\n<<endif>>";
        let node = crate::parse(src).unwrap();
        let Statement::If(stmt) = &node.statements[0] else {
            panic!("expected an if statement");
        };
        assert_eq!(stmt.clauses.len(), 3);
        assert!(stmt.clauses[0].condition.is_some());
        assert!(stmt.clauses[1].condition.is_some());
        assert!(stmt.clauses[2].condition.is_none());
    }

    #[test]
    fn shortcut_options_with_epilogue() {
        let src = "-> Yes\n  <<set $ok = 1>>\n-> No\nAfter";
        let node = crate::parse(src).unwrap();
        let Statement::ShortcutGroup(group) = &node.statements[0] else {
            panic!("expected a shortcut group");
        };
        assert_eq!(group.options.len(), 2);
        assert!(group.options[0].body.is_some());
        assert!(group.options[1].body.is_none());
        assert_eq!(group.epilogue.name.as_str(), "Start.Epilogue");
        assert_eq!(group.epilogue.statements.len(), 1);
    }

    #[test]
    fn option_link_with_and_without_label() {
        let node = crate::parse("[[Go north|NorthRoom]]").unwrap();
        let Statement::Option(opt) = &node.statements[0] else {
            panic!("expected an option statement");
        };
        assert_eq!(opt.label.unwrap().as_str(), "Go north");
        assert_eq!(opt.destination.as_str(), "NorthRoom");

        let node = crate::parse("[[NorthRoom]]").unwrap();
        let Statement::Option(opt) = &node.statements[0] else {
            panic!("expected an option statement");
        };
        assert!(opt.label.is_none());
        assert_eq!(opt.destination.as_str(), "NorthRoom");
    }

    #[test]
    fn unbalanced_parens_is_an_error() {
        let err = crate::parse("<<if (1 + 2>>").unwrap_err();
        assert!(matches!(err, ParseError::UnbalancedParens { line: 1, .. }));
    }

    #[test]
    fn custom_command_is_passed_through() {
        let node = crate::parse("<<shake 2.0>>").unwrap();
        let Statement::Command(cmd) = &node.statements[0] else {
            panic!("expected a custom command");
        };
        assert_eq!(cmd.text.as_str(), "shake 2.0");
    }

    #[test]
    fn function_call_in_condition() {
        let node = crate::parse("<<if visited(\"Start\") && $flag>>\n  A\n<<endif>>").unwrap();
        let Statement::If(stmt) = &node.statements[0] else {
            panic!("expected an if statement");
        };
        let Expression::Compound(c) = stmt.clauses[0].condition.as_ref().unwrap() else {
            panic!("expected a compound condition");
        };
        assert_eq!(c.op, Operator::And);
        assert!(matches!(c.lhs.as_deref(), Some(Expression::Call(_))));
    }

    #[test]
    fn nested_block_without_control_flow() {
        let node = crate::parse("A\n  B\nC").unwrap();
        assert_eq!(node.statements.len(), 3);
        assert!(matches!(node.statements[0], Statement::Line(_)));
        assert!(matches!(node.statements[1], Statement::Block(_)));
        assert!(matches!(node.statements[2], Statement::Line(_)));
    }
}
