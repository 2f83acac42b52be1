//! Expression parsing: shunting-yard reduction of a token run into an
//! [`Expression`] tree.
//!
//! # Operator table (lowest to highest precedence)
//!
//! | Operators | Precedence | Assoc | Arity |
//! |---|---|---|---|
//! | `\|\|` | 3 | left | 2 |
//! | `^` | 2 | left | 2 |
//! | `&&` | 4 | left | 2 |
//! | `==` `!=` | 5 | left | 2 |
//! | `<` `<=` `>` `>=` | 10 | left | 2 |
//! | `+` `-` | 15 | left | 2 |
//! | `*` `/` | 20 | left | 2 |
//! | unary `!` `-` | 25 | right | 1 |
//!
//! The table above is ordered by precedence value, not by operator kind, to
//! keep it readable; [`spec`] is the source of truth the parser consults.

use weave_lex::{Token, TokenKind};

use crate::ast::{CallExpression, CompoundExpression, Expression, Operator, Value};
use crate::error::ParseError;
use crate::Parser;

#[derive(Clone, Copy, PartialEq, Eq)]
enum Assoc {
    Left,
    Right,
}

/// `{precedence, associativity, arity}` for one operator kind, looked up by a
/// plain match rather than a table walk so it stays out of the hot loop.
fn spec(op: Operator) -> (u8, Assoc, usize) {
    match op {
        Operator::Mul | Operator::Div => (20, Assoc::Left, 2),
        Operator::Add | Operator::Sub => (15, Assoc::Left, 2),
        Operator::Lt | Operator::Le | Operator::Gt | Operator::Ge => (10, Assoc::Left, 2),
        Operator::EqEq | Operator::NotEq => (5, Assoc::Left, 2),
        Operator::And => (4, Assoc::Left, 2),
        Operator::Or => (3, Assoc::Left, 2),
        Operator::Xor => (2, Assoc::Left, 2),
        Operator::Neg | Operator::Not => (25, Assoc::Right, 1),
    }
}

fn binary_op(kind: TokenKind) -> Option<Operator> {
    match kind {
        TokenKind::Star => Some(Operator::Mul),
        TokenKind::Slash => Some(Operator::Div),
        TokenKind::Plus => Some(Operator::Add),
        TokenKind::Minus => Some(Operator::Sub),
        TokenKind::Lt => Some(Operator::Lt),
        TokenKind::Le => Some(Operator::Le),
        TokenKind::Gt => Some(Operator::Gt),
        TokenKind::Ge => Some(Operator::Ge),
        TokenKind::EqEq => Some(Operator::EqEq),
        TokenKind::NotEq => Some(Operator::NotEq),
        TokenKind::AndAnd => Some(Operator::And),
        TokenKind::OrOr => Some(Operator::Or),
        TokenKind::Caret => Some(Operator::Xor),
        _ => None,
    }
}

fn unary_op(kind: TokenKind) -> Option<Operator> {
    match kind {
        TokenKind::Minus => Some(Operator::Neg),
        TokenKind::Bang => Some(Operator::Not),
        _ => None,
    }
}

enum StackEntry {
    Op(Operator),
    LParen,
}

enum OutputItem {
    Operand(Expression),
    Op(Operator),
}

impl<'t> Parser<'t> {
    /// Parses one expression via shunting-yard: operands and operators are
    /// read left to right into an operator stack and output queue, then the
    /// output is reduced into a tree.
    pub(crate) fn parse_expression(&mut self) -> Result<Expression, ParseError> {
        let mut output: Vec<OutputItem> = Vec::new();
        let mut operators: Vec<StackEntry> = Vec::new();
        let mut expect_operand = true;

        loop {
            if expect_operand {
                // A grouping `(` opens a sentinel but does not itself satisfy
                // the operand we're waiting for; the next iteration still
                // expects one, now from inside the parens.
                if self.cursor.current().kind == TokenKind::LeftParen {
                    self.cursor.advance();
                    operators.push(StackEntry::LParen);
                    continue;
                }
                // A prefix unary operator pushes itself onto the operator
                // stack but still leaves us waiting for its own operand.
                if let Some(op) = unary_op(self.cursor.current().kind) {
                    self.cursor.advance();
                    operators.push(StackEntry::Op(op));
                    continue;
                }
                if self.try_push_operand(&mut output)? {
                    expect_operand = false;
                    continue;
                }
                let tok = self.cursor.current();
                return Err(ParseError::EmptyExpression {
                    line: tok.line,
                    column: tok.column,
                });
            }

            let tok = *self.cursor.current();
            if let Some(op) = binary_op(tok.kind) {
                self.pop_while_tighter(op, &mut output, &mut operators);
                operators.push(StackEntry::Op(op));
                self.cursor.advance();
                expect_operand = true;
                continue;
            }
            if tok.kind == TokenKind::RightParen {
                if !self.drain_to_matching_lparen(&mut output, &mut operators) {
                    // Not our paren: a function call or grouping above us owns it.
                    break;
                }
                self.cursor.advance();
                continue;
            }
            break;
        }

        while let Some(entry) = operators.pop() {
            match entry {
                StackEntry::Op(op) => output.push(OutputItem::Op(op)),
                StackEntry::LParen => {
                    let tok = self.cursor.current();
                    return Err(ParseError::UnbalancedParens {
                        line: tok.line,
                        column: tok.column,
                    });
                }
            }
        }

        self.reduce(output)
    }

    /// Attempts to consume one operand at the current position: a literal, a
    /// variable, or a function call. Grouping parens and prefix unary
    /// operators are handled by the caller before this is reached. Returns
    /// `false` without consuming anything if the current token cannot start
    /// an operand.
    fn try_push_operand(&mut self, output: &mut Vec<OutputItem>) -> Result<bool, ParseError> {
        let tok = *self.cursor.current();
        match tok.kind {
            TokenKind::Number => {
                self.cursor.advance();
                let text = tok.text().unwrap_or("0");
                let n: f64 = text.parse().map_err(|_| ParseError::UnexpectedToken {
                    line: tok.line,
                    column: tok.column,
                    expected: "a number".into(),
                    found: text.into(),
                })?;
                output.push(OutputItem::Operand(Expression::Value(Value::Number(n))));
                Ok(true)
            }
            TokenKind::Variable => {
                self.cursor.advance();
                output.push(OutputItem::Operand(Expression::Value(Value::Variable(
                    tok.value.expect("variable token always carries a name"),
                ))));
                Ok(true)
            }
            TokenKind::String => {
                self.cursor.advance();
                output.push(OutputItem::Operand(Expression::Value(Value::String(
                    tok.value.expect("string token always carries content"),
                ))));
                Ok(true)
            }
            TokenKind::True => {
                self.cursor.advance();
                output.push(OutputItem::Operand(Expression::Value(Value::Bool(true))));
                Ok(true)
            }
            TokenKind::False => {
                self.cursor.advance();
                output.push(OutputItem::Operand(Expression::Value(Value::Bool(false))));
                Ok(true)
            }
            TokenKind::Null => {
                self.cursor.advance();
                output.push(OutputItem::Operand(Expression::Value(Value::Null)));
                Ok(true)
            }
            TokenKind::Function => {
                let call = self.parse_call(tok)?;
                output.push(OutputItem::Operand(call));
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    fn parse_call(&mut self, name_tok: Token) -> Result<Expression, ParseError> {
        self.cursor.advance(); // function name
        self.expect(TokenKind::LeftParen)?;
        let mut args = Vec::new();
        if !self.cursor.check(TokenKind::RightParen) {
            loop {
                args.push(self.parse_expression()?);
                if self.cursor.check(TokenKind::Comma) {
                    self.cursor.advance();
                    continue;
                }
                break;
            }
        }
        self.expect(TokenKind::RightParen)?;
        Ok(Expression::Call(CallExpression {
            function: name_tok
                .value
                .expect("function token always carries a name"),
            args,
        }))
    }

    /// Implements the shunt rule: pops operators of equal-or-tighter binding
    /// into the output ahead of pushing `incoming`.
    fn pop_while_tighter(
        &self,
        incoming: Operator,
        output: &mut Vec<OutputItem>,
        operators: &mut Vec<StackEntry>,
    ) {
        let (incoming_prec, incoming_assoc, _) = spec(incoming);
        while let Some(StackEntry::Op(top)) = operators.last() {
            let (top_prec, _, _) = spec(*top);
            let should_pop = match incoming_assoc {
                Assoc::Left => incoming_prec <= top_prec,
                Assoc::Right => incoming_prec < top_prec,
            };
            if !should_pop {
                break;
            }
            let StackEntry::Op(op) = operators.pop().unwrap() else {
                unreachable!()
            };
            output.push(OutputItem::Op(op));
        }
    }

    /// Pops operators into the output until the matching `(` is found and
    /// discarded. Returns `false`, leaving the stack untouched, if no `(`
    /// exists on the operator stack (that `)` belongs to an enclosing call
    /// or grouping this expression does not own).
    fn drain_to_matching_lparen(
        &self,
        output: &mut Vec<OutputItem>,
        operators: &mut Vec<StackEntry>,
    ) -> bool {
        if !operators.iter().any(|e| matches!(e, StackEntry::LParen)) {
            return false;
        }
        while let Some(entry) = operators.pop() {
            match entry {
                StackEntry::Op(op) => output.push(OutputItem::Op(op)),
                StackEntry::LParen => return true,
            }
        }
        false
    }

    fn reduce(&self, output: Vec<OutputItem>) -> Result<Expression, ParseError> {
        let tok = self.cursor.current();
        let mut stack: Vec<Expression> = Vec::new();
        for item in output {
            match item {
                OutputItem::Operand(expr) => stack.push(expr),
                OutputItem::Op(op) => {
                    let (_, _, arity) = spec(op);
                    if stack.len() < arity {
                        return Err(ParseError::EmptyExpression {
                            line: tok.line,
                            column: tok.column,
                        });
                    }
                    if arity == 1 {
                        let rhs = stack.pop().unwrap();
                        stack.push(Expression::Compound(CompoundExpression {
                            op,
                            lhs: None,
                            rhs: Box::new(rhs),
                        }));
                    } else {
                        let rhs = stack.pop().unwrap();
                        let lhs = stack.pop().unwrap();
                        stack.push(Expression::Compound(CompoundExpression {
                            op,
                            lhs: Some(Box::new(lhs)),
                            rhs: Box::new(rhs),
                        }));
                    }
                }
            }
        }
        if stack.len() != 1 {
            return Err(ParseError::EmptyExpression {
                line: tok.line,
                column: tok.column,
            });
        }
        Ok(stack.pop().unwrap())
    }
}
