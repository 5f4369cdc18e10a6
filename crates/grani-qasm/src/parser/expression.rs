//! Expression parsing.

use super::Parser;
use crate::ast::{BinOp, Expression, UnaryFn};
use crate::error::{QasmError, QasmResult};
use crate::lexer::Token;

impl<'a> Parser<'a> {
    /// Parse an expression.
    pub(super) fn parse_expression(&mut self) -> QasmResult<Expression> {
        self.parse_binary_expr(0)
    }

    /// Parse a binary expression with precedence climbing.
    fn parse_binary_expr(&mut self, min_prec: u8) -> QasmResult<Expression> {
        let mut left = self.parse_unary_expr()?;

        while let Some(op) = self.peek_binary_op() {
            let prec = op_precedence(op);
            if prec < min_prec {
                break;
            }
            self.advance();

            // `^` folds to the right; everything else to the left.
            let next_min = if op == BinOp::Pow { prec } else { prec + 1 };
            let right = self.parse_binary_expr(next_min)?;
            left = Expression::Binary {
                op,
                left: Box::new(left),
                right: Box::new(right),
            };
        }

        Ok(left)
    }

    /// Parse a unary expression: `-`, `+`, or a primary.
    fn parse_unary_expr(&mut self) -> QasmResult<Expression> {
        if self.consume(&Token::Minus) {
            let expr = self.parse_unary_expr()?;
            return Ok(Expression::Neg(Box::new(expr)));
        }
        if self.consume(&Token::Plus) {
            // Unary plus is a no-op.
            return self.parse_unary_expr();
        }
        self.parse_primary_expr()
    }

    /// Parse a primary expression.
    fn parse_primary_expr(&mut self) -> QasmResult<Expression> {
        let pos = self.offset();
        let token = self
            .peek()
            .cloned()
            .ok_or_else(|| QasmError::eof(pos, "expression"))?;

        match token {
            Token::Real(v) => {
                self.advance();
                Ok(Expression::Real(v))
            }
            Token::Integer(v) => {
                self.advance();
                Ok(Expression::Int(v))
            }
            Token::Pi => {
                self.advance();
                Ok(Expression::Pi)
            }
            Token::Identifier(name) => {
                self.advance();
                Ok(Expression::Variable { name, pos })
            }
            Token::Sin => self.parse_call(UnaryFn::Sin),
            Token::Cos => self.parse_call(UnaryFn::Cos),
            Token::Tan => self.parse_call(UnaryFn::Tan),
            Token::Exp => self.parse_call(UnaryFn::Exp),
            Token::Ln => self.parse_call(UnaryFn::Ln),
            Token::Sqrt => self.parse_call(UnaryFn::Sqrt),
            Token::LParen => {
                self.advance();
                let expr = self.parse_expression()?;
                self.expect(Token::RParen)?;
                Ok(expr)
            }
            other => Err(QasmError::syntax(pos, "expression", format!("`{other}`"))),
        }
    }

    /// Parse a unary function call, the function token still current.
    fn parse_call(&mut self, func: UnaryFn) -> QasmResult<Expression> {
        self.advance();
        self.expect(Token::LParen)?;
        let arg = self.parse_expression()?;
        self.expect(Token::RParen)?;
        Ok(Expression::Call {
            func,
            arg: Box::new(arg),
        })
    }

    /// Binary operator at the cursor, if any.
    fn peek_binary_op(&self) -> Option<BinOp> {
        match self.peek()? {
            Token::Plus => Some(BinOp::Add),
            Token::Minus => Some(BinOp::Sub),
            Token::Star => Some(BinOp::Mul),
            Token::Slash => Some(BinOp::Div),
            Token::Caret => Some(BinOp::Pow),
            _ => None,
        }
    }

    /// Parse a parenthesized expression list; the opening paren is
    /// already consumed.
    pub(super) fn parse_expression_list(&mut self) -> QasmResult<Vec<Expression>> {
        if self.check(&Token::RParen) {
            return Ok(vec![]);
        }
        let mut exprs = vec![self.parse_expression()?];
        while self.consume(&Token::Comma) {
            exprs.push(self.parse_expression()?);
        }
        Ok(exprs)
    }
}

/// Operator precedence, loosest first.
fn op_precedence(op: BinOp) -> u8 {
    match op {
        BinOp::Add | BinOp::Sub => 1,
        BinOp::Mul | BinOp::Div => 2,
        BinOp::Pow => 3,
    }
}
