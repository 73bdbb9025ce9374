//! Pratt parser for equations.
//!
//! | BP (L,R)  | Operators |
//! |-----------|-----------|
//! | (1,2)     | `+` `-` |
//! | (3,4)     | `*` `/` |
//! | (6,5)     | `^` (right-assoc) |
//! | prefix 4  | unary `-` `+` |
//!
//! Unary minus binds looser than `^`, so `-x ^ 2` is `-(x ^ 2)`.

use crate::ast::{BinaryOp, Expr};
use crate::error::ExprError;
use crate::lexer::{lex, Token, TokenKind};

/// Binding power for binary operators. Returns (left_bp, right_bp).
fn infix_binding_power(op: BinaryOp) -> (u8, u8) {
    match op {
        BinaryOp::Add | BinaryOp::Sub => (1, 2),
        BinaryOp::Mul | BinaryOp::Div => (3, 4),
        BinaryOp::Pow => (6, 5), // right-associative
    }
}

const PREFIX_BP: u8 = 4;

/// Parses an equation into an expression tree.
pub fn parse(source: &str) -> Result<Expr, ExprError> {
    let tokens = lex(source)?;
    if tokens.len() == 1 {
        return Err(ExprError::Empty);
    }
    let mut parser = Parser { tokens, pos: 0 };
    let expr = parser.parse_expr_bp(0)?;
    match parser.current() {
        Token {
            kind: TokenKind::Eof,
            ..
        } => Ok(expr),
        tok => Err(unexpected(tok)),
    }
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

fn unexpected(tok: &Token) -> ExprError {
    ExprError::UnexpectedToken {
        found: tok.kind.describe(),
        pos: tok.pos,
    }
}

impl Parser {
    fn current(&self) -> &Token {
        // lex() guarantees a trailing Eof and the parser never advances past it
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    fn advance(&mut self) -> Token {
        let tok = self.current().clone();
        if tok.kind != TokenKind::Eof {
            self.pos += 1;
        }
        tok
    }

    fn parse_expr_bp(&mut self, min_bp: u8) -> Result<Expr, ExprError> {
        let mut lhs = self.parse_prefix()?;

        loop {
            let op = match self.current().kind {
                TokenKind::Plus => BinaryOp::Add,
                TokenKind::Minus => BinaryOp::Sub,
                TokenKind::Star => BinaryOp::Mul,
                TokenKind::Slash => BinaryOp::Div,
                TokenKind::Caret => BinaryOp::Pow,
                _ => break,
            };
            let (l_bp, r_bp) = infix_binding_power(op);
            if l_bp < min_bp {
                break;
            }
            self.advance();
            let rhs = self.parse_expr_bp(r_bp)?;
            lhs = Expr::binary(op, lhs, rhs);
        }

        Ok(lhs)
    }

    fn parse_prefix(&mut self) -> Result<Expr, ExprError> {
        let tok = self.advance();
        match tok.kind {
            TokenKind::Number(n) => Ok(Expr::Number(n)),
            TokenKind::Ident(name) => Ok(Expr::Var(name)),
            TokenKind::Minus => {
                let operand = self.parse_expr_bp(PREFIX_BP)?;
                Ok(Expr::Neg(Box::new(operand)))
            }
            TokenKind::Plus => self.parse_expr_bp(PREFIX_BP),
            TokenKind::LeftParen => {
                let inner = self.parse_expr_bp(0)?;
                let close = self.advance();
                if close.kind != TokenKind::RightParen {
                    return Err(unexpected(&close));
                }
                Ok(inner)
            }
            _ => Err(unexpected(&tok)),
        }
    }
}
