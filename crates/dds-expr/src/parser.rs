//! Pratt parser for custom-field expressions.

use crate::ast::{BinaryOp, Expr, UnaryOp};
use crate::error::{ExprError, Result};
use crate::functions::Function;
use crate::lexer::Lexer;
use crate::precedence::Precedence;
use crate::token::{Token, TokenKind};
use crate::value::Value;

/// Deepest nesting of parentheses, calls and operator operands.
pub const MAX_DEPTH: usize = 64;

/// Most tokens one expression may contain.
pub const MAX_TOKENS: usize = 1024;

/// Parses an expression. Field names are left unresolved.
pub fn parse(source: &str) -> Result<Expr> {
    let tokens = Lexer::new(source).tokenize()?;
    // The stream always ends with Eof.
    let count = tokens.len().saturating_sub(1);
    if count > MAX_TOKENS {
        return Err(ExprError::TooLong {
            tokens: count,
            limit: MAX_TOKENS,
        });
    }
    let mut parser = Parser::new(tokens);
    if parser.cur_is(&TokenKind::Eof) {
        return Err(ExprError::Empty);
    }
    let expr = parser.parse_expression(Precedence::Lowest)?;
    parser.expect(&TokenKind::Eof, "end of input")?;
    Ok(expr)
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    depth: usize,
}

impl Parser {
    fn new(tokens: Vec<Token>) -> Self {
        Self {
            tokens,
            pos: 0,
            depth: 0,
        }
    }

    fn current(&self) -> &Token {
        // The lexer always ends the stream with Eof and the parser never
        // advances past it.
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    fn cur_is(&self, kind: &TokenKind) -> bool {
        &self.current().kind == kind
    }

    fn advance(&mut self) -> Token {
        let token = self.current().clone();
        if token.kind != TokenKind::Eof {
            self.pos += 1;
        }
        token
    }

    fn expect(&mut self, kind: &TokenKind, expected: &'static str) -> Result<Token> {
        if self.cur_is(kind) {
            Ok(self.advance())
        } else {
            Err(self.unexpected(expected))
        }
    }

    fn unexpected(&self, expected: &'static str) -> ExprError {
        let token = self.current();
        ExprError::UnexpectedToken {
            expected,
            found: token.kind.to_string(),
            position: token.position,
        }
    }

    fn parse_expression(&mut self, precedence: Precedence) -> Result<Expr> {
        if self.depth >= MAX_DEPTH {
            return Err(ExprError::TooDeep {
                limit: MAX_DEPTH,
                position: self.current().position,
            });
        }
        self.depth += 1;
        let result = self.parse_infix(precedence);
        self.depth -= 1;
        result
    }

    fn parse_infix(&mut self, precedence: Precedence) -> Result<Expr> {
        let mut left = self.parse_prefix()?;

        while let Some(op) = BinaryOp::from_token(&self.current().kind) {
            if precedence >= Precedence::for_operator(op) {
                break;
            }
            self.advance();
            let right = self.parse_expression(Precedence::right_operand(op))?;
            left = Expr::Binary {
                op,
                left: Box::new(left),
                right: Box::new(right),
            };
        }

        Ok(left)
    }

    fn parse_prefix(&mut self) -> Result<Expr> {
        let token = self.advance();
        match token.kind {
            TokenKind::Number(value) => Ok(Expr::Literal(Value::Number(value))),
            TokenKind::Str(text) => Ok(Expr::Literal(Value::Text(text))),
            TokenKind::True => Ok(Expr::Literal(Value::Bool(true))),
            TokenKind::False => Ok(Expr::Literal(Value::Bool(false))),
            TokenKind::Null => Ok(Expr::Literal(Value::Null)),
            TokenKind::Field(name) => Ok(Expr::Field {
                name,
                position: token.position,
            }),
            TokenKind::Ident(name) => {
                if self.cur_is(&TokenKind::LParen) {
                    self.parse_call(name, token.position)
                } else {
                    Ok(Expr::Field {
                        name,
                        position: token.position,
                    })
                }
            }
            TokenKind::Minus => self.parse_unary(UnaryOp::Neg, Precedence::Prefix),
            TokenKind::Plus => self.parse_unary(UnaryOp::Plus, Precedence::Prefix),
            TokenKind::Not => self.parse_unary(UnaryOp::Not, Precedence::Not),
            TokenKind::LParen => {
                let inner = self.parse_expression(Precedence::Lowest)?;
                self.expect(&TokenKind::RParen, "')'")?;
                Ok(inner)
            }
            kind => Err(ExprError::UnexpectedToken {
                expected: "expression",
                found: kind.to_string(),
                position: token.position,
            }),
        }
    }

    fn parse_unary(&mut self, op: UnaryOp, precedence: Precedence) -> Result<Expr> {
        let operand = self.parse_expression(precedence)?;
        Ok(Expr::Unary {
            op,
            operand: Box::new(operand),
        })
    }

    fn parse_call(&mut self, name: String, position: usize) -> Result<Expr> {
        let function =
            Function::lookup(&name).ok_or(ExprError::UnknownFunction { name, position })?;
        self.expect(&TokenKind::LParen, "'('")?;

        let mut args = Vec::new();
        if !self.cur_is(&TokenKind::RParen) {
            loop {
                args.push(self.parse_expression(Precedence::Lowest)?);
                if self.cur_is(&TokenKind::Comma) {
                    self.advance();
                } else {
                    break;
                }
            }
        }
        self.expect(&TokenKind::RParen, "',' or ')'")?;

        let arity = function.arity();
        if !arity.accepts(args.len()) {
            return Err(ExprError::Arity {
                function: function.name(),
                expected: arity.describe(),
                found: args.len(),
                position,
            });
        }
        Ok(Expr::Call { function, args })
    }
}
