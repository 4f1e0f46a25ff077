//! Recursive-descent parser.
//!
//! Grammar (lowest to highest precedence):
//!
//! ```text
//! expr    := term (('+' | '-') term)*
//! term    := unary (('*' | '/') unary | <implicit> power)*
//! unary   := ('+' | '-') unary | power
//! power   := primary ('^' unary)?          right associative
//! primary := number | 'x' | 'e' | 'pi' | func '(' expr ')' | '(' expr ')'
//! ```
//!
//! Implicit multiplication applies when a factor is immediately followed by an
//! identifier or `(`, so `2x^2 + 3x`, `4(x+1)` and `0.5e^(0.3x)` all parse.
//!
//! Nesting is bounded by `MAX_DEPTH`: every unary operator, parenthesis,
//! function call and chained binary operator counts one level. That bound also
//! caps the height of the tree, so evaluation and `Display` recursion stay
//! shallow.

use thiserror::Error;

use super::ast::{BinOp, Expr, Func};
use super::lexer::{Spanned, Token, tokenize};

/// Deepest nesting accepted by the parser.
pub const MAX_DEPTH: usize = 256;

/// Malformed expression text.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{message} (at offset {position})")]
pub struct ParseError {
    /// Byte offset into the input.
    pub position: usize,
    pub message: String,
}

impl ParseError {
    pub fn new(position: usize, message: impl Into<String>) -> Self {
        Self {
            position,
            message: message.into(),
        }
    }
}

/// Parse `input` into an expression tree.
pub fn parse(input: &str) -> Result<Expr, ParseError> {
    let tokens = tokenize(input)?;
    if tokens.is_empty() {
        return Err(ParseError::new(0, "empty expression"));
    }

    let mut parser = Parser {
        tokens: &tokens,
        idx: 0,
        end: input.len(),
        depth: 0,
    };
    let expr = parser.expr()?;

    if let Some(extra) = parser.peek() {
        return Err(ParseError::new(
            extra.pos,
            format!("unexpected {}", describe(&extra.token)),
        ));
    }
    Ok(expr)
}

struct Parser<'a> {
    tokens: &'a [Spanned],
    idx: usize,
    end: usize,
    depth: usize,
}

impl<'a> Parser<'a> {
    fn peek(&self) -> Option<&'a Spanned> {
        self.tokens.get(self.idx)
    }

    fn next(&mut self) -> Option<&'a Spanned> {
        let tok = self.tokens.get(self.idx);
        if tok.is_some() {
            self.idx += 1;
        }
        tok
    }

    fn eat(&mut self, token: &Token) -> bool {
        match self.peek() {
            Some(s) if &s.token == token => {
                self.idx += 1;
                true
            }
            _ => false,
        }
    }

    /// Enter one nesting level; fails past `MAX_DEPTH`.
    fn descend(&mut self) -> Result<(), ParseError> {
        self.depth += 1;
        if self.depth > MAX_DEPTH {
            let pos = self.peek().map(|s| s.pos).unwrap_or(self.end);
            return Err(ParseError::new(pos, "expression nested too deeply"));
        }
        Ok(())
    }

    fn expr(&mut self) -> Result<Expr, ParseError> {
        let saved = self.depth;
        let mut lhs = self.term()?;
        loop {
            let op = if self.eat(&Token::Plus) {
                BinOp::Add
            } else if self.eat(&Token::Minus) {
                BinOp::Sub
            } else {
                self.depth = saved;
                return Ok(lhs);
            };
            self.descend()?;
            let rhs = self.term()?;
            lhs = Expr::Binary(op, Box::new(lhs), Box::new(rhs));
        }
    }

    fn term(&mut self) -> Result<Expr, ParseError> {
        let saved = self.depth;
        let mut lhs = self.unary()?;
        loop {
            let (op, rhs) = if self.eat(&Token::Star) {
                self.descend()?;
                (BinOp::Mul, self.unary()?)
            } else if self.eat(&Token::Slash) {
                self.descend()?;
                (BinOp::Div, self.unary()?)
            } else if matches!(
                self.peek().map(|s| &s.token),
                Some(Token::Ident(_)) | Some(Token::LParen)
            ) {
                self.descend()?;
                (BinOp::Mul, self.power()?)
            } else {
                self.depth = saved;
                return Ok(lhs);
            };
            lhs = Expr::Binary(op, Box::new(lhs), Box::new(rhs));
        }
    }

    fn unary(&mut self) -> Result<Expr, ParseError> {
        self.descend()?;
        let out = if self.eat(&Token::Minus) {
            Expr::Neg(Box::new(self.unary()?))
        } else if self.eat(&Token::Plus) {
            self.unary()?
        } else {
            self.power()?
        };
        self.depth -= 1;
        Ok(out)
    }

    fn power(&mut self) -> Result<Expr, ParseError> {
        let base = self.primary()?;
        if self.eat(&Token::Caret) {
            let exponent = self.unary()?;
            return Ok(Expr::Binary(BinOp::Pow, Box::new(base), Box::new(exponent)));
        }
        Ok(base)
    }

    fn primary(&mut self) -> Result<Expr, ParseError> {
        let end = self.end;
        let Some(tok) = self.next() else {
            return Err(ParseError::new(end, "unexpected end of expression"));
        };

        match &tok.token {
            Token::Number(v) => Ok(Expr::Num(*v)),
            Token::LParen => {
                self.descend()?;
                let inner = self.expr()?;
                self.expect_rparen(tok.pos)?;
                self.depth -= 1;
                Ok(inner)
            }
            Token::Ident(name) => match name.as_str() {
                "x" => Ok(Expr::Var),
                "e" => Ok(Expr::E),
                "pi" => Ok(Expr::Num(std::f64::consts::PI)),
                other => {
                    let Some(func) = Func::from_name(other) else {
                        return Err(ParseError::new(tok.pos, format!("unknown identifier '{other}'")));
                    };
                    if !self.eat(&Token::LParen) {
                        return Err(ParseError::new(
                            tok.pos,
                            format!("function '{other}' must be followed by '('"),
                        ));
                    }
                    self.descend()?;
                    let arg = self.expr()?;
                    self.expect_rparen(tok.pos)?;
                    self.depth -= 1;
                    Ok(Expr::Call(func, Box::new(arg)))
                }
            },
            other => Err(ParseError::new(tok.pos, format!("unexpected {}", describe(other)))),
        }
    }

    fn expect_rparen(&mut self, open_pos: usize) -> Result<(), ParseError> {
        if self.eat(&Token::RParen) {
            Ok(())
        } else {
            let pos = self.peek().map(|s| s.pos).unwrap_or(self.end);
            Err(ParseError::new(
                pos,
                format!("missing ')' for '(' at offset {open_pos}"),
            ))
        }
    }
}

fn describe(token: &Token) -> String {
    match token {
        Token::Number(v) => format!("number {v}"),
        Token::Ident(name) => format!("identifier '{name}'"),
        Token::Plus => "'+'".to_string(),
        Token::Minus => "'-'".to_string(),
        Token::Star => "'*'".to_string(),
        Token::Slash => "'/'".to_string(),
        Token::Caret => "'^'".to_string(),
        Token::LParen => "'('".to_string(),
        Token::RParen => "')'".to_string(),
    }
}
