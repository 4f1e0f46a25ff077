//! Single-variable algebraic expressions.
//!
//! Stages:
//!
//! - `lexer`  : text -> tokens (with byte offsets for error messages)
//! - `parser` : tokens -> `Expr` tree (recursive descent)
//! - `ast`    : `Expr` evaluation with domain checks
//! - `format` : number rendering used when a fitted model is written out as text
//!
//! The variable is always `x`. Fitted models render into this language and the
//! integrator parses it back, so both sides must agree on the grammar.

pub mod ast;
pub mod format;
pub mod lexer;
pub mod parser;

pub use ast::*;
pub use format::*;
pub use parser::{ParseError, parse};
