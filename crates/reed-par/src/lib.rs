//! reed-par - Parsing for the Reed language.
//!
//! Turns the token sequence produced by `reed-lex` into a typed AST. The
//! statement parser owns the top level and delegates expression sub-ranges to
//! the expression parser, which works by recursive precedence climbing over
//! token slices (see [`expr`]).
//!
//! The entry point is [`parse_statements`]:
//!
//! ```
//! use reed_lex::tokenize;
//! use reed_par::parse_statements;
//!
//! let tokens = tokenize("print 1 + 2;").unwrap();
//! let program = parse_statements(&tokens).unwrap();
//! assert_eq!(program.len(), 1);
//! ```

use thiserror::Error;

pub mod ast;
pub mod expr;
pub mod scan;
pub mod stmt;

pub use ast::{Expression, Statement};
pub use expr::parse_expression;
pub use stmt::parse_statements;

/// Errors produced while parsing expressions or statements. Each carries the
/// 1-based line of the construct being parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("unmatched parentheses, line {line}")]
    UnmatchedParen { line: u32 },

    #[error("unmatched brackets, line {line}")]
    UnmatchedBracket { line: u32 },

    #[error("expected }} to end block, line {line}")]
    NoBrace { line: u32 },

    #[error("expected ; to end statement, line {line}")]
    NoSemicolon { line: u32 },

    #[error("expected block after statement identifier, line {line}")]
    ExpectedBlock { line: u32 },

    #[error("expected if statement before else, line {line}")]
    ExpectedIf { line: u32 },

    #[error("invalid statement, line {line}")]
    InvalidStatement { line: u32 },

    #[error("invalid expression, line {line}")]
    InvalidExpression { line: u32 },

    #[error("expected expression, line {line}")]
    ExpectedExpression { line: u32 },

    #[error("expected identifier, line {line}")]
    ExpectedIdentifier { line: u32 },

    #[error("expected name after dot, line {line}")]
    ExpectedName { line: u32 },

    #[error("missing expression between commas, line {line}")]
    CommaError { line: u32 },
}
