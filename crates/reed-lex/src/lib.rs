//! reed-lex - Lexical analysis for the Reed language.
//!
//! This crate turns Reed source text into a flat sequence of [`Token`]s.
//! Token kinds form one closed enumeration whose operator block is declared
//! in precedence order, which is the only precedence mechanism the parser
//! needs (see [`TokenKind`]).
//!
//! The entry point is [`tokenize`]:
//!
//! ```
//! use reed_lex::{tokenize, TokenKind};
//!
//! let tokens = tokenize("x := 1;").unwrap();
//! assert_eq!(tokens[1].kind, TokenKind::ColonEqual);
//! ```

pub mod cursor;
mod lexer;
mod token;

pub use lexer::{tokenize, LexError, Lexer};
pub use token::{keyword_from_ident, Literal, Token, TokenKind};
