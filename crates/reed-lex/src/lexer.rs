//! Main lexer implementation for the Reed language.
//!
//! A single forward scan with one character of lookahead turns source text
//! into a flat token sequence. Whitespace is skipped, `#` comments run to the
//! end of the line, and double-symbol operators are matched by peeking at the
//! next character before committing to the single-symbol kind.
//!
//! One Reed-specific wrinkle lives here rather than in the parser: a dotted
//! word with no surrounding whitespace (`vec.x`, `lib.start.run`) is split
//! into alternating identifier and `.` tokens, unless the whole word parses
//! as a number (`1.5` stays one numeric literal).

use thiserror::Error;

use crate::cursor::Cursor;
use crate::token::{keyword_from_ident, Literal, Token, TokenKind};

/// Errors produced during tokenization. Each carries the offending lexeme
/// (where there is one) and the 1-based source line.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LexError {
    #[error("unexpected token: '{lexeme}', line {line}")]
    UnexpectedToken { lexeme: String, line: u32 },

    #[error("unterminated string, line {line}")]
    UnterminatedString { line: u32 },

    #[error("invalid syntax: '{lexeme}', line {line}")]
    InvalidSyntax { lexeme: String, line: u32 },
}

/// Tokenizes an entire source text.
///
/// # Example
///
/// ```
/// use reed_lex::{tokenize, TokenKind};
///
/// let tokens = tokenize("print 1 + 2;").unwrap();
/// let kinds: Vec<TokenKind> = tokens.iter().map(|t| t.kind).collect();
/// assert_eq!(
///     kinds,
///     vec![
///         TokenKind::Print,
///         TokenKind::Number,
///         TokenKind::Plus,
///         TokenKind::Number,
///         TokenKind::Semicolon,
///     ]
/// );
/// ```
pub fn tokenize(source: &str) -> Result<Vec<Token>, LexError> {
    Lexer::new(source).lex()
}

/// The Reed lexer. Owns a cursor over the source and accumulates tokens.
pub struct Lexer<'a> {
    cursor: Cursor<'a>,
    tokens: Vec<Token>,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            cursor: Cursor::new(source),
            tokens: Vec::new(),
        }
    }

    /// Consumes the lexer and returns the token sequence.
    pub fn lex(mut self) -> Result<Vec<Token>, LexError> {
        while let Some(ch) = self.cursor.current() {
            if ch.is_whitespace() {
                self.cursor.advance();
                continue;
            }

            if ch == '#' {
                self.skip_comment();
                continue;
            }

            if ch == '"' {
                self.lex_string()?;
                continue;
            }

            if ch.is_ascii_alphanumeric() || ch == '_' {
                self.lex_word()?;
                continue;
            }

            self.lex_symbol(ch)?;
        }

        Ok(self.tokens)
    }

    fn skip_comment(&mut self) {
        while let Some(ch) = self.cursor.current() {
            if ch == '\n' {
                break;
            }
            self.cursor.advance();
        }
    }

    /// Lexes one symbol token, checking whether the next character forms a
    /// known double-symbol operator before settling on the single kind.
    fn lex_symbol(&mut self, ch: char) -> Result<(), LexError> {
        let line = self.cursor.line();
        self.cursor.advance();

        let followed_by_equal = self.cursor.current() == Some('=');

        let (kind, lexeme) = match ch {
            '(' => (TokenKind::LeftParen, "("),
            ')' => (TokenKind::RightParen, ")"),
            '{' => (TokenKind::LeftBrace, "{"),
            '}' => (TokenKind::RightBrace, "}"),
            '[' => (TokenKind::LeftBracket, "["),
            ']' => (TokenKind::RightBracket, "]"),
            ',' => (TokenKind::Comma, ","),
            ';' => (TokenKind::Semicolon, ";"),
            '.' => (TokenKind::Dot, "."),
            '%' => (TokenKind::Percent, "%"),
            '^' => (TokenKind::Caret, "^"),

            '+' if followed_by_equal => {
                self.cursor.advance();
                (TokenKind::PlusEqual, "+=")
            }
            '+' => (TokenKind::Plus, "+"),

            '-' if followed_by_equal => {
                self.cursor.advance();
                (TokenKind::MinusEqual, "-=")
            }
            '-' => (TokenKind::Minus, "-"),

            '*' if followed_by_equal => {
                self.cursor.advance();
                (TokenKind::StarEqual, "*=")
            }
            '*' => (TokenKind::Star, "*"),

            '/' if followed_by_equal => {
                self.cursor.advance();
                (TokenKind::SlashEqual, "/=")
            }
            '/' => (TokenKind::Slash, "/"),

            '=' if followed_by_equal => {
                self.cursor.advance();
                (TokenKind::EqualEqual, "==")
            }
            '=' => (TokenKind::Equal, "="),

            '!' if followed_by_equal => {
                self.cursor.advance();
                (TokenKind::NotEqual, "!=")
            }
            '!' => (TokenKind::Bang, "!"),

            '<' if followed_by_equal => {
                self.cursor.advance();
                (TokenKind::LessEqual, "<=")
            }
            '<' => (TokenKind::Less, "<"),

            '>' if followed_by_equal => {
                self.cursor.advance();
                (TokenKind::GreaterEqual, ">=")
            }
            '>' => (TokenKind::Greater, ">"),

            ':' if followed_by_equal => {
                self.cursor.advance();
                (TokenKind::ColonEqual, ":=")
            }

            '&' if self.cursor.current() == Some('&') => {
                self.cursor.advance();
                (TokenKind::And, "&&")
            }

            '|' if self.cursor.current() == Some('|') => {
                self.cursor.advance();
                (TokenKind::Or, "||")
            }

            _ => {
                return Err(LexError::UnexpectedToken {
                    lexeme: ch.to_string(),
                    line,
                })
            }
        };

        self.tokens.push(Token::new(kind, lexeme, line));
        Ok(())
    }

    /// Lexes a string literal. No escape processing is performed; the literal
    /// runs to the next `"` or fails at end of input.
    fn lex_string(&mut self) -> Result<(), LexError> {
        let line = self.cursor.line();
        self.cursor.advance(); // opening quote

        let mut contents = String::new();
        loop {
            match self.cursor.advance() {
                Some('"') => break,
                Some(ch) => contents.push(ch),
                None => return Err(LexError::UnterminatedString { line }),
            }
        }

        let lexeme = format!("\"{contents}\"");
        self.tokens
            .push(Token::with_literal(TokenKind::Str, lexeme, Literal::Str(contents), line));
        Ok(())
    }

    /// Lexes an identifier, keyword, number, or dotted word.
    ///
    /// The whole run of `[A-Za-z0-9_.]` is consumed first. A run starting
    /// with a digit that parses as a number becomes one numeric literal;
    /// anything else is split on dots into identifier / `.` alternation.
    fn lex_word(&mut self) -> Result<(), LexError> {
        let line = self.cursor.line();

        let mut word = String::new();
        while let Some(ch) = self
            .cursor
            .advance_if(|c| c.is_ascii_alphanumeric() || c == '_' || c == '.')
        {
            word.push(ch);
        }

        if word.starts_with(|c: char| c.is_ascii_digit()) {
            if let Ok(value) = word.parse::<f64>() {
                self.tokens.push(Token::with_literal(
                    TokenKind::Number,
                    word,
                    Literal::Number(value),
                    line,
                ));
                return Ok(());
            }
        }

        if !word.contains('.') {
            self.push_word_fragment(&word, line)?;
            return Ok(());
        }

        let mut first = true;
        for fragment in word.split('.') {
            if !first {
                self.tokens.push(Token::new(TokenKind::Dot, ".", line));
            }
            first = false;

            if !fragment.is_empty() {
                self.push_word_fragment(fragment, line)?;
            }
        }

        Ok(())
    }

    /// Classifies a dot-free word fragment as a keyword, identifier, or
    /// numeric literal.
    fn push_word_fragment(&mut self, fragment: &str, line: u32) -> Result<(), LexError> {
        if fragment.starts_with(|c: char| c.is_ascii_digit()) {
            let Ok(value) = fragment.parse::<f64>() else {
                return Err(LexError::InvalidSyntax {
                    lexeme: fragment.to_string(),
                    line,
                });
            };

            self.tokens.push(Token::with_literal(
                TokenKind::Number,
                fragment,
                Literal::Number(value),
                line,
            ));
            return Ok(());
        }

        let token = match keyword_from_ident(fragment) {
            Some(TokenKind::True) => {
                Token::with_literal(TokenKind::True, fragment, Literal::Bool(true), line)
            }
            Some(TokenKind::False) => {
                Token::with_literal(TokenKind::False, fragment, Literal::Bool(false), line)
            }
            Some(TokenKind::Nil) => {
                Token::with_literal(TokenKind::Nil, fragment, Literal::Nil, line)
            }
            Some(kind) => Token::new(kind, fragment, line),
            None => Token::new(TokenKind::Identifier, fragment, line),
        };

        self.tokens.push(token);
        Ok(())
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    /// A fragment that lexes to exactly one token when surrounded by spaces.
    fn fragment() -> impl Strategy<Value = String> {
        prop_oneof![
            // Identifiers that are not keywords.
            "[a-z_][a-z0-9_]{0,6}".prop_filter("keyword collision", |s| {
                keyword_from_ident(s).is_none()
            }),
            // Integer and decimal literals.
            (0u32..100_000).prop_map(|n| n.to_string()),
            (0u32..1000, 1u32..100).prop_map(|(a, b)| format!("{a}.{b}")),
            // String literals (no quotes or backslashes inside).
            "[a-zA-Z0-9 ]{0,10}".prop_map(|s| format!("\"{s}\"")),
            // Operators and punctuation.
            Just("+".to_string()),
            Just("-".to_string()),
            Just("*".to_string()),
            Just("==".to_string()),
            Just("!=".to_string()),
            Just("<=".to_string()),
            Just(":=".to_string()),
            Just("&&".to_string()),
            Just("||".to_string()),
            Just("(".to_string()),
            Just(")".to_string()),
            Just("[".to_string()),
            Just("]".to_string()),
            Just(",".to_string()),
            Just(";".to_string()),
            // Keywords.
            Just("func".to_string()),
            Just("while".to_string()),
            Just("nil".to_string()),
            Just("true".to_string()),
        ]
    }

    proptest! {
        /// Joining the lexemes of a lexed program with spaces and re-lexing
        /// must reproduce the same kind stream.
        #[test]
        fn relex_round_trip(fragments in proptest::collection::vec(fragment(), 0..40)) {
            let source = fragments.join(" ");
            let tokens = tokenize(&source).expect("first lex");

            let joined = tokens
                .iter()
                .map(|t| t.lexeme.clone())
                .collect::<Vec<_>>()
                .join(" ");
            let relexed = tokenize(&joined).expect("second lex");

            let first: Vec<TokenKind> = tokens.iter().map(|t| t.kind).collect();
            let second: Vec<TokenKind> = relexed.iter().map(|t| t.kind).collect();
            prop_assert_eq!(first, second);
        }

        /// Every fragment lexes to exactly one token.
        #[test]
        fn fragments_are_single_tokens(fragment in fragment()) {
            let tokens = tokenize(&fragment).expect("lex");
            prop_assert_eq!(tokens.len(), 1);
        }
    }
}
