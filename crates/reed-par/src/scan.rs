//! Balanced scanning helpers over token slices.
//!
//! Both parsers work on slices rather than a token stream, so they need a
//! small set of utilities for finding matching delimiters and for locating
//! tokens at nesting depth zero ("top level").

use reed_lex::{Token, TokenKind};

use crate::ParseError;

/// Returns the index of the delimiter closing `tokens[open]`, counting
/// nesting of the same delimiter pair. `None` if the slice ends first.
pub fn find_closing(tokens: &[Token], open: usize) -> Option<usize> {
    let open_kind = tokens[open].kind;
    let close_kind = match open_kind {
        TokenKind::LeftParen => TokenKind::RightParen,
        TokenKind::LeftBracket => TokenKind::RightBracket,
        TokenKind::LeftBrace => TokenKind::RightBrace,
        _ => return None,
    };

    let mut depth = 0usize;
    for (offset, token) in tokens[open..].iter().enumerate() {
        if token.kind == open_kind {
            depth += 1;
        } else if token.kind == close_kind {
            depth -= 1;
            if depth == 0 {
                return Some(open + offset);
            }
        }
    }

    None
}

/// Verifies that every paren and bracket in the slice is matched. Braces do
/// not occur inside expressions, so only the two expression delimiter pairs
/// are checked.
pub fn check_balance(tokens: &[Token]) -> Result<(), ParseError> {
    let mut stack: Vec<&Token> = Vec::new();

    for token in tokens {
        match token.kind {
            TokenKind::LeftParen | TokenKind::LeftBracket => stack.push(token),
            TokenKind::RightParen => match stack.pop() {
                Some(open) if open.kind == TokenKind::LeftParen => {}
                _ => return Err(ParseError::UnmatchedParen { line: token.line }),
            },
            TokenKind::RightBracket => match stack.pop() {
                Some(open) if open.kind == TokenKind::LeftBracket => {}
                _ => return Err(ParseError::UnmatchedBracket { line: token.line }),
            },
            _ => {}
        }
    }

    if let Some(open) = stack.pop() {
        return Err(match open.kind {
            TokenKind::LeftParen => ParseError::UnmatchedParen { line: open.line },
            _ => ParseError::UnmatchedBracket { line: open.line },
        });
    }

    Ok(())
}

/// Returns the index of the first top-level token matching `pred`.
pub fn find_top_level(tokens: &[Token], pred: impl Fn(TokenKind) -> bool) -> Option<usize> {
    scan_top_level(tokens, pred).next()
}

/// Returns the index of the last top-level token matching `pred`.
pub fn rfind_top_level(tokens: &[Token], pred: impl Fn(TokenKind) -> bool) -> Option<usize> {
    scan_top_level(tokens, pred).last()
}

/// Splits the slice at every top-level token of the given kind. The
/// separators are not included in the pieces. A slice without any separator
/// yields one piece.
pub fn split_top_level(tokens: &[Token], kind: TokenKind) -> Vec<&[Token]> {
    let mut pieces = Vec::new();
    let mut start = 0;

    for idx in scan_top_level(tokens, |k| k == kind).collect::<Vec<_>>() {
        pieces.push(&tokens[start..idx]);
        start = idx + 1;
    }

    pieces.push(&tokens[start..]);
    pieces
}

/// Iterator over indices of top-level tokens matching `pred`. Depth is
/// tracked across parens, brackets, and braces together.
fn scan_top_level<'a>(
    tokens: &'a [Token],
    pred: impl Fn(TokenKind) -> bool + 'a,
) -> impl Iterator<Item = usize> + 'a {
    let mut depth = 0i32;
    tokens.iter().enumerate().filter_map(move |(idx, token)| {
        match token.kind {
            TokenKind::LeftParen | TokenKind::LeftBracket | TokenKind::LeftBrace => depth += 1,
            TokenKind::RightParen | TokenKind::RightBracket | TokenKind::RightBrace => depth -= 1,
            _ => {}
        }

        if depth == 0 && pred(token.kind) {
            Some(idx)
        } else {
            None
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use reed_lex::tokenize;

    fn toks(source: &str) -> Vec<Token> {
        tokenize(source).expect("lexing failed")
    }

    #[test]
    fn finds_matching_paren() {
        let tokens = toks("( a ( b ) c ) d");
        assert_eq!(find_closing(&tokens, 0), Some(6));
        assert_eq!(find_closing(&tokens, 2), Some(4));
    }

    #[test]
    fn missing_close_returns_none() {
        let tokens = toks("( a ( b )");
        assert_eq!(find_closing(&tokens, 0), None);
    }

    #[test]
    fn balance_check_accepts_nested() {
        assert!(check_balance(&toks("( [ 1 , 2 ] )")).is_ok());
        assert!(check_balance(&toks("f ( g ( x ) )")).is_ok());
    }

    #[test]
    fn balance_check_rejects_unmatched() {
        assert!(matches!(
            check_balance(&toks("( 1")),
            Err(ParseError::UnmatchedParen { .. })
        ));
        assert!(matches!(
            check_balance(&toks("1 ]")),
            Err(ParseError::UnmatchedBracket { .. })
        ));
        assert!(matches!(
            check_balance(&toks("( 1 ]")),
            Err(ParseError::UnmatchedBracket { .. })
        ));
    }

    #[test]
    fn top_level_scan_skips_nested() {
        let tokens = toks("a , f ( b , c ) , d");
        let commas: Vec<usize> =
            [find_top_level(&tokens, |k| k == TokenKind::Comma).unwrap()].to_vec();
        assert_eq!(commas, vec![1]);
        assert_eq!(rfind_top_level(&tokens, |k| k == TokenKind::Comma), Some(8));
    }

    #[test]
    fn split_top_level_keeps_nested_commas() {
        let tokens = toks("a , f ( b , c ) , d");
        let pieces = split_top_level(&tokens, TokenKind::Comma);
        assert_eq!(pieces.len(), 3);
        assert_eq!(pieces[0].len(), 1);
        assert_eq!(pieces[1].len(), 6);
        assert_eq!(pieces[2].len(), 1);
    }

    #[test]
    fn split_without_separator_is_whole_slice() {
        let tokens = toks("a + b");
        let pieces = split_top_level(&tokens, TokenKind::Comma);
        assert_eq!(pieces.len(), 1);
        assert_eq!(pieces[0].len(), 3);
    }
}
