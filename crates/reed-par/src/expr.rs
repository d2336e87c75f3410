//! Expression parsing by recursive precedence climbing over token slices.
//!
//! The parser never consumes a stream; it recursively splits a token slice.
//! Each entry attempts, in order:
//!
//! 1. empty slice -> `Empty`
//! 2. singleton -> `Variable` or `Literal`
//! 3. paren / bracket balance check
//! 4. top-level comma split -> `ArgList`
//! 5. leading unary operator -> `Unary`
//! 6. lowest-precedence top-level binary operator -> `Binary`
//! 7. whole-slice parens -> `Group`
//! 8. whole-slice brackets -> `ArrayLiteral`
//! 9. trailing `[ ... ]` -> `Index`
//! 10. trailing `( ... )` after any remaining top-level dot -> `Call`
//! 11. top-level `.` (split at the last) -> `Getter`
//! 12. otherwise the expression is invalid
//!
//! Dots, index brackets, and call parens split at the *last* occurrence so
//! chained calls and getters parse into a left-deep tree. The operator scan
//! keeps the *first* occurrence of the lowest kind, matching the numeric
//! ordering declared on [`TokenKind`].

use reed_lex::{Token, TokenKind};

use crate::ast::Expression;
use crate::scan::{check_balance, find_closing, rfind_top_level, split_top_level};
use crate::ParseError;

/// Parses one expression from a token slice.
pub fn parse_expression(tokens: &[Token]) -> Result<Expression, ParseError> {
    if tokens.is_empty() {
        return Ok(Expression::Empty { line: 0 });
    }

    let line = tokens[0].line;

    if let Some(bad) = tokens.iter().find(|t| !t.kind.is_expression_token()) {
        return Err(ParseError::InvalidExpression { line: bad.line });
    }

    check_balance(tokens)?;

    if tokens.len() == 1 {
        return parse_single(&tokens[0]);
    }

    // Comma-separated expressions become an argument list. An empty piece
    // means two commas ran together or the list ended on one.
    let pieces = split_top_level(tokens, TokenKind::Comma);
    if pieces.len() > 1 {
        let mut items = Vec::with_capacity(pieces.len());
        for piece in pieces {
            if piece.is_empty() {
                return Err(ParseError::CommaError { line });
            }
            items.push(parse_expression(piece)?);
        }

        return Ok(Expression::ArgList { items, line });
    }

    if let Some(idx) = lowest_operator(tokens) {
        let op = &tokens[idx];

        // A unary expression is an operator followed by a single operand, or
        // any slice whose loosest operator kind is unary and also leads it.
        if tokens.len() == 2 || (op.kind.is_unary_operator() && op.kind == tokens[0].kind) {
            if !tokens[0].kind.is_unary_operator() {
                return Err(ParseError::InvalidExpression { line });
            }

            let right = parse_expression(&tokens[1..])?;
            return Ok(Expression::Unary {
                op: tokens[0].clone(),
                right: Box::new(right),
                line,
            });
        }

        // A binary operator at either edge has a missing operand.
        if idx == 0 || idx == tokens.len() - 1 {
            return Err(ParseError::InvalidExpression { line: op.line });
        }

        let left = parse_expression(&tokens[..idx])?;
        let right = parse_expression(&tokens[idx + 1..])?;
        return Ok(Expression::Binary {
            op: op.clone(),
            left: Box::new(left),
            right: Box::new(right),
            line,
        });
    }

    let last = tokens.len() - 1;

    // Whole-slice parenthesized form.
    if tokens[0].kind == TokenKind::LeftParen && find_closing(tokens, 0) == Some(last) {
        let inner = &tokens[1..last];
        if inner.is_empty() {
            return Err(ParseError::ExpectedExpression { line });
        }

        let inner = parse_expression(inner)?;
        return Ok(Expression::Group {
            inner: Box::new(inner),
            line,
        });
    }

    // Whole-slice bracketed form. `[]` is the empty array.
    if tokens[0].kind == TokenKind::LeftBracket && find_closing(tokens, 0) == Some(last) {
        let items = parse_expression(&tokens[1..last])?;
        return Ok(Expression::ArrayLiteral {
            items: Box::new(items),
            line,
        });
    }

    // Trailing `[ ... ]` indexes whatever comes before it.
    if tokens[last].kind == TokenKind::RightBracket {
        if let Some(open) = opening_for_last(tokens, TokenKind::LeftBracket) {
            let index = parse_expression(&tokens[open + 1..last])?;
            if index.is_empty() {
                return Err(ParseError::ExpectedExpression { line });
            }

            let target = parse_expression(&tokens[..open])?;
            return Ok(Expression::Index {
                target: Box::new(target),
                index: Box::new(index),
                line,
            });
        }
    }

    let last_dot = rfind_top_level(tokens, |k| k == TokenKind::Dot);

    // Trailing `( ... )` is a call when the callee part is not split by a
    // later dot (a dot after the open paren belongs to a getter instead).
    if tokens[last].kind == TokenKind::RightParen {
        if let Some(open) = opening_for_last(tokens, TokenKind::LeftParen) {
            if open > 0 && last_dot.map_or(true, |dot| open > dot) {
                let callee = parse_expression(&tokens[..open])?;
                let args = parse_expression(&tokens[open + 1..last])?;
                return Ok(Expression::Call {
                    callee: Box::new(callee),
                    args: Box::new(args),
                    line,
                });
            }
        }
    }

    // Field access, split at the last top-level dot.
    if let Some(dot) = last_dot {
        if dot == 0 {
            return Err(ParseError::InvalidExpression { line });
        }

        let name = match tokens.get(dot + 1..) {
            Some([token]) if token.kind == TokenKind::Identifier => token.lexeme.clone(),
            _ => return Err(ParseError::ExpectedName { line: tokens[dot].line }),
        };

        let target = parse_expression(&tokens[..dot])?;
        return Ok(Expression::Getter {
            target: Box::new(target),
            name,
            line,
        });
    }

    Err(ParseError::InvalidExpression { line })
}

/// Parses a one-token expression: a variable reference or a literal.
fn parse_single(token: &Token) -> Result<Expression, ParseError> {
    if token.kind == TokenKind::Identifier {
        return Ok(Expression::Variable {
            name: token.lexeme.clone(),
            line: token.line,
        });
    }

    match &token.literal {
        Some(literal) => Ok(Expression::Literal {
            value: literal.clone(),
            line: token.line,
        }),
        None => Err(ParseError::InvalidExpression { line: token.line }),
    }
}

/// Finds the first top-level operator with the lowest-precedence kind.
fn lowest_operator(tokens: &[Token]) -> Option<usize> {
    let mut depth = 0i32;
    let mut best: Option<usize> = None;

    for (idx, token) in tokens.iter().enumerate() {
        match token.kind {
            TokenKind::LeftParen | TokenKind::LeftBracket => {
                depth += 1;
                continue;
            }
            TokenKind::RightParen | TokenKind::RightBracket => {
                depth -= 1;
                continue;
            }
            _ => {}
        }

        if depth == 0
            && token.kind.is_operator()
            && best.map_or(true, |b| token.kind < tokens[b].kind)
        {
            best = Some(idx);
        }
    }

    best
}

/// Finds the opening delimiter whose matching close is the slice's final
/// token.
fn opening_for_last(tokens: &[Token], open_kind: TokenKind) -> Option<usize> {
    let last = tokens.len() - 1;
    (0..last)
        .find(|&idx| tokens[idx].kind == open_kind && find_closing(tokens, idx) == Some(last))
}

#[cfg(test)]
mod tests {
    use super::*;
    use reed_lex::{tokenize, Literal};

    fn parse(source: &str) -> Expression {
        let tokens = tokenize(source).expect("lexing failed");
        parse_expression(&tokens).expect("parsing failed")
    }

    fn parse_err(source: &str) -> ParseError {
        let tokens = tokenize(source).expect("lexing failed");
        parse_expression(&tokens).expect_err("parse should fail")
    }

    fn number(expr: &Expression) -> f64 {
        match expr {
            Expression::Literal {
                value: Literal::Number(n),
                ..
            } => *n,
            other => panic!("expected number literal, got {other:?}"),
        }
    }

    #[test]
    fn parses_literals_and_variables() {
        assert!(matches!(parse("1"), Expression::Literal { .. }));
        assert!(matches!(parse("\"hi\""), Expression::Literal { .. }));
        assert!(matches!(parse("true"), Expression::Literal { .. }));
        assert!(matches!(parse("nil"), Expression::Literal { .. }));
        assert!(matches!(parse("x"), Expression::Variable { .. }));
    }

    #[test]
    fn multiplication_binds_tighter_than_addition() {
        // 1 + 2 * 3 splits at +, not *.
        let Expression::Binary { op, left, right, .. } = parse("1 + 2 * 3") else {
            panic!("expected binary");
        };
        assert_eq!(op.kind, TokenKind::Plus);
        assert_eq!(number(&left), 1.0);
        assert!(matches!(*right, Expression::Binary { .. }));
    }

    #[test]
    fn comparison_binds_looser_than_arithmetic() {
        let Expression::Binary { op, .. } = parse("a + 1 < b * 2") else {
            panic!("expected binary");
        };
        assert_eq!(op.kind, TokenKind::Less);
    }

    #[test]
    fn groups_override_precedence() {
        let Expression::Binary { op, left, .. } = parse("(1 + 2) * 3") else {
            panic!("expected binary");
        };
        assert_eq!(op.kind, TokenKind::Star);
        assert!(matches!(*left, Expression::Group { .. }));
    }

    #[test]
    fn parses_unary_operators() {
        let Expression::Unary { op, right, .. } = parse("-x") else {
            panic!("expected unary");
        };
        assert_eq!(op.kind, TokenKind::Minus);
        assert!(matches!(*right, Expression::Variable { .. }));

        assert!(matches!(parse("!ready"), Expression::Unary { .. }));
        assert!(matches!(parse("type x"), Expression::Unary { .. }));
    }

    #[test]
    fn unary_minus_inside_binary() {
        // -1 + 2 splits at +, leaving a unary minus on the left.
        let Expression::Binary { op, left, .. } = parse("-1 + 2") else {
            panic!("expected binary");
        };
        assert_eq!(op.kind, TokenKind::Plus);
        assert!(matches!(*left, Expression::Unary { .. }));
    }

    #[test]
    fn type_operator_in_comparison() {
        // type x == "number" compares the type string, it does not take the
        // type of the whole comparison.
        let Expression::Binary { op, left, .. } = parse("type x == \"number\"") else {
            panic!("expected binary");
        };
        assert_eq!(op.kind, TokenKind::EqualEqual);
        assert!(matches!(*left, Expression::Unary { .. }));
    }

    #[test]
    fn parses_calls() {
        let Expression::Call { callee, args, .. } = parse("add(1, 2)") else {
            panic!("expected call");
        };
        assert!(matches!(*callee, Expression::Variable { .. }));
        let Expression::ArgList { items, .. } = *args else {
            panic!("expected arg list");
        };
        assert_eq!(items.len(), 2);
    }

    #[test]
    fn call_without_args_has_empty_args() {
        let Expression::Call { args, .. } = parse("now()") else {
            panic!("expected call");
        };
        assert!(args.is_empty());
    }

    #[test]
    fn nested_call_arguments() {
        let Expression::Call { args, .. } = parse("f(g(1), h(2, 3))") else {
            panic!("expected call");
        };
        let Expression::ArgList { items, .. } = *args else {
            panic!("expected arg list");
        };
        assert_eq!(items.len(), 2);
        assert!(matches!(items[0], Expression::Call { .. }));
    }

    #[test]
    fn chained_calls_and_getters_parse_left_deep() {
        // m.f(x).g reads as Getter(Call(Getter(m, f), x), g).
        let Expression::Getter { target, name, .. } = parse("m.f(x).g") else {
            panic!("expected getter");
        };
        assert_eq!(name, "g");
        let Expression::Call { callee, .. } = *target else {
            panic!("expected call");
        };
        assert!(matches!(*callee, Expression::Getter { .. }));
    }

    #[test]
    fn getter_then_call() {
        let Expression::Call { callee, .. } = parse("str.upper(name)") else {
            panic!("expected call");
        };
        let Expression::Getter { name, .. } = *callee else {
            panic!("expected getter");
        };
        assert_eq!(name, "upper");
    }

    #[test]
    fn parses_array_literals() {
        let Expression::ArrayLiteral { items, .. } = parse("[1, 2, 3]") else {
            panic!("expected array literal");
        };
        assert!(matches!(*items, Expression::ArgList { .. }));

        let Expression::ArrayLiteral { items, .. } = parse("[]") else {
            panic!("expected array literal");
        };
        assert!(items.is_empty());
    }

    #[test]
    fn parses_indexing() {
        let Expression::Index { target, index, .. } = parse("arr[0]") else {
            panic!("expected index");
        };
        assert!(matches!(*target, Expression::Variable { .. }));
        assert_eq!(number(&index), 0.0);

        // Chained indexing is left-deep.
        let Expression::Index { target, .. } = parse("grid[1][2]") else {
            panic!("expected index");
        };
        assert!(matches!(*target, Expression::Index { .. }));
    }

    #[test]
    fn index_into_literal_array() {
        let Expression::Index { target, .. } = parse("[10, 20][1]") else {
            panic!("expected index");
        };
        assert!(matches!(*target, Expression::ArrayLiteral { .. }));
    }

    #[test]
    fn reports_unmatched_delimiters() {
        assert!(matches!(parse_err("(1 + 2"), ParseError::UnmatchedParen { .. }));
        assert!(matches!(parse_err("1 + 2)"), ParseError::UnmatchedParen { .. }));
        assert!(matches!(parse_err("[1, 2"), ParseError::UnmatchedBracket { .. }));
    }

    #[test]
    fn reports_comma_errors() {
        assert!(matches!(parse_err("1, , 2"), ParseError::CommaError { .. }));
        assert!(matches!(parse_err("1, 2,"), ParseError::CommaError { .. }));
    }

    #[test]
    fn reports_empty_group() {
        assert!(matches!(parse_err("()"), ParseError::ExpectedExpression { .. }));
    }

    #[test]
    fn reports_missing_getter_name() {
        assert!(matches!(parse_err("obj."), ParseError::ExpectedName { .. }));
        assert!(matches!(parse_err("obj.(x)"), ParseError::ExpectedName { .. }));
    }

    #[test]
    fn reports_invalid_expressions() {
        assert!(matches!(parse_err("1 +"), ParseError::InvalidExpression { .. }));
        assert!(matches!(parse_err("* 2"), ParseError::InvalidExpression { .. }));
        assert!(matches!(parse_err("1 2"), ParseError::InvalidExpression { .. }));
    }

    #[test]
    fn rejects_statement_keywords_in_expressions() {
        assert!(matches!(parse_err("1 + if"), ParseError::InvalidExpression { .. }));
        assert!(matches!(parse_err("print"), ParseError::InvalidExpression { .. }));
    }

    #[test]
    fn line_numbers_come_from_first_token() {
        let tokens = tokenize("\n\n1 + 2").unwrap();
        let expr = parse_expression(&tokens).unwrap();
        assert_eq!(expr.line(), 3);
    }
}
