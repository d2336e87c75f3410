//! Statement parsing.
//!
//! Statements come in two shapes. Simple statements run to the next
//! semicolon; hitting another statement keyword first means the semicolon is
//! missing. Block statements (`{`, `if`, `while`, `repeat`, `range`, `func`,
//! `define`, `enum`) are delimited by a matching brace and need no trailing
//! semicolon. The first token of a statement selects its parser; anything
//! unrecognised is an expression statement.

use std::rc::Rc;

use reed_lex::{Literal, Token, TokenKind};

use crate::ast::{Expression, Statement};
use crate::expr::parse_expression;
use crate::scan::{find_closing, find_top_level};
use crate::ParseError;

/// Parses a full token sequence into a statement list.
pub fn parse_statements(tokens: &[Token]) -> Result<Vec<Statement>, ParseError> {
    Parser::new(tokens).parse()
}

/// Slice-and-position statement parser.
struct Parser<'a> {
    tokens: &'a [Token],
    pos: usize,
}

impl<'a> Parser<'a> {
    fn new(tokens: &'a [Token]) -> Self {
        Self { tokens, pos: 0 }
    }

    fn parse(mut self) -> Result<Vec<Statement>, ParseError> {
        let mut statements = Vec::new();
        while self.pos < self.tokens.len() {
            statements.push(self.parse_statement()?);
        }

        Ok(statements)
    }

    fn parse_statement(&mut self) -> Result<Statement, ParseError> {
        match self.tokens[self.pos].kind {
            TokenKind::LeftBrace => self.parse_block(),
            TokenKind::If => self.parse_if(),
            TokenKind::While => self.parse_while(),
            TokenKind::Repeat => self.parse_repeat(),
            TokenKind::Range => self.parse_range(),
            TokenKind::Func => self.parse_func(),
            TokenKind::Define => self.parse_object_def(),
            TokenKind::Enum => self.parse_enum(),
            _ => self.parse_simple(),
        }
    }

    // =========================================================================
    // Simple statements (semicolon-terminated)
    // =========================================================================

    /// Parses one semicolon-terminated statement starting at the cursor.
    fn parse_simple(&mut self) -> Result<Statement, ParseError> {
        let start = self.pos;
        let line = self.tokens[start].line;

        let end = self.seek_semicolon(start)?;
        let interval = &self.tokens[start..end];
        self.pos = end + 1;

        if interval.is_empty() {
            return Err(ParseError::InvalidStatement { line });
        }

        match interval[0].kind {
            TokenKind::Print => Self::parse_print(interval, line),
            TokenKind::Else => Err(ParseError::ExpectedIf { line }),
            TokenKind::Break => Self::parse_bare(interval, line, Statement::Break { line }),
            TokenKind::Skip => Self::parse_bare(interval, line, Statement::Skip { line }),
            TokenKind::Return => Ok(Statement::Return {
                value: Self::parse_optional_value(interval)?,
                line,
            }),
            TokenKind::Exit => Ok(Statement::Exit {
                value: Self::parse_optional_value(interval)?,
                line,
            }),
            TokenKind::Error => Self::parse_error_stmt(interval, line),
            TokenKind::Import => Self::parse_import(interval, line),
            TokenKind::Include => Self::parse_include(interval, line),
            _ => Self::parse_assignment_or_expression(interval, line),
        }
    }

    /// Finds the semicolon ending the statement that starts at `start`.
    fn seek_semicolon(&self, start: usize) -> Result<usize, ParseError> {
        for idx in start..self.tokens.len() {
            let token = &self.tokens[idx];
            if idx > start && token.kind.is_statement_keyword() {
                return Err(ParseError::NoSemicolon { line: self.tokens[start].line });
            }

            if token.kind == TokenKind::Semicolon {
                return Ok(idx);
            }
        }

        Err(ParseError::NoSemicolon { line: self.tokens[start].line })
    }

    fn parse_print(interval: &[Token], line: u32) -> Result<Statement, ParseError> {
        if interval.len() == 1 {
            return Err(ParseError::ExpectedExpression { line });
        }

        let expr = parse_expression(&interval[1..])?;
        Ok(Statement::Print { expr, line })
    }

    fn parse_bare(
        interval: &[Token],
        line: u32,
        statement: Statement,
    ) -> Result<Statement, ParseError> {
        if interval.len() > 1 {
            return Err(ParseError::InvalidStatement { line });
        }

        Ok(statement)
    }

    /// Shared by `return` and `exit`, whose expression is optional.
    fn parse_optional_value(interval: &[Token]) -> Result<Option<Expression>, ParseError> {
        if interval.len() == 1 {
            return Ok(None);
        }

        Ok(Some(parse_expression(&interval[1..])?))
    }

    fn parse_error_stmt(interval: &[Token], line: u32) -> Result<Statement, ParseError> {
        if interval.len() == 1 {
            return Err(ParseError::ExpectedExpression { line });
        }

        let value = parse_expression(&interval[1..])?;
        Ok(Statement::Error { value, line })
    }

    fn parse_import(interval: &[Token], line: u32) -> Result<Statement, ParseError> {
        match Self::quoted_name(interval) {
            // The import name may carry the source suffix; drop it so the
            // namespace gets the plain file stem.
            Some(name) => Ok(Statement::Import {
                name: name.trim_end_matches(".reed").to_string(),
                line,
            }),
            None => Err(ParseError::ExpectedName { line }),
        }
    }

    fn parse_include(interval: &[Token], line: u32) -> Result<Statement, ParseError> {
        match Self::quoted_name(interval) {
            Some(name) => Ok(Statement::Include { name, line }),
            None => Err(ParseError::ExpectedName { line }),
        }
    }

    /// Extracts the single string literal of an import or include statement.
    fn quoted_name(interval: &[Token]) -> Option<String> {
        match interval {
            [_, token] => match &token.literal {
                Some(Literal::Str(name)) => Some(name.clone()),
                _ => None,
            },
            _ => None,
        }
    }

    /// A top-level assignment operator makes the statement an assignment;
    /// everything else is an expression statement.
    fn parse_assignment_or_expression(
        interval: &[Token],
        line: u32,
    ) -> Result<Statement, ParseError> {
        let Some(op_idx) = find_top_level(interval, TokenKind::is_assignment) else {
            let expr = parse_expression(interval)?;
            return Ok(Statement::Expression { expr, line });
        };

        let op = interval[op_idx].clone();
        let target = parse_expression(&interval[..op_idx])?;
        let value = parse_expression(&interval[op_idx + 1..])?;

        if target.is_empty() || value.is_empty() {
            return Err(ParseError::ExpectedExpression { line });
        }

        if op.kind == TokenKind::ColonEqual && !matches!(target, Expression::Variable { .. }) {
            return Err(ParseError::ExpectedIdentifier { line });
        }

        Ok(Statement::Assignment {
            target,
            op,
            value,
            line,
        })
    }

    // =========================================================================
    // Block statements (brace-delimited)
    // =========================================================================

    /// Parses `{ ... }` starting at the cursor, recursing on the interior.
    fn parse_block(&mut self) -> Result<Statement, ParseError> {
        let start = self.pos;
        let line = self.tokens[start].line;

        let Some(close) = find_closing(self.tokens, start) else {
            return Err(ParseError::NoBrace { line });
        };

        let body = parse_statements(&self.tokens[start + 1..close])?;
        self.pos = close + 1;

        Ok(Statement::Block { body, line })
    }

    /// Parses the header expression between the keyword at the cursor and the
    /// next `{`, then the block itself.
    fn expression_and_block(
        &mut self,
        expect_expr: bool,
    ) -> Result<(Expression, Statement), ParseError> {
        let line = self.tokens[self.pos].line;

        let mut brace = None;
        for idx in self.pos + 1..self.tokens.len() {
            if self.tokens[idx].kind == TokenKind::LeftBrace {
                brace = Some(idx);
                break;
            }
        }
        let Some(brace) = brace else {
            return Err(ParseError::ExpectedBlock { line });
        };

        let header = parse_expression(&self.tokens[self.pos + 1..brace])?;
        if expect_expr && header.is_empty() {
            return Err(ParseError::ExpectedExpression { line });
        }

        self.pos = brace;
        let block = self.parse_block()?;
        Ok((header, block))
    }

    fn parse_if(&mut self) -> Result<Statement, ParseError> {
        let line = self.tokens[self.pos].line;
        let (condition, then_block) = self.expression_and_block(true)?;

        let mut else_block = None;
        if self.tokens.get(self.pos).map(|t| t.kind) == Some(TokenKind::Else) {
            let else_line = self.tokens[self.pos].line;
            self.pos += 1;
            if self.tokens.get(self.pos).map(|t| t.kind) != Some(TokenKind::LeftBrace) {
                return Err(ParseError::ExpectedBlock { line: else_line });
            }

            else_block = Some(Box::new(self.parse_block()?));
        }

        Ok(Statement::If {
            condition,
            then_block: Box::new(then_block),
            else_block,
            line,
        })
    }

    fn parse_while(&mut self) -> Result<Statement, ParseError> {
        let line = self.tokens[self.pos].line;
        let (condition, body) = self.expression_and_block(false)?;

        let condition = if condition.is_empty() { None } else { Some(condition) };
        Ok(Statement::While {
            condition,
            body: Box::new(body),
            line,
        })
    }

    fn parse_repeat(&mut self) -> Result<Statement, ParseError> {
        let line = self.tokens[self.pos].line;
        let (count, body) = self.expression_and_block(true)?;

        Ok(Statement::Repeat {
            count,
            body: Box::new(body),
            line,
        })
    }

    /// `range NAME in ITERABLE { ... }`. The header is split on the `in`
    /// keyword; the left side must be a single identifier.
    fn parse_range(&mut self) -> Result<Statement, ParseError> {
        let line = self.tokens[self.pos].line;
        let start = self.pos;

        let mut brace = None;
        for idx in start + 1..self.tokens.len() {
            if self.tokens[idx].kind == TokenKind::LeftBrace {
                brace = Some(idx);
                break;
            }
        }
        let Some(brace) = brace else {
            return Err(ParseError::ExpectedBlock { line });
        };

        let header = &self.tokens[start + 1..brace];
        let Some(in_idx) = find_top_level(header, |k| k == TokenKind::In) else {
            return Err(ParseError::InvalidStatement { line });
        };

        let variable = match &header[..in_idx] {
            [token] if token.kind == TokenKind::Identifier => token.lexeme.clone(),
            _ => return Err(ParseError::ExpectedIdentifier { line }),
        };

        let iterable = parse_expression(&header[in_idx + 1..])?;
        if iterable.is_empty() {
            return Err(ParseError::ExpectedExpression { line });
        }

        self.pos = brace;
        let body = self.parse_block()?;

        Ok(Statement::Range {
            variable,
            iterable,
            body: Box::new(body),
            line,
        })
    }

    /// `func NAME(PARAMS) { ... }`.
    fn parse_func(&mut self) -> Result<Statement, ParseError> {
        let line = self.tokens[self.pos].line;

        let name = match self.tokens.get(self.pos + 1) {
            Some(token) if token.kind == TokenKind::Identifier => token.lexeme.clone(),
            _ => return Err(ParseError::InvalidStatement { line }),
        };
        if self.tokens.get(self.pos + 2).map(|t| t.kind) != Some(TokenKind::LeftParen) {
            return Err(ParseError::InvalidStatement { line });
        }

        let Some(close) = find_closing(self.tokens, self.pos + 2) else {
            return Err(ParseError::UnmatchedParen { line });
        };

        let params = Self::identifier_list(&self.tokens[self.pos + 3..close], line)?;

        self.pos = close + 1;
        if self.tokens.get(self.pos).map(|t| t.kind) != Some(TokenKind::LeftBrace) {
            return Err(ParseError::ExpectedBlock { line });
        }

        let body = self.parse_block()?;
        Ok(Statement::Function {
            name,
            params,
            body: Rc::new(body),
            line,
        })
    }

    /// `define NAME { FIELD, ... }`. At least one field is required.
    fn parse_object_def(&mut self) -> Result<Statement, ParseError> {
        let line = self.tokens[self.pos].line;

        let name = match self.tokens.get(self.pos + 1) {
            Some(token) if token.kind == TokenKind::Identifier => token.lexeme.clone(),
            _ => return Err(ParseError::ExpectedIdentifier { line }),
        };
        if self.tokens.get(self.pos + 2).map(|t| t.kind) != Some(TokenKind::LeftBrace) {
            return Err(ParseError::ExpectedBlock { line });
        }

        let Some(close) = find_closing(self.tokens, self.pos + 2) else {
            return Err(ParseError::NoBrace { line });
        };

        let fields = Self::identifier_list(&self.tokens[self.pos + 3..close], line)?;
        if fields.is_empty() {
            return Err(ParseError::ExpectedIdentifier { line });
        }

        self.pos = close + 1;
        Ok(Statement::ObjectDef { name, fields, line })
    }

    /// `enum { NAME, ... }`.
    fn parse_enum(&mut self) -> Result<Statement, ParseError> {
        let line = self.tokens[self.pos].line;

        if self.tokens.get(self.pos + 1).map(|t| t.kind) != Some(TokenKind::LeftBrace) {
            return Err(ParseError::ExpectedBlock { line });
        }

        let Some(close) = find_closing(self.tokens, self.pos + 1) else {
            return Err(ParseError::NoBrace { line });
        };

        let names = Self::identifier_list(&self.tokens[self.pos + 2..close], line)?;
        self.pos = close + 1;

        Ok(Statement::Enum { names, line })
    }

    /// Collects identifiers from a comma-separated list, ignoring the commas.
    fn identifier_list(tokens: &[Token], line: u32) -> Result<Vec<String>, ParseError> {
        let mut names = Vec::new();
        for token in tokens {
            match token.kind {
                TokenKind::Comma => {}
                TokenKind::Identifier => names.push(token.lexeme.clone()),
                _ => return Err(ParseError::ExpectedIdentifier { line }),
            }
        }

        Ok(names)
    }
}
