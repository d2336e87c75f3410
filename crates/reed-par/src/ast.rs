//! reed-par - AST node definitions.
//!
//! Expression and statement nodes are owned tagged unions with owned
//! children. Every node records the line of the first token of its construct;
//! the evaluator uses it to attach source positions to runtime errors.

use std::rc::Rc;

use reed_lex::{Literal, Token};

/// An expression tree node.
#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    /// The absence of an expression (empty argument list, empty condition).
    Empty { line: u32 },

    /// A literal value: number, string, `true`, `false` or `nil`.
    Literal { value: Literal, line: u32 },

    /// A variable reference by name.
    Variable { name: String, line: u32 },

    /// A unary operation: `-x`, `!x`, `type x`.
    Unary {
        op: Token,
        right: Box<Expression>,
        line: u32,
    },

    /// A binary operation with both operands always evaluated.
    Binary {
        op: Token,
        left: Box<Expression>,
        right: Box<Expression>,
        line: u32,
    },

    /// A parenthesized expression.
    Group { inner: Box<Expression>, line: u32 },

    /// A call. `args` is an `ArgList`, a single expression, or `Empty`.
    Call {
        callee: Box<Expression>,
        args: Box<Expression>,
        line: u32,
    },

    /// A field read: `target.name`.
    Getter {
        target: Box<Expression>,
        name: String,
        line: u32,
    },

    /// An array literal. `items` is an `ArgList`, a single expression, or
    /// `Empty` for `[]`.
    ArrayLiteral { items: Box<Expression>, line: u32 },

    /// An index operation on an array or string.
    Index {
        target: Box<Expression>,
        index: Box<Expression>,
        line: u32,
    },

    /// Comma-separated expressions. Only legal directly under a call or an
    /// array literal; never evaluated on its own.
    ArgList { items: Vec<Expression>, line: u32 },
}

impl Expression {
    pub fn line(&self) -> u32 {
        match self {
            Expression::Empty { line }
            | Expression::Literal { line, .. }
            | Expression::Variable { line, .. }
            | Expression::Unary { line, .. }
            | Expression::Binary { line, .. }
            | Expression::Group { line, .. }
            | Expression::Call { line, .. }
            | Expression::Getter { line, .. }
            | Expression::ArrayLiteral { line, .. }
            | Expression::Index { line, .. }
            | Expression::ArgList { line, .. } => *line,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Expression::Empty { .. })
    }
}

/// A statement node.
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    /// An expression evaluated for its side effects; the value is discarded.
    Expression { expr: Expression, line: u32 },

    /// `print EXPR;`
    Print { expr: Expression, line: u32 },

    /// `target OP value;` where OP is `=`, `:=`, `+=`, `-=`, `*=` or `/=`.
    Assignment {
        target: Expression,
        op: Token,
        value: Expression,
        line: u32,
    },

    /// `{ ... }` - a nested scope.
    Block { body: Vec<Statement>, line: u32 },

    /// `if EXPR { ... }` with an optional `else { ... }`.
    If {
        condition: Expression,
        then_block: Box<Statement>,
        else_block: Option<Box<Statement>>,
        line: u32,
    },

    /// `while EXPR { ... }`; no expression means loop forever.
    While {
        condition: Option<Expression>,
        body: Box<Statement>,
        line: u32,
    },

    /// `repeat EXPR { ... }` - run the body a fixed number of times.
    Repeat {
        count: Expression,
        body: Box<Statement>,
        line: u32,
    },

    /// `range NAME in EXPR { ... }` - iterate an array or numeric range.
    Range {
        variable: String,
        iterable: Expression,
        body: Box<Statement>,
        line: u32,
    },

    /// `break;`
    Break { line: u32 },

    /// `skip;` - continue with the next loop iteration.
    Skip { line: u32 },

    /// `func NAME(PARAMS) { ... }`. The body is shared with the callable
    /// value created at execution time.
    Function {
        name: String,
        params: Vec<String>,
        body: Rc<Statement>,
        line: u32,
    },

    /// `return;` or `return EXPR;`
    Return { value: Option<Expression>, line: u32 },

    /// `define NAME { FIELD, ... }` - declares an object constructor.
    ObjectDef {
        name: String,
        fields: Vec<String>,
        line: u32,
    },

    /// `enum { NAME, ... }` - declares sequential numeric constants.
    Enum { names: Vec<String>, line: u32 },

    /// `exit;` or `exit EXPR;` - ends the program successfully.
    Exit { value: Option<Expression>, line: u32 },

    /// `error EXPR;` - raises the value as a runtime error.
    Error { value: Expression, line: u32 },

    /// `import "NAME";` - static file import, hoisted before execution.
    Import { name: String, line: u32 },

    /// `include "LIB";` - native module import, hoisted before execution.
    Include { name: String, line: u32 },
}

impl Statement {
    pub fn line(&self) -> u32 {
        match self {
            Statement::Expression { line, .. }
            | Statement::Print { line, .. }
            | Statement::Assignment { line, .. }
            | Statement::Block { line, .. }
            | Statement::If { line, .. }
            | Statement::While { line, .. }
            | Statement::Repeat { line, .. }
            | Statement::Range { line, .. }
            | Statement::Break { line }
            | Statement::Skip { line }
            | Statement::Function { line, .. }
            | Statement::Return { line, .. }
            | Statement::ObjectDef { line, .. }
            | Statement::Enum { line, .. }
            | Statement::Exit { line, .. }
            | Statement::Error { line, .. }
            | Statement::Import { line, .. }
            | Statement::Include { line, .. } => *line,
        }
    }
}
