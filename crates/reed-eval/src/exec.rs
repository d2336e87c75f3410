//! Statement execution.
//!
//! Statements run in source order. Loops intercept `break` and `skip`;
//! everything else on the interrupt channel propagates outward. Scopes pushed
//! for blocks and loop bodies are popped on every exit path, including
//! failures.

use std::rc::Rc;

use reed_lex::TokenKind;
use reed_par::{Expression, Statement};

use crate::error::{fail, Interrupt, ReedError, RuntimeError, RuntimeErrorKind};
use crate::interp::Interpreter;
use crate::value::{Callable, CallableKind, Value};

impl Interpreter {
    /// Runs a statement list at the top level of a file or REPL submission,
    /// converting interrupts into user-visible results. Imports and includes
    /// were hoisted earlier and are skipped here.
    pub(crate) fn execute(&mut self, statements: &[Statement]) -> Result<(), ReedError> {
        for statement in statements {
            if matches!(
                statement,
                Statement::Import { .. } | Statement::Include { .. }
            ) {
                continue;
            }

            match self.exec_statement(statement) {
                Ok(()) => {}
                Err(Interrupt::Exit) => return Err(ReedError::ProgramExit),
                Err(Interrupt::Failure(error)) => return Err(ReedError::Runtime(error)),
                Err(Interrupt::Return(_)) => {
                    return Err(Self::stray("return", statement.line()));
                }
                Err(Interrupt::Break) => return Err(Self::stray("break", statement.line())),
                Err(Interrupt::Skip) => return Err(Self::stray("skip", statement.line())),
            }
        }

        Ok(())
    }

    fn stray(keyword: &'static str, line: u32) -> ReedError {
        ReedError::Runtime(RuntimeError::new(
            RuntimeErrorKind::StrayInterrupt { keyword },
            line,
        ))
    }

    pub(crate) fn exec_statement(&mut self, statement: &Statement) -> Result<(), Interrupt> {
        match statement {
            Statement::Expression { expr, .. } => {
                self.eval(expr)?;
                Ok(())
            }

            Statement::Print { expr, .. } => {
                let value = self.eval(expr)?;
                self.sink.write_line(&value.to_string());
                Ok(())
            }

            Statement::Assignment {
                target,
                op,
                value,
                line,
            } => self.exec_assignment(target, op.kind, &op.lexeme, value, *line),

            Statement::Block { body, .. } => self.exec_block(body),

            Statement::If {
                condition,
                then_block,
                else_block,
                ..
            } => {
                if self.eval(condition)?.is_truthy() {
                    self.exec_statement(then_block)
                } else if let Some(else_block) = else_block {
                    self.exec_statement(else_block)
                } else {
                    Ok(())
                }
            }

            Statement::While {
                condition, body, ..
            } => loop {
                if let Some(condition) = condition {
                    if !self.eval(condition)?.is_truthy() {
                        return Ok(());
                    }
                }

                match self.exec_statement(body) {
                    Ok(()) | Err(Interrupt::Skip) => {}
                    Err(Interrupt::Break) => return Ok(()),
                    Err(other) => return Err(other),
                }
            },

            Statement::Repeat { count, body, line } => {
                let count_value = self.eval(count)?;
                let times = match count_value.as_integer() {
                    Some(n) if n >= 0 => n,
                    _ => return Err(fail(RuntimeErrorKind::NotInteger, *line)),
                };

                for _ in 0..times {
                    match self.exec_statement(body) {
                        Ok(()) | Err(Interrupt::Skip) => {}
                        Err(Interrupt::Break) => return Ok(()),
                        Err(other) => return Err(other),
                    }
                }

                Ok(())
            }

            Statement::Range {
                variable,
                iterable,
                body,
                line,
            } => self.exec_range(variable, iterable, body, *line),

            Statement::Break { .. } => Err(Interrupt::Break),
            Statement::Skip { .. } => Err(Interrupt::Skip),

            Statement::Return { value, .. } => {
                let result = match value {
                    Some(expr) => self.eval(expr)?,
                    None => Value::Nil,
                };
                Err(Interrupt::Return(result))
            }

            Statement::Exit { value, .. } => {
                if let Some(expr) = value {
                    let value = self.eval(expr)?;
                    self.sink.write_line(&value.to_string());
                }
                Err(Interrupt::Exit)
            }

            Statement::Error { value, line } => {
                let value = self.eval(value)?;
                Err(fail(
                    RuntimeErrorKind::Raised {
                        message: value.to_string(),
                    },
                    *line,
                ))
            }

            Statement::Function {
                name,
                params,
                body,
                line,
            } => self.exec_function_decl(name, params, body, *line),

            Statement::ObjectDef { name, fields, line } => {
                let callable = Callable {
                    name: name.clone(),
                    origin: self.origin.clone(),
                    arity: Some(fields.len()),
                    kind: CallableKind::Constructor {
                        fields: fields.clone(),
                    },
                };
                self.env_mut()
                    .declare(name, Value::Callable(Rc::new(callable)))
                    .map_err(|kind| fail(kind, *line))
            }

            Statement::Enum { names, line } => {
                for (position, name) in names.iter().enumerate() {
                    self.env_mut()
                        .declare(name, Value::Number(position as f64))
                        .map_err(|kind| fail(kind, *line))?;
                }
                Ok(())
            }

            // Hoisted before execution; nothing left to do in source order.
            Statement::Import { .. } | Statement::Include { .. } => Ok(()),
        }
    }

    /// Runs statements inside a fresh scope, popping it on every exit path.
    fn exec_block(&mut self, body: &[Statement]) -> Result<(), Interrupt> {
        self.env_mut().push_scope();
        let result = body
            .iter()
            .try_for_each(|statement| self.exec_statement(statement));
        self.env_mut().pop_scope();
        result
    }

    /// Declares a function. The closure chain is captured *after* the name
    /// is declared, so the body can see the function for recursion, while
    /// scopes entered later never leak in.
    fn exec_function_decl(
        &mut self,
        name: &str,
        params: &[String],
        body: &Rc<Statement>,
        line: u32,
    ) -> Result<(), Interrupt> {
        self.env_mut()
            .declare(name, Value::Nil)
            .map_err(|kind| fail(kind, line))?;
        let closure = self.env().snapshot();

        let callable = Callable {
            name: name.to_string(),
            origin: self.origin.clone(),
            arity: Some(params.len()),
            kind: CallableKind::Function {
                params: params.to_vec(),
                body: Rc::clone(body),
                closure,
            },
        };

        self.env_mut()
            .assign(name, Value::Callable(Rc::new(callable)))
            .map_err(|kind| fail(kind, line))
    }

    // =========================================================================
    // Assignment
    // =========================================================================

    fn exec_assignment(
        &mut self,
        target: &Expression,
        op: TokenKind,
        op_lexeme: &str,
        value: &Expression,
        line: u32,
    ) -> Result<(), Interrupt> {
        let value = self.eval(value)?;

        match op {
            TokenKind::ColonEqual => {
                let Expression::Variable { name, .. } = target else {
                    return Err(fail(RuntimeErrorKind::NonAssignable, line));
                };
                self.env_mut()
                    .declare(name, value)
                    .map_err(|kind| fail(kind, line))
            }

            TokenKind::Equal => self.assign_target(target, value, line),

            _ => {
                let current = self.eval(target)?;
                let combined = Self::apply_compound(op, op_lexeme, current, value)
                    .map_err(|kind| fail(kind, line))?;
                self.assign_target(target, combined, line)
            }
        }
    }

    /// Stores a value into a variable, object field, or array element.
    fn assign_target(
        &mut self,
        target: &Expression,
        value: Value,
        line: u32,
    ) -> Result<(), Interrupt> {
        match target {
            Expression::Variable { name, .. } => self
                .env_mut()
                .assign(name, value)
                .map_err(|kind| fail(kind, line)),

            Expression::Getter {
                target: object_expr,
                name,
                ..
            } => match self.eval(object_expr)? {
                Value::Object(object) => {
                    let mut object = object.borrow_mut();
                    if object.set(name, value) {
                        Ok(())
                    } else {
                        Err(fail(
                            RuntimeErrorKind::NotAField {
                                object: object.name.clone(),
                                field: name.clone(),
                            },
                            line,
                        ))
                    }
                }
                other => Err(fail(
                    RuntimeErrorKind::NotObject {
                        type_name: other.type_name().to_string(),
                    },
                    line,
                )),
            },

            Expression::Index {
                target: array_expr,
                index,
                ..
            } => {
                let container = self.eval(array_expr)?;
                let index_value = self.eval(index)?;
                let Some(index) = index_value.as_integer() else {
                    return Err(fail(RuntimeErrorKind::NotInteger, line));
                };

                match container {
                    Value::Array(values) => {
                        let mut values = values.borrow_mut();
                        let length = values.len();
                        if index < 0 || index as usize >= length {
                            return Err(fail(
                                RuntimeErrorKind::IndexOutOfRange { index, length },
                                line,
                            ));
                        }
                        values[index as usize] = value;
                        Ok(())
                    }
                    // Strings are immutable.
                    Value::Str(_) => Err(fail(RuntimeErrorKind::NonAssignable, line)),
                    other => Err(fail(
                        RuntimeErrorKind::NotArray {
                            type_name: other.type_name().to_string(),
                        },
                        line,
                    )),
                }
            }

            _ => Err(fail(RuntimeErrorKind::NonAssignable, line)),
        }
    }

    /// Combines current and new values for `+=`, `-=`, `*=`, `/=`. Both
    /// sides must share a runtime type; only strings support `+=` beyond
    /// numbers.
    fn apply_compound(
        op: TokenKind,
        op_lexeme: &str,
        current: Value,
        value: Value,
    ) -> Result<Value, RuntimeErrorKind> {
        match (&current, &value) {
            (Value::Number(a), Value::Number(b)) => match op {
                TokenKind::PlusEqual => Ok(Value::Number(a + b)),
                TokenKind::MinusEqual => Ok(Value::Number(a - b)),
                TokenKind::StarEqual => Ok(Value::Number(a * b)),
                TokenKind::SlashEqual => {
                    if *b == 0.0 {
                        Err(RuntimeErrorKind::DivideByZero)
                    } else {
                        Ok(Value::Number(a / b))
                    }
                }
                _ => Err(RuntimeErrorKind::InvalidOperatorTypes {
                    op: op_lexeme.to_string(),
                    left: current.type_name().to_string(),
                    right: value.type_name().to_string(),
                }),
            },

            (Value::Str(a), Value::Str(b)) if op == TokenKind::PlusEqual => {
                Ok(Value::Str(format!("{a}{b}")))
            }

            _ if current.type_name() != value.type_name() => {
                Err(RuntimeErrorKind::DifferentTypes {
                    op: op_lexeme.to_string(),
                    left: current.type_name().to_string(),
                    right: value.type_name().to_string(),
                })
            }

            _ => Err(RuntimeErrorKind::InvalidOperatorTypes {
                op: op_lexeme.to_string(),
                left: current.type_name().to_string(),
                right: value.type_name().to_string(),
            }),
        }
    }

    // =========================================================================
    // Range loops
    // =========================================================================

    /// Iterates an array's elements or a numeric sequence. The loop variable
    /// lives in a scope of its own; the body block adds another per
    /// iteration.
    fn exec_range(
        &mut self,
        variable: &str,
        iterable: &Expression,
        body: &Statement,
        line: u32,
    ) -> Result<(), Interrupt> {
        let items = self.range_items(iterable, line)?;

        self.env_mut().push_scope();
        self.env_mut()
            .declare(variable, Value::Nil)
            .expect("loop variable collides in fresh scope");

        let mut result = Ok(());
        for item in items {
            self.env_mut()
                .assign(variable, item)
                .expect("loop variable vanished");

            match self.exec_statement(body) {
                Ok(()) | Err(Interrupt::Skip) => {}
                Err(Interrupt::Break) => break,
                Err(other) => {
                    result = Err(other);
                    break;
                }
            }
        }

        self.env_mut().pop_scope();
        result
    }

    /// Resolves a range iterable into the concrete values to bind.
    fn range_items(
        &mut self,
        iterable: &Expression,
        line: u32,
    ) -> Result<Vec<Value>, Interrupt> {
        // `range x in (0, 10, 2)` parses as a group around the arg list.
        let mut expr = iterable;
        while let Expression::Group { inner, .. } = expr {
            expr = inner;
        }

        if let Expression::ArgList { items, .. } = expr {
            let mut bounds = Vec::with_capacity(items.len());
            for item in items {
                let value = self.eval(item)?;
                match value {
                    Value::Number(n) => bounds.push(n),
                    other => {
                        return Err(fail(
                            RuntimeErrorKind::NotArray {
                                type_name: other.type_name().to_string(),
                            },
                            line,
                        ))
                    }
                }
            }
            return Self::numeric_range(&bounds, line);
        }

        match self.eval(expr)? {
            Value::Array(values) => Ok(values.borrow().clone()),
            Value::Number(stop) => Self::numeric_range(&[stop], line),
            other => Err(fail(
                RuntimeErrorKind::NotArray {
                    type_name: other.type_name().to_string(),
                },
                line,
            )),
        }
    }

    /// Generates `start, start+step, ...` bounded by `stop` exclusive.
    /// Defaults are `(stop)`, `(start, stop)`, `(start, stop, step)`.
    fn numeric_range(bounds: &[f64], line: u32) -> Result<Vec<Value>, Interrupt> {
        let (start, stop, step) = match bounds {
            [stop] => (0.0, *stop, 1.0),
            [start, stop] => (*start, *stop, 1.0),
            [start, stop, step] => (*start, *stop, *step),
            _ => {
                return Err(fail(
                    RuntimeErrorKind::IncorrectArgs {
                        name: "range".to_string(),
                        expected: 3,
                        got: bounds.len(),
                    },
                    line,
                ))
            }
        };

        if step == 0.0 || (start < stop && step < 0.0) {
            return Err(fail(RuntimeErrorKind::InfiniteLoop, line));
        }

        let mut items = Vec::new();
        let mut current = start;
        if step > 0.0 {
            while current < stop {
                items.push(Value::Number(current));
                current += step;
            }
        } else {
            while current > stop {
                items.push(Value::Number(current));
                current += step;
            }
        }

        Ok(items)
    }
}
