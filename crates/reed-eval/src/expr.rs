//! Expression evaluation.
//!
//! Dispatch on the node variant. Sub-expressions evaluate depth-first,
//! left to right; `&&` and `||` evaluate both sides. Every failure is
//! stamped with the node's line before it leaves this module.

use std::rc::Rc;

use reed_lex::{Literal, Token, TokenKind};
use reed_par::{Expression, Statement};

use crate::error::{fail, Interrupt, RuntimeErrorKind};
use crate::interp::{Interpreter, TraceFrame};
use crate::value::{Callable, CallableKind, Object, Value};

impl Interpreter {
    pub(crate) fn eval(&mut self, expression: &Expression) -> Result<Value, Interrupt> {
        match expression {
            Expression::Empty { .. } => Ok(Value::Nil),

            Expression::Literal { value, .. } => Ok(match value {
                Literal::Number(n) => Value::Number(*n),
                Literal::Str(s) => Value::Str(s.clone()),
                Literal::Bool(b) => Value::Bool(*b),
                Literal::Nil => Value::Nil,
            }),

            Expression::Variable { name, line } => self
                .env()
                .lookup(name)
                .map_err(|kind| fail(kind, *line)),

            Expression::Group { inner, .. } => self.eval(inner),

            Expression::Unary { op, right, line } => {
                let right = self.eval(right)?;
                Self::apply_unary(op, right).map_err(|kind| fail(kind, *line))
            }

            Expression::Binary {
                op, left, right, line,
            } => {
                let left = self.eval(left)?;
                let right = self.eval(right)?;
                Self::apply_binary(op, left, right).map_err(|kind| fail(kind, *line))
            }

            Expression::Call { callee, args, line } => self.eval_call(callee, args, *line),

            Expression::Getter { target, name, line } => match self.eval(target)? {
                Value::Object(object) => {
                    let object = object.borrow();
                    object.get(name).ok_or_else(|| {
                        fail(
                            RuntimeErrorKind::NotAField {
                                object: object.name.clone(),
                                field: name.clone(),
                            },
                            *line,
                        )
                    })
                }
                other => Err(fail(
                    RuntimeErrorKind::NotObject {
                        type_name: other.type_name().to_string(),
                    },
                    *line,
                )),
            },

            Expression::Index { target, index, line } => {
                let container = self.eval(target)?;
                let index = self.eval(index)?;
                Self::apply_index(container, index).map_err(|kind| fail(kind, *line))
            }

            Expression::ArrayLiteral { items, .. } => {
                let values = self.eval_list(items)?;
                Ok(Value::array(values))
            }

            // Only legal directly under a call or array literal; those
            // evaluate the children themselves.
            Expression::ArgList { line, .. } => Err(fail(
                RuntimeErrorKind::Raised {
                    message: "unexpected argument list".to_string(),
                },
                *line,
            )),
        }
    }

    /// Evaluates an argument position: an arg list, nothing, or a single
    /// expression.
    fn eval_list(&mut self, expression: &Expression) -> Result<Vec<Value>, Interrupt> {
        match expression {
            Expression::ArgList { items, .. } => {
                let mut values = Vec::with_capacity(items.len());
                for item in items {
                    values.push(self.eval(item)?);
                }
                Ok(values)
            }
            Expression::Empty { .. } => Ok(Vec::new()),
            single => Ok(vec![self.eval(single)?]),
        }
    }

    fn apply_unary(op: &Token, right: Value) -> Result<Value, RuntimeErrorKind> {
        match op.kind {
            TokenKind::Minus => match right {
                Value::Number(n) => Ok(Value::Number(-n)),
                other => Err(RuntimeErrorKind::InvalidOperatorType {
                    op: op.lexeme.clone(),
                    type_name: other.type_name().to_string(),
                }),
            },
            TokenKind::Bang => Ok(Value::Bool(!right.is_truthy())),
            TokenKind::Type => Ok(Value::Str(right.type_name().to_string())),
            _ => Err(RuntimeErrorKind::InvalidOperatorType {
                op: op.lexeme.clone(),
                type_name: right.type_name().to_string(),
            }),
        }
    }

    fn apply_binary(op: &Token, left: Value, right: Value) -> Result<Value, RuntimeErrorKind> {
        if let (Value::Number(a), Value::Number(b)) = (&left, &right) {
            let (a, b) = (*a, *b);
            match op.kind {
                TokenKind::Plus => return Ok(Value::Number(a + b)),
                TokenKind::Minus => return Ok(Value::Number(a - b)),
                TokenKind::Star => return Ok(Value::Number(a * b)),
                TokenKind::Caret => return Ok(Value::Number(a.powf(b))),
                TokenKind::Greater => return Ok(Value::Bool(a > b)),
                TokenKind::Less => return Ok(Value::Bool(a < b)),
                TokenKind::GreaterEqual => return Ok(Value::Bool(a >= b)),
                TokenKind::LessEqual => return Ok(Value::Bool(a <= b)),
                TokenKind::Slash => {
                    if b == 0.0 {
                        return Err(RuntimeErrorKind::DivideByZero);
                    }
                    return Ok(Value::Number(a / b));
                }
                // Modulo truncates both sides to their integer parts.
                TokenKind::Percent => {
                    if b as i64 == 0 {
                        return Err(RuntimeErrorKind::DivideByZero);
                    }
                    return Ok(Value::Number((a as i64 % b as i64) as f64));
                }
                _ => {}
            }
        }

        match op.kind {
            TokenKind::EqualEqual => return Ok(Value::Bool(left == right)),
            TokenKind::NotEqual => return Ok(Value::Bool(left != right)),
            TokenKind::And => {
                return Ok(Value::Bool(left.is_truthy() && right.is_truthy()));
            }
            TokenKind::Or => {
                return Ok(Value::Bool(left.is_truthy() || right.is_truthy()));
            }
            _ => {}
        }

        if let (Value::Str(a), Value::Str(b)) = (&left, &right) {
            if op.kind == TokenKind::Plus {
                return Ok(Value::Str(format!("{a}{b}")));
            }
        }

        Err(RuntimeErrorKind::InvalidOperatorTypes {
            op: op.lexeme.clone(),
            left: left.type_name().to_string(),
            right: right.type_name().to_string(),
        })
    }

    /// Indexes an array or string. The index must be a number with zero
    /// fractional part.
    fn apply_index(container: Value, index: Value) -> Result<Value, RuntimeErrorKind> {
        let Some(index) = index.as_integer() else {
            return Err(RuntimeErrorKind::NotInteger);
        };

        match container {
            Value::Array(values) => {
                let values = values.borrow();
                if index < 0 || index as usize >= values.len() {
                    return Err(RuntimeErrorKind::IndexOutOfRange {
                        index,
                        length: values.len(),
                    });
                }
                Ok(values[index as usize].clone())
            }
            Value::Str(s) => {
                let length = s.chars().count();
                if index < 0 || index as usize >= length {
                    return Err(RuntimeErrorKind::IndexOutOfRange { index, length });
                }
                let ch = s.chars().nth(index as usize).expect("index checked");
                Ok(Value::Str(ch.to_string()))
            }
            other => Err(RuntimeErrorKind::NotArray {
                type_name: other.type_name().to_string(),
            }),
        }
    }

    // =========================================================================
    // Calls
    // =========================================================================

    fn eval_call(
        &mut self,
        callee: &Expression,
        args: &Expression,
        line: u32,
    ) -> Result<Value, Interrupt> {
        let callee = match self.eval(callee)? {
            Value::Callable(callable) => callable,
            other => {
                return Err(fail(
                    RuntimeErrorKind::NotFunction {
                        type_name: other.type_name().to_string(),
                    },
                    line,
                ))
            }
        };

        let args = self.eval_list(args)?;

        if let Some(expected) = callee.arity {
            if args.len() != expected {
                return Err(fail(
                    RuntimeErrorKind::IncorrectArgs {
                        name: callee.name.clone(),
                        expected,
                        got: args.len(),
                    },
                    line,
                ));
            }
        }

        self.call_callable(&callee, args, line)
    }

    pub(crate) fn call_callable(
        &mut self,
        callable: &Rc<Callable>,
        args: Vec<Value>,
        line: u32,
    ) -> Result<Value, Interrupt> {
        match &callable.kind {
            CallableKind::Native(function) => function(&args)
                .map_err(|error| Interrupt::Failure(error.with_line(line))),

            CallableKind::Constructor { fields } => {
                let fields = fields
                    .iter()
                    .cloned()
                    .zip(args)
                    .collect();
                Ok(Value::object(Object::new(callable.name.clone(), fields)))
            }

            CallableKind::Function {
                params,
                body,
                closure,
            } => self.call_function(callable, params, body, closure, args, line),
        }
    }

    /// Invokes a user function: installs its closure snapshot as the active
    /// chain, pushes a scope, binds parameters, runs the body, and restores
    /// everything on the way out.
    fn call_function(
        &mut self,
        callable: &Rc<Callable>,
        params: &[String],
        body: &Rc<Statement>,
        closure: &crate::env::Environment,
        args: Vec<Value>,
        line: u32,
    ) -> Result<Value, Interrupt> {
        let limit = self.recursion_limit;
        let depth = self
            .call_depths
            .entry(callable.name.clone())
            .or_insert(0);
        *depth += 1;
        if *depth > limit {
            self.leave_call(&callable.name);
            return Err(fail(
                RuntimeErrorKind::MaximumRecursion {
                    name: callable.name.clone(),
                },
                line,
            ));
        }

        self.envs.push(closure.snapshot());
        self.env_mut().push_scope();

        let mut result = Ok(());
        for (param, arg) in params.iter().zip(args) {
            if let Err(kind) = self.env_mut().declare(param, arg) {
                result = Err(fail(kind, line));
                break;
            }
        }

        if result.is_ok() {
            // The body block's statements run directly in the parameter
            // scope, like any other nested statements.
            result = match body.as_ref() {
                Statement::Block { body, .. } => body
                    .iter()
                    .try_for_each(|statement| self.exec_statement(statement)),
                other => self.exec_statement(other),
            };
        }

        self.env_mut().pop_scope();
        self.envs.pop();
        self.leave_call(&callable.name);

        match result {
            Ok(()) => Ok(Value::Nil),
            Err(Interrupt::Return(value)) => Ok(value),
            Err(Interrupt::Break) => Err(fail(
                RuntimeErrorKind::StrayInterrupt { keyword: "break" },
                line,
            )),
            Err(Interrupt::Skip) => Err(fail(
                RuntimeErrorKind::StrayInterrupt { keyword: "skip" },
                line,
            )),
            Err(Interrupt::Exit) => Err(Interrupt::Exit),
            Err(Interrupt::Failure(error)) => {
                self.trace.push(TraceFrame {
                    name: callable.name.clone(),
                    origin: callable.origin.clone(),
                    line,
                });
                Err(Interrupt::Failure(error.with_line(line)))
            }
        }
    }

    fn leave_call(&mut self, name: &str) {
        if let Some(depth) = self.call_depths.get_mut(name) {
            *depth -= 1;
            if *depth == 0 {
                self.call_depths.remove(name);
            }
        }
    }
}
