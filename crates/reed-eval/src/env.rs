//! The lexical environment: a stack of scopes.
//!
//! The innermost scope is the last element. Scopes are reference-counted so
//! that a closure snapshot shares its scope maps with the environment it was
//! captured from; a later assignment through either is visible to both, which
//! is what makes recursion through a function's own name work.

use std::cell::RefCell;
use std::rc::Rc;

use rustc_hash::FxHashMap;

use crate::error::RuntimeErrorKind;
use crate::value::Value;

pub type Scope = FxHashMap<String, Value>;

/// A chain of scopes, innermost last.
#[derive(Debug, Clone, Default)]
pub struct Environment {
    scopes: Vec<Rc<RefCell<Scope>>>,
}

impl Environment {
    /// A fresh environment with one empty global scope.
    pub fn new() -> Self {
        Self {
            scopes: vec![Rc::new(RefCell::new(Scope::default()))],
        }
    }

    pub fn push_scope(&mut self) {
        self.scopes.push(Rc::new(RefCell::new(Scope::default())));
    }

    /// Removes the innermost scope. Push and pop calls are paired by the
    /// evaluator, so the global scope can never be popped.
    pub fn pop_scope(&mut self) {
        debug_assert!(self.scopes.len() > 1, "popped the global scope");
        self.scopes.pop();
    }

    pub fn depth(&self) -> usize {
        self.scopes.len()
    }

    /// Declares a new binding in the innermost scope. Fails if the name
    /// already exists there; shadowing an outer scope is allowed.
    pub fn declare(&mut self, name: &str, value: Value) -> Result<(), RuntimeErrorKind> {
        let scope = self.scopes.last().expect("environment has no scopes");
        let mut scope = scope.borrow_mut();
        if scope.contains_key(name) {
            return Err(RuntimeErrorKind::AlreadyDefined {
                name: name.to_string(),
            });
        }

        scope.insert(name.to_string(), value);
        Ok(())
    }

    /// Updates the nearest existing binding, searching innermost-out.
    pub fn assign(&mut self, name: &str, value: Value) -> Result<(), RuntimeErrorKind> {
        for scope in self.scopes.iter().rev() {
            let mut scope = scope.borrow_mut();
            if let Some(slot) = scope.get_mut(name) {
                *slot = value;
                return Ok(());
            }
        }

        Err(RuntimeErrorKind::UndefinedVariable {
            name: name.to_string(),
        })
    }

    /// Returns the nearest binding, searching innermost-out.
    pub fn lookup(&self, name: &str) -> Result<Value, RuntimeErrorKind> {
        for scope in self.scopes.iter().rev() {
            if let Some(value) = scope.borrow().get(name) {
                return Ok(value.clone());
            }
        }

        Err(RuntimeErrorKind::UndefinedVariable {
            name: name.to_string(),
        })
    }

    /// Captures the current scope chain for a closure. The scope maps are
    /// shared, not copied: bindings added to a captured scope later are
    /// visible through the snapshot.
    pub fn snapshot(&self) -> Environment {
        self.clone()
    }

    /// The global (outermost) scope's bindings, sorted by name.
    pub fn bindings(&self) -> Vec<(String, Value)> {
        let scope = self.scopes.first().expect("environment has no scopes");
        let mut bindings: Vec<(String, Value)> = scope
            .borrow()
            .iter()
            .map(|(name, value)| (name.clone(), value.clone()))
            .collect();
        bindings.sort_by(|a, b| a.0.cmp(&b.0));
        bindings
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn declare_then_lookup() {
        let mut env = Environment::new();
        env.declare("x", Value::Number(1.0)).unwrap();
        assert_eq!(env.lookup("x").unwrap(), Value::Number(1.0));
    }

    #[test]
    fn redeclaration_in_same_scope_fails() {
        let mut env = Environment::new();
        env.declare("x", Value::Nil).unwrap();
        assert!(matches!(
            env.declare("x", Value::Nil),
            Err(RuntimeErrorKind::AlreadyDefined { .. })
        ));
    }

    #[test]
    fn shadowing_in_child_scope_is_allowed() {
        let mut env = Environment::new();
        env.declare("x", Value::Number(1.0)).unwrap();
        env.push_scope();
        env.declare("x", Value::Number(2.0)).unwrap();
        assert_eq!(env.lookup("x").unwrap(), Value::Number(2.0));
        env.pop_scope();
        assert_eq!(env.lookup("x").unwrap(), Value::Number(1.0));
    }

    #[test]
    fn assign_updates_nearest_binding() {
        let mut env = Environment::new();
        env.declare("x", Value::Number(1.0)).unwrap();
        env.push_scope();
        env.assign("x", Value::Number(5.0)).unwrap();
        env.pop_scope();
        assert_eq!(env.lookup("x").unwrap(), Value::Number(5.0));
    }

    #[test]
    fn assign_to_undeclared_fails() {
        let mut env = Environment::new();
        assert!(matches!(
            env.assign("missing", Value::Nil),
            Err(RuntimeErrorKind::UndefinedVariable { .. })
        ));
    }

    #[test]
    fn lookup_of_undeclared_fails() {
        let env = Environment::new();
        assert!(matches!(
            env.lookup("missing"),
            Err(RuntimeErrorKind::UndefinedVariable { .. })
        ));
    }

    #[test]
    fn push_then_pop_is_identity() {
        let mut env = Environment::new();
        env.declare("x", Value::Number(1.0)).unwrap();
        let before = env.depth();
        env.push_scope();
        env.pop_scope();
        assert_eq!(env.depth(), before);
        assert_eq!(env.lookup("x").unwrap(), Value::Number(1.0));
    }

    #[test]
    fn snapshot_shares_scope_maps() {
        let mut env = Environment::new();
        env.declare("x", Value::Number(1.0)).unwrap();
        let snapshot = env.snapshot();

        // A binding added to the live environment's global scope is visible
        // through the earlier snapshot.
        env.declare("y", Value::Number(2.0)).unwrap();
        assert_eq!(snapshot.lookup("y").unwrap(), Value::Number(2.0));

        // A scope pushed after the snapshot is not.
        env.push_scope();
        env.declare("z", Value::Number(3.0)).unwrap();
        assert!(snapshot.lookup("z").is_err());
    }

    #[test]
    fn bindings_are_sorted() {
        let mut env = Environment::new();
        env.declare("b", Value::Number(2.0)).unwrap();
        env.declare("a", Value::Number(1.0)).unwrap();
        let names: Vec<String> = env.bindings().into_iter().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["a".to_string(), "b".to_string()]);
    }
}
