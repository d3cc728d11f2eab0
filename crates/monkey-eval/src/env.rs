//! Lexically scoped variable environment for the Monkey evaluator.

use crate::value::Value;
use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

/// A single scope level.
#[derive(Default)]
struct Scope {
    bindings: RefCell<HashMap<String, Value>>,
    outer: Option<Environment>,
}

/// Shared handle to a scope and, through it, the chain of enclosing scopes.
///
/// Cloning the handle shares the scope: a closure that captures an
/// environment sees every later `define` made in it. Variables are looked
/// up from the innermost scope outward; `define` always binds in the
/// scope the handle points at.
#[derive(Clone, Default)]
pub struct Environment {
    scope: Rc<Scope>,
}

impl Environment {
    /// Create a new top-level environment.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty scope whose lookups fall back to `outer`.
    pub fn enclosed(outer: &Environment) -> Self {
        Self {
            scope: Rc::new(Scope {
                bindings: RefCell::default(),
                outer: Some(outer.clone()),
            }),
        }
    }

    /// Bind `name` in this scope, replacing any previous binding here.
    pub fn define(&self, name: impl Into<String>, value: Value) {
        self.scope.bindings.borrow_mut().insert(name.into(), value);
    }

    /// Look up a variable, searching from this scope outward.
    pub fn get(&self, name: &str) -> Option<Value> {
        let mut env = self;
        loop {
            if let Some(value) = env.scope.bindings.borrow().get(name) {
                return Some(value.clone());
            }
            env = env.scope.outer.as_ref()?;
        }
    }

    /// Returns `true` if both handles point at the same scope.
    pub fn ptr_eq(&self, other: &Environment) -> bool {
        Rc::ptr_eq(&self.scope, &other.scope)
    }

    /// Names bound directly in this scope, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.scope.bindings.borrow().keys().cloned().collect();
        names.sort();
        names
    }
}

// Closures hold their defining environment, which may hold the closure, so
// only names are printed.
impl fmt::Debug for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Environment")
            .field("names", &self.names())
            .field("has_outer", &self.scope.outer.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_define_and_get() {
        let env = Environment::new();
        env.define("x", Value::Integer(5));
        assert_eq!(env.get("x"), Some(Value::Integer(5)));
        assert_eq!(env.get("y"), None);
    }

    #[test]
    fn test_enclosed_falls_back_to_outer() {
        let outer = Environment::new();
        outer.define("x", Value::Integer(1));
        let inner = Environment::enclosed(&outer);
        inner.define("y", Value::Integer(2));

        assert_eq!(inner.get("x"), Some(Value::Integer(1)));
        assert_eq!(inner.get("y"), Some(Value::Integer(2)));
        assert_eq!(outer.get("y"), None);
        assert!(!inner.ptr_eq(&outer));
    }

    #[test]
    fn test_inner_binding_shadows_outer() {
        let outer = Environment::new();
        outer.define("x", Value::Integer(1));
        let inner = Environment::enclosed(&outer);
        inner.define("x", Value::Integer(2));

        assert_eq!(inner.get("x"), Some(Value::Integer(2)));
        assert_eq!(outer.get("x"), Some(Value::Integer(1)));
    }

    #[test]
    fn test_clones_share_the_scope() {
        let env = Environment::new();
        let captured = env.clone();
        env.define("late", Value::Boolean(true));
        assert_eq!(captured.get("late"), Some(Value::Boolean(true)));
        assert!(captured.ptr_eq(&env));
    }

    #[test]
    fn test_debug_lists_names_only() {
        let env = Environment::new();
        env.define("b", Value::Null);
        env.define("a", Value::Null);
        assert_eq!(
            format!("{env:?}"),
            r#"Environment { names: ["a", "b"], has_outer: false }"#
        );
    }
}
