//! Environment for variable bindings
//!
//! One flat, global table. Subroutine bodies read and write the same
//! bindings as the top level; there are no nested scopes.

use super::Value;
use std::collections::HashMap;

/// Environment holding variable bindings
#[derive(Debug, Clone, Default)]
pub struct Environment {
    bindings: HashMap<String, Value>,
}

impl Environment {
    /// Create an empty environment
    pub fn new() -> Self {
        Environment {
            bindings: HashMap::new(),
        }
    }

    /// Bind a variable, creating or overwriting
    pub fn define(&mut self, name: String, value: Value) {
        self.bindings.insert(name, value);
    }

    /// Look up a variable
    pub fn get(&self, name: &str) -> Option<Value> {
        self.bindings.get(name).cloned()
    }

    /// Mutable access to a binding, for in-place index assignment
    pub fn get_mut(&mut self, name: &str) -> Option<&mut Value> {
        self.bindings.get_mut(name)
    }

    /// Check if a variable is bound
    pub fn contains(&self, name: &str) -> bool {
        self.bindings.contains_key(name)
    }

    /// All bindings (for the symbol-table dump)
    pub fn bindings(&self) -> &HashMap<String, Value> {
        &self.bindings
    }
}
