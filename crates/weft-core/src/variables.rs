//! The variable table supplied alongside the design tree.
//!
//! Node properties may reference externally defined, mode-dependent values
//! through binding references. The table is provided by the design source;
//! the pipeline never fetches it.

use indexmap::IndexMap;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::types::Color;

/// An opaque reference from a node property to a design variable.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BindingRef(pub String);

impl BindingRef {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for BindingRef {
    fn from(s: &str) -> Self {
        BindingRef(s.to_string())
    }
}

/// A resolved variable value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum VariableValue {
    Color(Color),
    Number(f64),
    String(String),
    Bool(bool),
}

impl VariableValue {
    pub fn as_color(&self) -> Option<Color> {
        match self {
            VariableValue::Color(c) => Some(*c),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            VariableValue::Number(n) => Some(*n),
            _ => None,
        }
    }
}

/// A design variable: a human-given name plus one value per mode.
///
/// Mode keys are source-defined ("light"/"dark", density names, breakpoint
/// labels). The first entry is the source's default mode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Variable {
    pub name: String,
    pub values: IndexMap<String, VariableValue>,
}

impl Variable {
    pub fn single(name: impl Into<String>, value: VariableValue) -> Self {
        let mut values = IndexMap::new();
        values.insert("default".to_string(), value);
        Self {
            name: name.into(),
            values,
        }
    }

    /// Value for the requested mode, falling back to the default mode.
    pub fn value_for(&self, mode: Option<&str>) -> Option<&VariableValue> {
        if let Some(mode) = mode {
            if let Some(v) = self.values.get(mode) {
                return Some(v);
            }
        }
        self.values.first().map(|(_, v)| v)
    }

    pub fn is_multi_mode(&self) -> bool {
        self.values.len() > 1
    }
}

/// Binding reference → variable lookup table.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VariableTable {
    vars: FxHashMap<String, Variable>,
}

impl VariableTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, reference: impl Into<String>, var: Variable) {
        self.vars.insert(reference.into(), var);
    }

    pub fn get(&self, reference: &BindingRef) -> Option<&Variable> {
        self.vars.get(reference.as_str())
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }
}
