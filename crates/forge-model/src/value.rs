//! Typed option values.

use serde::{Deserialize, Serialize};

/// A scalar or list value assigned to a service option.
///
/// Serialized untagged so snapshots read as plain JSON values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NixValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    List(Vec<String>),
    String(String),
}

impl From<bool> for NixValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for NixValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<&str> for NixValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for NixValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<Vec<String>> for NixValue {
    fn from(value: Vec<String>) -> Self {
        Self::List(value)
    }
}
