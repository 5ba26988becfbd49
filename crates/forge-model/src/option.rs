//! Option metadata discovered from module sources.

use serde::{Deserialize, Serialize};

/// Coarse classification of an option's declared type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OptionType {
    Boolean,
    String,
    Int,
    List,
    Other,
}

impl OptionType {
    /// Classifies a raw `type = ...` expression by the constructors it mentions.
    pub fn classify(raw: &str) -> Self {
        if raw.contains("bool") {
            Self::Boolean
        } else if raw.contains("str") || raw.contains("lines") {
            Self::String
        } else if raw.contains("int") || raw.contains("port") {
            Self::Int
        } else if raw.contains("list") {
            Self::List
        } else {
            Self::Other
        }
    }
}

/// Describes one configurable option. Used as a hint only, never rendered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionMetadata {
    pub name: String,
    pub description: String,
    #[serde(rename = "type")]
    pub option_type: OptionType,
    /// Example or default value as written in the source.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub example: Option<String>,
}
