use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Where the expression text sits inside an attribute's arguments.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case", tag = "kind", content = "key")]
pub enum ExpressionSlot {
    /// First string-literal argument, or `value = "..."`.
    Positional,
    /// `key = "..."`.
    Named(String),
}

/// A validated attribute to scan for expressions.
///
/// `name` is matched against the attribute path: a plain name matches the last path segment
/// (`pre_authorize` matches `#[actix_security::pre_authorize]`), a `::` path must match exactly.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub struct AttributeToScan {
    pub name: String,
    pub slot: ExpressionSlot,
}

impl AttributeToScan {
    pub fn positional(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            slot: ExpressionSlot::Positional,
        }
    }

    pub fn named(name: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            slot: ExpressionSlot::Named(key.into()),
        }
    }

    pub fn matches_path(&self, segments: &[String]) -> bool {
        if self.name.contains("::") {
            segments.join("::") == self.name
        } else {
            segments.last().is_some_and(|last| *last == self.name)
        }
    }
}
