use crate::RepoPath;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Where a discovered expression lives in the scanned tree.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Location {
    pub path: RepoPath,
    /// 1-based line of the expression literal.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<u32>,
}

/// One `(owner, member, expression)` triple handed over by a discovery source.
///
/// `member` is absent for expressions attached to the type itself.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ExpressionSite {
    pub owner: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub member: Option<String>,
    pub expression: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<Location>,
}

impl ExpressionSite {
    pub fn new(owner: impl Into<String>, member: Option<&str>, expression: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            member: member.map(str::to_string),
            expression: expression.into(),
            location: None,
        }
    }

    pub fn with_location(mut self, path: RepoPath, line: Option<u32>) -> Self {
        self.location = Some(Location { path, line });
        self
    }

    /// `Owner(member)` or just `Owner` for type-level expressions.
    pub fn display_name(&self) -> String {
        match &self.member {
            Some(member) => format!("{}({})", self.owner, member),
            None => self.owner.clone(),
        }
    }
}
