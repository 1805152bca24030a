use crate::{ExpressionSite, FactSet};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum ScanStatus {
    /// The expression parsed; facts are available.
    Valid,
    /// The expression is syntactically broken; only a diagnostic is available.
    Invalid,
}

/// Facts for a valid expression, or the parser diagnostic for an invalid one.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum ScanResult {
    Valid { facts: FactSet },
    Invalid { diagnostic: String },
}

/// Parse-and-extract result for one discovered expression. Never mutated after construction.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ScanRecord {
    #[serde(flatten)]
    pub site: ExpressionSite,
    #[serde(flatten)]
    pub result: ScanResult,
}

impl ScanRecord {
    pub fn valid(site: ExpressionSite, facts: FactSet) -> Self {
        Self {
            site,
            result: ScanResult::Valid { facts },
        }
    }

    pub fn invalid(site: ExpressionSite, diagnostic: impl Into<String>) -> Self {
        Self {
            site,
            result: ScanResult::Invalid {
                diagnostic: diagnostic.into(),
            },
        }
    }

    pub fn status(&self) -> ScanStatus {
        match self.result {
            ScanResult::Valid { .. } => ScanStatus::Valid,
            ScanResult::Invalid { .. } => ScanStatus::Invalid,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.status() == ScanStatus::Valid
    }

    pub fn facts(&self) -> Option<&FactSet> {
        match &self.result {
            ScanResult::Valid { facts } => Some(facts),
            ScanResult::Invalid { .. } => None,
        }
    }

    pub fn diagnostic(&self) -> Option<&str> {
        match &self.result {
            ScanResult::Valid { .. } => None,
            ScanResult::Invalid { diagnostic } => Some(diagnostic),
        }
    }

    pub fn owner(&self) -> &str {
        &self.site.owner
    }

    pub fn member(&self) -> Option<&str> {
        self.site.member.as_deref()
    }

    pub fn expression(&self) -> &str {
        &self.site.expression
    }

    pub fn display_name(&self) -> String {
        self.site.display_name()
    }
}
