use crate::{Location, Severity};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum OutcomeStatus {
    Ok,
    Error,
}

/// One record failing (or unable to be checked against) a policy.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Violation {
    pub code: String,
    pub owner: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub member: Option<String>,
    pub message: String,

    /// Offending references, call names, or argument texts.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub values: Vec<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<Location>,

    /// Stable identifier for dedup and trending: hash of policy, code, owner, member and values.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fingerprint: Option<String>,
}

/// Result of applying one policy to a collection of scan records.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ValidationOutcome {
    pub policy: String,
    pub severity: Severity,
    pub status: OutcomeStatus,
    pub summary: String,
    #[serde(default)]
    pub violations: Vec<Violation>,

    /// Records the policy could not verify (broken expressions). Never affects `status`.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub advisories: Vec<Violation>,
}

impl ValidationOutcome {
    pub fn is_ok(&self) -> bool {
        self.status == OutcomeStatus::Ok
    }

    pub fn is_error(&self) -> bool {
        self.status == OutcomeStatus::Error
    }
}
