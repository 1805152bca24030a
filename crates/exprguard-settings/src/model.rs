use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// `exprguard.toml` schema v1.
///
/// This is a *user-facing* config model: everything is optional and validated later.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ExprguardConfigV1 {
    /// Optional schema string for tooling (`exprguard.config.v1`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,

    /// `strict` (default), `warn`, or `bare`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile: Option<String>,

    /// When to fail the check: `error` (default) or `warning`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fail_on: Option<String>,

    /// What content policies do with expressions that do not parse: `advise` (default) or `fail`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub invalid_expressions: Option<String>,

    #[serde(default)]
    pub scan: ScanConfig,

    #[serde(default)]
    pub policies: PoliciesConfig,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ScanConfig {
    /// Repo-relative globs of files to scan. Replaces the preset list when set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub include: Option<Vec<String>>,

    /// Repo-relative globs to skip. Replaces the preset list when set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exclude: Option<Vec<String>>,

    /// Extra attributes to scan, appended to the preset ones.
    #[serde(default)]
    pub attributes: Vec<AttributeConfig>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct AttributeConfig {
    /// Attribute name (`pre_authorize`) or path (`security::pre_authorize`).
    pub name: String,

    /// Named argument holding the expression (`expr` for `#[secured(expr = "...")]`).
    /// Absent means the first string-literal argument.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub argument: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct PoliciesConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub valid_syntax: Option<PolicyConfig>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub references: Option<PolicyConfig>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub calls: Option<PolicyConfig>,

    /// Map of call name -> allowed argument values.
    #[serde(default)]
    pub call_arguments: BTreeMap<String, PolicyConfig>,
}

/// A policy section. Present means enabled unless `enabled = false`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct PolicyConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,

    /// Override the profile severity: `info`, `warning`, `error`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub severity: Option<String>,

    /// Allowed references, call names, or argument values. Empty allows nothing.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allow: Option<Vec<String>>,
}
