use exprguard_types::{Severity, ids};
use std::collections::BTreeMap;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum FailOn {
    #[default]
    Error,
    Warning,
}

/// What a content policy does with a record whose expression did not parse.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum InvalidHandling {
    /// List it under the outcome's advisories; status is unaffected.
    #[default]
    Advise,
    /// Count it as a violation.
    Fail,
}

/// One allow-list rule, ready to run against a batch of records.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Policy {
    /// Every expression must parse.
    ValidSyntax,
    /// Only these symbolic references may appear.
    References { allow: Vec<String> },
    /// Only calls with these names may appear.
    Calls { allow: Vec<String> },
    /// Every argument of `call` must be one of these values, written as a quoted literal.
    CallArguments { call: String, allow: Vec<String> },
}

impl Policy {
    pub fn id(&self) -> &'static str {
        match self {
            Policy::ValidSyntax => ids::POLICY_VALID_SYNTAX,
            Policy::References { .. } => ids::POLICY_REFERENCES,
            Policy::Calls { .. } => ids::POLICY_CALLS,
            Policy::CallArguments { .. } => ids::POLICY_CALL_ARGUMENTS,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PolicySettings {
    pub enabled: bool,
    pub severity: Severity,
    pub allow: Vec<String>,
}

impl PolicySettings {
    pub fn enabled(severity: Severity) -> Self {
        Self {
            enabled: true,
            severity,
            allow: Vec::new(),
        }
    }

    pub fn disabled() -> Self {
        Self {
            enabled: false,
            severity: Severity::Info,
            allow: Vec::new(),
        }
    }

    pub fn with_allow<I, S>(mut self, allow: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allow = allow.into_iter().map(Into::into).collect();
        self
    }
}

#[derive(Clone, Debug)]
pub struct EffectiveConfig {
    pub profile: String,
    pub fail_on: FailOn,
    pub invalid: InvalidHandling,
    pub valid_syntax: PolicySettings,
    pub references: PolicySettings,
    pub calls: PolicySettings,
    /// Keyed by call name.
    pub call_arguments: BTreeMap<String, PolicySettings>,
}

impl EffectiveConfig {
    /// Nothing enabled; a starting point for tests and callers that add policies by hand.
    pub fn empty(profile: impl Into<String>) -> Self {
        Self {
            profile: profile.into(),
            fail_on: FailOn::Error,
            invalid: InvalidHandling::Advise,
            valid_syntax: PolicySettings::disabled(),
            references: PolicySettings::disabled(),
            calls: PolicySettings::disabled(),
            call_arguments: BTreeMap::new(),
        }
    }

    /// Enabled policies in evaluation order: syntax, references, calls, then
    /// call arguments by call name.
    pub fn policies(&self) -> Vec<(Policy, Severity)> {
        let mut out = Vec::new();
        if self.valid_syntax.enabled {
            out.push((Policy::ValidSyntax, self.valid_syntax.severity));
        }
        if self.references.enabled {
            out.push((
                Policy::References {
                    allow: self.references.allow.clone(),
                },
                self.references.severity,
            ));
        }
        if self.calls.enabled {
            out.push((
                Policy::Calls {
                    allow: self.calls.allow.clone(),
                },
                self.calls.severity,
            ));
        }
        for (call, settings) in self.call_arguments.iter().filter(|(_, s)| s.enabled) {
            out.push((
                Policy::CallArguments {
                    call: call.clone(),
                    allow: settings.allow.clone(),
                },
                settings.severity,
            ));
        }
        out
    }
}
