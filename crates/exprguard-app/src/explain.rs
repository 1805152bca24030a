//! The `explain` use case.
//!
//! A policy id explains the policy together with its `exprguard.toml` section, the codes
//! it reports and the profiles that turn it on. A code explains itself and names the
//! policies that can emit it.

use exprguard_settings::preset;
use exprguard_types::explain::{self, Explanation};
use exprguard_types::{Severity, ids};

const PROFILES: &[&str] = &["strict", "warn", "bare"];

struct PolicyEntry {
    id: &'static str,
    config: &'static str,
    codes: &'static [&'static str],
}

const POLICIES: &[PolicyEntry] = &[
    PolicyEntry {
        id: ids::POLICY_VALID_SYNTAX,
        config: "[policies.valid_syntax]\nenabled = true\nseverity = \"error\"",
        codes: &[ids::CODE_INVALID_EXPRESSION],
    },
    PolicyEntry {
        id: ids::POLICY_REFERENCES,
        config: "[policies.references]\nallow = [\"authz\"]",
        codes: &[ids::CODE_REFERENCE_NOT_ALLOWED, ids::CODE_UNVERIFIABLE_EXPRESSION],
    },
    PolicyEntry {
        id: ids::POLICY_CALLS,
        config: "[policies.calls]\nallow = [\"hasRole\", \"isAuthenticated\"]",
        codes: &[ids::CODE_CALL_NOT_ALLOWED, ids::CODE_UNVERIFIABLE_EXPRESSION],
    },
    PolicyEntry {
        id: ids::POLICY_CALL_ARGUMENTS,
        config: "[policies.call_arguments.hasRole]\nallow = [\"ADMIN\", \"USER\"]",
        codes: &[ids::CODE_ARGUMENT_NOT_ALLOWED, ids::CODE_UNVERIFIABLE_EXPRESSION],
    },
];

#[derive(Clone, Debug)]
pub struct PolicyTopic {
    pub policy_id: &'static str,
    pub explanation: Explanation,
    /// Minimal `exprguard.toml` section that enables the policy.
    pub config: &'static str,
    pub codes: &'static [&'static str],
    /// Profiles that enable the policy with no configuration, and at which severity.
    pub profiles: Vec<(&'static str, Severity)>,
}

#[derive(Clone, Debug)]
pub struct CodeTopic {
    pub code: &'static str,
    pub explanation: Explanation,
    pub emitted_by: Vec<&'static str>,
}

#[derive(Clone, Debug)]
pub enum ExplainOutput {
    Policy(PolicyTopic),
    Code(CodeTopic),
    /// Unknown identifier; carries what would have been accepted.
    NotFound {
        identifier: String,
        available_policy_ids: &'static [&'static str],
        available_codes: &'static [&'static str],
    },
}

pub fn run_explain(identifier: &str) -> ExplainOutput {
    policy_topic(identifier)
        .map(ExplainOutput::Policy)
        .or_else(|| code_topic(identifier).map(ExplainOutput::Code))
        .unwrap_or_else(|| ExplainOutput::NotFound {
            identifier: identifier.to_string(),
            available_policy_ids: explain::all_policy_ids(),
            available_codes: explain::all_codes(),
        })
}

fn policy_topic(identifier: &str) -> Option<PolicyTopic> {
    let entry = POLICIES.iter().find(|e| e.id == identifier)?;
    Some(PolicyTopic {
        policy_id: entry.id,
        explanation: explain::lookup_explanation(entry.id)?,
        config: entry.config,
        codes: entry.codes,
        profiles: profiles_enabling(entry.id),
    })
}

fn code_topic(identifier: &str) -> Option<CodeTopic> {
    let code = *explain::all_codes().iter().find(|c| **c == identifier)?;
    Some(CodeTopic {
        code,
        explanation: explain::lookup_explanation(code)?,
        emitted_by: POLICIES
            .iter()
            .filter(|e| e.codes.contains(&code))
            .map(|e| e.id)
            .collect(),
    })
}

fn profiles_enabling(policy_id: &str) -> Vec<(&'static str, Severity)> {
    PROFILES
        .iter()
        .filter_map(|name| {
            preset(name)
                .effective
                .policies()
                .into_iter()
                .find(|(policy, _)| policy.id() == policy_id)
                .map(|(_, severity)| (*name, severity))
        })
        .collect()
}

fn severity_label(severity: Severity) -> &'static str {
    match severity {
        Severity::Info => "info",
        Severity::Warning => "warning",
        Severity::Error => "error",
    }
}

fn push_heading(out: &mut String, text: &str, underline: char) {
    out.push_str(text);
    out.push('\n');
    out.extend(std::iter::repeat_n(underline, text.chars().count()));
    out.push_str("\n\n");
}

fn push_body(out: &mut String, exp: &Explanation) {
    out.push_str(exp.description);
    out.push_str("\n\n");
    push_heading(out, "Remediation", '-');
    out.push_str(exp.remediation);
    out.push_str("\n\n");
    push_heading(out, "Example", '-');
    out.push_str(&format!(
        "Before:\n```rust\n{}\n```\n\nAfter:\n```rust\n{}\n```\n",
        exp.examples.before, exp.examples.after
    ));
}

/// Terminal text for a found topic. `None` for [`ExplainOutput::NotFound`].
pub fn format_explanation(output: &ExplainOutput) -> Option<String> {
    let mut out = String::new();
    match output {
        ExplainOutput::Policy(topic) => {
            push_heading(
                &mut out,
                &format!("{}: {}", topic.policy_id, topic.explanation.title),
                '=',
            );
            if topic.profiles.is_empty() {
                out.push_str("Enabled by: no profile, configure it below\n");
            } else {
                let profiles: Vec<String> = topic
                    .profiles
                    .iter()
                    .map(|(name, sev)| format!("{} ({})", name, severity_label(*sev)))
                    .collect();
                out.push_str(&format!("Enabled by: {}\n", profiles.join(", ")));
            }
            out.push_str(&format!("Codes: {}\n\n", topic.codes.join(", ")));
            push_heading(&mut out, "Configuration", '-');
            out.push_str(&format!("```toml\n{}\n```\n\n", topic.config));
            push_body(&mut out, &topic.explanation);
        }
        ExplainOutput::Code(topic) => {
            push_heading(
                &mut out,
                &format!("{}: {}", topic.code, topic.explanation.title),
                '=',
            );
            out.push_str(&format!("Reported by: {}\n\n", topic.emitted_by.join(", ")));
            push_body(&mut out, &topic.explanation);
        }
        ExplainOutput::NotFound { .. } => return None,
    }
    Some(out)
}

pub fn format_not_found(identifier: &str, policy_ids: &[&str], codes: &[&str]) -> String {
    format!(
        "Unknown policy id or code: {}\n\nPolicies: {}\nCodes: {}\n",
        identifier,
        policy_ids.join(", "),
        codes.join(", ")
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn policy(identifier: &str) -> PolicyTopic {
        match run_explain(identifier) {
            ExplainOutput::Policy(topic) => topic,
            other => panic!("expected a policy topic, got {:?}", other),
        }
    }

    #[test]
    fn every_policy_id_has_a_topic() {
        for id in explain::all_policy_ids() {
            assert_eq!(policy(id).policy_id, *id);
        }
    }

    #[test]
    fn valid_syntax_is_enabled_by_security_profiles() {
        let topic = policy("expr.valid_syntax");
        assert_eq!(
            topic.profiles,
            vec![("strict", Severity::Error), ("warn", Severity::Warning)]
        );
        assert_eq!(topic.codes, &["invalid_expression"]);
    }

    #[test]
    fn allow_list_policies_need_configuration() {
        let topic = policy("expr.calls");
        assert!(topic.profiles.is_empty());
        assert!(topic.config.starts_with("[policies.calls]"));
    }

    #[test]
    fn unverifiable_code_is_shared_by_content_policies() {
        let ExplainOutput::Code(topic) = run_explain("unverifiable_expression") else {
            panic!("expected a code topic");
        };
        assert_eq!(
            topic.emitted_by,
            vec!["expr.references", "expr.calls", "expr.call_arguments"]
        );
    }

    #[test]
    fn unknown_identifier_lists_known_ones() {
        match run_explain("not_a_real_thing") {
            ExplainOutput::NotFound {
                identifier,
                available_policy_ids,
                available_codes,
            } => {
                assert_eq!(identifier, "not_a_real_thing");
                assert!(available_policy_ids.contains(&"expr.valid_syntax"));
                assert!(available_codes.contains(&"call_not_allowed"));
            }
            other => panic!("expected NotFound, got {:?}", other),
        }
    }

    #[test]
    fn policy_text_shows_profiles_config_and_codes() {
        let text = format_explanation(&run_explain("expr.valid_syntax")).expect("found");
        assert!(text.starts_with("expr.valid_syntax: Expressions Must Parse\n"));
        assert!(text.contains("Enabled by: strict (error), warn (warning)\n"));
        assert!(text.contains("Codes: invalid_expression\n"));
        assert!(text.contains("```toml\n[policies.valid_syntax]\n"));
        assert!(text.contains("```rust\n#[pre_authorize"));
    }

    #[test]
    fn code_text_names_reporting_policy() {
        let text = format_explanation(&run_explain("call_not_allowed")).expect("found");
        assert!(text.starts_with("call_not_allowed: "));
        assert!(text.contains("Reported by: expr.calls\n"));
        assert!(!text.contains("```toml"));
    }

    #[test]
    fn not_found_text() {
        let output = run_explain("missing");
        assert!(format_explanation(&output).is_none());
        let text = format_not_found("missing", &["expr.one", "expr.two"], &["code.one"]);
        assert_eq!(
            text,
            "Unknown policy id or code: missing\n\nPolicies: expr.one, expr.two\nCodes: code.one\n"
        );
    }
}
