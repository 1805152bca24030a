//! Explain registry for policies and codes.
//!
//! Maps policy IDs and codes to human-readable explanations with remediation guidance.

use crate::ids;

/// Explanation entry for a policy or code.
#[derive(Debug, Clone)]
pub struct Explanation {
    /// Short description of the policy/code.
    pub title: &'static str,
    /// What the policy checks and why it exists.
    pub description: &'static str,
    /// How to fix violations.
    pub remediation: &'static str,
    /// Before/after examples.
    pub examples: ExamplePair,
}

/// Before and after examples.
#[derive(Debug, Clone)]
pub struct ExamplePair {
    /// Code that would trigger a violation.
    pub before: &'static str,
    /// Code that passes the policy.
    pub after: &'static str,
}

/// Look up an explanation by policy ID or code.
///
/// Returns `None` if the identifier is not recognized.
pub fn lookup_explanation(identifier: &str) -> Option<Explanation> {
    match identifier {
        ids::POLICY_VALID_SYNTAX | ids::CODE_INVALID_EXPRESSION => Some(explain_valid_syntax()),
        ids::POLICY_REFERENCES | ids::CODE_REFERENCE_NOT_ALLOWED => Some(explain_references()),
        ids::POLICY_CALLS | ids::CODE_CALL_NOT_ALLOWED => Some(explain_calls()),
        ids::POLICY_CALL_ARGUMENTS | ids::CODE_ARGUMENT_NOT_ALLOWED => {
            Some(explain_call_arguments())
        }
        ids::CODE_UNVERIFIABLE_EXPRESSION => Some(explain_unverifiable()),
        _ => None,
    }
}

/// List all known policy IDs.
pub fn all_policy_ids() -> &'static [&'static str] {
    &[
        ids::POLICY_VALID_SYNTAX,
        ids::POLICY_REFERENCES,
        ids::POLICY_CALLS,
        ids::POLICY_CALL_ARGUMENTS,
    ]
}

/// List all known codes.
pub fn all_codes() -> &'static [&'static str] {
    &[
        ids::CODE_INVALID_EXPRESSION,
        ids::CODE_REFERENCE_NOT_ALLOWED,
        ids::CODE_CALL_NOT_ALLOWED,
        ids::CODE_ARGUMENT_NOT_ALLOWED,
        ids::CODE_UNVERIFIABLE_EXPRESSION,
    ]
}

fn explain_valid_syntax() -> Explanation {
    Explanation {
        title: "Expressions Must Parse",
        description: "\
Reports every attached expression that is not syntactically valid.

A broken expression usually fails only at request time, when the guarded method is first
called. Content policies cannot inspect it either, so it silently escapes every allow-list.",
        remediation: "\
Fix the expression text. Typical causes are unbalanced parentheses, unterminated string
literals, and stray tokens after a complete expression.",
        examples: ExamplePair {
            before: r#"#[pre_authorize("hasRole('ADMIN'))")]
fn delete_user() {}"#,
            after: r#"#[pre_authorize("hasRole('ADMIN')")]
fn delete_user() {}"#,
        },
    }
}

fn explain_references() -> Explanation {
    Explanation {
        title: "Allowed Bean References",
        description: "\
Restricts the `@name` references an expression may use to an allow-list.

References reach into arbitrary application components. Keeping the set small makes
authorization rules reviewable and stops typos from resolving to the wrong component.",
        remediation: "\
Replace the reference with an approved one, or add it to `[policies.references] allow`
after review.",
        examples: ExamplePair {
            before: r#"#[pre_authorize("@unknownBean.someMethod()")]
fn report() {}"#,
            after: r#"#[pre_authorize("@authz.canRead()")]
fn report() {}"#,
        },
    }
}

fn explain_calls() -> Explanation {
    Explanation {
        title: "Allowed Calls",
        description: "\
Restricts the functions and methods an expression may call to an allow-list.

The check looks at every call at any nesting depth, including calls inside arguments.",
        remediation: "\
Rewrite the rule with an approved call, or add the call name to `[policies.calls] allow`.",
        examples: ExamplePair {
            before: r#"#[pre_authorize("isAdmin()")]
fn settings() {}"#,
            after: r#"#[pre_authorize("hasRole('ADMIN')")]
fn settings() {}"#,
        },
    }
}

fn explain_call_arguments() -> Explanation {
    Explanation {
        title: "Allowed Call Arguments",
        description: "\
Restricts the literal arguments passed to one named call, e.g. the roles given to `hasRole`.

Each argument is compared by its source text against the allowed values written as
single-quoted string literals, so `ADMIN` in the allow-list matches `hasRole('ADMIN')`.",
        remediation: "\
Use one of the approved values, or extend `[policies.call_arguments.<call>] allow`.",
        examples: ExamplePair {
            before: r#"#[pre_authorize("hasRole('ROLE_GUEST')")]
fn dashboard() {}"#,
            after: r#"#[pre_authorize("hasRole('ROLE_USER')")]
fn dashboard() {}"#,
        },
    }
}

fn explain_unverifiable() -> Explanation {
    Explanation {
        title: "Unverifiable Expression",
        description: "\
A content policy skipped a record because its expression does not parse.

The record is listed as an advisory (or a violation with `invalid_expressions = \"fail\"`)
so that a broken rule never counts as passing.",
        remediation: "\
Fix the syntax first; the content policies run on the next check.",
        examples: ExamplePair {
            before: r#"#[pre_authorize("hasRole('C'))")]
fn invalid_closed_brackets() {}"#,
            after: r#"#[pre_authorize("hasRole('C')")]
fn invalid_closed_brackets() {}"#,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_policy_and_code_has_an_explanation() {
        for id in all_policy_ids().iter().chain(all_codes()) {
            assert!(lookup_explanation(id).is_some(), "missing explanation for {id}");
        }
    }

    #[test]
    fn unknown_identifier_has_none() {
        assert!(lookup_explanation("expr.no_such_policy").is_none());
    }
}
