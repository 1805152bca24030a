//! Property-based tests for the domain crate.
//!
//! These tests use proptest to verify invariants around:
//! - Fact extraction completeness at any nesting depth
//! - Determinism and deduplication
//! - Containment of syntax failures inside a batch
//! - Allow-list policies on empty and arbitrary inputs

use crate::expr::parse;
use crate::extract::extract;
use crate::record::{build, build_records};
use crate::validator::ExpressionValidator;
use exprguard_types::{ExpressionSite, ScanStatus};
use proptest::prelude::*;
use std::collections::BTreeSet;

// ============================================================================
// Strategies
// ============================================================================

/// Names always end in a digit, so they can never collide with a word operator
/// (`and`, `not`, ...) or a keyword.
fn arb_name() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-z]{1,6}[0-9]").unwrap()
}

/// An expression plus the references and call names it must yield.
#[derive(Clone, Debug)]
struct Generated {
    text: String,
    references: BTreeSet<String>,
    calls: BTreeSet<String>,
}

impl Generated {
    fn leaf(text: String) -> Self {
        Self {
            text,
            references: BTreeSet::new(),
            calls: BTreeSet::new(),
        }
    }

    fn merge(mut self, other: &Generated) -> Self {
        self.references.extend(other.references.iter().cloned());
        self.calls.extend(other.calls.iter().cloned());
        self
    }
}

fn arb_leaf() -> impl Strategy<Value = Generated> {
    prop_oneof![
        arb_name().prop_map(|n| {
            let mut g = Generated::leaf(format!("@{n}"));
            g.references.insert(n);
            g
        }),
        arb_name().prop_map(|n| {
            let mut g = Generated::leaf(format!("{n}()"));
            g.calls.insert(n);
            g
        }),
        prop::string::string_regex("[A-Z_]{0,6}")
            .unwrap()
            .prop_map(|s| Generated::leaf(format!("'{s}'"))),
        (0u32..1000).prop_map(|n| Generated::leaf(n.to_string())),
        Just(Generated::leaf("true".to_string())),
        Just(Generated::leaf("#root".to_string())),
    ]
}

fn join(name: &str, args: &[Generated]) -> Generated {
    let text = args
        .iter()
        .map(|a| a.text.as_str())
        .collect::<Vec<_>>()
        .join(", ");
    args.iter()
        .fold(Generated::leaf(format!("{name}({text})")), |acc, a| acc.merge(a))
}

fn arb_expression() -> impl Strategy<Value = Generated> {
    arb_leaf().prop_recursive(5, 48, 4, |inner| {
        prop_oneof![
            (
                inner.clone(),
                inner.clone(),
                prop::sample::select(vec!["&&", "||", "==", "!=", "+", "*", "and", "or", ">="])
            )
                .prop_map(|(a, b, op)| {
                    Generated::leaf(format!("{} {} {}", a.text, op, b.text))
                        .merge(&a)
                        .merge(&b)
                }),
            inner.clone().prop_map(|a| {
                let g = Generated::leaf(format!("({})", a.text));
                g.merge(&a)
            }),
            inner.clone().prop_map(|a| {
                let g = Generated::leaf(format!("!{}", a.text));
                g.merge(&a)
            }),
            (arb_name(), prop::collection::vec(inner.clone(), 0..3)).prop_map(|(name, args)| {
                let mut g = join(&name, &args);
                g.calls.insert(name);
                g
            }),
            (arb_name(), arb_name(), prop::collection::vec(inner, 0..3)).prop_map(
                |(bean, method, args)| {
                    let call = join(&method, &args);
                    let mut g = Generated::leaf(format!("@{bean}.{}", call.text)).merge(&call);
                    g.references.insert(bean);
                    g.calls.insert(method);
                    g
                }
            ),
        ]
    })
}

// ============================================================================
// Extraction
// ============================================================================

proptest! {
    /// Every reference and call is found, wherever it is nested.
    #[test]
    fn extraction_is_complete(g in arb_expression()) {
        let parsed = parse(&g.text);
        prop_assert!(parsed.is_ok(), "{:?} failed: {:?}", g.text, parsed);
        let facts = extract(&parsed.unwrap());

        prop_assert_eq!(&facts.references, &g.references);
        let names: BTreeSet<String> = facts.call_names().into_iter().map(str::to_string).collect();
        prop_assert_eq!(&names, &g.calls);
    }

    /// A call's own name only shows up among references if it was also used with `@`.
    #[test]
    fn call_names_do_not_leak_into_references(g in arb_expression()) {
        let facts = extract(&parse(&g.text).unwrap());
        for name in facts.call_names() {
            prop_assert!(
                !facts.references.contains(name) || g.references.contains(name),
                "call {} leaked into references",
                name
            );
        }
    }

    /// Parsing the same text twice gives equal facts.
    #[test]
    fn extraction_is_idempotent(g in arb_expression()) {
        let a = extract(&parse(&g.text).unwrap());
        let b = extract(&parse(&g.text).unwrap());
        prop_assert_eq!(a, b);
    }

    /// Repeating an expression adds no new facts.
    #[test]
    fn repeated_facts_collapse(g in arb_expression()) {
        let once = extract(&parse(&g.text).unwrap());
        let twice = extract(&parse(&format!("({}) && ({})", g.text, g.text)).unwrap());
        prop_assert_eq!(once, twice);
    }

    /// A stray closing parenthesis after a complete expression is always rejected.
    #[test]
    fn trailing_paren_is_rejected(g in arb_expression()) {
        let text = format!("{})", g.text);
        prop_assert!(parse(&text).is_err());
    }

    /// The parser never panics, whatever the input.
    #[test]
    fn parse_never_panics(s in any::<String>()) {
        let _ = parse(&s);
    }
}

// ============================================================================
// Records and policies
// ============================================================================

proptest! {
    /// A broken expression anywhere in a batch leaves the other records untouched.
    #[test]
    fn syntax_failures_are_contained(
        good in prop::collection::vec(arb_expression(), 0..6),
        at in 0usize..6,
    ) {
        let mut sites: Vec<ExpressionSite> = good
            .iter()
            .map(|g| ExpressionSite::new("Owner", None, g.text.clone()))
            .collect();
        let at = at.min(sites.len());
        sites.insert(at, ExpressionSite::new("Owner", Some("broken"), "hasRole('C'))"));

        let records = build_records(sites);
        prop_assert_eq!(records.len(), good.len() + 1);
        for (i, record) in records.iter().enumerate() {
            let expected = if i == at { ScanStatus::Invalid } else { ScanStatus::Valid };
            prop_assert_eq!(record.status(), expected);
        }
    }

    /// No records means nothing to complain about.
    #[test]
    fn empty_batch_is_ok(allow in prop::collection::vec(arb_name(), 0..4), call in arb_name()) {
        let records: Vec<exprguard_types::ScanRecord> = Vec::new();
        let validator = ExpressionValidator::new(&records);
        prop_assert!(validator.valid_syntax().is_ok());
        prop_assert!(validator.uses_only_references(allow.as_slice()).is_ok());
        prop_assert!(validator.uses_only_calls(allow.as_slice()).is_ok());
        prop_assert!(validator.verify_call_argument(&call, allow.as_slice()).is_ok());
    }

    /// Allowing exactly what was found always passes; allowing nothing fails iff
    /// something was found.
    #[test]
    fn allow_lists_match_extracted_facts(g in arb_expression()) {
        let records = vec![build("Owner", None, &g.text)];
        let validator = ExpressionValidator::new(&records);

        let refs: Vec<&str> = g.references.iter().map(String::as_str).collect();
        let calls: Vec<&str> = g.calls.iter().map(String::as_str).collect();
        prop_assert!(validator.uses_only_references(refs.as_slice()).is_ok());
        prop_assert!(validator.uses_only_calls(calls.as_slice()).is_ok());

        let none: Vec<&str> = Vec::new();
        prop_assert_eq!(validator.uses_only_references(none.as_slice()).is_error(), !refs.is_empty());
        prop_assert_eq!(validator.uses_only_calls(none.as_slice()).is_error(), !calls.is_empty());
    }
}
