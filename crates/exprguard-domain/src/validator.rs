use crate::fingerprint::fingerprint_for_violation;
use crate::policy::{InvalidHandling, Policy};
use exprguard_types::{
    FactSet, OutcomeStatus, ScanRecord, ScanStatus, Severity, ValidationOutcome, Violation, ids,
};
use std::collections::BTreeSet;

/// The one policy engine over a batch of scan records.
///
/// Every check is a pure function of the records and its arguments; nothing is cached
/// between calls and the records are never modified.
#[derive(Clone, Copy, Debug)]
pub struct ExpressionValidator<'a> {
    records: &'a [ScanRecord],
    invalid: InvalidHandling,
}

impl<'a> ExpressionValidator<'a> {
    pub fn new(records: &'a [ScanRecord]) -> Self {
        Self {
            records,
            invalid: InvalidHandling::default(),
        }
    }

    pub fn with_invalid_handling(mut self, invalid: InvalidHandling) -> Self {
        self.invalid = invalid;
        self
    }

    pub fn records(&self) -> &'a [ScanRecord] {
        self.records
    }

    /// True iff every record has `status` (vacuously true for no records).
    pub fn all_match_status(&self, status: ScanStatus) -> bool {
        self.records.iter().all(|r| r.status() == status)
    }

    /// True iff at least one record has `status`.
    pub fn any_match_status(&self, status: ScanStatus) -> bool {
        self.records.iter().any(|r| r.status() == status)
    }

    pub fn check(&self, policy: &Policy) -> ValidationOutcome {
        match policy {
            Policy::ValidSyntax => self.valid_syntax(),
            Policy::References { allow } => self.uses_only_references(allow.as_slice()),
            Policy::Calls { allow } => self.uses_only_calls(allow.as_slice()),
            Policy::CallArguments { call, allow } => {
                self.verify_call_argument(call, allow.as_slice())
            }
        }
    }

    /// One violation per record whose expression did not parse.
    pub fn valid_syntax(&self) -> ValidationOutcome {
        let violations = self
            .records
            .iter()
            .filter_map(|record| {
                let diagnostic = record.diagnostic()?;
                Some(violation(
                    ids::POLICY_VALID_SYNTAX,
                    ids::CODE_INVALID_EXPRESSION,
                    record,
                    format!(
                        "{} - Invalid expression '{}': {}",
                        record.display_name(),
                        record.expression(),
                        diagnostic
                    ),
                    Vec::new(),
                ))
            })
            .collect();

        finish(
            ids::POLICY_VALID_SYNTAX,
            "All expressions are valid",
            "Found invalid expressions".to_string(),
            violations,
            Vec::new(),
        )
    }

    /// Every symbolic reference must be in `allowed`.
    pub fn uses_only_references<S: AsRef<str>>(&self, allowed: &[S]) -> ValidationOutcome {
        let allowed = allow_set(allowed);
        self.per_record(
            ids::POLICY_REFERENCES,
            "All references are valid",
            format!("Reference not allowed - (allowed:'{}')", list(&allowed)),
            |record, facts| {
                let offending: Vec<String> = facts
                    .references
                    .iter()
                    .filter(|r| !allowed.contains(r.as_str()))
                    .cloned()
                    .collect();
                listing_violation(ids::POLICY_REFERENCES, ids::CODE_REFERENCE_NOT_ALLOWED, record, offending)
                    .into_iter()
                    .collect()
            },
        )
    }

    /// Every call name must be in `allowed`.
    pub fn uses_only_calls<S: AsRef<str>>(&self, allowed: &[S]) -> ValidationOutcome {
        let allowed = allow_set(allowed);
        self.per_record(
            ids::POLICY_CALLS,
            "All calls are valid",
            format!("Call not allowed - (allowed:'{}')", list(&allowed)),
            |record, facts| {
                let offending: Vec<String> = facts
                    .call_names()
                    .into_iter()
                    .filter(|name| !allowed.contains(name))
                    .map(str::to_string)
                    .collect();
                listing_violation(ids::POLICY_CALLS, ids::CODE_CALL_NOT_ALLOWED, record, offending)
                    .into_iter()
                    .collect()
            },
        )
    }

    /// Every argument of every `call_name(...)` must be one of `allowed`, compared as
    /// quoted string literals (`ADMIN` matches the argument text `'ADMIN'`).
    pub fn verify_call_argument<S: AsRef<str>>(&self, call_name: &str, allowed: &[S]) -> ValidationOutcome {
        let quoted = quoted_values(allowed);
        let plain: Vec<&str> = allowed.iter().map(AsRef::as_ref).collect();
        self.per_record(
            ids::POLICY_CALL_ARGUMENTS,
            "All call arguments are valid",
            format!(
                "Call '{}' argument value not allowed - (allowed:'[{}]')",
                call_name,
                plain.join(", ")
            ),
            |record, facts| {
                facts
                    .calls_named(call_name)
                    .flat_map(|call| call.args.iter())
                    .filter(|arg| !quoted.contains(arg))
                    .map(|arg| {
                        violation(
                            ids::POLICY_CALL_ARGUMENTS,
                            ids::CODE_ARGUMENT_NOT_ALLOWED,
                            record,
                            format!(
                                "{} - Call '{}' uses not allowed argument value '{}'",
                                record.display_name(),
                                call_name,
                                arg
                            ),
                            vec![arg.clone()],
                        )
                    })
                    .collect()
            },
        )
    }

    /// Shared loop of the content policies: valid records go through `check`, invalid
    /// ones become advisories or violations depending on [`InvalidHandling`].
    fn per_record<F>(
        &self,
        policy: &str,
        ok_summary: &str,
        error_summary: String,
        check: F,
    ) -> ValidationOutcome
    where
        F: Fn(&ScanRecord, &FactSet) -> Vec<Violation>,
    {
        let mut violations = Vec::new();
        let mut advisories = Vec::new();

        for record in self.records {
            match record.facts() {
                Some(facts) => violations.extend(check(record, facts)),
                None => {
                    let item = unverifiable(policy, record);
                    match self.invalid {
                        InvalidHandling::Advise => advisories.push(item),
                        InvalidHandling::Fail => violations.push(item),
                    }
                }
            }
        }

        finish(policy, ok_summary, error_summary, violations, advisories)
    }
}

/// `["A", "B"]` becomes `["'A'", "'B'"]`, the way a string literal argument renders in
/// source. Embedded quotes are doubled to match the literal escape.
pub fn quoted_values<S: AsRef<str>>(values: &[S]) -> Vec<String> {
    values
        .iter()
        .map(|v| format!("'{}'", v.as_ref().replace('\'', "''")))
        .collect()
}

/// `Owner(member) - Expression is valid`
pub fn valid_message(record: &ScanRecord) -> String {
    format!("{} - Expression is valid", record.display_name())
}

/// `Owner(member) - Cannot perform check ...: <diagnostic>`
pub fn invalid_message(record: &ScanRecord) -> String {
    format!(
        "{} - Cannot perform check because of an invalid expression. Please fix it first: {}",
        record.display_name(),
        record.diagnostic().unwrap_or_default()
    )
}

fn allow_set<S: AsRef<str>>(allowed: &[S]) -> BTreeSet<&str> {
    allowed.iter().map(AsRef::as_ref).collect()
}

fn list(values: &BTreeSet<&str>) -> String {
    let joined: Vec<&str> = values.iter().copied().collect();
    format!("[{}]", joined.join(", "))
}

fn unverifiable(policy: &str, record: &ScanRecord) -> Violation {
    violation(
        policy,
        ids::CODE_UNVERIFIABLE_EXPRESSION,
        record,
        invalid_message(record),
        Vec::new(),
    )
}

fn listing_violation(policy: &str, code: &str, record: &ScanRecord, offending: Vec<String>) -> Option<Violation> {
    if offending.is_empty() {
        return None;
    }
    let message = format!("{} - '[{}]'", record.display_name(), offending.join(", "));
    Some(violation(policy, code, record, message, offending))
}

fn violation(policy: &str, code: &str, record: &ScanRecord, message: String, values: Vec<String>) -> Violation {
    let fingerprint = fingerprint_for_violation(policy, code, record.owner(), record.member(), &values);
    Violation {
        code: code.to_string(),
        owner: record.owner().to_string(),
        member: record.member().map(str::to_string),
        message,
        values,
        location: record.site.location.clone(),
        fingerprint: Some(fingerprint),
    }
}

fn finish(
    policy: &str,
    ok_summary: &str,
    error_summary: String,
    violations: Vec<Violation>,
    advisories: Vec<Violation>,
) -> ValidationOutcome {
    let (status, summary) = if violations.is_empty() {
        (OutcomeStatus::Ok, ok_summary.to_string())
    } else {
        (OutcomeStatus::Error, error_summary)
    };
    ValidationOutcome {
        policy: policy.to_string(),
        severity: Severity::Error,
        status,
        summary,
        violations,
        advisories,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::build;
    use crate::test_support::{testklasse_records, valid_with_calls, valid_with_references};

    #[test]
    fn status_predicates() {
        let records = testklasse_records();
        let validator = ExpressionValidator::new(&records);
        assert!(!validator.all_match_status(ScanStatus::Valid));
        assert!(validator.any_match_status(ScanStatus::Invalid));
        assert!(validator.any_match_status(ScanStatus::Valid));

        let none: Vec<ScanRecord> = Vec::new();
        let empty = ExpressionValidator::new(&none);
        assert!(empty.all_match_status(ScanStatus::Valid));
        assert!(!empty.any_match_status(ScanStatus::Invalid));
    }

    #[test]
    fn references_allowed_and_not_allowed() {
        let records = vec![valid_with_references(&["bean1", "bean2"])];
        let validator = ExpressionValidator::new(&records);

        let ok = validator.uses_only_references(&["bean1", "bean2"]);
        assert_eq!(ok.status, OutcomeStatus::Ok);
        assert_eq!(ok.summary, "All references are valid");

        let err = validator.uses_only_references(&["bean1"]);
        assert_eq!(err.status, OutcomeStatus::Error);
        assert_eq!(err.summary, "Reference not allowed - (allowed:'[bean1]')");
        assert_eq!(err.violations.len(), 1);
        assert_eq!(err.violations[0].values, vec!["bean2"]);
        assert_eq!(err.violations[0].message, "TestUtil(myMethod) - '[bean2]'");
    }

    #[test]
    fn calls_allowed_and_not_allowed() {
        let records = vec![valid_with_calls(&["hasRole", "isAdmin"])];
        let validator = ExpressionValidator::new(&records);

        assert!(validator.uses_only_calls(&["hasRole", "isAdmin"]).is_ok());

        let err = validator.uses_only_calls(&["hasRole"]);
        assert!(err.is_error());
        assert_eq!(err.violations.len(), 1);
        assert_eq!(err.violations[0].code, ids::CODE_CALL_NOT_ALLOWED);
        assert_eq!(err.violations[0].values, vec!["isAdmin"]);
    }

    #[test]
    fn one_violation_per_offending_record_in_input_order() {
        let records = vec![
            build("First", Some("a"), "isAdmin()"),
            build("Second", Some("b"), "hasRole('A')"),
            build("Third", None, "isAdmin() or isOwner()"),
        ];
        let outcome = ExpressionValidator::new(&records).uses_only_calls(&["hasRole"]);
        let owners: Vec<_> = outcome.violations.iter().map(|v| v.owner.as_str()).collect();
        assert_eq!(owners, vec!["First", "Third"]);
        assert_eq!(outcome.violations[1].values, vec!["isAdmin", "isOwner"]);
        assert_eq!(outcome.violations[1].message, "Third - '[isAdmin, isOwner]'");
    }

    #[test]
    fn call_arguments_compare_against_quoted_values() {
        let user = vec![build("Api", Some("read"), "hasRole('ROLE_USER')")];
        let outcome = ExpressionValidator::new(&user)
            .verify_call_argument("hasRole", &["ROLE_USER", "ROLE_ADMIN"]);
        assert!(outcome.is_ok());
        assert_eq!(outcome.summary, "All call arguments are valid");

        let guest = vec![build("Api", Some("read"), "hasRole('ROLE_GUEST')")];
        let outcome = ExpressionValidator::new(&guest)
            .verify_call_argument("hasRole", &["ROLE_USER", "ROLE_ADMIN"]);
        assert!(outcome.is_error());
        assert_eq!(outcome.violations.len(), 1);
        assert_eq!(outcome.violations[0].values, vec!["'ROLE_GUEST'"]);
        assert_eq!(
            outcome.violations[0].message,
            "Api(read) - Call 'hasRole' uses not allowed argument value ''ROLE_GUEST''"
        );
        assert_eq!(
            outcome.summary,
            "Call 'hasRole' argument value not allowed - (allowed:'[ROLE_USER, ROLE_ADMIN]')"
        );
    }

    #[test]
    fn call_arguments_only_look_at_the_named_call() {
        let records = vec![build("Api", None, "hasAuthority('X') and hasRole('A')")];
        let outcome = ExpressionValidator::new(&records).verify_call_argument("hasRole", &["A"]);
        assert!(outcome.is_ok());
    }

    #[test]
    fn non_literal_argument_is_not_allowed() {
        let records = vec![build("Api", None, "hasRole(#role)")];
        let outcome = ExpressionValidator::new(&records).verify_call_argument("hasRole", &["A"]);
        assert_eq!(outcome.violations[0].values, vec!["#role"]);
    }

    #[test]
    fn quoting_wraps_each_value() {
        assert_eq!(quoted_values(&["A", "B"]), vec!["'A'", "'B'"]);
        assert_eq!(quoted_values(&["it's"]), vec!["'it''s'"]);
    }

    #[test]
    fn empty_allow_list_rejects_everything_found() {
        let records = vec![build("Api", None, "@authz.check()")];
        let none: [&str; 0] = [];
        let validator = ExpressionValidator::new(&records);
        assert!(validator.uses_only_references(&none).is_error());
        assert!(validator.uses_only_calls(&none).is_error());
    }

    #[test]
    fn empty_record_collection_is_ok_for_every_policy() {
        let records: Vec<ScanRecord> = Vec::new();
        let validator = ExpressionValidator::new(&records);
        assert!(validator.valid_syntax().is_ok());
        assert!(validator.uses_only_references(&["a"]).is_ok());
        assert!(validator.uses_only_calls(&["a"]).is_ok());
        assert!(validator.verify_call_argument("hasRole", &["A"]).is_ok());
    }

    #[test]
    fn invalid_records_become_advisories_by_default() {
        let records = testklasse_records();
        let outcome = ExpressionValidator::new(&records).verify_call_argument("hasRole", &["B", "C", "D"]);
        assert!(outcome.is_ok());
        assert!(outcome.violations.is_empty());
        assert_eq!(outcome.advisories.len(), 1);
        let advisory = &outcome.advisories[0];
        assert_eq!(advisory.code, ids::CODE_UNVERIFIABLE_EXPRESSION);
        assert_eq!(advisory.member.as_deref(), Some("invalidClosedBrackets"));
        assert!(advisory.message.contains("Please fix it first"));
    }

    #[test]
    fn invalid_records_fail_when_asked_to() {
        let records = testklasse_records();
        let outcome = ExpressionValidator::new(&records)
            .with_invalid_handling(InvalidHandling::Fail)
            .verify_call_argument("hasRole", &["B", "C", "D"]);
        assert!(outcome.is_error());
        assert_eq!(outcome.violations.len(), 1);
        assert!(outcome.advisories.is_empty());
    }

    #[test]
    fn valid_syntax_reports_each_broken_record() {
        let records = testklasse_records();
        let outcome = ExpressionValidator::new(&records).valid_syntax();
        assert!(outcome.is_error());
        assert_eq!(outcome.violations.len(), 1);
        assert!(outcome.violations[0].message.starts_with(
            "Testklasse(invalidClosedBrackets) - Invalid expression 'hasRole('C'))'"
        ));
    }

    #[test]
    fn references_policy_sees_the_unknown_bean() {
        let records = testklasse_records();
        let outcome = ExpressionValidator::new(&records).uses_only_references(&["knownBean"]);
        assert!(outcome.is_error());
        assert_eq!(outcome.violations.len(), 1);
        assert_eq!(outcome.violations[0].values, vec!["unknownBean"]);
        assert_eq!(outcome.advisories.len(), 1);
    }

    #[test]
    fn violations_carry_fingerprints_and_locations() {
        let site = exprguard_types::ExpressionSite::new("Api", Some("get"), "isAdmin()")
            .with_location(exprguard_types::RepoPath::new("src/api.rs"), Some(3));
        let records = vec![crate::record::build_record(site)];
        let outcome = ExpressionValidator::new(&records).uses_only_calls(&["hasRole"]);
        let violation = &outcome.violations[0];
        assert_eq!(violation.fingerprint.as_ref().map(String::len), Some(64));
        assert_eq!(violation.location.as_ref().and_then(|l| l.line), Some(3));
    }

    #[test]
    fn record_messages() {
        let ok = build("TestUtil", Some("myMethod"), "hasRole('')");
        assert_eq!(valid_message(&ok), "TestUtil(myMethod) - Expression is valid");
        let bad = build("TestUtil", Some("myMethod"), "hasRole(''");
        assert!(invalid_message(&bad).contains("invalid expression"));
    }
}
