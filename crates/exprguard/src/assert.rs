use anyhow::Context;
use camino::Utf8PathBuf;
use exprguard_domain::policy::InvalidHandling;
use exprguard_domain::{ExpressionValidator, valid_message};
use exprguard_render::{
    render_failure, render_invalid_expressions, render_no_invalid_expressions, render_unverified,
};
use exprguard_repo::RustSourceScanner;
use exprguard_settings::SECURITY_ATTRIBUTES;
use exprguard_types::{AttributeToScan, ScanRecord, ScanStatus, ValidationOutcome};

/// Entry point for expression assertions in tests.
///
/// Every check runs through the same [`ExpressionValidator`] the CLI uses. A content check
/// cannot verify a broken expression; it prints a notice naming the record instead of
/// passing it silently. [`ExpressionAssert::fail_on_invalid`] turns that notice into a
/// failure.
#[derive(Clone, Debug)]
pub struct ExpressionAssert {
    records: Vec<ScanRecord>,
    invalid: InvalidHandling,
}

/// Collects the scan configuration for [`ExpressionAssert::config`].
#[derive(Clone, Debug)]
pub struct ScanBuilder {
    root: Utf8PathBuf,
    attributes: Vec<AttributeToScan>,
}

impl Default for ScanBuilder {
    fn default() -> Self {
        Self {
            root: Utf8PathBuf::from("."),
            attributes: Vec::new(),
        }
    }
}

impl ScanBuilder {
    /// `pre_authorize`, `post_authorize`, `pre_filter` and `post_filter`, positional.
    pub fn register_security_defaults(self) -> Self {
        self.attributes(SECURITY_ATTRIBUTES.iter().copied())
    }

    pub fn root(mut self, root: impl Into<Utf8PathBuf>) -> Self {
        self.root = root.into();
        self
    }

    /// Scan `#[name("...")]`. Registering the same attribute twice has no effect.
    pub fn attribute(self, name: impl Into<String>) -> Self {
        self.attribute_to_scan(AttributeToScan::positional(name))
    }

    /// Scan `#[name(key = "...")]`.
    pub fn named_attribute(self, name: impl Into<String>, key: impl Into<String>) -> Self {
        self.attribute_to_scan(AttributeToScan::named(name, key))
    }

    pub fn attributes<I, S>(self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        names.into_iter().fold(self, |b, name| b.attribute(name))
    }

    fn attribute_to_scan(mut self, attribute: AttributeToScan) -> Self {
        if !self.attributes.contains(&attribute) {
            self.attributes.push(attribute);
        }
        self
    }

    /// Walk every `.rs` file under the root and build one record per expression found.
    pub fn scan(&self) -> anyhow::Result<Vec<ScanRecord>> {
        tracing::debug!(root = %self.root, attributes = self.attributes.len(), "scanning for expressions");
        let scan = RustSourceScanner::new(self.root.clone())
            .attributes(self.attributes.iter().cloned())
            .scan()
            .with_context(|| format!("scan {}", self.root))?;
        Ok(exprguard_domain::build_records(scan.sites))
    }
}

impl ExpressionAssert {
    pub fn config() -> ScanBuilder {
        ScanBuilder::default()
    }

    pub fn that(records: impl IntoIterator<Item = ScanRecord>) -> Self {
        Self {
            records: records.into_iter().collect(),
            invalid: InvalidHandling::Advise,
        }
    }

    /// Content checks fail on records whose expression does not parse.
    pub fn fail_on_invalid(mut self) -> Self {
        self.invalid = InvalidHandling::Fail;
        self
    }

    pub fn records(&self) -> &[ScanRecord] {
        &self.records
    }

    fn validator(&self) -> ExpressionValidator<'_> {
        ExpressionValidator::new(&self.records).with_invalid_handling(self.invalid)
    }

    /// Panics listing every expression that does not parse.
    #[track_caller]
    pub fn all_valid(&self) -> &Self {
        let outcome = self.validator().valid_syntax();
        if outcome.is_error() {
            let messages: Vec<&str> = outcome.violations.iter().map(|v| v.message.as_str()).collect();
            panic!("{}", render_invalid_expressions(&messages));
        }
        self
    }

    /// Panics, listing the valid ones, unless at least one expression does not parse.
    #[track_caller]
    pub fn has_invalid(&self) -> &Self {
        if !self.validator().any_match_status(ScanStatus::Invalid) {
            let messages: Vec<String> = self.records.iter().map(valid_message).collect();
            panic!("{}", render_no_invalid_expressions(&messages));
        }
        self
    }

    #[track_caller]
    pub fn uses_only_references(&self, allowed: &[&str]) -> &Self {
        expect_ok(self.validator().uses_only_references(allowed));
        self
    }

    #[track_caller]
    pub fn uses_only_calls(&self, allowed: &[&str]) -> &Self {
        expect_ok(self.validator().uses_only_calls(allowed));
        self
    }

    /// Every argument of every `call_name(...)` must be one of `allowed` (unquoted values).
    #[track_caller]
    pub fn verify_call_argument(&self, call_name: &str, allowed: &[&str]) -> &Self {
        expect_ok(self.validator().verify_call_argument(call_name, allowed));
        self
    }
}

#[track_caller]
fn expect_ok(outcome: ValidationOutcome) {
    if !outcome.advisories.is_empty() {
        let messages: Vec<&str> = outcome.advisories.iter().map(|v| v.message.as_str()).collect();
        eprintln!("{}", render_unverified(&outcome.policy, &messages));
    }
    if outcome.is_error() {
        let messages: Vec<&str> = outcome.violations.iter().map(|v| v.message.as_str()).collect();
        panic!("{}", render_failure(&outcome.summary, &messages));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use exprguard_domain::build;

    fn testklasse() -> Vec<ScanRecord> {
        vec![
            build("Testklasse", Some("correct"), "hasRole('B')"),
            build("Testklasse", Some("invalidClosedBrackets"), "hasRole('C'))"),
            build("Testklasse", Some("unknownBean"), "hasRole('D') && @unknownBean.someMethod()"),
        ]
    }

    fn valid() -> Vec<ScanRecord> {
        vec![
            build("TestUtil", Some("myMethod"), "hasRole('ADMIN') and @authz.check()"),
            build("TestUtil", None, "isAuthenticated()"),
        ]
    }

    #[test]
    fn valid_records_pass_every_check() {
        ExpressionAssert::that(valid())
            .all_valid()
            .uses_only_references(&["authz"])
            .uses_only_calls(&["hasRole", "check", "isAuthenticated"])
            .verify_call_argument("hasRole", &["ADMIN"]);
    }

    #[test]
    #[should_panic(expected = "❌ Found invalid expressions:\n\t❌\tTestklasse(invalidClosedBrackets) - Invalid expression 'hasRole('C'))'")]
    fn all_valid_lists_broken_expressions() {
        ExpressionAssert::that(testklasse()).all_valid();
    }

    #[test]
    fn has_invalid_passes_when_something_is_broken() {
        ExpressionAssert::that(testklasse()).has_invalid();
    }

    #[test]
    #[should_panic(expected = "❌ No errors found. Expected any invalid expressions:\n\t✅\tTestUtil(myMethod) - Expression is valid\n\t✅\tTestUtil - Expression is valid")]
    fn has_invalid_lists_valid_expressions() {
        ExpressionAssert::that(valid()).has_invalid();
    }

    #[test]
    fn broken_expression_does_not_fail_argument_check() {
        ExpressionAssert::that(testklasse()).verify_call_argument("hasRole", &["B", "C", "D"]);
    }

    #[test]
    #[should_panic(expected = "❌ Call 'hasRole' argument value not allowed - (allowed:'[B, C, D]')\n\t❌\tTestklasse(invalidClosedBrackets) - Cannot perform check")]
    fn fail_on_invalid_turns_unverified_into_failure() {
        ExpressionAssert::that(testklasse())
            .fail_on_invalid()
            .verify_call_argument("hasRole", &["B", "C", "D"]);
    }

    #[test]
    #[should_panic(expected = "❌ Reference not allowed - (allowed:'[authz]')\n\t❌\tTestklasse(invalidClosedBrackets) - Cannot perform check because of an invalid expression.")]
    fn fail_on_invalid_lists_broken_expressions_first() {
        ExpressionAssert::that(testklasse())
            .fail_on_invalid()
            .uses_only_references(&["authz"]);
    }

    #[test]
    #[should_panic(expected = "Testklasse(unknownBean) - '[unknownBean]'")]
    fn disallowed_reference_is_named() {
        let records: Vec<ScanRecord> = testklasse().into_iter().filter(|r| r.is_valid()).collect();
        ExpressionAssert::that(records).uses_only_references(&["authz"]);
    }

    #[test]
    #[should_panic(expected = "❌ Call not allowed - (allowed:'[hasRole]')\n\t❌\tTestUtil(myMethod) - '[check]'\n\t❌\tTestUtil - '[isAuthenticated]'")]
    fn disallowed_calls_are_listed_per_record() {
        ExpressionAssert::that(valid()).uses_only_calls(&["hasRole"]);
    }

    #[test]
    #[should_panic(expected = "TestUtil(myMethod) - Call 'hasRole' uses not allowed argument value ''ADMIN''")]
    fn disallowed_argument_is_named() {
        ExpressionAssert::that(valid()).verify_call_argument("hasRole", &["USER"]);
    }

    #[test]
    fn empty_records_pass_content_checks() {
        ExpressionAssert::that(Vec::new())
            .all_valid()
            .uses_only_references(&[])
            .uses_only_calls(&[])
            .verify_call_argument("hasRole", &[]);
    }

    #[test]
    fn builder_deduplicates_attributes() {
        let builder = ExpressionAssert::config()
            .register_security_defaults()
            .attribute("pre_authorize")
            .attributes(["secured", "secured"])
            .named_attribute("guard", "expr");
        assert_eq!(builder.attributes.len(), 6);
    }
}
