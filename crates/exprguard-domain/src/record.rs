use crate::expr::parse;
use crate::extract::extract;
use exprguard_types::{ExpressionSite, ScanRecord};

/// Parse and extract one discovered expression.
///
/// Never fails: a syntax error becomes an invalid record carrying its diagnostic.
pub fn build_record(site: ExpressionSite) -> ScanRecord {
    match parse(&site.expression) {
        Ok(parsed) => ScanRecord::valid(site, extract(&parsed)),
        Err(err) => ScanRecord::invalid(site, err.to_string()),
    }
}

/// Convenience form of [`build_record`] for an `(owner, member, expression)` triple.
pub fn build(owner: &str, member: Option<&str>, expression: &str) -> ScanRecord {
    build_record(ExpressionSite::new(owner, member, expression))
}

/// One record per site, in input order. A broken expression never stops the batch.
pub fn build_records<I>(sites: I) -> Vec<ScanRecord>
where
    I: IntoIterator<Item = ExpressionSite>,
{
    sites.into_iter().map(build_record).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use exprguard_types::{CallFact, RepoPath, ScanStatus};

    #[test]
    fn valid_expression_carries_facts() {
        let record = build("Testklasse", Some("correct"), "hasRole('B')");
        assert_eq!(record.status(), ScanStatus::Valid);
        let facts = record.facts().expect("facts");
        assert!(facts.calls.contains(&CallFact::new("hasRole", vec!["'B'".into()])));
        assert!(record.diagnostic().is_none());
    }

    #[test]
    fn long_operator_chain_builds_a_valid_record() {
        let text = vec!["hasRole('A')"; 20_000].join(" or ");
        let record = build("Owner", None, &text);
        assert_eq!(record.status(), ScanStatus::Valid);
        let facts = record.facts().expect("facts");
        assert_eq!(facts.calls.len(), 1);
    }

    #[test]
    fn invalid_expression_carries_diagnostic_only() {
        let record = build("Testklasse", Some("broken"), "hasRole('C'))");
        assert_eq!(record.status(), ScanStatus::Invalid);
        assert!(record.facts().is_none());
        let diagnostic = record.diagnostic().expect("diagnostic");
        assert!(diagnostic.contains("more data after a complete expression"));
    }

    #[test]
    fn one_bad_expression_does_not_stop_the_batch() {
        let records = build_records(vec![
            ExpressionSite::new("Testklasse", Some("a"), "hasRole('B')"),
            ExpressionSite::new("Testklasse", Some("b"), "hasRole('C'))"),
            ExpressionSite::new("Testklasse", Some("c"), "hasRole('D') && @unknownBean.someMethod()"),
        ]);
        let statuses: Vec<_> = records.iter().map(|r| r.status()).collect();
        assert_eq!(
            statuses,
            vec![ScanStatus::Valid, ScanStatus::Invalid, ScanStatus::Valid]
        );
        assert_eq!(records[2].member(), Some("c"));
    }

    #[test]
    fn location_survives_record_building() {
        let site = ExpressionSite::new("Api", Some("get"), "isAuthenticated()")
            .with_location(RepoPath::new("src/api.rs"), Some(12));
        let record = build_record(site);
        let location = record.site.location.as_ref().expect("location");
        assert_eq!(location.path.as_str(), "src/api.rs");
        assert_eq!(location.line, Some(12));
    }
}
