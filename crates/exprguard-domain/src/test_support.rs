use crate::policy::{EffectiveConfig, PolicySettings};
use crate::record::build;
use exprguard_types::{CallFact, ExpressionSite, FactSet, ScanRecord, Severity};

/// The three-method fixture: one valid, one with an extra `)`, one with an unknown bean.
pub fn testklasse_records() -> Vec<ScanRecord> {
    vec![
        build("Testklasse", Some("correct"), "hasRole('B')"),
        build("Testklasse", Some("invalidClosedBrackets"), "hasRole('C'))"),
        build(
            "Testklasse",
            Some("unknownBean"),
            "hasRole('D') && @unknownBean.someMethod()",
        ),
    ]
}

fn site() -> ExpressionSite {
    ExpressionSite::new("TestUtil", Some("myMethod"), "hasRole('')")
}

pub fn valid_with_references(references: &[&str]) -> ScanRecord {
    let mut facts = FactSet::default();
    for r in references {
        facts.insert_reference(*r);
    }
    ScanRecord::valid(site(), facts)
}

pub fn valid_with_calls(calls: &[&str]) -> ScanRecord {
    let mut facts = FactSet::default();
    for c in calls {
        facts.insert_call(CallFact::new(*c, Vec::new()));
    }
    ScanRecord::valid(site(), facts)
}

pub fn config_with_calls(allow: &[&str], severity: Severity) -> EffectiveConfig {
    let mut cfg = EffectiveConfig::empty("test");
    cfg.calls = PolicySettings::enabled(severity).with_allow(allow.iter().copied());
    cfg
}
