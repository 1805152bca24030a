use exprguard_types::{ExprguardData, Severity, ValidationOutcome, Verdict};

/// Violations counted by the severity of the policy that raised them.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SeverityCounts {
    pub info: u32,
    pub warning: u32,
    pub error: u32,
}

impl SeverityCounts {
    pub fn from_outcomes(outcomes: &[ValidationOutcome]) -> Self {
        let mut counts = SeverityCounts::default();
        for outcome in outcomes {
            let n = outcome.violations.len() as u32;
            match outcome.severity {
                Severity::Info => counts.info += n,
                Severity::Warning => counts.warning += n,
                Severity::Error => counts.error += n,
            }
        }
        counts
    }
}

#[derive(Clone, Debug)]
pub struct DomainReport {
    pub verdict: Verdict,
    pub outcomes: Vec<ValidationOutcome>,
    pub data: ExprguardData,
    pub counts: SeverityCounts,
}
