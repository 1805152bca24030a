use crate::policy::{EffectiveConfig, FailOn};
use crate::report::{DomainReport, SeverityCounts};
use crate::validator::ExpressionValidator;
use exprguard_types::{ExprguardData, ScanRecord, Severity, ValidationOutcome, Verdict};

/// Run every enabled policy over `records` and derive the verdict.
///
/// `files_scanned` is left at zero; only the caller knows where the records came from.
pub fn evaluate(records: &[ScanRecord], cfg: &EffectiveConfig) -> DomainReport {
    let validator = ExpressionValidator::new(records).with_invalid_handling(cfg.invalid);

    let outcomes: Vec<ValidationOutcome> = cfg
        .policies()
        .into_iter()
        .map(|(policy, severity)| {
            let mut outcome = validator.check(&policy);
            outcome.severity = severity;
            outcome
        })
        .collect();

    let verdict = compute_verdict(&outcomes, cfg.fail_on);
    let counts = SeverityCounts::from_outcomes(&outcomes);

    let valid = records.iter().filter(|r| r.is_valid()).count() as u32;
    let data = ExprguardData {
        profile: cfg.profile.clone(),
        files_scanned: 0,
        expressions_scanned: records.len() as u32,
        expressions_valid: valid,
        expressions_invalid: records.len() as u32 - valid,
        violations_total: outcomes.iter().map(|o| o.violations.len() as u32).sum(),
        advisories_total: outcomes.iter().map(|o| o.advisories.len() as u32).sum(),
    };

    DomainReport {
        verdict,
        outcomes,
        data,
        counts,
    }
}

fn compute_verdict(outcomes: &[ValidationOutcome], fail_on: FailOn) -> Verdict {
    let failing = |sev: Severity| outcomes.iter().any(|o| o.is_error() && o.severity == sev);

    if failing(Severity::Error) {
        return Verdict::Fail;
    }

    if failing(Severity::Warning) {
        return match fail_on {
            FailOn::Warning => Verdict::Fail,
            FailOn::Error => Verdict::Warn,
        };
    }

    Verdict::Pass
}
