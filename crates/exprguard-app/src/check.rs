//! The `check` use case: scan sources, evaluate policies, produce a report.

use anyhow::Context;
use camino::Utf8Path;
use exprguard_repo::RustSourceScanner;
use exprguard_settings::{Overrides, ResolvedConfig};
use exprguard_types::{ExprguardReport, ReportEnvelope, SCHEMA_REPORT_V1, ToolMeta, Verdict};
use time::OffsetDateTime;

/// Input for the check use case.
#[derive(Clone, Debug)]
pub struct CheckInput<'a> {
    /// Repository root path.
    pub repo_root: &'a Utf8Path,
    /// Config file contents (empty string if not found).
    pub config_text: &'a str,
    /// CLI overrides.
    pub overrides: Overrides,
}

/// Output from the check use case.
#[derive(Clone, Debug)]
pub struct CheckOutput {
    /// The generated report.
    pub report: ExprguardReport,
    /// The resolved configuration used.
    pub resolved_config: ResolvedConfig,
}

/// Run the check use case: parse config, scan sources, evaluate policies, produce report.
pub fn run_check(input: CheckInput<'_>) -> anyhow::Result<CheckOutput> {
    let started_at = OffsetDateTime::now_utc();

    // Parse config (empty is allowed, defaults apply).
    let cfg = if input.config_text.trim().is_empty() {
        exprguard_settings::ExprguardConfigV1::default()
    } else {
        exprguard_settings::parse_config_toml(input.config_text).context("parse config")?
    };

    let resolved =
        exprguard_settings::resolve_config(cfg, input.overrides).context("resolve config")?;
    tracing::debug!(
        profile = %resolved.effective.profile,
        attributes = resolved.scan.attributes.len(),
        "resolved config"
    );

    let scan = RustSourceScanner::new(input.repo_root)
        .include(resolved.scan.include.iter().cloned())
        .exclude(resolved.scan.exclude.iter().cloned())
        .attributes(resolved.scan.attributes.iter().cloned())
        .scan()
        .context("scan sources")?;

    let files_scanned = scan.files.len() as u32;
    let records = exprguard_domain::build_records(scan.sites);

    let exprguard_domain::report::DomainReport {
        verdict,
        outcomes,
        mut data,
        counts,
    } = exprguard_domain::evaluate(&records, &resolved.effective);
    data.files_scanned = files_scanned;

    tracing::info!(
        verdict = ?verdict,
        expressions = data.expressions_scanned,
        invalid = data.expressions_invalid,
        errors = counts.error,
        warnings = counts.warning,
        "check complete"
    );

    let report = ReportEnvelope {
        schema: SCHEMA_REPORT_V1.to_string(),
        tool: ToolMeta {
            name: "exprguard".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        },
        started_at,
        finished_at: OffsetDateTime::now_utc(),
        verdict,
        outcomes,
        records,
        data,
    };

    Ok(CheckOutput {
        report,
        resolved_config: resolved,
    })
}

/// Map verdict to exit code: 0 = pass/warn, 2 = fail.
pub fn verdict_exit_code(verdict: Verdict) -> i32 {
    match verdict {
        Verdict::Pass => 0,
        Verdict::Warn => 0,
        Verdict::Fail => 2,
    }
}
