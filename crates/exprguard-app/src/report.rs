use anyhow::Context;
use exprguard_render::{
    RenderableData, RenderableEntry, RenderableLocation, RenderableOutcome, RenderableReport,
    RenderableSeverity, RenderableVerdictStatus,
};
use exprguard_types::{
    ids, ExprguardData, ExprguardReport, OutcomeStatus, ReportEnvelope, SCHEMA_REPORT_V1, Severity,
    ToolMeta, ValidationOutcome, Verdict, Violation,
};
use time::OffsetDateTime;

pub fn parse_report_json(text: &str) -> anyhow::Result<ExprguardReport> {
    let value: serde_json::Value = serde_json::from_str(text).context("parse report json")?;

    let schema = value
        .get("schema")
        .and_then(|v| v.as_str())
        .unwrap_or_default()
        .to_string();

    if schema != SCHEMA_REPORT_V1 {
        anyhow::bail!("unknown report schema: {schema}");
    }
    serde_json::from_value(value).context("parse exprguard report")
}

pub fn serialize_report(report: &ExprguardReport) -> anyhow::Result<Vec<u8>> {
    serde_json::to_vec_pretty(report).context("serialize report")
}

pub fn to_renderable(report: &ExprguardReport) -> RenderableReport {
    let d = &report.data;
    RenderableReport {
        verdict: match report.verdict {
            Verdict::Pass => RenderableVerdictStatus::Pass,
            Verdict::Warn => RenderableVerdictStatus::Warn,
            Verdict::Fail => RenderableVerdictStatus::Fail,
        },
        outcomes: report.outcomes.iter().map(renderable_outcome).collect(),
        data: RenderableData {
            profile: d.profile.clone(),
            files_scanned: d.files_scanned,
            expressions_scanned: d.expressions_scanned,
            expressions_valid: d.expressions_valid,
            expressions_invalid: d.expressions_invalid,
            violations_total: d.violations_total,
            advisories_total: d.advisories_total,
        },
    }
}

fn renderable_outcome(o: &ValidationOutcome) -> RenderableOutcome {
    RenderableOutcome {
        policy: o.policy.clone(),
        severity: match o.severity {
            Severity::Info => RenderableSeverity::Info,
            Severity::Warning => RenderableSeverity::Warning,
            Severity::Error => RenderableSeverity::Error,
        },
        ok: o.is_ok(),
        summary: o.summary.clone(),
        violations: o.violations.iter().map(renderable_entry).collect(),
        advisories: o.advisories.iter().map(renderable_entry).collect(),
    }
}

fn renderable_entry(v: &Violation) -> RenderableEntry {
    RenderableEntry {
        code: v.code.clone(),
        message: v.message.clone(),
        location: v.location.as_ref().map(|loc| RenderableLocation {
            path: loc.path.as_str().to_string(),
            line: loc.line,
        }),
    }
}

fn tool() -> ToolMeta {
    ToolMeta {
        name: "exprguard".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    }
}

pub fn empty_report(profile: &str) -> ExprguardReport {
    let now = OffsetDateTime::now_utc();
    ReportEnvelope {
        schema: SCHEMA_REPORT_V1.to_string(),
        tool: tool(),
        started_at: now,
        finished_at: now,
        verdict: Verdict::Pass,
        outcomes: Vec::new(),
        records: Vec::new(),
        data: ExprguardData {
            profile: profile.to_string(),
            ..ExprguardData::default()
        },
    }
}

/// A failing report carrying one `tool.runtime` outcome, written when the check itself breaks.
pub fn runtime_error_report(message: &str) -> ExprguardReport {
    let now = OffsetDateTime::now_utc();
    ReportEnvelope {
        schema: SCHEMA_REPORT_V1.to_string(),
        tool: tool(),
        started_at: now,
        finished_at: now,
        verdict: Verdict::Fail,
        outcomes: vec![ValidationOutcome {
            policy: ids::POLICY_TOOL_RUNTIME.to_string(),
            severity: Severity::Error,
            status: OutcomeStatus::Error,
            summary: "Fix the tool error and re-run exprguard.".to_string(),
            violations: vec![Violation {
                code: ids::CODE_RUNTIME_ERROR.to_string(),
                owner: "exprguard".to_string(),
                member: None,
                message: message.to_string(),
                values: Vec::new(),
                location: None,
                fingerprint: None,
            }],
            advisories: Vec::new(),
        }],
        records: Vec::new(),
        data: ExprguardData {
            profile: "unknown".to_string(),
            violations_total: 1,
            ..ExprguardData::default()
        },
    }
}
