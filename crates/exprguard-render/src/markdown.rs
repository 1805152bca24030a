use crate::{RenderableEntry, RenderableReport, RenderableSeverity, RenderableVerdictStatus};

pub fn render_markdown(report: &RenderableReport) -> String {
    let mut out = String::new();

    out.push_str("# Exprguard report\n\n");
    let verdict = match report.verdict {
        RenderableVerdictStatus::Pass => "PASS",
        RenderableVerdictStatus::Warn => "WARN",
        RenderableVerdictStatus::Fail => "FAIL",
    };
    let d = &report.data;
    out.push_str(&format!(
        "- Verdict: **{}**\n- Profile: {}\n- Files scanned: {}\n- Expressions: {} scanned / {} valid / {} invalid\n- Violations: {} / Advisories: {}\n\n",
        verdict,
        d.profile,
        d.files_scanned,
        d.expressions_scanned,
        d.expressions_valid,
        d.expressions_invalid,
        d.violations_total,
        d.advisories_total
    ));

    if report.outcomes.is_empty() {
        out.push_str("No policies enabled.\n");
        return out;
    }

    for outcome in &report.outcomes {
        let mark = if outcome.ok { "✅" } else { "❌" };
        let sev = match outcome.severity {
            RenderableSeverity::Info => "info",
            RenderableSeverity::Warning => "warning",
            RenderableSeverity::Error => "error",
        };
        out.push_str(&format!("## {} `{}` ({})\n\n", mark, outcome.policy, sev));
        out.push_str(&outcome.summary);
        out.push_str("\n\n");

        push_entries(&mut out, &outcome.violations);
        if !outcome.advisories.is_empty() {
            out.push_str("Advisories:\n\n");
            push_entries(&mut out, &outcome.advisories);
        }
    }

    out
}

fn push_entries(out: &mut String, entries: &[RenderableEntry]) {
    if entries.is_empty() {
        return;
    }
    for e in entries {
        match &e.location {
            Some(loc) => match loc.line {
                Some(line) => out.push_str(&format!(
                    "- `{}` {} (`{}`:{})\n",
                    e.code, e.message, loc.path, line
                )),
                None => out.push_str(&format!("- `{}` {} (`{}`)\n", e.code, e.message, loc.path)),
            },
            None => out.push_str(&format!("- `{}` {}\n", e.code, e.message)),
        }
    }
    out.push('\n');
}
