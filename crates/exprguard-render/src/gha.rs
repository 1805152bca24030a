use crate::{RenderableReport, RenderableSeverity};

/// Render violations as GitHub Actions workflow command annotations.
///
/// Format:
/// `::{level} file={path},line={line}::{message}`
///
/// The level follows the severity of the policy that raised the violation. Advisories are
/// not annotated.
pub fn render_github_annotations(report: &RenderableReport) -> Vec<String> {
    let mut out = Vec::new();

    for outcome in &report.outcomes {
        let level = match outcome.severity {
            RenderableSeverity::Error => "error",
            RenderableSeverity::Warning => "warning",
            RenderableSeverity::Info => "notice",
        };

        for v in &outcome.violations {
            let mut meta = String::new();
            if let Some(loc) = &v.location {
                meta.push_str(&format!("file={}", escape_property(&loc.path)));
                if let Some(line) = loc.line {
                    meta.push_str(&format!(",line={}", line));
                }
            }

            let message = escape(&format!("[{}:{}] {}", outcome.policy, v.code, v.message));

            if meta.is_empty() {
                out.push(format!("::{}::{}", level, message));
            } else {
                out.push(format!("::{} {}::{}", level, meta, message));
            }
        }
    }

    out
}

fn escape(message: &str) -> String {
    message
        .replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}

/// Property values additionally reserve the separators `,` and `:`.
fn escape_property(value: &str) -> String {
    escape(value).replace(':', "%3A").replace(',', "%2C")
}
