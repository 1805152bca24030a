//! Failure text for test-suite assertions.
//!
//! One header line, then one tab-indented line per offending record, so a failing test
//! shows every problem at once.

/// `❌ <summary>` followed by one `\t❌\t<message>` line per message.
pub fn render_failure<S: AsRef<str>>(summary: &str, messages: &[S]) -> String {
    let mut out = format!("❌ {}", summary);
    for m in messages {
        out.push_str("\n\t❌\t");
        out.push_str(m.as_ref());
    }
    out
}

/// Failure text when some expressions do not parse.
pub fn render_invalid_expressions<S: AsRef<str>>(messages: &[S]) -> String {
    render_failure("Found invalid expressions:", messages)
}

/// Failure text when broken expressions were expected but every one parsed.
pub fn render_no_invalid_expressions<S: AsRef<str>>(valid_messages: &[S]) -> String {
    let mut out = "❌ No errors found. Expected any invalid expressions:".to_string();
    for m in valid_messages {
        out.push_str("\n\t✅\t");
        out.push_str(m.as_ref());
    }
    out
}

/// Notice for records a check could not verify. Printed, never raised.
pub fn render_unverified<S: AsRef<str>>(policy: &str, messages: &[S]) -> String {
    let mut out = format!("⚠️ Not verified by '{}':", policy);
    for m in messages {
        out.push_str("\n\t⚠️\t");
        out.push_str(m.as_ref());
    }
    out
}
