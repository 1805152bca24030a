use sha2::{Digest, Sha256};

/// Stable SHA-256 fingerprint for a violation.
///
/// Identity fields:
/// - policy id
/// - code
/// - owner
/// - member (empty when absent)
/// - offending values, in order
pub fn fingerprint_for_violation(
    policy: &str,
    code: &str,
    owner: &str,
    member: Option<&str>,
    values: &[String],
) -> String {
    let mut parts = vec![policy, code, owner, member.unwrap_or("")];
    parts.extend(values.iter().map(String::as_str));
    let canonical = parts.join("|");

    let mut hasher = Sha256::new();
    hasher.update(canonical.as_bytes());
    hex::encode(hasher.finalize())
}
