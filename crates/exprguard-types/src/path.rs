use camino::{Utf8Path, Utf8PathBuf};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Canonical repo-relative path of a scanned source file.
///
/// Normalization is simple and deterministic:
/// - always forward slashes (`/`)
/// - no leading `./`
/// - empty input becomes `.`
#[derive(
    Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(transparent)]
pub struct RepoPath(String);

impl Default for RepoPath {
    fn default() -> Self {
        RepoPath::new(".")
    }
}

impl RepoPath {
    pub fn new<S: AsRef<str>>(s: S) -> Self {
        let mut v = s.as_ref().replace('\\', "/");
        while let Some(rest) = v.strip_prefix("./") {
            v = rest.to_string();
        }
        if v.is_empty() {
            v = ".".to_string();
        }
        Self(v)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn to_utf8_pathbuf(&self) -> Utf8PathBuf {
        Utf8PathBuf::from(self.0.clone())
    }

    pub fn join(&self, segment: &str) -> RepoPath {
        let base = Utf8Path::new(self.as_str());
        RepoPath::new(base.join(segment).as_str())
    }

    /// Path segments, without the file extension on the last one.
    pub fn stem_segments(&self) -> Vec<&str> {
        let path = Utf8Path::new(self.as_str());
        let mut segments: Vec<&str> = path
            .parent()
            .map(|p| p.components().map(|c| c.as_str()).collect())
            .unwrap_or_default();
        segments.retain(|s| !s.is_empty() && *s != ".");
        if let Some(stem) = path.file_stem() {
            segments.push(stem);
        }
        segments
    }
}

impl From<&Utf8Path> for RepoPath {
    fn from(value: &Utf8Path) -> Self {
        RepoPath::new(value.as_str())
    }
}

impl From<Utf8PathBuf> for RepoPath {
    fn from(value: Utf8PathBuf) -> Self {
        RepoPath::new(value.as_str())
    }
}

impl std::fmt::Display for RepoPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_separators_and_leading_dot() {
        assert_eq!(RepoPath::new(".\\src\\lib.rs").as_str(), "src/lib.rs");
        assert_eq!(RepoPath::new("././src/a.rs").as_str(), "src/a.rs");
        assert_eq!(RepoPath::new("").as_str(), ".");
    }

    #[test]
    fn stem_segments_drop_extension() {
        let path = RepoPath::new("src/handlers/admin.rs");
        assert_eq!(path.stem_segments(), vec!["src", "handlers", "admin"]);
        assert_eq!(RepoPath::new("lib.rs").stem_segments(), vec!["lib"]);
    }
}
