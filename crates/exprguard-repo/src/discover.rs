use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use exprguard_types::RepoPath;
use globset::{Glob, GlobSet, GlobSetBuilder};
use std::path::PathBuf;
use walkdir::WalkDir;

/// Find the files under `repo_root` selected by `include` minus `exclude`.
///
/// Patterns are matched against repo-relative paths with forward slashes.
/// The result is sorted, so scans are reproducible.
pub fn discover_files(
    repo_root: &Utf8Path,
    include: &[String],
    exclude: &[String],
) -> anyhow::Result<Vec<RepoPath>> {
    let include_set = build_globset(include).context("compile include globset")?;
    let exclude_set = build_globset(exclude).context("compile exclude globset")?;

    let mut out: Vec<RepoPath> = WalkDir::new(repo_root)
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || e.file_name() != ".git")
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter_map(|e| pathbuf_to_utf8(e.path().to_path_buf()))
        .filter_map(|abs| {
            let rel = abs
                .strip_prefix(repo_root)
                .unwrap_or(&abs)
                .as_str()
                .replace('\\', "/");
            (include_set.is_match(&rel) && !exclude_set.is_match(&rel)).then(|| RepoPath::new(rel))
        })
        .collect();

    // Stable order.
    out.sort();
    out.dedup();

    Ok(out)
}

fn build_globset(patterns: &[String]) -> anyhow::Result<GlobSet> {
    let mut b = GlobSetBuilder::new();
    for p in patterns {
        b.add(Glob::new(p).with_context(|| format!("invalid glob: {p}"))?);
    }
    Ok(b.build()?)
}

fn pathbuf_to_utf8(path: PathBuf) -> Option<Utf8PathBuf> {
    Utf8PathBuf::from_path_buf(path).ok()
}
