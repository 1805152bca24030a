use crate::attrs;
use crate::discover::discover_files;
use crate::source::ExpressionSource;
use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use exprguard_types::{AttributeToScan, ExpressionSite, RepoPath};
use rayon::prelude::*;

/// Result of one scan: which files were looked at and what was found in them.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SourceScan {
    /// Every file matched by the include/exclude globs, sorted.
    pub files: Vec<RepoPath>,
    /// Files that are not valid Rust and were not scanned.
    pub skipped: Vec<RepoPath>,
    /// Sites in (path, source) order.
    pub sites: Vec<ExpressionSite>,
}

/// Walks a source tree and reads the expression argument of configured attributes.
#[derive(Clone, Debug)]
pub struct RustSourceScanner {
    root: Utf8PathBuf,
    include: Vec<String>,
    exclude: Vec<String>,
    attributes: Vec<AttributeToScan>,
}

enum FileScan {
    Parsed(Vec<ExpressionSite>),
    Skipped,
}

impl RustSourceScanner {
    pub fn new(root: impl Into<Utf8PathBuf>) -> Self {
        Self {
            root: root.into(),
            include: vec!["**/*.rs".to_string()],
            exclude: vec!["target/**".to_string()],
            attributes: Vec::new(),
        }
    }

    pub fn include(mut self, patterns: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.include = patterns.into_iter().map(Into::into).collect();
        self
    }

    pub fn exclude(mut self, patterns: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.exclude = patterns.into_iter().map(Into::into).collect();
        self
    }

    pub fn attribute(mut self, attribute: AttributeToScan) -> Self {
        if !self.attributes.contains(&attribute) {
            self.attributes.push(attribute);
        }
        self
    }

    pub fn attributes(self, attributes: impl IntoIterator<Item = AttributeToScan>) -> Self {
        attributes.into_iter().fold(self, Self::attribute)
    }

    pub fn root(&self) -> &Utf8Path {
        &self.root
    }

    pub fn scan(&self) -> anyhow::Result<SourceScan> {
        if !self.root.is_dir() {
            anyhow::bail!("source root is not a directory: {}", self.root);
        }
        let files = discover_files(&self.root, &self.include, &self.exclude)
            .with_context(|| format!("discover source files under {}", self.root))?;

        if self.attributes.is_empty() {
            tracing::debug!("no attributes configured; nothing to scan");
            return Ok(SourceScan {
                files,
                ..SourceScan::default()
            });
        }

        let scanned = files
            .par_iter()
            .map(|path| self.scan_file(path))
            .collect::<anyhow::Result<Vec<_>>>()?;

        let mut out = SourceScan {
            files: Vec::with_capacity(files.len()),
            ..SourceScan::default()
        };
        for (path, scan) in files.into_iter().zip(scanned) {
            match scan {
                FileScan::Parsed(sites) => out.sites.extend(sites),
                FileScan::Skipped => out.skipped.push(path.clone()),
            }
            out.files.push(path);
        }

        tracing::info!(
            files = out.files.len(),
            skipped = out.skipped.len(),
            expressions = out.sites.len(),
            "source scan complete"
        );
        Ok(out)
    }

    fn scan_file(&self, path: &RepoPath) -> anyhow::Result<FileScan> {
        let abs = self.root.join(path.as_str());
        let text = match std::fs::read_to_string(&abs) {
            Ok(text) => text,
            Err(err) if err.kind() == std::io::ErrorKind::InvalidData => {
                tracing::warn!(path = %path, error = %err, "skipping file that is not valid Rust");
                return Ok(FileScan::Skipped);
            }
            Err(err) => return Err(err).with_context(|| format!("read {}", abs)),
        };
        match attrs::scan_source(path, &text, &self.attributes) {
            Ok(sites) => {
                tracing::debug!(path = %path, expressions = sites.len(), "scanned");
                Ok(FileScan::Parsed(sites))
            }
            Err(err) => {
                tracing::warn!(path = %path, error = %err, "skipping file that is not valid Rust");
                Ok(FileScan::Skipped)
            }
        }
    }
}

impl ExpressionSource for RustSourceScanner {
    fn discover(&self) -> anyhow::Result<Vec<ExpressionSite>> {
        Ok(self.scan()?.sites)
    }
}
