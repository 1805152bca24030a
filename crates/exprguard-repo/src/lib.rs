//! Repository adapters: find the expressions a policy run should look at.
//!
//! This crate is allowed to do filesystem IO. It never evaluates anything itself;
//! it hands `(owner, member, expression)` sites to the domain crate.

#![forbid(unsafe_code)]

mod attrs;
mod discover;
mod scanner;
mod source;

use exprguard_types::ScanRecord;

pub use discover::discover_files;
pub use scanner::{RustSourceScanner, SourceScan};
pub use source::{ExpressionSource, StaticSource};

/// Discover sites from `source` and build one scan record per site, in discovery order.
///
/// Broken expressions become invalid records; only discovery itself can fail.
pub fn scan_records(source: &dyn ExpressionSource) -> anyhow::Result<Vec<ScanRecord>> {
    let sites = source.discover()?;
    Ok(exprguard_domain::build_records(sites))
}

/// Fuzz-friendly API for testing scanning robustness without filesystem access.
/// These functions are designed to never panic on any input.
pub mod fuzz {
    use exprguard_types::{AttributeToScan, RepoPath};

    /// Scan arbitrary text as a Rust source file for the security attributes plus a
    /// named-argument attribute.
    ///
    /// Returns the number of expressions found, or `Err(...)` when the text is not
    /// valid Rust. **Never panics** on any input.
    pub fn scan_source(text: &str) -> anyhow::Result<usize> {
        let attributes = [
            AttributeToScan::positional("pre_authorize"),
            AttributeToScan::positional("post_authorize"),
            AttributeToScan::named("secured", "expr"),
        ];
        let sites = super::attrs::scan_source(&RepoPath::new("src/fuzz.rs"), text, &attributes)?;
        Ok(sites.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use exprguard_types::{ExpressionSite, ScanStatus};
    use proptest::prelude::*;

    #[test]
    fn scan_records_keeps_discovery_order() {
        let source = StaticSource::from_triples([
            ("Testklasse", Some("correct"), "hasRole('B')"),
            ("Testklasse", Some("invalidClosedBrackets"), "hasRole('C'))"),
            ("Testklasse", None, "isAuthenticated()"),
        ]);
        let records = scan_records(&source).expect("scan");
        let statuses: Vec<_> = records.iter().map(|r| r.status()).collect();
        assert_eq!(
            statuses,
            vec![ScanStatus::Valid, ScanStatus::Invalid, ScanStatus::Valid]
        );
        assert_eq!(records[2].site, ExpressionSite::new("Testklasse", None, "isAuthenticated()"));
    }

    proptest! {
        #[test]
        fn fuzz_scanner_never_panics(input in ".*") {
            let _ = fuzz::scan_source(&input);
        }
    }
}
