//! Allow-list validation of authorization expressions attached to Rust items.
//!
//! The facade re-exports the engine (parser, fact extraction, policy validation) and the
//! discovery adapters, and adds [`ExpressionAssert`] for checking expressions from inside a
//! test suite:
//!
//! ```no_run
//! use exprguard::ExpressionAssert;
//!
//! let records = ExpressionAssert::config()
//!     .register_security_defaults()
//!     .root("src")
//!     .scan()
//!     .expect("scan sources");
//!
//! ExpressionAssert::that(records)
//!     .all_valid()
//!     .uses_only_references(&["authz"])
//!     .uses_only_calls(&["hasRole", "isAuthenticated"])
//!     .verify_call_argument("hasRole", &["ADMIN", "USER"]);
//! ```

#![forbid(unsafe_code)]

mod assert;

pub use assert::{ExpressionAssert, ScanBuilder};

pub use exprguard_domain::policy::{EffectiveConfig, FailOn, InvalidHandling, Policy, PolicySettings};
pub use exprguard_domain::report::DomainReport;
pub use exprguard_domain::{
    build, build_record, build_records, evaluate, extract, parse, ExpressionValidator,
    ParsedExpression, SyntaxError,
};
pub use exprguard_repo::{scan_records, ExpressionSource, RustSourceScanner, SourceScan, StaticSource};
pub use exprguard_types::{
    AttributeToScan, CallFact, ExpressionSite, ExpressionSlot, FactSet, Location, OutcomeStatus,
    RepoPath, ScanRecord, ScanResult, ScanStatus, Severity, ValidationOutcome, Verdict, Violation,
};
