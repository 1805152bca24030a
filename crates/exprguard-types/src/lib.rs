//! Stable DTOs and IDs used across the exprguard workspace.
//!
//! This crate is intentionally boring:
//! - expression sites handed over by discovery
//! - fact sets and scan records produced by the parser
//! - validation outcomes and the emitted report envelope
//! - stable string IDs and codes, plus the explain registry

#![forbid(unsafe_code)]

pub mod attribute;
pub mod explain;
pub mod facts;
pub mod ids;
pub mod outcome;
pub mod path;
pub mod receipt;
pub mod record;
pub mod site;

pub use attribute::{AttributeToScan, ExpressionSlot};
pub use explain::{lookup_explanation, ExamplePair, Explanation};
pub use facts::{CallFact, FactSet};
pub use outcome::{OutcomeStatus, ValidationOutcome, Violation};
pub use path::RepoPath;
pub use receipt::{
    ExprguardData, ExprguardReport, ReportEnvelope, Severity, ToolMeta, Verdict, SCHEMA_REPORT_V1,
};
pub use record::{ScanRecord, ScanResult, ScanStatus};
pub use site::{ExpressionSite, Location};
