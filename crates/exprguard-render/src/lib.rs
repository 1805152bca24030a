//! Rendering utilities for CI surfaces (Markdown, GitHub annotations) and test assertions.
//!
//! Renderers work on a small presentation model so they stay independent of the report
//! schema; the app crate does the conversion.

#![forbid(unsafe_code)]

mod assertion;
mod gha;
mod markdown;
mod model;

pub use assertion::{
    render_failure, render_invalid_expressions, render_no_invalid_expressions, render_unverified,
};
pub use gha::render_github_annotations;
pub use markdown::render_markdown;
pub use model::{
    RenderableData, RenderableEntry, RenderableLocation, RenderableOutcome, RenderableReport,
    RenderableSeverity, RenderableVerdictStatus,
};
