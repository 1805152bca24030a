//! The `parse` use case: show what the engine sees in a single expression.

use anyhow::Context;
use exprguard_types::{ScanResult, ScanStatus};

/// Facts or diagnostic of one expression.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParseOutput {
    pub result: ScanResult,
}

impl ParseOutput {
    pub fn status(&self) -> ScanStatus {
        match self.result {
            ScanResult::Valid { .. } => ScanStatus::Valid,
            ScanResult::Invalid { .. } => ScanStatus::Invalid,
        }
    }

    /// `{"status":"valid","facts":{..}}` or `{"status":"invalid","diagnostic":".."}`.
    pub fn to_json(&self) -> anyhow::Result<String> {
        serde_json::to_string_pretty(&self.result).context("serialize parse result")
    }
}

pub fn run_parse(expression: &str) -> ParseOutput {
    let record = exprguard_domain::build("<input>", None, expression);
    ParseOutput {
        result: record.result,
    }
}
