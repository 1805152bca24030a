//! Pure expression analysis and policy evaluation (no IO).
//!
//! Input: expression sites discovered elsewhere.
//! Output: scan records, per-policy validation outcomes, and a verdict.

#![forbid(unsafe_code)]

pub mod expr;
pub mod policy;
pub mod report;

mod engine;
mod extract;
mod fingerprint;
mod record;
mod validator;

pub use engine::evaluate;
pub use expr::{parse, ParsedExpression, SyntaxError};
pub use extract::extract;
pub use record::{build, build_record, build_records};
pub use validator::{ExpressionValidator, invalid_message, quoted_values, valid_message};

#[cfg(test)]
mod test_support;

#[cfg(test)]
mod proptest;
