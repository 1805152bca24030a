//! Stable identifiers for policies and violation codes.
//!
//! `policy` is a dotted namespace. `code` is a short snake_case discriminator.

// Policies
pub const POLICY_VALID_SYNTAX: &str = "expr.valid_syntax";
pub const POLICY_REFERENCES: &str = "expr.references";
pub const POLICY_CALLS: &str = "expr.calls";
pub const POLICY_CALL_ARGUMENTS: &str = "expr.call_arguments";

// Codes: expr.valid_syntax
pub const CODE_INVALID_EXPRESSION: &str = "invalid_expression";

// Codes: expr.references
pub const CODE_REFERENCE_NOT_ALLOWED: &str = "reference_not_allowed";

// Codes: expr.calls
pub const CODE_CALL_NOT_ALLOWED: &str = "call_not_allowed";

// Codes: expr.call_arguments
pub const CODE_ARGUMENT_NOT_ALLOWED: &str = "argument_not_allowed";

// Shared by every content policy when a record could not be parsed.
pub const CODE_UNVERIFIABLE_EXPRESSION: &str = "unverifiable_expression";

// Tool-level
pub const POLICY_TOOL_RUNTIME: &str = "tool.runtime";
pub const CODE_RUNTIME_ERROR: &str = "runtime_error";
