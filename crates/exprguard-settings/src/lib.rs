//! Config parsing and profile/preset resolution.
//!
//! This crate is intentionally IO-free: it parses and resolves configuration provided as strings.

#![forbid(unsafe_code)]

mod model;
mod presets;
mod resolve;

pub use model::{AttributeConfig, ExprguardConfigV1, PoliciesConfig, PolicyConfig, ScanConfig};
pub use presets::{Preset, SECURITY_ATTRIBUTES, preset};
pub use resolve::{Overrides, ResolvedConfig, ScanSettings};

/// Stable schema identifier for `exprguard.toml`.
pub const SCHEMA_CONFIG_V1: &str = "exprguard.config.v1";

/// Parse `exprguard.toml` (or equivalent) into a typed model.
pub fn parse_config_toml(input: &str) -> anyhow::Result<ExprguardConfigV1> {
    let cfg: ExprguardConfigV1 = toml::from_str(input)?;
    Ok(cfg)
}

/// Resolve the effective config used by the engine and the scanner
/// (profile preset + file + overrides).
pub fn resolve_config(
    cfg: ExprguardConfigV1,
    overrides: Overrides,
) -> anyhow::Result<ResolvedConfig> {
    resolve::resolve_config(cfg, overrides)
}
