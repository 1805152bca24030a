use exprguard_domain::policy::{EffectiveConfig, PolicySettings};
use exprguard_types::{AttributeToScan, Severity};

/// Attributes registered by the security defaults, all with a positional expression.
pub const SECURITY_ATTRIBUTES: &[&str] = &["pre_authorize", "post_authorize", "pre_filter", "post_filter"];

pub(crate) const DEFAULT_INCLUDE: &str = "**/*.rs";
pub(crate) const DEFAULT_EXCLUDE: &str = "target/**";

/// A profile: engine config, the severity new policy sections default to, and the
/// attributes scanned before any configured ones.
#[derive(Clone, Debug)]
pub struct Preset {
    pub effective: EffectiveConfig,
    pub default_severity: Severity,
    pub attributes: Vec<AttributeToScan>,
}

/// Preset profiles are opinionated defaults.
///
/// Keep these small and readable. Anything complex should go into repo config.
pub fn preset(profile: &str) -> Preset {
    match profile {
        "warn" => security_profile("warn", Severity::Warning),
        "bare" => bare_profile(),
        // default
        _ => security_profile("strict", Severity::Error),
    }
}

fn security_profile(name: &str, severity: Severity) -> Preset {
    let mut effective = EffectiveConfig::empty(name);
    effective.valid_syntax = PolicySettings::enabled(severity);
    Preset {
        effective,
        default_severity: severity,
        attributes: SECURITY_ATTRIBUTES
            .iter()
            .map(|name| AttributeToScan::positional(*name))
            .collect(),
    }
}

fn bare_profile() -> Preset {
    Preset {
        effective: EffectiveConfig::empty("bare"),
        default_severity: Severity::Error,
        attributes: Vec::new(),
    }
}
