use crate::model::{AttributeConfig, ExprguardConfigV1, PolicyConfig};
use crate::presets::{self, DEFAULT_EXCLUDE, DEFAULT_INCLUDE};
use anyhow::Context;
use exprguard_domain::policy::{EffectiveConfig, FailOn, InvalidHandling, PolicySettings};
use exprguard_types::{AttributeToScan, Severity};
use globset::Glob;

#[derive(Clone, Debug, Default)]
pub struct Overrides {
    pub profile: Option<String>,
}

/// What the scanner needs: validated globs and attributes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScanSettings {
    pub include: Vec<String>,
    pub exclude: Vec<String>,
    pub attributes: Vec<AttributeToScan>,
}

#[derive(Clone, Debug)]
pub struct ResolvedConfig {
    pub effective: EffectiveConfig,
    pub scan: ScanSettings,
}

pub fn resolve_config(
    cfg: ExprguardConfigV1,
    overrides: Overrides,
) -> anyhow::Result<ResolvedConfig> {
    let profile = overrides
        .profile
        .clone()
        .or(cfg.profile.clone())
        .unwrap_or_else(|| "strict".to_string());

    let preset = presets::preset(&profile);
    let mut effective = preset.effective;
    let default_severity = preset.default_severity;

    if let Some(fail_on_s) = cfg.fail_on.as_deref() {
        effective.fail_on = parse_fail_on(fail_on_s)?;
    }
    if let Some(invalid_s) = cfg.invalid_expressions.as_deref() {
        effective.invalid = parse_invalid_handling(invalid_s)?;
    }

    // per-policy overrides
    let policies = &cfg.policies;
    if let Some(pc) = &policies.valid_syntax {
        apply_policy(&mut effective.valid_syntax, pc, default_severity, "valid_syntax")?;
    }
    if let Some(pc) = &policies.references {
        apply_policy(&mut effective.references, pc, default_severity, "references")?;
    }
    if let Some(pc) = &policies.calls {
        apply_policy(&mut effective.calls, pc, default_severity, "calls")?;
    }
    for (call, pc) in policies.call_arguments.iter() {
        if !is_identifier(call) {
            anyhow::bail!("invalid call name in policies.call_arguments: {call:?}");
        }
        let entry = effective
            .call_arguments
            .entry(call.clone())
            .or_insert_with(PolicySettings::disabled);
        apply_policy(entry, pc, default_severity, &format!("call_arguments.{call}"))?;
    }

    let scan = resolve_scan(&cfg, preset.attributes)?;

    Ok(ResolvedConfig { effective, scan })
}

/// A present section switches the policy on with the profile severity unless it says otherwise.
fn apply_policy(
    entry: &mut PolicySettings,
    pc: &PolicyConfig,
    default_severity: Severity,
    name: &str,
) -> anyhow::Result<()> {
    if !entry.enabled {
        entry.severity = default_severity;
    }
    entry.enabled = pc.enabled.unwrap_or(true);
    if let Some(sev) = pc.severity.as_deref() {
        entry.severity =
            parse_severity(sev).with_context(|| format!("invalid severity for policies.{name}"))?;
    }
    if let Some(allow) = &pc.allow {
        entry.allow = allow.clone();
    }
    Ok(())
}

fn resolve_scan(
    cfg: &ExprguardConfigV1,
    mut attributes: Vec<AttributeToScan>,
) -> anyhow::Result<ScanSettings> {
    let include = cfg
        .scan
        .include
        .clone()
        .unwrap_or_else(|| vec![DEFAULT_INCLUDE.to_string()]);
    let exclude = cfg
        .scan
        .exclude
        .clone()
        .unwrap_or_else(|| vec![DEFAULT_EXCLUDE.to_string()]);
    validate_globs("scan.include", &include)?;
    validate_globs("scan.exclude", &exclude)?;

    for ac in &cfg.scan.attributes {
        let attr = parse_attribute(ac)?;
        if !attributes.contains(&attr) {
            attributes.push(attr);
        }
    }

    Ok(ScanSettings {
        include,
        exclude,
        attributes,
    })
}

fn parse_attribute(ac: &AttributeConfig) -> anyhow::Result<AttributeToScan> {
    if ac.name.is_empty() || !ac.name.split("::").all(is_identifier) {
        anyhow::bail!(
            "invalid attribute name: {:?} (expected an identifier or a `::` path)",
            ac.name
        );
    }
    match ac.argument.as_deref() {
        None => Ok(AttributeToScan::positional(ac.name.clone())),
        Some(key) if is_identifier(key) => Ok(AttributeToScan::named(ac.name.clone(), key)),
        Some(key) => anyhow::bail!(
            "invalid argument name for attribute {}: {key:?} (expected an identifier)",
            ac.name
        ),
    }
}

fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

fn validate_globs(field: &str, patterns: &[String]) -> anyhow::Result<()> {
    for pattern in patterns {
        Glob::new(pattern).with_context(|| format!("invalid glob in {field}: {pattern}"))?;
    }
    Ok(())
}

fn parse_severity(v: &str) -> anyhow::Result<Severity> {
    match v {
        "info" => Ok(Severity::Info),
        "warning" | "warn" => Ok(Severity::Warning),
        "error" => Ok(Severity::Error),
        other => anyhow::bail!("unknown severity: {other} (expected info|warning|error)"),
    }
}

fn parse_fail_on(v: &str) -> anyhow::Result<FailOn> {
    match v {
        "error" => Ok(FailOn::Error),
        "warning" | "warn" => Ok(FailOn::Warning),
        other => anyhow::bail!("unknown fail_on: {other} (expected error|warning)"),
    }
}

fn parse_invalid_handling(v: &str) -> anyhow::Result<InvalidHandling> {
    match v {
        "advise" => Ok(InvalidHandling::Advise),
        "fail" => Ok(InvalidHandling::Fail),
        other => anyhow::bail!("unknown invalid_expressions: {other} (expected advise|fail)"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse_config_toml;
    use exprguard_domain::policy::Policy;
    use exprguard_types::ExpressionSlot;

    fn resolve(toml: &str) -> anyhow::Result<ResolvedConfig> {
        resolve_config(parse_config_toml(toml)?, Overrides::default())
    }

    #[test]
    fn empty_config_is_strict_defaults() {
        let resolved = resolve("").expect("resolve");
        assert_eq!(resolved.effective.profile, "strict");
        assert_eq!(resolved.effective.fail_on, FailOn::Error);
        assert_eq!(resolved.effective.invalid, InvalidHandling::Advise);
        assert_eq!(resolved.effective.policies(), vec![(Policy::ValidSyntax, Severity::Error)]);
        assert_eq!(resolved.scan.include, vec!["**/*.rs"]);
        assert_eq!(resolved.scan.exclude, vec!["target/**"]);
        let names: Vec<_> = resolved.scan.attributes.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["pre_authorize", "post_authorize", "pre_filter", "post_filter"]);
    }

    #[test]
    fn full_config_resolves() {
        let resolved = resolve(
            r#"
schema = "exprguard.config.v1"
profile = "strict"
fail_on = "warning"
invalid_expressions = "fail"

[scan]
include = ["src/**/*.rs"]
exclude = ["src/generated/**"]
attributes = [{ name = "pre_authorize" }, { name = "secured", argument = "expr" }]

[policies.references]
allow = ["authz"]

[policies.calls]
allow = ["hasRole", "isAuthenticated"]
severity = "warning"

[policies.call_arguments.hasRole]
allow = ["ADMIN", "USER"]
"#,
        )
        .expect("resolve");

        let eff = &resolved.effective;
        assert_eq!(eff.fail_on, FailOn::Warning);
        assert_eq!(eff.invalid, InvalidHandling::Fail);
        assert!(eff.references.enabled);
        assert_eq!(eff.references.severity, Severity::Error);
        assert_eq!(eff.references.allow, vec!["authz"]);
        assert_eq!(eff.calls.severity, Severity::Warning);
        let has_role = &eff.call_arguments["hasRole"];
        assert!(has_role.enabled);
        assert_eq!(has_role.allow, vec!["ADMIN", "USER"]);

        assert_eq!(resolved.scan.include, vec!["src/**/*.rs"]);
        assert_eq!(resolved.scan.attributes.len(), 5, "duplicate pre_authorize collapses");
        let secured = resolved.scan.attributes.last().expect("secured");
        assert_eq!(secured.name, "secured");
        assert_eq!(secured.slot, ExpressionSlot::Named("expr".to_string()));
    }

    #[test]
    fn override_profile_beats_file() {
        let cfg = parse_config_toml("profile = \"strict\"\n[policies.calls]\nallow = []\n")
            .expect("parse");
        let resolved = resolve_config(
            cfg,
            Overrides {
                profile: Some("warn".to_string()),
            },
        )
        .expect("resolve");
        assert_eq!(resolved.effective.profile, "warn");
        assert_eq!(resolved.effective.calls.severity, Severity::Warning);
        assert!(resolved.effective.calls.allow.is_empty());
    }

    #[test]
    fn bare_profile_scans_only_configured_attributes() {
        let resolved = resolve("profile = \"bare\"\n[scan]\nattributes = [{ name = \"guard\" }]\n")
            .expect("resolve");
        assert!(resolved.effective.policies().is_empty());
        assert_eq!(resolved.scan.attributes, vec![AttributeToScan::positional("guard")]);
    }

    #[test]
    fn disabled_section_stays_off() {
        let resolved = resolve("[policies.valid_syntax]\nenabled = false\n").expect("resolve");
        assert!(resolved.effective.policies().is_empty());
    }

    #[test]
    fn rejects_bad_values() {
        for bad in [
            "fail_on = \"sometimes\"",
            "invalid_expressions = \"ignore\"",
            "[policies.calls]\nseverity = \"fatal\"",
            "[scan]\ninclude = [\"src/[\"]",
            "[scan]\nattributes = [{ name = \"\" }]",
            "[scan]\nattributes = [{ name = \"pre-authorize\" }]",
            "[scan]\nattributes = [{ name = \"a::\" }]",
            "[scan]\nattributes = [{ name = \"secured\", argument = \"a b\" }]",
            "[policies.call_arguments.\"has role\"]\nallow = []",
        ] {
            assert!(resolve(bad).is_err(), "should reject: {bad}");
        }
    }

    #[test]
    fn severity_error_names_the_policy() {
        let err = resolve("[policies.references]\nseverity = \"fatal\"").expect_err("bad severity");
        assert!(format!("{err:#}").contains("policies.references"));
    }

    #[test]
    fn qualified_attribute_paths_are_accepted() {
        let resolved = resolve("[scan]\nattributes = [{ name = \"security::pre_authorize\" }]")
            .expect("resolve");
        assert!(
            resolved
                .scan
                .attributes
                .contains(&AttributeToScan::positional("security::pre_authorize"))
        );
    }
}
