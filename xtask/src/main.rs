//! Developer tasks (schema generation, report conformance, explain coverage).
//!
//! Keeping this separate avoids bloating the end-user CLI.

use anyhow::{Context, bail};
use camino::{Utf8Path, Utf8PathBuf};
use schemars::schema_for;
use std::fs;
use std::path::PathBuf;

/// Get the project root (parent of xtask directory).
fn project_root() -> anyhow::Result<PathBuf> {
    let manifest_dir = match std::env::var("CARGO_MANIFEST_DIR") {
        Ok(dir) => PathBuf::from(dir),
        Err(_) => std::env::current_dir().context("Cannot determine current directory")?,
    };

    if manifest_dir.ends_with("xtask")
        && let Some(parent) = manifest_dir.parent()
    {
        return Ok(parent.to_path_buf());
    }
    Ok(manifest_dir)
}

fn schemas_dir() -> anyhow::Result<PathBuf> {
    Ok(project_root()?.join("schemas"))
}

fn fixtures_dir() -> anyhow::Result<PathBuf> {
    Ok(project_root()?.join("tests").join("fixtures"))
}

/// Schema definition with its target filename.
struct SchemaSpec {
    filename: &'static str,
    generate: fn() -> schemars::Schema,
}

fn generate_report_schema() -> schemars::Schema {
    schema_for!(exprguard_types::ExprguardReport)
}

fn generate_config_schema() -> schemars::Schema {
    schema_for!(exprguard_settings::ExprguardConfigV1)
}

fn schema_specs() -> Vec<SchemaSpec> {
    vec![
        SchemaSpec {
            filename: "exprguard.report.v1.json",
            generate: generate_report_schema,
        },
        SchemaSpec {
            filename: "exprguard.config.v1.json",
            generate: generate_config_schema,
        },
    ]
}

/// Serialize a schema to pretty-printed JSON with trailing newline.
fn serialize_schema(schema: &schemars::Schema) -> anyhow::Result<String> {
    let mut json = serde_json::to_string_pretty(schema).context("Failed to serialize schema")?;
    json.push('\n');
    Ok(json)
}

fn emit_schemas() -> anyhow::Result<()> {
    let dir = schemas_dir()?;
    fs::create_dir_all(&dir).context("Failed to create schemas directory")?;

    for spec in schema_specs() {
        let json = serialize_schema(&(spec.generate)())?;
        let path = dir.join(spec.filename);
        fs::write(&path, &json)
            .with_context(|| format!("Failed to write schema to {}", path.display()))?;
        println!("Wrote {}", path.display());
    }

    println!("\nSchemas emitted successfully.");
    Ok(())
}

/// Check that schemas/ matches what would be generated (for CI).
fn validate_schemas() -> anyhow::Result<()> {
    let dir = schemas_dir()?;
    let mut missing = Vec::new();
    let mut mismatched = Vec::new();

    for spec in schema_specs() {
        let path = dir.join(spec.filename);
        if !path.exists() {
            missing.push(spec.filename);
            continue;
        }

        let expected = serialize_schema(&(spec.generate)())?;
        let actual = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        if expected != actual {
            mismatched.push(spec.filename);
        }
    }

    if missing.is_empty() && mismatched.is_empty() {
        println!("All schemas are up to date.");
        return Ok(());
    }

    if !missing.is_empty() {
        eprintln!("Missing schemas:");
        for name in &missing {
            eprintln!("  - {}", name);
        }
    }
    if !mismatched.is_empty() {
        eprintln!("Schemas out of date:");
        for name in &mismatched {
            eprintln!("  - {}", name);
        }
    }
    eprintln!("\nRun `cargo xtask emit-schemas` to regenerate.");
    bail!("Schema validation failed")
}

/// Run `check` in-process on every fixture and validate each report against the generated
/// report schema. Broken fixtures must still produce a schema-valid runtime error report.
fn conform() -> anyhow::Result<()> {
    let schema = serde_json::to_value(generate_report_schema()).context("schema to json")?;
    let validator = jsonschema::validator_for(&schema)
        .map_err(|e| anyhow::anyhow!("Failed to compile report schema: {}", e))?;

    let fixtures = fixtures_dir()?;
    let mut entries: Vec<PathBuf> = fs::read_dir(&fixtures)
        .with_context(|| format!("Failed to read {}", fixtures.display()))?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.is_dir())
        .collect();
    entries.sort();

    let mut errors = Vec::new();
    for dir in entries {
        let Ok(root) = Utf8PathBuf::from_path_buf(dir) else {
            continue;
        };
        let name = root.file_name().unwrap_or_default().to_string();

        let report = fixture_report(&root)?;
        let bytes = exprguard_app::serialize_report(&report)?;
        let value: serde_json::Value = serde_json::from_slice(&bytes)
            .with_context(|| format!("fixture '{}': report is not JSON", name))?;

        let before = errors.len();
        for err in validator.iter_errors(&value) {
            errors.push(format!("fixture '{}': schema validation: {}", name, err));
        }

        let normalized = exprguard_test_util::normalize_nondeterministic(value);
        if normalized["tool"]["version"] != "__VERSION__" {
            errors.push(format!("fixture '{}': tool.version was not normalized", name));
        }

        if errors.len() == before {
            println!("  ✓ fixture '{}' produces a valid report ({:?})", name, report.verdict);
        }
    }

    if !errors.is_empty() {
        eprintln!("\nConformance errors:");
        for err in &errors {
            eprintln!("  - {}", err);
        }
        bail!("Conformance validation failed with {} errors", errors.len());
    }

    println!("\n✓ Conformance checks passed!");
    Ok(())
}

/// Same flow as `exprguard check`: a failure to run becomes a runtime error report.
fn fixture_report(root: &Utf8Path) -> anyhow::Result<exprguard_types::ExprguardReport> {
    let config_path = root.join("exprguard.toml");
    let config_text = if config_path.exists() {
        fs::read_to_string(&config_path).with_context(|| format!("read {}", config_path))?
    } else {
        String::new()
    };

    let input = exprguard_app::CheckInput {
        repo_root: root,
        config_text: &config_text,
        overrides: exprguard_settings::Overrides::default(),
    };
    Ok(match exprguard_app::run_check(input) {
        Ok(output) => output.report,
        Err(err) => exprguard_app::runtime_error_report(&format!("{:#}", err)),
    })
}

/// Validate that all policy IDs and codes have explanations.
fn explain_coverage() -> anyhow::Result<()> {
    let policy_ids = exprguard_types::explain::all_policy_ids();
    let codes = exprguard_types::explain::all_codes();

    let mut errors = Vec::new();
    for (kind, identifier) in policy_ids
        .iter()
        .map(|id| ("Policy ID", id))
        .chain(codes.iter().map(|code| ("Code", code)))
    {
        let Some(exp) = exprguard_types::lookup_explanation(identifier) else {
            errors.push(format!("{} '{}' has no explanation", kind, identifier));
            continue;
        };
        for (field, text) in [
            ("title", exp.title),
            ("description", exp.description),
            ("remediation", exp.remediation),
        ] {
            if text.is_empty() {
                errors.push(format!("{} '{}' has empty {}", kind, identifier, field));
            }
        }
    }

    if !errors.is_empty() {
        for error in &errors {
            eprintln!("  - {}", error);
        }
        bail!("Explain coverage validation failed with {} errors", errors.len());
    }

    println!("✓ {} policy IDs have explanations", policy_ids.len());
    println!("✓ {} codes have explanations", codes.len());
    Ok(())
}

fn print_help() {
    eprintln!("xtask commands:");
    eprintln!("  help              Show this message");
    eprintln!("  emit-schemas      Generate JSON schemas from Rust types to schemas/");
    eprintln!("  validate-schemas  Check if schemas/ matches generated output (for CI)");
    eprintln!("  print-schema-ids  Print known schema IDs");
    eprintln!("  conform           Validate fixture reports against the report schema");
    eprintln!("  explain-coverage  Validate all policy IDs and codes have explanations");
}

fn main() -> anyhow::Result<()> {
    let args: Vec<String> = std::env::args().collect();
    let cmd = args.get(1).map(|s| s.as_str()).unwrap_or("help");

    match cmd {
        "help" | "--help" | "-h" => {
            print_help();
            Ok(())
        }
        "emit-schemas" => emit_schemas(),
        "validate-schemas" => validate_schemas(),
        "conform" => conform(),
        "explain-coverage" => explain_coverage(),
        "print-schema-ids" => {
            for spec in schema_specs() {
                println!("{}", spec.filename.trim_end_matches(".json"));
            }
            Ok(())
        }
        other => bail!("unknown xtask command: {other}\n\nRun `cargo xtask help` for usage."),
    }
    .context("xtask failed")
}
