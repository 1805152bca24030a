//! CLI entry point for exprguard.
//!
//! This module is intentionally thin: it handles argument parsing, I/O, and exit codes.
//! All business logic lives in the `exprguard-app` crate.

use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use clap::{Parser, Subcommand};
use exprguard_app::{
    parse_report_json, render_annotations, render_markdown, run_check, run_explain, run_parse,
    runtime_error_report, serialize_report, to_renderable, verdict_exit_code, CheckInput,
    ExplainOutput,
};
use exprguard_settings::Overrides;
use exprguard_types::{ExprguardReport, ScanStatus};

#[derive(Parser, Debug)]
#[command(
    name = "exprguard",
    version,
    about = "Allow-list policy guard for authorization expressions in Rust sources"
)]
struct Cli {
    /// Repository root (directory the scan globs are relative to).
    #[arg(long, default_value = ".")]
    repo_root: Utf8PathBuf,

    /// Path to exprguard config TOML, relative to the repository root.
    #[arg(long, default_value = "exprguard.toml")]
    config: Utf8PathBuf,

    /// Override profile (strict|warn|bare).
    #[arg(long)]
    profile: Option<String>,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Scan sources, evaluate policies, and write artifacts.
    Check {
        /// Where to write the JSON report.
        #[arg(long, default_value = "artifacts/exprguard/report.json")]
        report_out: Utf8PathBuf,

        /// Write a Markdown report alongside the JSON.
        #[arg(long)]
        write_markdown: bool,

        /// Where to write the Markdown report (if enabled).
        #[arg(long, default_value = "artifacts/exprguard/comment.md")]
        markdown_out: Utf8PathBuf,
    },

    /// Print the references and calls of one expression, or why it does not parse.
    Parse {
        /// The expression text, e.g. "hasRole('ADMIN') and @authz.check()".
        expression: String,
    },

    /// Render markdown from an existing JSON report.
    Md {
        /// Path to the JSON report file.
        #[arg(long, default_value = "artifacts/exprguard/report.json")]
        report: Utf8PathBuf,

        /// Where to write the Markdown output (if not specified, prints to stdout).
        #[arg(long, short)]
        output: Option<Utf8PathBuf>,
    },

    /// Render GitHub Actions annotations from an existing JSON report.
    Annotations {
        /// Path to the JSON report file.
        #[arg(long, default_value = "artifacts/exprguard/report.json")]
        report: Utf8PathBuf,

        /// Maximum number of annotations to emit.
        #[arg(long, default_value = "10")]
        max: usize,
    },

    /// Explain a policy id or code with remediation guidance.
    Explain {
        /// The policy id (e.g., "expr.calls") or code (e.g., "call_not_allowed") to explain.
        identifier: String,
    },
}

fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.cmd {
        Commands::Check {
            ref report_out,
            write_markdown,
            ref markdown_out,
        } => cmd_check(&cli, report_out, write_markdown, markdown_out),
        Commands::Parse { ref expression } => cmd_parse(expression),
        Commands::Md { report, output } => cmd_md(report, output),
        Commands::Annotations { report, max } => cmd_annotations(report, max),
        Commands::Explain { identifier } => cmd_explain(&identifier),
    }
}

/// Logs go to stderr so stdout stays machine-readable. `RUST_LOG` overrides the default level.
fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn cmd_check(
    cli: &Cli,
    report_out: &Utf8Path,
    write_markdown: bool,
    markdown_out: &Utf8Path,
) -> anyhow::Result<()> {
    let repo_root = cli
        .repo_root
        .canonicalize_utf8()
        .unwrap_or_else(|_| cli.repo_root.clone());

    let result = (|| -> anyhow::Result<i32> {
        if !repo_root.is_dir() {
            anyhow::bail!("repo root does not exist: {}", repo_root);
        }
        let cfg_path = repo_root.join(&cli.config);
        let cfg_text = read_optional(&cfg_path)?;

        let overrides = Overrides {
            profile: cli.profile.clone(),
        };

        let output = run_check(CheckInput {
            repo_root: &repo_root,
            config_text: &cfg_text,
            overrides,
        })?;

        write_report_file(report_out, &output.report).context("write report json")?;

        if write_markdown {
            let md = render_markdown(&to_renderable(&output.report));
            write_text_file(markdown_out, &md).context("write markdown")?;
        }

        Ok(verdict_exit_code(output.report.verdict))
    })();

    match result {
        Ok(code) => {
            if code != 0 {
                std::process::exit(code);
            }
            Ok(())
        }
        Err(err) => {
            let report = runtime_error_report(&format!("{err:#}"));
            if let Err(write_err) = write_report_file(report_out, &report) {
                tracing::error!(error = %write_err, "could not write runtime error report");
            }
            eprintln!("exprguard error: {err:#}");
            std::process::exit(1);
        }
    }
}

/// Missing config is allowed (defaults apply); any other read failure is an error.
fn read_optional(path: &Utf8Path) -> anyhow::Result<String> {
    match std::fs::read_to_string(path) {
        Ok(text) => Ok(text),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!(path = %path, "no config file; using defaults");
            Ok(String::new())
        }
        Err(err) => Err(err).with_context(|| format!("read config: {}", path)),
    }
}

fn write_report_file(path: &Utf8Path, report: &ExprguardReport) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).with_context(|| format!("create directory: {}", parent))?;
    }
    let data = serialize_report(report).context("serialize report")?;
    std::fs::write(path, data).with_context(|| format!("write report: {}", path))?;
    Ok(())
}

fn write_text_file(path: &Utf8Path, text: &str) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).with_context(|| format!("create directory: {}", parent))?;
    }
    std::fs::write(path, text).with_context(|| format!("write text: {}", path))?;
    Ok(())
}

fn cmd_parse(expression: &str) -> anyhow::Result<()> {
    let output = run_parse(expression);
    println!("{}", output.to_json()?);
    if output.status() == ScanStatus::Invalid {
        std::process::exit(1);
    }
    Ok(())
}

fn read_report(report_path: &Utf8Path) -> anyhow::Result<ExprguardReport> {
    let report_text = std::fs::read_to_string(report_path)
        .with_context(|| format!("read report: {}", report_path))?;
    parse_report_json(&report_text)
}

fn cmd_md(report_path: Utf8PathBuf, output: Option<Utf8PathBuf>) -> anyhow::Result<()> {
    let report = read_report(&report_path)?;
    let md = render_markdown(&to_renderable(&report));

    if let Some(out_path) = output {
        write_text_file(&out_path, &md).context("write markdown output")?;
    } else {
        print!("{}", md);
    }

    Ok(())
}

fn cmd_annotations(report_path: Utf8PathBuf, max: usize) -> anyhow::Result<()> {
    let report = read_report(&report_path)?;
    for annotation in render_annotations(&to_renderable(&report), max) {
        println!("{}", annotation);
    }
    Ok(())
}

fn cmd_explain(identifier: &str) -> anyhow::Result<()> {
    let output = run_explain(identifier);
    match &output {
        ExplainOutput::NotFound {
            identifier,
            available_policy_ids,
            available_codes,
        } => {
            eprint!(
                "{}",
                exprguard_app::format_not_found(identifier, available_policy_ids, available_codes)
            );
            std::process::exit(1);
        }
        _ => {
            print!("{}", exprguard_app::format_explanation(&output).unwrap_or_default());
            Ok(())
        }
    }
}
