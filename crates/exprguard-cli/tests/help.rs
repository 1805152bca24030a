use assert_cmd::Command;

/// Helper to get a Command for the exprguard binary.
#[allow(deprecated)]
fn exprguard_cmd() -> Command {
    Command::cargo_bin("exprguard").unwrap()
}

#[test]
fn help_works() {
    exprguard_cmd().arg("--help").assert().success();
}

#[test]
fn help_lists_subcommands() {
    let output = exprguard_cmd().arg("--help").output().expect("run");
    let stdout = String::from_utf8_lossy(&output.stdout);
    for cmd in ["check", "parse", "md", "annotations", "explain"] {
        assert!(stdout.contains(cmd), "help should mention {cmd}");
    }
}
