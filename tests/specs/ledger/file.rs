//! File ledger round trips through separate lm invocations.

use crate::prelude::*;

const FILE_LEDGER: &str = r#"ledgers = [{ plugin = "FINDY_FILE_LEDGER", arg = "specs" }]"#;

#[test]
fn written_record_is_read_back() {
    let project = Project::with_config(FILE_LEDGER);

    project
        .lm()
        .args(&["write", "did:1", "verkey-1"])
        .passes()
        .stdout_has("Written: did:1");
    project
        .lm()
        .args(&["read", "did:1"])
        .passes()
        .stdout_eq("verkey-1\n");

    assert!(project.ledger_dir().join("specs.json").exists());
}

#[test]
fn missing_record_is_not_found() {
    let project = Project::with_config(FILE_LEDGER);

    project
        .lm()
        .args(&["read", "did:unknown"])
        .fails()
        .stderr_has("not found: did:unknown");
}

#[test]
fn ledgers_flag_overrides_config() {
    let project = Project::with_config(FILE_LEDGER);

    project
        .lm()
        .args(&["--ledgers", "FINDY_FILE_LEDGER,other", "write", "k", "v"])
        .passes();

    assert!(project.ledger_dir().join("other.json").exists());
    assert!(!project.ledger_dir().join("specs.json").exists());
}
