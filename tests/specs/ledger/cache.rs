//! Two-ledger sessions: an authoritative ledger with a cache in front.

use crate::prelude::*;

const FILE_WITH_MEM_CACHE: &str = r#"ledgers = [
    { plugin = "FINDY_FILE_LEDGER", arg = "authoritative" },
    { plugin = "FINDY_MEM_LEDGER", arg = "cache" },
]"#;

#[test]
fn cold_cache_falls_through_to_authoritative() {
    let project = Project::with_config(FILE_WITH_MEM_CACHE);

    project
        .lm()
        .args(&["write", "--tx", "schema", "schema:1", "{\"seqNo\":7}"])
        .passes();

    // The mem cache starts empty in every process, so the read is served
    // by the file ledger
    project
        .lm()
        .args(&["read", "--tx", "schema", "schema:1"])
        .passes()
        .stdout_eq("{\"seqNo\":7}\n");
}

#[test]
fn mock_database_starts_empty_in_each_process() {
    let project = Project::with_config(
        r#"ledgers = [
    { plugin = "FINDY_IMMUDB_LEDGER" },
    { plugin = "FINDY_MEM_LEDGER", arg = "cache" },
]"#,
    );

    // Each process has its own in-process database, so a fresh read misses
    project
        .lm()
        .args(&["read", "did:1"])
        .fails()
        .stderr_has("not found");
}

#[test]
fn verbose_logs_plugin_lifecycle() {
    let project = Project::with_config(FILE_WITH_MEM_CACHE);

    project
        .lm()
        .args(&["-v", "write", "k", "v"])
        .passes()
        .stderr_has("plugin opened")
        .stderr_has("ledger.write");
}
