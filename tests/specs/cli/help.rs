//! Help and discovery output.

use crate::prelude::*;

#[test]
fn help_lists_commands() {
    cli()
        .args(&["--help"])
        .passes()
        .stdout_has("plugins")
        .stdout_has("write")
        .stdout_has("read");
}

#[test]
fn write_help_shows_tx_kinds() {
    cli()
        .args(&["write", "--help"])
        .passes()
        .stdout_has("--tx")
        .stdout_has("cred-def");
}

#[test]
fn plugins_lists_builtin_ledgers() {
    let project = Project::with_config("");
    project
        .lm()
        .args(&["plugins"])
        .passes()
        .stdout_eq(
            "FINDY_API_LEDGER\n\
             FINDY_ECHO_LEDGER\n\
             FINDY_FILE_LEDGER\n\
             FINDY_IMMUDB_LEDGER\n\
             FINDY_MEM_LEDGER\n",
        );
}
