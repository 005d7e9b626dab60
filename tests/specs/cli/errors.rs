//! Error reporting for bad input and configuration.

use crate::prelude::*;

#[test]
fn missing_config_file_fails() {
    cli()
        .args(&["--config", "/nonexistent/pool.toml", "plugins"])
        .fails()
        .stderr_has("loading config");
}

#[test]
fn invalid_config_fails() {
    let project = Project::empty();
    project.file("pool.toml", "ledgers = 3\n");
    project
        .lm()
        .args(&["plugins"])
        .fails()
        .stderr_has("TOML parse error");
}

#[test]
fn read_without_ledgers_fails() {
    let project = Project::with_config("");
    project
        .lm()
        .args(&["read", "k"])
        .fails()
        .stderr_has("no ledgers configured");
}

#[test]
fn unpaired_ledger_list_fails() {
    let project = Project::with_config("");
    project
        .lm()
        .args(&["--ledgers", "FINDY_MEM_LEDGER,,FINDY_ECHO_LEDGER", "read", "k"])
        .fails()
        .stderr_has("name/argument pairs");
}

#[test]
fn unknown_pool_name_opens_nothing() {
    // A bare unknown name is taken as a pool of the native ledger, which
    // this binary does not provide
    let project = Project::with_config("");
    project
        .lm()
        .args(&["--ledgers", "some_pool_name", "read", "k"])
        .fails()
        .stderr_has("could be opened");
}

#[test]
fn invalid_database_port_in_env_fails() {
    cli()
        .env("ImmuUrl", "localhost")
        .env("ImmuPort", "not-a-port")
        .args(&["plugins"])
        .fails()
        .stderr_has("invalid port");
}
