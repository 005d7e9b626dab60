//! Shared helpers for the behavioral specs.

use assert_cmd::Command;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A scratch directory holding a pool config and the file ledger's data
pub struct Project {
    dir: TempDir,
}

impl Project {
    pub fn empty() -> Self {
        Self {
            dir: tempfile::tempdir().unwrap(),
        }
    }

    /// Project whose config points the file ledger at `<project>/ledgers`
    pub fn with_config(ledgers: &str) -> Self {
        let project = Self::empty();
        let config = format!(
            "{}\n\n[file]\ndir = \"{}\"\n",
            ledgers,
            project.ledger_dir().display()
        );
        project.file("pool.toml", &config);
        project
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn ledger_dir(&self) -> PathBuf {
        self.path().join("ledgers")
    }

    pub fn config_path(&self) -> PathBuf {
        self.path().join("pool.toml")
    }

    pub fn file(&self, name: &str, content: &str) {
        std::fs::write(self.path().join(name), content).unwrap();
    }

    /// `lm` with `--config` set to this project's config
    pub fn lm(&self) -> Cli {
        let mut cli = cli();
        cli.cmd.arg("--config").arg(self.config_path());
        cli
    }
}

/// Command builder with terse assertions
pub struct Cli {
    cmd: Command,
}

/// `lm` with a clean environment
pub fn cli() -> Cli {
    let mut cmd = Command::cargo_bin("lm").unwrap();
    for var in ["RUST_LOG", "ImmuUrl", "ImmuPort", "ImmuUsrName", "ImmuPasswd"] {
        cmd.env_remove(var);
    }
    Cli { cmd }
}

impl Cli {
    pub fn args(mut self, args: &[&str]) -> Self {
        self.cmd.args(args);
        self
    }

    pub fn env(mut self, key: &str, value: &str) -> Self {
        self.cmd.env(key, value);
        self
    }

    pub fn passes(mut self) -> Output {
        Output(self.cmd.assert().success())
    }

    pub fn fails(mut self) -> Output {
        Output(self.cmd.assert().failure())
    }
}

pub struct Output(assert_cmd::assert::Assert);

impl Output {
    pub fn stdout_has(self, expected: &str) -> Self {
        Output(self.0.stdout(predicates::str::contains(expected)))
    }

    pub fn stdout_eq(self, expected: &str) -> Self {
        Output(self.0.stdout(expected.to_string()))
    }

    pub fn stderr_has(self, expected: &str) -> Self {
        Output(self.0.stderr(predicates::str::contains(expected)))
    }
}
