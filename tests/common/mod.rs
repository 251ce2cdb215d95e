//! Common test utilities and fixtures

#![allow(dead_code)]

use std::fs;
use std::path::PathBuf;

use assert_cmd::Command;
use tempfile::TempDir;

/// Command for the gettsim-personas binary, isolated from user config
pub fn personas_cmd() -> Command {
    let mut cmd = Command::cargo_bin("gettsim-personas").unwrap();
    cmd.env_remove("GETTSIM_PERSONAS_CONFIG")
        .env_remove("GETTSIM_PERSONAS_LOG_LEVEL")
        .env_remove("GETTSIM_PERSONAS_PRETTY")
        .env_remove("GETTSIM_PERSONAS_START_YEAR")
        .env_remove("GETTSIM_PERSONAS_END_YEAR")
        .env_remove("RUST_LOG");
    cmd
}

/// Temporary directory holding files written by a test
pub struct Fixture {
    pub temp_dir: TempDir,
}

impl Fixture {
    pub fn new() -> Self {
        Self {
            temp_dir: TempDir::new().unwrap(),
        }
    }

    /// Write `content` to `name` inside the fixture directory
    pub fn write(&self, name: &str, content: &str) -> PathBuf {
        let path = self.temp_dir.path().join(name);
        fs::write(&path, content).unwrap();
        path
    }

    pub fn path(&self, name: &str) -> PathBuf {
        self.temp_dir.path().join(name)
    }
}

/// Parse the stdout of a finished command as JSON
pub fn stdout_json(output: &std::process::Output) -> serde_json::Value {
    serde_json::from_slice(&output.stdout).unwrap()
}
