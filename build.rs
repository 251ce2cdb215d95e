//! Build script for gettsim-personas
//!
//! Embeds git and toolchain details shown by `gettsim-personas version`.

use std::env;
use std::process::Command;

fn main() {
    println!("cargo:rerun-if-changed=.git/HEAD");
    println!("cargo:rerun-if-changed=.git/index");

    let git_dirty = match git(&["status", "--porcelain"]) {
        Some(status) if !status.is_empty() => "true",
        Some(_) => "false",
        None => "unknown",
    };
    let vars = [
        ("GIT_HASH", git(&["rev-parse", "--short=8", "HEAD"])),
        ("GIT_BRANCH", git(&["rev-parse", "--abbrev-ref", "HEAD"])),
        ("GIT_DIRTY", Some(git_dirty.to_string())),
        (
            "BUILD_TIMESTAMP",
            Some(chrono::Utc::now().format("%Y-%m-%d %H:%M:%S UTC").to_string()),
        ),
        ("TARGET", env::var("TARGET").ok()),
        ("PROFILE", env::var("PROFILE").ok()),
        ("RUSTC_VERSION", command_output("rustc", &["--version"])),
    ];

    for (name, value) in vars {
        let value = value.unwrap_or_else(|| "unknown".to_string());
        println!("cargo:rustc-env=GETTSIM_PERSONAS_{name}={value}");
    }
}

fn git(args: &[&str]) -> Option<String> {
    command_output("git", args)
}

/// Trimmed stdout of a successful command
fn command_output(program: &str, args: &[&str]) -> Option<String> {
    let output = Command::new(program).args(args).output().ok()?;
    if !output.status.success() {
        return None;
    }
    String::from_utf8(output.stdout)
        .ok()
        .map(|s| s.trim().to_string())
}
