//! Build information for `gettsim-personas version`
//!
//! Values are embedded at compile time by `build.rs`.

use std::fmt;

use serde::Serialize;

/// Build information embedded at compile time
#[derive(Debug, Clone, Serialize)]
pub struct BuildInfo {
    pub name: &'static str,
    pub version: &'static str,
    /// Short git commit hash, "unknown" outside a checkout
    pub git_hash: &'static str,
    pub git_branch: &'static str,
    #[serde(skip)]
    git_dirty_str: &'static str,
    pub build_timestamp: &'static str,
    pub target: &'static str,
    pub profile: &'static str,
    pub rustc_version: &'static str,
}

impl BuildInfo {
    pub const fn current() -> Self {
        Self {
            name: env!("CARGO_PKG_NAME"),
            version: env!("CARGO_PKG_VERSION"),
            git_hash: env!("GETTSIM_PERSONAS_GIT_HASH"),
            git_branch: env!("GETTSIM_PERSONAS_GIT_BRANCH"),
            git_dirty_str: env!("GETTSIM_PERSONAS_GIT_DIRTY"),
            build_timestamp: env!("GETTSIM_PERSONAS_BUILD_TIMESTAMP"),
            target: env!("GETTSIM_PERSONAS_TARGET"),
            profile: env!("GETTSIM_PERSONAS_PROFILE"),
            rustc_version: env!("GETTSIM_PERSONAS_RUSTC_VERSION"),
        }
    }

    /// Whether the working tree had uncommitted changes at build time
    pub fn git_dirty(&self) -> bool {
        self.git_dirty_str == "true"
    }

    /// Version with commit suffix, e.g. "0.1.0-abc1234"
    pub fn full_version(&self) -> String {
        let dirty = if self.git_dirty() { "-dirty" } else { "" };
        format!("{}-{}{}", self.version, self.git_hash, dirty)
    }
}

impl fmt::Display for BuildInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} {}", self.name, self.full_version())?;
        writeln!(f)?;
        writeln!(f, "Build Information:")?;
        writeln!(f, "  Git Hash:   {}", self.git_hash)?;
        writeln!(f, "  Git Branch: {}", self.git_branch)?;
        writeln!(f, "  Built:      {} ({})", self.build_timestamp, self.profile)?;
        writeln!(f, "  Target:     {}", self.target)?;
        writeln!(f, "  Compiler:   {}", self.rustc_version)
    }
}

pub fn build_info() -> BuildInfo {
    BuildInfo::current()
}

/// Print version information to stdout
pub fn print_version() {
    print!("{}", build_info());
}
