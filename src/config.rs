//! Harness configuration.
//!
//! Everything that depends on the process environment (working directory,
//! update mode, color support) is captured here once per run and passed down
//! explicitly.

use std::env;
use std::path::PathBuf;

use crate::errors::{io_error, HarnessResult};
use crate::mode::Mode;

/// Environment variable that switches snapshot checks to rewriting.
pub const UPDATE_ENV: &str = "UPDATE_SNAPSHOTS";

/// Substring filters narrowing which (translator, fixture, mode) runs execute.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunFilter {
    pub translator: Option<String>,
    pub fixture: Option<String>,
    pub mode: Option<String>,
}

impl RunFilter {
    /// Returns why a run is filtered out, or `None` if it should execute.
    pub fn skip_reason(&self, translator: &str, fixture: &str, mode: Mode) -> Option<String> {
        let checks = [
            ("translator", &self.translator, translator),
            ("fixture", &self.fixture, fixture),
            ("mode", &self.mode, mode.name()),
        ];
        for (what, filter, value) in checks {
            let Some(filter) = filter else { continue };
            if !value.to_lowercase().contains(&filter.to_lowercase()) {
                return Some(format!("Filtered out by {} substring: {}", what, filter));
            }
        }
        None
    }
}

#[derive(Debug, Clone)]
pub struct HarnessConfig {
    /// Directory scanned for `translator-<name>` packages.
    pub packages_root: PathBuf,
    /// Working directory stripped from error traces.
    pub cwd: PathBuf,
    /// Leading segment of stack frames that belong to the project.
    pub source_root: String,
    /// Entry file of a fixture unless its local configuration overrides it.
    pub template_file: String,
    /// Snapshot extension of the regenerated-source mode.
    pub regenerated_extension: String,
    pub update_snapshots: bool,
    pub use_colors: bool,
    pub filter: RunFilter,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            packages_root: PathBuf::from("packages"),
            cwd: PathBuf::new(),
            source_root: "packages".to_string(),
            template_file: "template.marko".to_string(),
            regenerated_extension: ".marko".to_string(),
            update_snapshots: false,
            use_colors: false,
            filter: RunFilter::default(),
        }
    }
}

impl HarnessConfig {
    /// Defaults plus the current directory and environment overrides.
    pub fn from_env() -> HarnessResult<Self> {
        let cwd = env::current_dir().map_err(|e| io_error(".", e))?;
        Ok(Self {
            cwd,
            update_snapshots: env_flag(UPDATE_ENV),
            use_colors: atty::is(atty::Stream::Stdout) && env::var_os("NO_COLOR").is_none(),
            ..Self::default()
        })
    }
}

fn env_flag(name: &str) -> bool {
    env::var(name)
        .map(|v| matches!(v.trim().to_lowercase().as_str(), "1" | "true" | "yes"))
        .unwrap_or(false)
}
