//! Harness error handling.
//!
//! Every failure the harness can surface to a test boundary is one variant of
//! [`HarnessError`]. The enum derives both `thiserror::Error` (for `Display`)
//! and `miette::Diagnostic` (for codes and help text in the CLI report).

use std::path::{Path, PathBuf};

use miette::Diagnostic;
use thiserror::Error;

pub type HarnessResult<T> = Result<T, HarnessError>;

#[derive(Debug, Error, Diagnostic)]
pub enum HarnessError {
    /// The compiler rejected the fixture and the error snapshot could not be
    /// recorded. Carries the original, un-normalized trace.
    #[error("compilation of {} failed:\n{trace}", .entry.display())]
    #[diagnostic(code(harness::compilation_failure))]
    CompilationFailure { entry: PathBuf, trace: String },

    #[error(
        "snapshot {} does not match\n--- stored ---\n{expected}\n--- produced ---\n{actual}",
        .path.display()
    )]
    #[diagnostic(
        code(harness::snapshot_mismatch),
        help("rerun with --update (or UPDATE_SNAPSHOTS=1) if the new output is intended")
    )]
    SnapshotMismatch {
        path: PathBuf,
        expected: String,
        actual: String,
    },

    #[error("invalid fixture configuration {}: {reason}", .path.display())]
    #[diagnostic(code(harness::fixture_config))]
    FixtureConfig { path: PathBuf, reason: String },

    #[error("I/O error at {}: {source}", .path.display())]
    #[diagnostic(code(harness::io))]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to walk directory: {0}")]
    #[diagnostic(code(harness::walk))]
    Walk(#[from] walkdir::Error),
}

impl HarnessError {
    /// Short classification used by reports and logs.
    pub fn kind(&self) -> &'static str {
        match self {
            HarnessError::CompilationFailure { .. } => "CompilationFailure",
            HarnessError::SnapshotMismatch { .. } => "SnapshotMismatch",
            HarnessError::FixtureConfig { .. } => "FixtureConfig",
            HarnessError::Io { .. } => "Io",
            HarnessError::Walk(_) => "Walk",
        }
    }
}

/// Attaches the offending path to an I/O error.
pub fn io_error(path: impl AsRef<Path>, source: std::io::Error) -> HarnessError {
    HarnessError::Io {
        path: path.as_ref().to_path_buf(),
        source,
    }
}

/// Builds a fixture configuration error from any displayable cause.
pub fn fixture_config_error(path: impl AsRef<Path>, reason: impl ToString) -> HarnessError {
    HarnessError::FixtureConfig {
        path: path.as_ref().to_path_buf(),
        reason: reason.to_string(),
    }
}
