//! Snapshot identity and storage.
//!
//! The recorder decides *what* is snapshotted for a run: base name,
//! extension and content. The store decides how an entry is persisted and
//! compared. Files live at `<fixture>/snapshots/<base><ext>`.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::diagnostics::format_diagnostics;
use crate::errors::{io_error, HarnessError, HarnessResult};
use crate::mode::Mode;
use crate::runner::CompileResult;

pub const ERROR_EXTENSION: &str = ".txt";
pub const CODE_EXTENSION: &str = ".js";
pub const DIAGNOSTICS_EXTENSION: &str = ".diagnostics.txt";

/// One unit written to or compared against the snapshot store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotEntry {
    pub base_name: String,
    pub extension: String,
    pub content: String,
}

impl SnapshotEntry {
    pub fn new(
        base_name: impl Into<String>,
        extension: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            base_name: base_name.into(),
            extension: extension.into(),
            content: content.into(),
        }
    }

    pub fn file_name(&self) -> String {
        format!("{}{}", self.base_name, self.extension)
    }

    pub fn path_in(&self, dir: &Path) -> PathBuf {
        dir.join(self.file_name())
    }
}

// =============================================================================
// RECORDER
// =============================================================================

/// Maps a classified result to the snapshot entries of one run.
#[derive(Debug, Clone)]
pub struct SnapshotRecorder {
    regenerated_extension: String,
}

impl SnapshotRecorder {
    pub fn new(regenerated_extension: impl Into<String>) -> Self {
        Self {
            regenerated_extension: regenerated_extension.into(),
        }
    }

    pub fn entries(&self, mode: Mode, result: &CompileResult) -> Vec<SnapshotEntry> {
        let name = mode.name();
        match result {
            CompileResult::Failure { normalized_trace } => vec![SnapshotEntry::new(
                format!("{}-error", name),
                ERROR_EXTENSION,
                normalized_trace.as_str(),
            )],
            CompileResult::Success { code, diagnostics } if mode.regenerates_source() => {
                let regenerated =
                    SnapshotEntry::new(name, self.regenerated_extension.as_str(), code.as_str());
                // Checked twice: the second check must agree with the first.
                let mut entries = vec![regenerated.clone(), regenerated];
                if !diagnostics.is_empty() {
                    entries.push(SnapshotEntry::new(
                        name,
                        DIAGNOSTICS_EXTENSION,
                        format_diagnostics(diagnostics),
                    ));
                }
                entries
            }
            CompileResult::Success { code, .. } => {
                vec![SnapshotEntry::new(name, CODE_EXTENSION, code.as_str())]
            }
        }
    }
}

// =============================================================================
// STORE
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapshotOutcome {
    /// No snapshot existed; the entry was written.
    Written,
    /// Update mode replaced a differing snapshot.
    Updated,
    /// The stored snapshot equals the entry.
    Matched,
}

/// Persists entries and compares them against stored snapshots.
pub trait SnapshotStore {
    fn check(&self, dir: &Path, entry: &SnapshotEntry) -> HarnessResult<SnapshotOutcome>;
}

/// Plain files, compared byte for byte.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsSnapshotStore {
    update: bool,
}

impl FsSnapshotStore {
    pub fn new(update: bool) -> Self {
        Self { update }
    }

    fn write(path: &Path, content: &str) -> HarnessResult<()> {
        fs::write(path, content).map_err(|e| io_error(path, e))
    }
}

impl SnapshotStore for FsSnapshotStore {
    fn check(&self, dir: &Path, entry: &SnapshotEntry) -> HarnessResult<SnapshotOutcome> {
        let path = entry.path_in(dir);
        let stored = match fs::read_to_string(&path) {
            Ok(stored) => stored,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                Self::write(&path, &entry.content)?;
                debug!(path = %path.display(), "snapshot written");
                return Ok(SnapshotOutcome::Written);
            }
            Err(e) => return Err(io_error(&path, e)),
        };

        if stored == entry.content {
            debug!(path = %path.display(), "snapshot matched");
            return Ok(SnapshotOutcome::Matched);
        }
        if self.update {
            Self::write(&path, &entry.content)?;
            debug!(path = %path.display(), "snapshot updated");
            return Ok(SnapshotOutcome::Updated);
        }
        Err(HarnessError::SnapshotMismatch {
            path,
            expected: stored,
            actual: entry.content.clone(),
        })
    }
}
