//! Translator and fixture discovery.
//!
//! Translators are sibling packages named `translator-<name>`. Each one keeps
//! its fixtures under `translator-<name>/test/fixtures`, one directory per
//! fixture.

use std::fs;
use std::path::PathBuf;

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, info};
use walkdir::WalkDir;

use crate::errors::{io_error, HarnessResult};
use crate::mode::Mode;

static TRANSLATOR_DIR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^translator-(.+)$").expect("translator pattern is valid"));

/// A discovered translator package and where its fixtures live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Translator {
    pub name: String,
    pub fixture_root: PathBuf,
}

impl Translator {
    /// Modes registered for this translator's fixtures.
    pub fn modes(&self) -> &'static [Mode] {
        &Mode::ALL
    }

    /// Fixture directories directly under the fixture root, sorted by name.
    ///
    /// A translator without a fixture root has no fixtures.
    pub fn fixture_dirs(&self) -> HarnessResult<Vec<PathBuf>> {
        if !self.fixture_root.is_dir() {
            debug!(translator = %self.name, root = %self.fixture_root.display(), "no fixture root");
            return Ok(Vec::new());
        }

        let mut dirs = Vec::new();
        for entry in WalkDir::new(&self.fixture_root).min_depth(1).max_depth(1) {
            let entry = entry?;
            if entry.file_type().is_dir() {
                dirs.push(entry.into_path());
            }
        }
        dirs.sort();
        Ok(dirs)
    }
}

/// Returns the translator name encoded in a package directory name.
pub fn translator_name(dir_name: &str) -> Option<&str> {
    TRANSLATOR_DIR
        .captures(dir_name)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Scans one directory for translator packages.
#[derive(Debug, Clone)]
pub struct TranslatorLocator {
    packages_root: PathBuf,
}

impl TranslatorLocator {
    pub fn new(packages_root: impl Into<PathBuf>) -> Self {
        Self {
            packages_root: packages_root.into(),
        }
    }

    /// Every `translator-<name>` directory, sorted by name. Finding none is
    /// not an error.
    pub fn locate(&self) -> HarnessResult<Vec<Translator>> {
        let entries =
            fs::read_dir(&self.packages_root).map_err(|e| io_error(&self.packages_root, e))?;

        let mut translators = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| io_error(&self.packages_root, e))?;
            let file_name = entry.file_name();
            let Some(name) = translator_name(&file_name.to_string_lossy()).map(str::to_string)
            else {
                continue;
            };
            if !entry.path().is_dir() {
                continue;
            }
            translators.push(Translator {
                fixture_root: entry.path().join("test").join("fixtures"),
                name,
            });
        }
        translators.sort_by(|a, b| a.name.cmp(&b.name));

        info!(
            root = %self.packages_root.display(),
            count = translators.len(),
            "located translators"
        );
        Ok(translators)
    }
}
