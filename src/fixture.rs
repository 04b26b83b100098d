//! Fixtures and their optional local configuration.
//!
//! A fixture directory holds a template entry file, optionally a `test.json`
//! (or `test.yaml`) overriding fixture settings, and a `snapshots/` directory
//! created on first use. The local configuration is read exactly once, when
//! the fixture is loaded.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::errors::{fixture_config_error, io_error, HarnessResult};

pub const CONFIG_JSON: &str = "test.json";
pub const CONFIG_YAML: &str = "test.yaml";
pub const SNAPSHOT_DIR: &str = "snapshots";

/// Fixture-local test configuration.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FixtureConfig {
    /// Entry file relative to the fixture directory.
    #[serde(default)]
    pub template_file: Option<String>,
    /// Keys the harness does not interpret.
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl FixtureConfig {
    /// Reads the fixture's configuration file, if it has one.
    pub fn load(dir: &Path) -> HarnessResult<Option<FixtureConfig>> {
        let json = dir.join(CONFIG_JSON);
        if json.is_file() {
            let text = fs::read_to_string(&json).map_err(|e| io_error(&json, e))?;
            return serde_json::from_str(&text)
                .map(Some)
                .map_err(|e| fixture_config_error(&json, e));
        }

        let yaml = dir.join(CONFIG_YAML);
        if yaml.is_file() {
            let text = fs::read_to_string(&yaml).map_err(|e| io_error(&yaml, e))?;
            // An empty YAML document means "no overrides".
            if text.trim().is_empty() {
                return Ok(Some(FixtureConfig::default()));
            }
            return serde_yaml::from_str(&text)
                .map(Some)
                .map_err(|e| fixture_config_error(&yaml, e));
        }

        Ok(None)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Fixture {
    pub name: String,
    pub dir: PathBuf,
    pub config: FixtureConfig,
    pub template_file: PathBuf,
    pub snapshot_dir: PathBuf,
}

impl Fixture {
    /// Loads the fixture in `dir`, reading its local configuration.
    pub fn load(dir: impl AsRef<Path>, default_template: &str) -> HarnessResult<Self> {
        let dir = dir.as_ref();
        let config = FixtureConfig::load(dir)?;
        Ok(Self::from_parts(dir, config, default_template))
    }

    /// Builds a fixture from an already-resolved local configuration.
    pub fn from_parts(
        dir: impl AsRef<Path>,
        config: Option<FixtureConfig>,
        default_template: &str,
    ) -> Self {
        let dir = dir.as_ref().to_path_buf();
        let config = config.unwrap_or_default();
        let name = dir
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| dir.display().to_string());
        let template_file = dir.join(
            config
                .template_file
                .as_deref()
                .unwrap_or(default_template),
        );
        let snapshot_dir = dir.join(SNAPSHOT_DIR);

        Self {
            name,
            dir,
            config,
            template_file,
            snapshot_dir,
        }
    }

    /// Maps a fixture-relative name to a path inside the fixture.
    pub fn resolve(&self, name: impl AsRef<Path>) -> PathBuf {
        self.dir.join(name)
    }

    /// Creates the snapshot directory if it does not exist yet.
    pub fn ensure_snapshot_dir(&self) -> HarnessResult<()> {
        fs::create_dir_all(&self.snapshot_dir).map_err(|e| io_error(&self.snapshot_dir, e))
    }
}
