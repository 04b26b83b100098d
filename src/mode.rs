//! The fixed set of compilation modes run against every fixture.

use std::fmt::{self, Display, Formatter};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::compiler::CompilerConfig;

// =============================================================================
// CONFIGURATION AXES
// =============================================================================

/// What the compiler is asked to produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputTarget {
    /// Server-side html rendering code.
    Html,
    /// Code building an in-memory element tree.
    Dom,
    /// The template regenerated in its own (migrated) source format.
    Migrate,
    /// Browser hydration entry for html-rendered output.
    Hydrate,
}

/// Module format of generated code. Absent means the compiler default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModuleFormat {
    Cjs,
}

/// A dependency the compiler wants materialized as a virtual module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VirtualDependency {
    pub virtual_path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

/// How virtual dependencies are turned into import paths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DependencyResolver {
    /// Import the descriptor's `virtual_path` verbatim, whatever the real
    /// file layout around `from` looks like.
    VirtualPath,
}

impl DependencyResolver {
    pub fn resolve(&self, _from: &Path, dependency: &VirtualDependency) -> PathBuf {
        match self {
            DependencyResolver::VirtualPath => PathBuf::from(&dependency.virtual_path),
        }
    }
}

/// Static configuration of one mode, before the harness overrides are applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModeSettings {
    pub output: OutputTarget,
    pub modules: Option<ModuleFormat>,
    pub optimize: bool,
    pub resolver: Option<DependencyResolver>,
}

// =============================================================================
// MODES
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Mode {
    Cjs,
    Html,
    HtmlProduction,
    Vdom,
    VdomProduction,
    Generated,
    Hydrate,
}

impl Mode {
    /// Every mode, in registration order.
    pub const ALL: [Mode; 7] = [
        Mode::Cjs,
        Mode::Html,
        Mode::HtmlProduction,
        Mode::Vdom,
        Mode::VdomProduction,
        Mode::Generated,
        Mode::Hydrate,
    ];

    /// Name used for registration and as the snapshot base name.
    pub fn name(self) -> &'static str {
        match self {
            Mode::Cjs => "cjs",
            Mode::Html => "html",
            Mode::HtmlProduction => "htmlProduction",
            Mode::Vdom => "vdom",
            Mode::VdomProduction => "vdomProduction",
            Mode::Generated => "generated",
            Mode::Hydrate => "hydrate",
        }
    }

    pub fn from_name(name: &str) -> Option<Mode> {
        Mode::ALL.into_iter().find(|mode| mode.name() == name)
    }

    pub fn settings(self) -> ModeSettings {
        let (output, modules, optimize, resolver) = match self {
            Mode::Cjs => (OutputTarget::Html, Some(ModuleFormat::Cjs), false, None),
            Mode::Html => (OutputTarget::Html, None, false, None),
            Mode::HtmlProduction => (OutputTarget::Html, None, true, None),
            Mode::Vdom => (OutputTarget::Dom, None, false, None),
            Mode::VdomProduction => (OutputTarget::Dom, None, true, None),
            Mode::Generated => (OutputTarget::Migrate, None, false, None),
            Mode::Hydrate => (
                OutputTarget::Hydrate,
                None,
                false,
                Some(DependencyResolver::VirtualPath),
            ),
        };
        ModeSettings {
            output,
            modules,
            optimize,
            resolver,
        }
    }

    /// True for the mode whose output is regenerated template source, which
    /// is snapshotted with its diagnostics.
    pub fn regenerates_source(self) -> bool {
        self.settings().output == OutputTarget::Migrate
    }

    /// The configuration handed to the compiler, with the determinism
    /// overrides applied.
    pub fn compiler_config(self) -> CompilerConfig {
        CompilerConfig::for_mode(self.settings())
    }
}

impl Display for Mode {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
