//! The compiler as consumed by the harness.
//!
//! The harness never looks inside the compiler. It hands over an entry file
//! and a [`CompilerConfig`] and gets back either generated code with
//! diagnostics or a failure carrying the error's display trace.

use std::fmt::{self, Display, Formatter};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::diagnostics::Diagnostic;
use crate::mode::{DependencyResolver, ModeSettings, ModuleFormat, OutputTarget};

pub mod command;

pub use command::CommandCompiler;

// =============================================================================
// CONFIGURATION
// =============================================================================

/// Settings for the compiler's embedded source transformer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransformConfig {
    /// Look up `.rc` style config files next to the sources.
    pub babelrc: bool,
    /// Load a project-level config file.
    pub config_file: bool,
}

/// The merged configuration of one compilation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompilerConfig {
    pub output: OutputTarget,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modules: Option<ModuleFormat>,
    pub optimize: bool,
    pub babel_config: TransformConfig,
    pub write_version_comment: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resolve_virtual_dependency: Option<DependencyResolver>,
}

impl CompilerConfig {
    /// Ambient config discovery and version comments are always off so that
    /// output depends only on the fixture and the mode.
    pub fn for_mode(settings: ModeSettings) -> Self {
        Self {
            output: settings.output,
            modules: settings.modules,
            optimize: settings.optimize,
            babel_config: TransformConfig {
                babelrc: false,
                config_file: false,
            },
            write_version_comment: false,
            resolve_virtual_dependency: settings.resolver,
        }
    }
}

// =============================================================================
// RESULTS
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompileMeta {
    #[serde(default)]
    pub diagnostics: Vec<Diagnostic>,
}

/// What a successful compilation returns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompileOutput {
    pub code: String,
    #[serde(default)]
    pub meta: CompileMeta,
}

impl CompileOutput {
    pub fn new(code: impl Into<String>, diagnostics: Vec<Diagnostic>) -> Self {
        Self {
            code: code.into(),
            meta: CompileMeta { diagnostics },
        }
    }
}

/// An error thrown by the compiler, reduced to its display trace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompileFailure {
    trace: String,
}

impl CompileFailure {
    pub fn new(trace: impl Into<String>) -> Self {
        Self {
            trace: trace.into(),
        }
    }

    pub fn trace(&self) -> &str {
        &self.trace
    }

    pub fn into_trace(self) -> String {
        self.trace
    }
}

impl Display for CompileFailure {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.trace)
    }
}

impl std::error::Error for CompileFailure {}

// =============================================================================
// COMPILER SEAM
// =============================================================================

/// A synchronous compiler entry point.
pub trait Compiler {
    fn compile_file(
        &self,
        entry: &Path,
        config: &CompilerConfig,
    ) -> Result<CompileOutput, CompileFailure>;
}

impl<F> Compiler for F
where
    F: Fn(&Path, &CompilerConfig) -> Result<CompileOutput, CompileFailure>,
{
    fn compile_file(
        &self,
        entry: &Path,
        config: &CompilerConfig,
    ) -> Result<CompileOutput, CompileFailure> {
        self(entry, config)
    }
}
