//! Executes one fixture under one mode and records the outcome.
//!
//! A run compiles exactly once. A compile error is a valid, terminal outcome:
//! its normalized trace is snapshotted like any other output. Only if that
//! snapshot cannot be recorded does the run fail, and then with the original
//! compiler error rather than the snapshot problem.

use tracing::warn;

use crate::compiler::{CompileFailure, CompileOutput, Compiler};
use crate::diagnostics::Diagnostic;
use crate::errors::{HarnessError, HarnessResult};
use crate::fixture::Fixture;
use crate::mode::Mode;
use crate::normalize::Normalizer;
use crate::snapshot::{SnapshotEntry, SnapshotOutcome, SnapshotRecorder, SnapshotStore};

/// The classified outcome of one compilation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompileResult {
    Success {
        code: String,
        diagnostics: Vec<Diagnostic>,
    },
    Failure {
        normalized_trace: String,
    },
}

impl CompileResult {
    pub fn is_failure(&self) -> bool {
        matches!(self, CompileResult::Failure { .. })
    }
}

/// What a passing run checked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    pub result: CompileResult,
    pub snapshots: Vec<(SnapshotEntry, SnapshotOutcome)>,
}

pub struct ModeRunner<'a, C: ?Sized, S: ?Sized> {
    compiler: &'a C,
    store: &'a S,
    normalizer: &'a Normalizer,
    recorder: &'a SnapshotRecorder,
}

impl<'a, C, S> ModeRunner<'a, C, S>
where
    C: Compiler + ?Sized,
    S: SnapshotStore + ?Sized,
{
    pub fn new(
        compiler: &'a C,
        store: &'a S,
        normalizer: &'a Normalizer,
        recorder: &'a SnapshotRecorder,
    ) -> Self {
        Self {
            compiler,
            store,
            normalizer,
            recorder,
        }
    }

    /// Compiles the fixture with the mode's merged configuration.
    pub fn compile(&self, fixture: &Fixture, mode: Mode) -> Result<CompileOutput, CompileFailure> {
        let config = mode.compiler_config();
        self.compiler.compile_file(&fixture.template_file, &config)
    }

    pub fn classify(&self, outcome: &Result<CompileOutput, CompileFailure>) -> CompileResult {
        match outcome {
            Ok(output) => CompileResult::Success {
                code: output.code.clone(),
                diagnostics: output.meta.diagnostics.clone(),
            },
            Err(failure) => CompileResult::Failure {
                normalized_trace: self.normalizer.normalize(failure.trace()),
            },
        }
    }

    pub fn run(&self, fixture: &Fixture, mode: Mode) -> HarnessResult<RunReport> {
        fixture.ensure_snapshot_dir()?;

        let outcome = self.compile(fixture, mode);
        let result = self.classify(&outcome);
        let entries = self.recorder.entries(mode, &result);

        match outcome {
            Ok(_) => {
                let snapshots = self.record(fixture, entries)?;
                Ok(RunReport { result, snapshots })
            }
            Err(failure) => match self.record(fixture, entries) {
                Ok(snapshots) => Ok(RunReport { result, snapshots }),
                Err(snapshot_error) => {
                    warn!(
                        fixture = %fixture.name,
                        %mode,
                        kind = snapshot_error.kind(),
                        error = %snapshot_error,
                        "error snapshot failed, reporting the compiler error"
                    );
                    Err(HarnessError::CompilationFailure {
                        entry: fixture.template_file.clone(),
                        trace: failure.into_trace(),
                    })
                }
            },
        }
    }

    fn record(
        &self,
        fixture: &Fixture,
        entries: Vec<SnapshotEntry>,
    ) -> HarnessResult<Vec<(SnapshotEntry, SnapshotOutcome)>> {
        let mut recorded = Vec::with_capacity(entries.len());
        for entry in entries {
            let outcome = self.store.check(&fixture.snapshot_dir, &entry)?;
            recorded.push((entry, outcome));
        }
        Ok(recorded)
    }
}
