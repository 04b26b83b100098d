//! Runs every registered mode against every fixture of every translator.
//!
//! This is the scheduler side of the harness: it enumerates
//! translator × fixture × mode, applies the run filter, hands each triple to a
//! [`ModeRunner`] and collects one [`TestResult`] per triple. Execution is
//! sequential; each triple writes only to its own fixture's snapshot
//! directory.

use std::io::{self, Write};

use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};
use tracing::{debug, info};

use crate::compiler::Compiler;
use crate::config::HarnessConfig;
use crate::discovery::{Translator, TranslatorLocator};
use crate::errors::HarnessResult;
use crate::fixture::Fixture;
use crate::mode::Mode;
use crate::normalize::Normalizer;
use crate::runner::ModeRunner;
use crate::snapshot::{SnapshotRecorder, SnapshotStore};

// =============================================================================
// RESULTS
// =============================================================================

/// Identity of one (translator, fixture, mode) execution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestId {
    pub translator: String,
    pub fixture: String,
    pub mode: Mode,
}

impl std::fmt::Display for TestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} > {} > {}", self.translator, self.fixture, self.mode)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TestResult {
    Pass { id: TestId },
    Fail { id: TestId, error: String },
    Skipped { id: TestId, reason: String },
}

impl TestResult {
    pub fn id(&self) -> &TestId {
        match self {
            TestResult::Pass { id }
            | TestResult::Fail { id, .. }
            | TestResult::Skipped { id, .. } => id,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    pub results: Vec<TestResult>,
}

impl RunSummary {
    pub fn passed(&self) -> usize {
        self.count(|r| matches!(r, TestResult::Pass { .. }))
    }

    pub fn failed(&self) -> usize {
        self.count(|r| matches!(r, TestResult::Fail { .. }))
    }

    pub fn skipped(&self) -> usize {
        self.count(|r| matches!(r, TestResult::Skipped { .. }))
    }

    fn count(&self, pred: impl Fn(&TestResult) -> bool) -> usize {
        self.results.iter().filter(|r| pred(r)).count()
    }
}

// =============================================================================
// HARNESS
// =============================================================================

pub struct Harness<C, S> {
    config: HarnessConfig,
    compiler: C,
    store: S,
    normalizer: Normalizer,
    recorder: SnapshotRecorder,
}

impl<C: Compiler, S: SnapshotStore> Harness<C, S> {
    pub fn new(config: HarnessConfig, compiler: C, store: S) -> Self {
        let normalizer = Normalizer::new(&config.cwd, config.source_root.as_str());
        let recorder = SnapshotRecorder::new(config.regenerated_extension.as_str());
        Self {
            config,
            compiler,
            store,
            normalizer,
            recorder,
        }
    }

    pub fn config(&self) -> &HarnessConfig {
        &self.config
    }

    pub fn run(&self) -> HarnessResult<RunSummary> {
        let translators = TranslatorLocator::new(&self.config.packages_root).locate()?;
        let mut summary = RunSummary::default();
        for translator in &translators {
            self.run_translator(translator, &mut summary)?;
        }
        info!(
            passed = summary.passed(),
            failed = summary.failed(),
            skipped = summary.skipped(),
            "run finished"
        );
        Ok(summary)
    }

    fn run_translator(&self, translator: &Translator, summary: &mut RunSummary) -> HarnessResult<()> {
        let runner = ModeRunner::new(&self.compiler, &self.store, &self.normalizer, &self.recorder);

        for dir in translator.fixture_dirs()? {
            let fixture_name = dir
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            let id_for = |mode: Mode| TestId {
                translator: translator.name.clone(),
                fixture: fixture_name.clone(),
                mode,
            };

            let pending: Vec<Mode> = translator
                .modes()
                .iter()
                .copied()
                .filter(|&mode| {
                    match self
                        .config
                        .filter
                        .skip_reason(&translator.name, &fixture_name, mode)
                    {
                        Some(reason) => {
                            summary.results.push(TestResult::Skipped {
                                id: id_for(mode),
                                reason,
                            });
                            false
                        }
                        None => true,
                    }
                })
                .collect();
            if pending.is_empty() {
                continue;
            }

            let fixture = match Fixture::load(&dir, &self.config.template_file) {
                Ok(fixture) => fixture,
                Err(e) => {
                    let error = e.to_string();
                    summary
                        .results
                        .extend(pending.into_iter().map(|mode| TestResult::Fail {
                            id: id_for(mode),
                            error: error.clone(),
                        }));
                    continue;
                }
            };

            for mode in pending {
                debug!(
                    translator = %translator.name,
                    fixture = %fixture.name,
                    %mode,
                    "running"
                );
                let result = match runner.run(&fixture, mode) {
                    Ok(_) => TestResult::Pass { id: id_for(mode) },
                    Err(e) => TestResult::Fail {
                        id: id_for(mode),
                        error: e.to_string(),
                    },
                };
                summary.results.push(result);
            }
        }
        Ok(())
    }
}

// =============================================================================
// REPORTING
// =============================================================================

/// Prints every result and a summary line to stdout.
pub fn print_report(summary: &RunSummary, use_colors: bool) -> io::Result<()> {
    let choice = if use_colors {
        ColorChoice::Auto
    } else {
        ColorChoice::Never
    };
    let mut out = StandardStream::stdout(choice);
    write_report(&mut out, summary)
}

pub fn write_report<W: WriteColor>(out: &mut W, summary: &RunSummary) -> io::Result<()> {
    for result in &summary.results {
        let (label, color) = match result {
            TestResult::Pass { .. } => ("PASS", Color::Green),
            TestResult::Fail { .. } => ("FAIL", Color::Red),
            TestResult::Skipped { .. } => ("SKIP", Color::Yellow),
        };
        out.set_color(ColorSpec::new().set_fg(Some(color)).set_bold(true))?;
        write!(out, "{}", label)?;
        out.reset()?;
        writeln!(out, " {}", result.id())?;

        match result {
            TestResult::Fail { error, .. } => {
                for line in error.lines() {
                    writeln!(out, "    {}", line)?;
                }
            }
            TestResult::Skipped { reason, .. } => writeln!(out, "    {}", reason)?,
            TestResult::Pass { .. } => {}
        }
    }

    writeln!(out)?;
    writeln!(
        out,
        "{} passed, {} failed, {} skipped",
        summary.passed(),
        summary.failed(),
        summary.skipped()
    )
}
