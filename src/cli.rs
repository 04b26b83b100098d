//! The `snapshot_runner` command-line interface.
//!
//! This module defines the arguments with `clap`'s derive API and dispatches
//! to the harness.

use std::ffi::OsString;
use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use miette::Report;
use tracing_subscriber::EnvFilter;

use crate::compiler::CommandCompiler;
use crate::config::{HarnessConfig, RunFilter};
use crate::discovery::TranslatorLocator;
use crate::harness::{print_report, Harness};
use crate::mode::Mode;
use crate::snapshot::FsSnapshotStore;
use crate::HarnessResult;

// ============================================================================
// CLI ARGUMENTS
// ============================================================================

#[derive(Debug, Parser)]
#[command(
    name = "snapshot_runner",
    version,
    about = "Snapshot regression harness for translator fixtures."
)]
pub struct SnapshotArgs {
    #[command(subcommand)]
    pub command: ArgsCommand,
}

#[derive(Debug, Subcommand)]
pub enum ArgsCommand {
    /// Compile every fixture in every mode and check the snapshots.
    Run {
        /// Directory containing the `translator-*` packages.
        #[arg(long, default_value = "packages")]
        packages: PathBuf,
        /// Only run translators whose name contains this substring.
        #[arg(long)]
        translator: Option<String>,
        /// Only run fixtures whose name contains this substring.
        #[arg(long)]
        fixture: Option<String>,
        /// Only run modes whose name contains this substring.
        #[arg(long)]
        mode: Option<String>,
        /// Rewrite differing snapshots instead of failing.
        #[arg(long)]
        update: bool,
        /// Compiler executable; receives the entry file as its last argument.
        #[arg(long, required = true)]
        compiler: OsString,
        /// Extra arguments passed to the compiler before the entry file.
        #[arg(last = true)]
        compiler_args: Vec<OsString>,
    },
    /// List translators and their fixtures.
    List {
        /// Directory containing the `translator-*` packages.
        #[arg(long, default_value = "packages")]
        packages: PathBuf,
    },
    /// Print the mode table.
    Modes,
}

// ============================================================================
// MAIN ENTRY POINT
// ============================================================================

pub fn run() {
    init_tracing();
    let args = SnapshotArgs::parse();

    let code = match dispatch(args.command) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{:?}", Report::new(e));
            1
        }
    };
    process::exit(code);
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn dispatch(command: ArgsCommand) -> HarnessResult<i32> {
    match command {
        ArgsCommand::Run {
            packages,
            translator,
            fixture,
            mode,
            update,
            compiler,
            compiler_args,
        } => {
            let mut config = HarnessConfig::from_env()?;
            config.packages_root = packages;
            config.update_snapshots |= update;
            config.filter = RunFilter {
                translator,
                fixture,
                mode,
            };

            let compiler = CommandCompiler::new(compiler).with_args(compiler_args);
            let store = FsSnapshotStore::new(config.update_snapshots);
            let harness = Harness::new(config, compiler, store);
            let summary = harness.run()?;

            if let Err(e) = print_report(&summary, harness.config().use_colors) {
                eprintln!("failed to print report: {}", e);
            }
            Ok(if summary.failed() > 0 { 1 } else { 0 })
        }
        ArgsCommand::List { packages } => {
            for translator in TranslatorLocator::new(packages).locate()? {
                println!("{} ({})", translator.name, translator.fixture_root.display());
                for dir in translator.fixture_dirs()? {
                    if let Some(name) = dir.file_name() {
                        println!("  {}", name.to_string_lossy());
                    }
                }
            }
            Ok(0)
        }
        ArgsCommand::Modes => {
            for mode in Mode::ALL {
                let settings = mode.settings();
                println!(
                    "{:<16} output={:<8} modules={:<8} optimize={:<5} resolver={}",
                    mode.name(),
                    format!("{:?}", settings.output).to_lowercase(),
                    settings
                        .modules
                        .map_or("default".to_string(), |m| format!("{:?}", m).to_lowercase()),
                    settings.optimize,
                    settings
                        .resolver
                        .map_or("none".to_string(), |r| format!("{:?}", r)),
                );
            }
            Ok(0)
        }
    }
}
