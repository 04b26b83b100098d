//! Out-of-process compiler adapter.
//!
//! Runs `<program> <args..> <entry>` and blocks until it exits. The merged
//! [`CompilerConfig`] is written to the child's stdin as JSON. On success the
//! child prints a [`CompileOutput`] JSON document on stdout; on failure it
//! exits non-zero and its stderr is the error trace.

use std::ffi::OsString;
use std::io::Write;
use std::path::Path;
use std::process::{Command, Stdio};

use tracing::debug;

use super::{CompileFailure, CompileOutput, Compiler, CompilerConfig};

#[derive(Debug, Clone)]
pub struct CommandCompiler {
    program: OsString,
    args: Vec<OsString>,
}

impl CommandCompiler {
    pub fn new(program: impl Into<OsString>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    fn request(config: &CompilerConfig) -> Result<Vec<u8>, CompileFailure> {
        serde_json::to_vec(config)
            .map_err(|e| CompileFailure::new(format!("failed to encode compiler config: {}", e)))
    }
}

impl Compiler for CommandCompiler {
    fn compile_file(
        &self,
        entry: &Path,
        config: &CompilerConfig,
    ) -> Result<CompileOutput, CompileFailure> {
        let request = Self::request(config)?;
        debug!(program = ?self.program, entry = %entry.display(), "spawning compiler");

        let mut child = Command::new(&self.program)
            .args(&self.args)
            .arg(entry)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| {
                CompileFailure::new(format!(
                    "failed to start compiler {}: {}",
                    Path::new(&self.program).display(),
                    e
                ))
            })?;

        if let Some(mut stdin) = child.stdin.take() {
            // A compiler that ignores its config may exit before reading it.
            if let Err(e) = stdin.write_all(&request) {
                debug!(error = %e, "compiler did not read its config");
            }
        }

        let output = child
            .wait_with_output()
            .map_err(|e| CompileFailure::new(format!("failed to wait for compiler: {}", e)))?;

        if !output.status.success() {
            let trace = String::from_utf8_lossy(&output.stderr).into_owned();
            return Err(CompileFailure::new(trace));
        }

        serde_json::from_slice(&output.stdout).map_err(|e| {
            CompileFailure::new(format!(
                "compiler produced an unreadable result: {}\n{}",
                e,
                String::from_utf8_lossy(&output.stdout)
            ))
        })
    }
}
