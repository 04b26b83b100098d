//! Snapshot regression harness for a template compiler.
//!
//! The harness discovers `translator-<name>` packages, and for every fixture
//! under each translator compiles the fixture's template once per [`Mode`].
//! The outcome (generated code, diagnostics, or a normalized failure trace)
//! is checked against snapshot files stored next to the fixture.

pub use crate::errors::{HarnessError, HarnessResult};
pub use crate::mode::Mode;

pub mod cli;
pub mod compiler;
pub mod config;
pub mod diagnostics;
pub mod discovery;
pub mod errors;
pub mod fixture;
pub mod harness;
pub mod mode;
pub mod normalize;
pub mod runner;
pub mod snapshot;
