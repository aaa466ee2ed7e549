//! Tooling & Integration Layer
//!
//! CLI parsing, mode dispatch, and text rendering of run summaries.

pub mod cli;
pub mod format;

pub use cli::{Cli, CliContext, Mode};
