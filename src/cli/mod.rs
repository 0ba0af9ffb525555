//! CLI support for tsqlc
//!
//! Each subcommand is a plain function from SQL text to rendered output, so
//! the driver in `main.rs` only deals with arguments, input and printing.

mod analyze;
mod check;
mod format;

pub use analyze::{execute_lint, execute_search, LintOptions, SearchOptions};
pub use check::{execute_check, execute_tokens, CheckReport};
pub use format::{execute_format, FormatOptions};

use std::io;
use std::time::Instant;

use thiserror::Error;

/// Errors that can occur during CLI operations
#[derive(Debug, Error)]
pub enum CliError {
    #[error("{0}")]
    Sql(#[from] crate::tsql::Error),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error("No input provided. Use --input or pipe SQL to stdin.")]
    NoInput,
}

impl From<crate::LexError> for CliError {
    fn from(e: crate::LexError) -> Self {
        CliError::Sql(e.into())
    }
}

impl From<crate::ParseError> for CliError {
    fn from(e: crate::ParseError) -> Self {
        CliError::Sql(e.into())
    }
}

/// Run one phase of a command inside a debug span, logging how long it took.
fn timed<T>(phase: &'static str, run: impl FnOnce() -> T) -> T {
    let _span = tracing::debug_span!("phase", name = phase).entered();
    let start = Instant::now();
    let result = run();
    tracing::debug!(elapsed_us = start.elapsed().as_micros() as u64, "{phase} done");
    result
}

fn parse(source: &str) -> Result<Vec<crate::Statement>, CliError> {
    let statements = timed("parse", || crate::parse(source))?;
    tracing::debug!(statements = statements.len(), "parsed");
    Ok(statements)
}
