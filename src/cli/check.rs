//! Token dumps and syntax checks

use serde::Serialize;

use super::{parse, timed, CliError};
use crate::tokenize;

/// Outcome of a successful check
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckReport {
    pub tokens: usize,
    pub statements: usize,
}

/// Dump every token of `source`, one per line.
pub fn execute_tokens(source: &str) -> Result<String, CliError> {
    let tokens = timed("lex", || tokenize(source))?;
    let mut out = String::new();
    for token in &tokens {
        out.push_str(&token.to_string());
        out.push('\n');
    }
    Ok(out)
}

/// Lex and parse `source`, failing with the first error found.
pub fn execute_check(source: &str) -> Result<CheckReport, CliError> {
    let tokens = timed("lex", || tokenize(source))?.len();
    let statements = parse(source)?.len();
    Ok(CheckReport { tokens, statements })
}
