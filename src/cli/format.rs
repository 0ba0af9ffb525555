//! Re-format SQL, optionally qualifying table names

use super::{parse, timed, CliError};
use crate::transform::qualify_tables;
use crate::writer::to_sql;

/// Options for the format command
#[derive(Debug, Clone, Default)]
pub struct FormatOptions {
    /// Schema to prefix one-part table names with
    pub qualify: Option<String>,
}

pub fn execute_format(source: &str, options: &FormatOptions) -> Result<String, CliError> {
    let mut statements = parse(source)?;
    if let Some(schema) = &options.qualify {
        let qualified = timed("qualify", || qualify_tables(&mut statements, schema));
        tracing::info!(schema = %schema, qualified, "qualified table names");
    }
    Ok(timed("write", || to_sql(&statements)))
}
