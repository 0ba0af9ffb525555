//! Lint and table search commands

use super::{parse, timed, CliError};
use crate::analysis::check_left_joins;
use crate::search::{find_tables, SearchQuery, TablePattern, UsageContext};

/// Options for the lint command
#[derive(Debug, Clone, Default)]
pub struct LintOptions {
    pub json: bool,
}

/// Options for the search command
#[derive(Debug, Clone, Default)]
pub struct SearchOptions {
    /// Table name, or a regular expression when `regex` is set
    pub table: String,
    pub regex: bool,
    /// Restrict hits to these contexts; empty means all
    pub contexts: Vec<UsageContext>,
    pub json: bool,
}

/// Report `WHERE` filters on `LEFT JOIN`ed sources, one per line or as JSON.
pub fn execute_lint(source: &str, options: &LintOptions) -> Result<String, CliError> {
    let statements = parse(source)?;
    let findings = timed("lint", || check_left_joins(&statements));
    tracing::debug!(findings = findings.len(), "lint finished");

    if options.json {
        return Ok(serde_json::to_string_pretty(&findings)?);
    }
    Ok(findings
        .iter()
        .map(|finding| format!("{finding}\n"))
        .collect())
}

/// List the statements using a table, one hit per line or as JSON.
pub fn execute_search(source: &str, options: &SearchOptions) -> Result<String, CliError> {
    let pattern = if options.regex {
        TablePattern::regex(&options.table)?
    } else {
        TablePattern::name(&options.table)
    };
    let query = SearchQuery::new(pattern).with_contexts(options.contexts.clone());

    let statements = parse(source)?;
    let hits = timed("search", || find_tables(&statements, query));

    if options.json {
        return Ok(serde_json::to_string_pretty(&hits)?);
    }
    Ok(hits.iter().map(|hit| format!("{hit}\n")).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_filters_by_context() {
        let source = "update t set a = 1 from t join u on u.id = t.id; select * from u";
        let options = SearchOptions {
            table: "u".into(),
            contexts: vec![UsageContext::Select],
            ..Default::default()
        };
        assert_eq!(execute_search(source, &options).unwrap(), "1:64 SELECT u\n");
    }

    #[test]
    fn test_bad_regex_is_reported() {
        let options = SearchOptions {
            table: "(".into(),
            regex: true,
            ..Default::default()
        };
        assert!(matches!(
            execute_search("select 1", &options),
            Err(CliError::Pattern(_))
        ));
    }

    #[test]
    fn test_lint_json() {
        let source = "select 1 from a left join b on b.id = a.id where b.x = 1";
        let out = execute_lint(source, &LintOptions { json: true }).unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value[0]["reference"], "b.x");
        assert_eq!(value[0]["alias"], "b");
    }
}
