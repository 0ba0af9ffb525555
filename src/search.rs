//! Table usage search.
//!
//! Finds the places statements read or write a given table, and how: plain
//! `SELECT`, a `SELECT` feeding an `INSERT`/`UPDATE`/`DELETE`, or the target of
//! one of those.

use std::fmt;

use regex::Regex;
use serde::Serialize;

use crate::ast::{FromSource, Reference, ReferenceFrom, Statement};
use crate::visitor::{TreeVisitor, Visitable, Visitor};

/// How a statement uses a table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "kebab-case")]
pub enum UsageContext {
    Select,
    SelectInInsert,
    SelectInUpdate,
    SelectInDelete,
    Insert,
    Update,
    Delete,
}

impl UsageContext {
    pub fn as_str(self) -> &'static str {
        match self {
            UsageContext::Select => "SELECT",
            UsageContext::SelectInInsert => "SELECT-IN-INSERT",
            UsageContext::SelectInUpdate => "SELECT-IN-UPDATE",
            UsageContext::SelectInDelete => "SELECT-IN-DELETE",
            UsageContext::Insert => "INSERT",
            UsageContext::Update => "UPDATE",
            UsageContext::Delete => "DELETE",
        }
    }
}

impl fmt::Display for UsageContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What to look for.
#[derive(Debug, Clone)]
pub enum TablePattern {
    /// A table name, compared part by part. Case, brackets and the `dbo`
    /// schema are ignored, so `t`, `dbo.t` and `[DBO].[T]` all match.
    Name(Vec<String>),
    /// A regular expression matched against the dotted name as written.
    Regex(Regex),
}

impl TablePattern {
    pub fn name(name: &str) -> Self {
        TablePattern::Name(normalize(&Reference::parse_dotted(name)))
    }

    pub fn regex(pattern: &str) -> Result<Self, regex::Error> {
        Ok(TablePattern::Regex(Regex::new(pattern)?))
    }

    pub fn matches(&self, reference: &Reference) -> bool {
        match self {
            TablePattern::Name(parts) => normalize(reference) == *parts,
            TablePattern::Regex(regex) => regex.is_match(&reference.identifier()),
        }
    }
}

/// Comparable form of a table name: delimiters stripped, lowercased, with a
/// `dbo` or empty schema part removed.
fn normalize(reference: &Reference) -> Vec<String> {
    let mut parts: Vec<String> = reference
        .parts
        .iter()
        .map(|part| {
            part.trim_start_matches(['[', '"'])
                .trim_end_matches([']', '"'])
                .to_ascii_lowercase()
        })
        .collect();
    if parts.len() >= 2 {
        let schema = parts.len() - 2;
        if parts[schema].is_empty() || parts[schema] == "dbo" {
            parts.remove(schema);
        }
    }
    parts
}

#[derive(Debug, Clone)]
pub struct SearchQuery {
    pub pattern: TablePattern,
    /// Contexts to report; empty reports all of them.
    pub contexts: Vec<UsageContext>,
}

impl SearchQuery {
    pub fn new(pattern: TablePattern) -> Self {
        SearchQuery {
            pattern,
            contexts: Vec::new(),
        }
    }

    pub fn with_contexts(mut self, contexts: Vec<UsageContext>) -> Self {
        self.contexts = contexts;
        self
    }

    fn wants(&self, context: UsageContext) -> bool {
        self.contexts.is_empty() || self.contexts.contains(&context)
    }
}

/// One use of a matching table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Hit {
    pub context: UsageContext,
    pub table: String,
    pub line: usize,
    pub column: usize,
}

impl fmt::Display for Hit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{} {} {}",
            self.line, self.column, self.context, self.table
        )
    }
}

/// Every `FROM` entry under a node, nested subqueries included.
#[derive(Default)]
struct Sources(Vec<ReferenceFrom>);

impl Visitor for Sources {
    fn visit_reference_from(&mut self, node: &ReferenceFrom) {
        self.0.push(node.clone());
    }
}

fn sources_of<T: Visitable>(node: &T) -> Vec<ReferenceFrom> {
    let mut tree = TreeVisitor::new(Sources::default());
    node.accept(&mut tree);
    tree.into_inner().map(|sources| sources.0).unwrap_or_default()
}

/// Runs a [`SearchQuery`] over statements.
///
/// # Example
/// ```
/// use tsqlc::parser::parse;
/// use tsqlc::search::{SearchQuery, TablePattern, TableSearch, UsageContext};
///
/// let statements = parse("insert into dbo.audit select * from [dbo].[orders]").unwrap();
/// let mut search = TableSearch::new(SearchQuery::new(TablePattern::name("orders")));
/// search.search(&statements);
/// assert_eq!(search.hits()[0].context, UsageContext::SelectInInsert);
/// ```
#[derive(Debug)]
pub struct TableSearch {
    query: SearchQuery,
    hits: Vec<Hit>,
}

impl TableSearch {
    pub fn new(query: SearchQuery) -> Self {
        TableSearch {
            query,
            hits: Vec::new(),
        }
    }

    pub fn hits(&self) -> &[Hit] {
        &self.hits
    }

    pub fn into_hits(self) -> Vec<Hit> {
        self.hits
    }

    pub fn search(&mut self, statements: &[Statement]) {
        for statement in statements {
            self.statement(statement);
        }
    }

    fn statement(&mut self, statement: &Statement) {
        match statement {
            Statement::Select(select) => {
                self.sources(&sources_of(select), UsageContext::Select, None);
            }
            Statement::ValuesInsert(insert) => {
                self.record(&insert.target, UsageContext::Insert);
                for row in &insert.rows {
                    self.sources(&sources_of(row), UsageContext::SelectInInsert, None);
                }
            }
            Statement::SelectInsert(insert) => {
                self.record(&insert.target, UsageContext::Insert);
                self.sources(
                    &sources_of(&insert.select),
                    UsageContext::SelectInInsert,
                    None,
                );
            }
            Statement::Update(update) => {
                let target = self.target(&update.target, &update.from, UsageContext::Update);
                let mut sources: Vec<_> = update.from.iter().flat_map(sources_of).collect();
                sources.extend(update.set.iter().flat_map(sources_of));
                if let Some(where_clause) = &update.where_clause {
                    sources.extend(sources_of(where_clause));
                }
                self.sources(&sources, UsageContext::SelectInUpdate, target);
            }
            Statement::Delete(delete) => {
                let target = self.target(&delete.target, &delete.from, UsageContext::Delete);
                let mut sources: Vec<_> = delete.from.iter().flat_map(sources_of).collect();
                if let Some(where_clause) = &delete.where_clause {
                    sources.extend(sources_of(where_clause));
                }
                self.sources(&sources, UsageContext::SelectInDelete, target);
            }
            Statement::If(node) => {
                self.sources(&sources_of(&node.test), UsageContext::Select, None);
                self.statement(&node.then_branch);
                if let Some(else_branch) = &node.else_branch {
                    self.statement(else_branch);
                }
            }
            Statement::While(node) => {
                self.sources(&sources_of(&node.test), UsageContext::Select, None);
                self.statement(&node.body);
            }
            Statement::Block(block) => self.search(&block.body),
            Statement::Empty(_) => {}
        }
    }

    /// Record a DML target directly, or hand back the alias it resolves
    /// through when it names an entry of its own `FROM` list.
    fn target(
        &mut self,
        target: &Reference,
        from: &[FromSource],
        context: UsageContext,
    ) -> Option<(String, UsageContext)> {
        let name = target.object_name();
        let resolves = target.is_single_part()
            && from.iter().any(|source| match source {
                FromSource::Reference(from) => from
                    .alias
                    .as_deref()
                    .unwrap_or(from.name.object_name())
                    .eq_ignore_ascii_case(name),
                FromSource::Subquery(from) => from
                    .alias
                    .as_deref()
                    .is_some_and(|alias| alias.eq_ignore_ascii_case(name)),
            });
        if resolves {
            Some((name.to_string(), context))
        } else {
            self.record(target, context);
            None
        }
    }

    fn sources(
        &mut self,
        sources: &[ReferenceFrom],
        context: UsageContext,
        target: Option<(String, UsageContext)>,
    ) {
        for source in sources {
            let visible = source.alias.as_deref().unwrap_or(source.name.object_name());
            let context = match &target {
                Some((alias, target)) if alias.eq_ignore_ascii_case(visible) => *target,
                _ => context,
            };
            self.record(&source.name, context);
        }
    }

    fn record(&mut self, reference: &Reference, context: UsageContext) {
        if self.query.wants(context) && self.query.pattern.matches(reference) {
            self.hits.push(Hit {
                context,
                table: reference.identifier(),
                line: reference.origin.line(),
                column: reference.origin.column(),
            });
        }
    }
}

/// Search `statements` for uses of the tables `query` describes.
pub fn find_tables(statements: &[Statement], query: SearchQuery) -> Vec<Hit> {
    let mut search = TableSearch::new(query);
    search.search(statements);
    search.into_hits()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_ignore_dbo_and_brackets() {
        let pattern = TablePattern::name("dbo.Orders");
        assert!(pattern.matches(&Reference::parse_dotted("orders")));
        assert!(pattern.matches(&Reference::parse_dotted("[dbo].[orders]")));
        assert!(!pattern.matches(&Reference::parse_dotted("sales.orders")));
    }

    #[test]
    fn test_empty_schema_is_default() {
        let pattern = TablePattern::name("shop.dbo.orders");
        assert!(pattern.matches(&Reference::parse_dotted("shop..orders")));
    }
}
