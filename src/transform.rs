//! Rewriting visitors.
//!
//! Rewrites happen in place through [`VisitorMut`]: walk the statements with
//! [`walk_mut`] and the nodes the rewriter touched are changed when the walk
//! returns.

use crate::ast::{
    DeleteStatement, FromSource, Reference, ReferenceFrom, SelectInsertStatement, Statement,
    UpdateStatement, ValuesInsertStatement,
};
use crate::visitor::{walk_mut, VisitorMut};

/// Prefixes one-part table names with a default schema.
///
/// `FROM orders` becomes `FROM dbo.orders`. Variables (`@t`) and temporary
/// tables (`#t`) are left alone, as are `UPDATE`/`DELETE` targets that name a
/// table or alias of their own `FROM` list, since those resolve through it.
///
/// # Example
/// ```
/// use tsqlc::parser::parse;
/// use tsqlc::transform::qualify_tables;
/// use tsqlc::writer::to_sql;
///
/// let mut statements = parse("delete x from orders x where x.id = 1").unwrap();
/// assert_eq!(qualify_tables(&mut statements, "dbo"), 1);
/// assert!(to_sql(&statements).contains("FROM    dbo.orders AS x"));
/// ```
#[derive(Debug, Clone)]
pub struct SchemaQualifier {
    schema: String,
    qualified: usize,
}

impl SchemaQualifier {
    pub fn new(schema: impl Into<String>) -> Self {
        SchemaQualifier {
            schema: schema.into(),
            qualified: 0,
        }
    }

    pub fn schema(&self) -> &str {
        &self.schema
    }

    /// Number of references rewritten so far.
    pub fn qualified(&self) -> usize {
        self.qualified
    }

    fn qualify(&mut self, reference: &mut Reference) {
        if needs_schema(reference) {
            reference.parts.insert(0, self.schema.clone());
            self.qualified += 1;
        }
    }

    /// Qualify a DML target unless it resolves through the `FROM` list.
    fn qualify_target(&mut self, target: &mut Reference, from: &[FromSource]) {
        if !names_source(from, target.object_name()) {
            self.qualify(target);
        }
    }
}

fn needs_schema(reference: &Reference) -> bool {
    match reference.parts.as_slice() {
        [name] => !name.is_empty() && !name.starts_with(['@', '#']),
        _ => false,
    }
}

/// Whether `name` is the alias, or the unaliased table name, of a `FROM` entry.
fn names_source(from: &[FromSource], name: &str) -> bool {
    from.iter().any(|source| match source {
        FromSource::Reference(from) => match &from.alias {
            Some(alias) => alias.eq_ignore_ascii_case(name),
            None => from.name.object_name().eq_ignore_ascii_case(name),
        },
        FromSource::Subquery(from) => from
            .alias
            .as_deref()
            .is_some_and(|alias| alias.eq_ignore_ascii_case(name)),
    })
}

impl VisitorMut for SchemaQualifier {
    fn visit_reference_from_mut(&mut self, node: &mut ReferenceFrom) {
        self.qualify(&mut node.name);
    }

    // targets are checked before the walk reaches, and qualifies, the FROM list
    fn visit_update_mut(&mut self, node: &mut UpdateStatement) {
        self.qualify_target(&mut node.target, &node.from);
    }

    fn visit_delete_mut(&mut self, node: &mut DeleteStatement) {
        self.qualify_target(&mut node.target, &node.from);
    }

    fn visit_values_insert_mut(&mut self, node: &mut ValuesInsertStatement) {
        self.qualify(&mut node.target);
    }

    fn visit_select_insert_mut(&mut self, node: &mut SelectInsertStatement) {
        self.qualify(&mut node.target);
    }
}

/// Qualify every one-part table name in `statements` with `schema`, returning
/// how many references were rewritten.
pub fn qualify_tables(statements: &mut [Statement], schema: &str) -> usize {
    walk_mut(statements, SchemaQualifier::new(schema)).qualified()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;

    fn first_from(statement: &Statement) -> &ReferenceFrom {
        let from = match statement {
            Statement::Select(select) => &select.from,
            Statement::Update(update) => &update.from,
            Statement::Delete(delete) => &delete.from,
            _ => panic!("statement has no FROM list"),
        };
        match &from[0] {
            FromSource::Reference(from) => from,
            FromSource::Subquery(_) => panic!("expected a table reference"),
        }
    }

    #[test]
    fn test_variables_and_temp_tables_are_skipped() {
        let mut statements = parse("select 1 from @t; select 1 from #tmp").unwrap();
        assert_eq!(qualify_tables(&mut statements, "dbo"), 0);
        assert_eq!(first_from(&statements[0]).name.identifier(), "@t");
    }

    #[test]
    fn test_update_target_resolved_through_alias() {
        let mut statements = parse("update o set total = 0 from orders o").unwrap();
        assert_eq!(qualify_tables(&mut statements, "sales"), 1);
        let Statement::Update(update) = &statements[0] else {
            panic!("expected update");
        };
        assert_eq!(update.target.identifier(), "o");
        assert_eq!(first_from(&statements[0]).name.identifier(), "sales.orders");
    }
}
