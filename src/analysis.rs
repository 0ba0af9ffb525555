//! Analysis visitors.

use std::fmt;

use serde::Serialize;

use crate::ast::{
    BooleanExpression, DeleteStatement, Expression, FromSource, JoinType, Reference,
    SelectStatement, Statement, UpdateStatement,
};
use crate::visitor::{walk, Visitable, Visitor};

/// A `WHERE` condition on a `LEFT JOIN`ed source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Finding {
    pub line: usize,
    pub column: usize,
    /// Alias, or table name, of the joined source
    pub alias: String,
    /// The offending reference as written
    pub reference: String,
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "line {} char {}: `{}` in WHERE drops the unmatched rows of LEFT JOIN `{}`",
            self.line, self.column, self.reference, self.alias
        )
    }
}

/// Flags `WHERE` references to sources brought in by a `LEFT JOIN`.
///
/// Filtering on the outer side of a left join quietly turns it into an inner
/// join. `IS NULL` checks are not reported: `WHERE r.id IS NULL` is the usual
/// way to keep only the unmatched rows. References inside subqueries of the
/// `WHERE` clause are left to the check of the subquery itself.
///
/// # Example
/// ```
/// use tsqlc::analysis::check_left_joins;
/// use tsqlc::parser::parse;
///
/// let statements = parse(
///     "select o.id from orders o left join refunds r on r.order_id = o.id where r.amount > 0",
/// )
/// .unwrap();
/// let findings = check_left_joins(&statements);
/// assert_eq!(findings.len(), 1);
/// assert_eq!(findings[0].reference, "r.amount");
/// ```
#[derive(Debug, Default)]
pub struct LeftJoinFilterCheck {
    findings: Vec<Finding>,
}

impl LeftJoinFilterCheck {
    pub fn new() -> Self {
        LeftJoinFilterCheck::default()
    }

    pub fn findings(&self) -> &[Finding] {
        &self.findings
    }

    pub fn into_findings(self) -> Vec<Finding> {
        self.findings
    }

    fn check(&mut self, from: &[FromSource], where_clause: Option<&BooleanExpression>) {
        let Some(where_clause) = where_clause else {
            return;
        };
        let aliases = left_joined(from);
        if aliases.is_empty() {
            return;
        }

        let mut filters = FilterReferences::default();
        where_clause.accept(&mut filters);

        for reference in filters.references {
            let [qualifier, _, ..] = reference.parts.as_slice() else {
                continue;
            };
            if let Some(alias) = aliases
                .iter()
                .find(|alias| alias.eq_ignore_ascii_case(qualifier))
            {
                self.findings.push(Finding {
                    line: reference.origin.line(),
                    column: reference.origin.column(),
                    alias: alias.to_string(),
                    reference: reference.identifier(),
                });
            }
        }
    }
}

/// Names that qualify columns of `LEFT JOIN`ed sources.
fn left_joined(from: &[FromSource]) -> Vec<&str> {
    from.iter()
        .filter(|source| source.join() == JoinType::Left)
        .filter_map(|source| match source {
            FromSource::Reference(from) => {
                Some(from.alias.as_deref().unwrap_or(from.name.object_name()))
            }
            FromSource::Subquery(from) => from.alias.as_deref(),
        })
        .collect()
}

impl Visitor for LeftJoinFilterCheck {
    fn visit_select(&mut self, node: &SelectStatement) {
        self.check(&node.from, node.where_clause.as_ref());
    }

    fn visit_update(&mut self, node: &UpdateStatement) {
        self.check(&node.from, node.where_clause.as_ref());
    }

    fn visit_delete(&mut self, node: &DeleteStatement) {
        self.check(&node.from, node.where_clause.as_ref());
    }
}

/// References that take part in filtering, outside `IS NULL` and subqueries.
#[derive(Default)]
struct FilterReferences {
    references: Vec<Reference>,
}

impl Visitor for FilterReferences {
    fn visit_boolean(&mut self, node: &BooleanExpression) {
        match node {
            BooleanExpression::Not { inner, .. } | BooleanExpression::Grouped { inner, .. } => {
                inner.accept(self)
            }
            BooleanExpression::Exists { .. } => {}
            BooleanExpression::NullCheck { is_null: true, .. } => {}
            BooleanExpression::NullCheck { left, .. }
            | BooleanExpression::InSubquery { left, .. }
            | BooleanExpression::Range { left, .. } => left.accept(self),
            BooleanExpression::InList { left, list, .. } => {
                left.accept(self);
                for item in list {
                    item.accept(self);
                }
            }
            BooleanExpression::Between {
                left, low, high, ..
            } => {
                left.accept(self);
                low.accept(self);
                high.accept(self);
            }
            BooleanExpression::Comparison { left, right, .. } => {
                left.accept(self);
                right.accept(self);
            }
            BooleanExpression::Binary { left, right, .. } => {
                left.accept(self);
                right.accept(self);
            }
        }
    }

    fn visit_expression(&mut self, node: &Expression) {
        match node {
            Expression::Unary { operand, .. } => operand.accept(self),
            Expression::Grouped { inner, .. } => inner.accept(self),
            Expression::Null { .. } | Expression::Constant { .. } | Expression::Subquery { .. } => {}
            Expression::Reference(reference) => self.references.push(reference.clone()),
            Expression::FunctionCall { arguments, .. } => {
                for argument in arguments {
                    argument.accept(self);
                }
            }
            Expression::Binary { left, right, .. } => {
                left.accept(self);
                right.accept(self);
            }
        }
    }
}

/// Run [`LeftJoinFilterCheck`] over `statements`, subqueries included.
pub fn check_left_joins(statements: &[Statement]) -> Vec<Finding> {
    walk(statements, LeftJoinFilterCheck::new()).into_findings()
}
