//! SQL serializer.
//!
//! [`SqlWriter`] renders statements back to text in a fixed layout: clause
//! keywords padded to eight columns, one list entry per line with leading
//! commas, nested constructs indented by two. Output re-parses to a tree equal
//! to the one written.

use std::io;

use crate::ast::{
    BlockStatement, BooleanExpression, Column, Constant, DeleteStatement, EmptyStatement,
    Expression, FromSource, IfStatement, Reference, ReferenceFrom, SelectInsertStatement,
    SelectStatement, Statement, SubqueryFrom, TableHint, UnaryOperator, UpdateStatement,
    ValuesInsertStatement, ValuesRow, WhileStatement,
};
use crate::visitor::{Visitable, Visitor};

const CLAUSE_WIDTH: usize = 8;

#[derive(Debug, Default)]
pub struct SqlWriter {
    out: String,
    indent: usize,
    dirty: bool,
}

impl SqlWriter {
    pub fn new() -> Self {
        SqlWriter::default()
    }

    /// Write one top-level statement followed by a blank line.
    pub fn append(&mut self, statement: &Statement) {
        statement.accept(self);
        self.newline();
        self.newline();
    }

    pub fn append_all(&mut self, statements: &[Statement]) {
        for statement in statements {
            self.append(statement);
        }
    }

    pub fn as_str(&self) -> &str {
        &self.out
    }

    pub fn into_string(self) -> String {
        self.out
    }

    // ------------------------------------------------------------------
    // Layout primitives
    // ------------------------------------------------------------------

    fn write(&mut self, text: &str) {
        if !self.dirty {
            self.dirty = true;
            self.out.extend(std::iter::repeat_n(' ', self.indent));
        }
        self.out.push_str(text);
    }

    fn newline(&mut self) {
        self.out.push('\n');
        self.dirty = false;
    }

    /// Run `body` with the indent raised by `by`, restoring it afterwards.
    fn indented(&mut self, by: usize, body: impl FnOnce(&mut Self)) {
        self.indent += by;
        body(self);
        self.indent -= by;
    }

    fn separated<T>(
        &mut self,
        items: &[T],
        mut each: impl FnMut(&mut Self, &T),
        mut between: impl FnMut(&mut Self),
    ) {
        for (i, item) in items.iter().enumerate() {
            if i > 0 {
                between(self);
            }
            each(self, item);
        }
    }

    /// One entry per line, each after the first led by a comma.
    fn comma_lines<T: Visitable>(&mut self, items: &[T]) {
        self.separated(
            items,
            |w, item| item.accept(w),
            |w| {
                w.newline();
                w.write(",");
            },
        );
    }

    fn clause(&mut self, keyword: &str) {
        self.write(&format!("{keyword:<CLAUSE_WIDTH$}"));
    }

    fn terminator(&mut self, terminated: bool) {
        if terminated {
            self.write(";");
        }
    }

    /// `TOP n` on its own line.
    fn top(&mut self, top: Option<&Expression>) {
        if let Some(top) = top {
            self.write("TOP ");
            top.accept(self);
            self.newline();
        }
    }

    fn from_list(&mut self, from: &[FromSource]) {
        if from.is_empty() {
            return;
        }
        self.newline();
        self.clause("FROM");
        self.indented(CLAUSE_WIDTH, |w| {
            w.separated(from, |w, source| source.accept(w), |w| w.newline());
        });
    }

    fn where_clause(&mut self, where_clause: Option<&BooleanExpression>) {
        if let Some(where_clause) = where_clause {
            self.newline();
            self.clause("WHERE");
            self.indented(CLAUSE_WIDTH, |w| where_clause.accept(w));
        }
    }

    fn on_clause(&mut self, on: Option<&BooleanExpression>) {
        if let Some(on) = on {
            self.indented(2, |w| {
                w.newline();
                w.write("ON ");
                w.indented(2, |w| on.accept(w));
            });
        }
    }

    fn alias(&mut self, alias: Option<&str>) {
        if let Some(alias) = alias {
            self.write(" AS ");
            self.write(alias);
        }
    }

    fn hints(&mut self, hints: &[TableHint]) {
        if hints.is_empty() {
            return;
        }
        let names: Vec<&str> = hints.iter().map(|hint| hint.as_str()).collect();
        self.write(&format!(" WITH ({})", names.join(", ")));
    }

    /// Parenthesized subquery on its own indented lines.
    fn subquery(&mut self, select: &SelectStatement) {
        self.write("(");
        self.newline();
        self.indented(2, |w| select.accept(w));
        self.newline();
        self.write(")");
    }

    fn insert_head(&mut self, top: Option<&Expression>, target: &Reference, hints: &[TableHint]) {
        self.clause("INSERT");
        self.top(top);
        self.indented(CLAUSE_WIDTH, |w| target.accept(w));
        self.hints(hints);
    }

    fn column_spec(&mut self, columns: &[Reference]) {
        if columns.is_empty() {
            return;
        }
        self.indented(CLAUSE_WIDTH, |w| {
            w.write(" (");
            w.newline();
            w.indented(2, |w| w.comma_lines(columns));
            w.newline();
            w.write(")");
        });
    }

    /// `IF`/`ELSE` bodies are indented unless they are blocks.
    fn body(&mut self, statement: &Statement) {
        if matches!(statement, Statement::Block(_)) {
            statement.accept(self);
        } else {
            self.indented(2, |w| statement.accept(w));
        }
    }

    fn constant(&mut self, value: &Constant) {
        let text = match value {
            Constant::Int(v) => v.to_string(),
            Constant::BigInt(v) => v.to_string(),
            Constant::Numeric(v) => v.to_string(),
            // exponent form keeps the literal a real on re-reading
            Constant::Real(v) => format!("{v:e}"),
            Constant::Varchar(text) => quote(text),
            Constant::NVarchar(text) => format!("N{}", quote(text)),
        };
        self.write(&text);
    }
}

fn quote(text: &str) -> String {
    format!("'{}'", text.replace('\'', "''"))
}

impl Visitor for SqlWriter {
    fn visit_select(&mut self, node: &SelectStatement) {
        self.clause("SELECT");
        self.top(node.top.as_ref());
        self.indented(CLAUSE_WIDTH, |w| w.comma_lines(&node.columns));
        self.from_list(&node.from);
        self.where_clause(node.where_clause.as_ref());
        self.terminator(node.has_terminator);
    }

    fn visit_values_insert(&mut self, node: &ValuesInsertStatement) {
        self.insert_head(node.top.as_ref(), &node.target, &node.hints);
        self.column_spec(&node.columns);
        self.newline();
        self.clause("VALUES");
        self.indented(CLAUSE_WIDTH, |w| w.comma_lines(&node.rows));
        self.terminator(node.has_terminator);
    }

    fn visit_select_insert(&mut self, node: &SelectInsertStatement) {
        self.insert_head(node.top.as_ref(), &node.target, &node.hints);
        self.column_spec(&node.columns);
        self.newline();
        node.select.accept(self);
        self.terminator(node.has_terminator);
    }

    fn visit_update(&mut self, node: &UpdateStatement) {
        self.clause("UPDATE");
        self.top(node.top.as_ref());
        self.indented(CLAUSE_WIDTH, |w| node.target.accept(w));
        self.newline();
        self.clause("SET");
        self.indented(CLAUSE_WIDTH, |w| w.comma_lines(&node.set));
        self.from_list(&node.from);
        self.where_clause(node.where_clause.as_ref());
        self.terminator(node.has_terminator);
    }

    fn visit_delete(&mut self, node: &DeleteStatement) {
        self.clause("DELETE");
        self.top(node.top.as_ref());
        self.indented(CLAUSE_WIDTH, |w| node.target.accept(w));
        self.from_list(&node.from);
        self.where_clause(node.where_clause.as_ref());
        self.terminator(node.has_terminator);
    }

    fn visit_if(&mut self, node: &IfStatement) {
        self.write("IF ");
        node.test.accept(self);
        self.newline();
        self.body(&node.then_branch);
        if let Some(else_branch) = &node.else_branch {
            self.newline();
            self.write("ELSE");
            self.newline();
            self.body(else_branch);
        }
    }

    fn visit_while(&mut self, node: &WhileStatement) {
        self.write("WHILE ");
        node.test.accept(self);
        self.indented(2, |w| {
            w.newline();
            node.body.accept(w);
        });
    }

    fn visit_block(&mut self, node: &BlockStatement) {
        self.write("BEGIN");
        self.newline();
        self.indented(2, |w| {
            w.separated(
                &node.body,
                |w, statement| statement.accept(w),
                |w| {
                    w.newline();
                    w.newline();
                },
            );
        });
        self.newline();
        self.write("END");
    }

    fn visit_empty(&mut self, _node: &EmptyStatement) {
        self.write(";");
    }

    fn visit_expression(&mut self, node: &Expression) {
        match node {
            Expression::Unary {
                operator, operand, ..
            } => {
                self.write(operator.symbol());
                // `- -x`, never the comment opener `--x`
                if matches!(**operand, Expression::Unary { .. })
                    && *operator != UnaryOperator::BitwiseNot
                {
                    self.write(" ");
                }
                operand.accept(self);
            }
            Expression::Grouped { inner, .. } => {
                self.write("(");
                inner.accept(self);
                self.write(")");
            }
            Expression::Null { .. } => self.write("NULL"),
            Expression::Constant { value, .. } => self.constant(value),
            Expression::Subquery { select, .. } => self.subquery(select),
            Expression::Reference(reference) => reference.accept(self),
            Expression::FunctionCall {
                function,
                arguments,
                ..
            } => {
                function.accept(self);
                self.write("(");
                self.separated(arguments, |w, argument| argument.accept(w), |w| w.write(", "));
                self.write(")");
            }
            Expression::Binary {
                left,
                operator,
                right,
                ..
            } => {
                left.accept(self);
                self.write(&format!(" {} ", operator.symbol()));
                right.accept(self);
            }
        }
    }

    fn visit_boolean(&mut self, node: &BooleanExpression) {
        match node {
            BooleanExpression::Not { inner, .. } => {
                self.write("NOT ");
                inner.accept(self);
            }
            BooleanExpression::Exists { subquery, .. } => {
                self.write("EXISTS ");
                self.subquery(subquery);
            }
            BooleanExpression::InSubquery {
                left,
                negated,
                subquery,
                ..
            } => {
                left.accept(self);
                self.write(if *negated { " NOT IN " } else { " IN " });
                self.subquery(subquery);
            }
            BooleanExpression::InList {
                left,
                negated,
                list,
                ..
            } => {
                left.accept(self);
                self.write(if *negated { " NOT IN (" } else { " IN (" });
                self.newline();
                self.indented(2, |w| w.comma_lines(list));
                self.newline();
                self.write(")");
            }
            BooleanExpression::Between {
                left,
                negated,
                low,
                high,
                ..
            } => {
                left.accept(self);
                self.write(if *negated { " NOT BETWEEN " } else { " BETWEEN " });
                low.accept(self);
                self.write(" AND ");
                high.accept(self);
            }
            BooleanExpression::Grouped { inner, .. } => {
                self.write("(");
                self.indented(2, |w| {
                    w.newline();
                    inner.accept(w);
                    w.newline();
                });
                self.write(")");
            }
            BooleanExpression::Range {
                left,
                operator,
                quantifier,
                subquery,
                ..
            } => {
                left.accept(self);
                self.write(&format!(" {} {} ", operator.symbol(), quantifier.keyword()));
                self.subquery(subquery);
            }
            BooleanExpression::NullCheck { left, is_null, .. } => {
                left.accept(self);
                self.write(if *is_null { " IS NULL" } else { " IS NOT NULL" });
            }
            BooleanExpression::Comparison {
                left,
                operator,
                right,
                ..
            } => {
                left.accept(self);
                self.write(&format!(" {} ", operator.symbol()));
                right.accept(self);
            }
            BooleanExpression::Binary {
                left,
                operator,
                right,
                ..
            } => {
                left.accept(self);
                self.newline();
                self.write(operator.keyword());
                self.write(" ");
                right.accept(self);
            }
        }
    }

    fn visit_reference_from(&mut self, node: &ReferenceFrom) {
        self.write(node.join.prefix());
        node.name.accept(self);
        self.alias(node.alias.as_deref());
        self.hints(&node.hints);
        self.on_clause(node.on.as_ref());
    }

    fn visit_subquery_from(&mut self, node: &SubqueryFrom) {
        self.write(node.join.prefix());
        self.write("(");
        self.indented(2, |w| {
            w.newline();
            node.subquery.accept(w);
        });
        self.newline();
        self.write(")");
        self.alias(node.alias.as_deref());
        self.on_clause(node.on.as_ref());
    }

    fn visit_column(&mut self, node: &Column) {
        match node {
            Column::Star { table, .. } => {
                if let Some(table) = table {
                    self.write(table);
                    self.write(".");
                }
                self.write("*");
            }
            Column::Expression {
                expression, alias, ..
            } => {
                expression.accept(self);
                self.alias(alias.as_deref());
            }
            Column::Set {
                target, expression, ..
            } => {
                target.accept(self);
                self.write(" = ");
                expression.accept(self);
            }
        }
    }

    fn visit_values_row(&mut self, node: &ValuesRow) {
        self.write("(");
        self.separated(&node.values, |w, value| value.accept(w), |w| w.write(", "));
        self.write(")");
    }

    fn visit_reference(&mut self, node: &Reference) {
        self.write(&node.identifier());
    }
}

/// Render statements to a string.
pub fn to_sql(statements: &[Statement]) -> String {
    let mut writer = SqlWriter::new();
    writer.append_all(statements);
    writer.into_string()
}

/// Render statements into an `io::Write` sink.
pub fn write_sql<W: io::Write>(statements: &[Statement], mut out: W) -> io::Result<()> {
    out.write_all(to_sql(statements).as_bytes())?;
    out.flush()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;

    #[test]
    fn test_select_layout() {
        let statements = parse("select a, b as c from dbo.t x where a = 1").unwrap();
        assert_eq!(
            to_sql(&statements),
            "SELECT  a\n        ,b AS c\nFROM    dbo.t AS x\nWHERE   a = 1\n\n"
        );
    }

    #[test]
    fn test_nested_indent_is_restored() {
        let statements = parse("select 1 where exists (select 2) and 3 = 3").unwrap();
        assert_eq!(
            to_sql(&statements),
            "SELECT  1\nWHERE   EXISTS (\n          SELECT  2\n        )\n        AND 3 = 3\n\n"
        );
    }
}
