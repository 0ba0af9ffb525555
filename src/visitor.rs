//! Tree traversal.
//!
//! [`Visitor`] and [`VisitorMut`] declare one hook per node type, each a no-op
//! by default. Nodes dispatch to their hook through [`Visitable::accept`] /
//! [`VisitableMut::accept_mut`]. Hooks do not descend on their own; wrapping a
//! visitor in a [`TreeVisitor`] gives a pre-order walk where the wrapped
//! visitor sees each node before its children.
//!
//! ```
//! use tsqlc::ast::Reference;
//! use tsqlc::parser::parse;
//! use tsqlc::visitor::{walk, Visitor};
//!
//! #[derive(Default)]
//! struct Names(Vec<String>);
//!
//! impl Visitor for Names {
//!     fn visit_reference(&mut self, node: &Reference) {
//!         self.0.push(node.identifier());
//!     }
//! }
//!
//! let statements = parse("select a.x from dbo.t as a").unwrap();
//! let names = walk(&statements, Names::default());
//! assert_eq!(names.0, vec!["a.x", "dbo.t"]);
//! ```

use crate::ast::{
    BlockStatement, BooleanExpression, Column, DeleteStatement, EmptyStatement, Expression,
    FromSource, IfStatement, Reference, ReferenceFrom, SelectInsertStatement, SelectStatement,
    Statement, SubqueryFrom, UpdateStatement, ValuesInsertStatement, ValuesRow, WhileStatement,
};

/// Read-only hooks, one per node type.
#[allow(unused_variables)]
pub trait Visitor {
    fn visit_select(&mut self, node: &SelectStatement) {}
    fn visit_values_insert(&mut self, node: &ValuesInsertStatement) {}
    fn visit_select_insert(&mut self, node: &SelectInsertStatement) {}
    fn visit_update(&mut self, node: &UpdateStatement) {}
    fn visit_delete(&mut self, node: &DeleteStatement) {}
    fn visit_if(&mut self, node: &IfStatement) {}
    fn visit_while(&mut self, node: &WhileStatement) {}
    fn visit_block(&mut self, node: &BlockStatement) {}
    fn visit_empty(&mut self, node: &EmptyStatement) {}
    fn visit_expression(&mut self, node: &Expression) {}
    fn visit_boolean(&mut self, node: &BooleanExpression) {}
    fn visit_reference_from(&mut self, node: &ReferenceFrom) {}
    fn visit_subquery_from(&mut self, node: &SubqueryFrom) {}
    fn visit_column(&mut self, node: &Column) {}
    fn visit_values_row(&mut self, node: &ValuesRow) {}
    fn visit_reference(&mut self, node: &Reference) {}
}

/// Rewriting hooks, one per node type. Changes made by a hook are in place.
#[allow(unused_variables)]
pub trait VisitorMut {
    fn visit_select_mut(&mut self, node: &mut SelectStatement) {}
    fn visit_values_insert_mut(&mut self, node: &mut ValuesInsertStatement) {}
    fn visit_select_insert_mut(&mut self, node: &mut SelectInsertStatement) {}
    fn visit_update_mut(&mut self, node: &mut UpdateStatement) {}
    fn visit_delete_mut(&mut self, node: &mut DeleteStatement) {}
    fn visit_if_mut(&mut self, node: &mut IfStatement) {}
    fn visit_while_mut(&mut self, node: &mut WhileStatement) {}
    fn visit_block_mut(&mut self, node: &mut BlockStatement) {}
    fn visit_empty_mut(&mut self, node: &mut EmptyStatement) {}
    fn visit_expression_mut(&mut self, node: &mut Expression) {}
    fn visit_boolean_mut(&mut self, node: &mut BooleanExpression) {}
    fn visit_reference_from_mut(&mut self, node: &mut ReferenceFrom) {}
    fn visit_subquery_from_mut(&mut self, node: &mut SubqueryFrom) {}
    fn visit_column_mut(&mut self, node: &mut Column) {}
    fn visit_values_row_mut(&mut self, node: &mut ValuesRow) {}
    fn visit_reference_mut(&mut self, node: &mut Reference) {}
}

impl Visitor for () {}
impl VisitorMut for () {}

macro_rules! forward_hooks {
    ($visitor:ident, $($hook:ident($node:ty)),* $(,)?) => {
        impl<V: $visitor + ?Sized> $visitor for &mut V {
            $(
                fn $hook(&mut self, node: $node) {
                    (**self).$hook(node)
                }
            )*
        }
    };
}

forward_hooks!(
    Visitor,
    visit_select(&SelectStatement),
    visit_values_insert(&ValuesInsertStatement),
    visit_select_insert(&SelectInsertStatement),
    visit_update(&UpdateStatement),
    visit_delete(&DeleteStatement),
    visit_if(&IfStatement),
    visit_while(&WhileStatement),
    visit_block(&BlockStatement),
    visit_empty(&EmptyStatement),
    visit_expression(&Expression),
    visit_boolean(&BooleanExpression),
    visit_reference_from(&ReferenceFrom),
    visit_subquery_from(&SubqueryFrom),
    visit_column(&Column),
    visit_values_row(&ValuesRow),
    visit_reference(&Reference),
);

forward_hooks!(
    VisitorMut,
    visit_select_mut(&mut SelectStatement),
    visit_values_insert_mut(&mut ValuesInsertStatement),
    visit_select_insert_mut(&mut SelectInsertStatement),
    visit_update_mut(&mut UpdateStatement),
    visit_delete_mut(&mut DeleteStatement),
    visit_if_mut(&mut IfStatement),
    visit_while_mut(&mut WhileStatement),
    visit_block_mut(&mut BlockStatement),
    visit_empty_mut(&mut EmptyStatement),
    visit_expression_mut(&mut Expression),
    visit_boolean_mut(&mut BooleanExpression),
    visit_reference_from_mut(&mut ReferenceFrom),
    visit_subquery_from_mut(&mut SubqueryFrom),
    visit_column_mut(&mut Column),
    visit_values_row_mut(&mut ValuesRow),
    visit_reference_mut(&mut Reference),
);

/// A node that dispatches to its [`Visitor`] hook.
pub trait Visitable {
    fn accept<V: Visitor + ?Sized>(&self, visitor: &mut V);
}

/// A node that dispatches to its [`VisitorMut`] hook.
pub trait VisitableMut {
    fn accept_mut<V: VisitorMut + ?Sized>(&mut self, visitor: &mut V);
}

macro_rules! visitable {
    ($($node:ty => $visit:ident, $visit_mut:ident;)*) => {
        $(
            impl Visitable for $node {
                fn accept<V: Visitor + ?Sized>(&self, visitor: &mut V) {
                    visitor.$visit(self)
                }
            }

            impl VisitableMut for $node {
                fn accept_mut<V: VisitorMut + ?Sized>(&mut self, visitor: &mut V) {
                    visitor.$visit_mut(self)
                }
            }
        )*
    };
}

visitable! {
    SelectStatement => visit_select, visit_select_mut;
    ValuesInsertStatement => visit_values_insert, visit_values_insert_mut;
    SelectInsertStatement => visit_select_insert, visit_select_insert_mut;
    UpdateStatement => visit_update, visit_update_mut;
    DeleteStatement => visit_delete, visit_delete_mut;
    IfStatement => visit_if, visit_if_mut;
    WhileStatement => visit_while, visit_while_mut;
    BlockStatement => visit_block, visit_block_mut;
    EmptyStatement => visit_empty, visit_empty_mut;
    Expression => visit_expression, visit_expression_mut;
    BooleanExpression => visit_boolean, visit_boolean_mut;
    ReferenceFrom => visit_reference_from, visit_reference_from_mut;
    SubqueryFrom => visit_subquery_from, visit_subquery_from_mut;
    Column => visit_column, visit_column_mut;
    ValuesRow => visit_values_row, visit_values_row_mut;
    Reference => visit_reference, visit_reference_mut;
}

impl Visitable for Statement {
    fn accept<V: Visitor + ?Sized>(&self, visitor: &mut V) {
        match self {
            Statement::Select(node) => visitor.visit_select(node),
            Statement::ValuesInsert(node) => visitor.visit_values_insert(node),
            Statement::SelectInsert(node) => visitor.visit_select_insert(node),
            Statement::Update(node) => visitor.visit_update(node),
            Statement::Delete(node) => visitor.visit_delete(node),
            Statement::If(node) => visitor.visit_if(node),
            Statement::While(node) => visitor.visit_while(node),
            Statement::Block(node) => visitor.visit_block(node),
            Statement::Empty(node) => visitor.visit_empty(node),
        }
    }
}

impl VisitableMut for Statement {
    fn accept_mut<V: VisitorMut + ?Sized>(&mut self, visitor: &mut V) {
        match self {
            Statement::Select(node) => visitor.visit_select_mut(node),
            Statement::ValuesInsert(node) => visitor.visit_values_insert_mut(node),
            Statement::SelectInsert(node) => visitor.visit_select_insert_mut(node),
            Statement::Update(node) => visitor.visit_update_mut(node),
            Statement::Delete(node) => visitor.visit_delete_mut(node),
            Statement::If(node) => visitor.visit_if_mut(node),
            Statement::While(node) => visitor.visit_while_mut(node),
            Statement::Block(node) => visitor.visit_block_mut(node),
            Statement::Empty(node) => visitor.visit_empty_mut(node),
        }
    }
}

impl Visitable for FromSource {
    fn accept<V: Visitor + ?Sized>(&self, visitor: &mut V) {
        match self {
            FromSource::Reference(node) => visitor.visit_reference_from(node),
            FromSource::Subquery(node) => visitor.visit_subquery_from(node),
        }
    }
}

impl VisitableMut for FromSource {
    fn accept_mut<V: VisitorMut + ?Sized>(&mut self, visitor: &mut V) {
        match self {
            FromSource::Reference(node) => visitor.visit_reference_from_mut(node),
            FromSource::Subquery(node) => visitor.visit_subquery_from_mut(node),
        }
    }
}

/// Pre-order walker.
///
/// For every node it first calls the wrapped visitor's hook, then descends
/// into the node's children in source order. Without a wrapped visitor it
/// only walks.
#[derive(Debug, Default)]
pub struct TreeVisitor<V> {
    inner: Option<V>,
}

impl<V> TreeVisitor<V> {
    pub fn new(inner: V) -> Self {
        TreeVisitor { inner: Some(inner) }
    }

    pub fn empty() -> Self {
        TreeVisitor { inner: None }
    }

    pub fn inner(&self) -> Option<&V> {
        self.inner.as_ref()
    }

    pub fn into_inner(self) -> Option<V> {
        self.inner
    }
}

impl<V: Visitor> Visitor for TreeVisitor<V> {
    fn visit_select(&mut self, node: &SelectStatement) {
        if let Some(inner) = self.inner.as_mut() {
            inner.visit_select(node);
        }
        if let Some(top) = &node.top {
            top.accept(self);
        }
        for column in &node.columns {
            column.accept(self);
        }
        for from in &node.from {
            from.accept(self);
        }
        if let Some(where_clause) = &node.where_clause {
            where_clause.accept(self);
        }
    }

    fn visit_values_insert(&mut self, node: &ValuesInsertStatement) {
        if let Some(inner) = self.inner.as_mut() {
            inner.visit_values_insert(node);
        }
        if let Some(top) = &node.top {
            top.accept(self);
        }
        node.target.accept(self);
        for column in &node.columns {
            column.accept(self);
        }
        for row in &node.rows {
            row.accept(self);
        }
    }

    fn visit_select_insert(&mut self, node: &SelectInsertStatement) {
        if let Some(inner) = self.inner.as_mut() {
            inner.visit_select_insert(node);
        }
        if let Some(top) = &node.top {
            top.accept(self);
        }
        node.target.accept(self);
        for column in &node.columns {
            column.accept(self);
        }
        node.select.accept(self);
    }

    fn visit_update(&mut self, node: &UpdateStatement) {
        if let Some(inner) = self.inner.as_mut() {
            inner.visit_update(node);
        }
        if let Some(top) = &node.top {
            top.accept(self);
        }
        node.target.accept(self);
        for column in &node.set {
            column.accept(self);
        }
        for from in &node.from {
            from.accept(self);
        }
        if let Some(where_clause) = &node.where_clause {
            where_clause.accept(self);
        }
    }

    fn visit_delete(&mut self, node: &DeleteStatement) {
        if let Some(inner) = self.inner.as_mut() {
            inner.visit_delete(node);
        }
        if let Some(top) = &node.top {
            top.accept(self);
        }
        node.target.accept(self);
        for from in &node.from {
            from.accept(self);
        }
        if let Some(where_clause) = &node.where_clause {
            where_clause.accept(self);
        }
    }

    fn visit_if(&mut self, node: &IfStatement) {
        if let Some(inner) = self.inner.as_mut() {
            inner.visit_if(node);
        }
        node.test.accept(self);
        node.then_branch.accept(self);
        if let Some(else_branch) = &node.else_branch {
            else_branch.accept(self);
        }
    }

    fn visit_while(&mut self, node: &WhileStatement) {
        if let Some(inner) = self.inner.as_mut() {
            inner.visit_while(node);
        }
        node.test.accept(self);
        node.body.accept(self);
    }

    fn visit_block(&mut self, node: &BlockStatement) {
        if let Some(inner) = self.inner.as_mut() {
            inner.visit_block(node);
        }
        for statement in &node.body {
            statement.accept(self);
        }
    }

    fn visit_empty(&mut self, node: &EmptyStatement) {
        if let Some(inner) = self.inner.as_mut() {
            inner.visit_empty(node);
        }
    }

    fn visit_expression(&mut self, node: &Expression) {
        if let Some(inner) = self.inner.as_mut() {
            inner.visit_expression(node);
        }
        match node {
            Expression::Unary { operand, .. } => operand.accept(self),
            Expression::Grouped { inner, .. } => inner.accept(self),
            Expression::Null { .. } | Expression::Constant { .. } => {}
            Expression::Subquery { select, .. } => select.accept(self),
            Expression::Reference(reference) => reference.accept(self),
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

    fn visit_boolean(&mut self, node: &BooleanExpression) {
        if let Some(inner) = self.inner.as_mut() {
            inner.visit_boolean(node);
        }
        match node {
            BooleanExpression::Not { inner, .. } | BooleanExpression::Grouped { inner, .. } => {
                inner.accept(self)
            }
            BooleanExpression::Exists { subquery, .. } => subquery.accept(self),
            BooleanExpression::InSubquery { left, subquery, .. }
            | BooleanExpression::Range { left, subquery, .. } => {
                left.accept(self);
                subquery.accept(self);
            }
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
            BooleanExpression::NullCheck { left, .. } => left.accept(self),
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

    fn visit_reference_from(&mut self, node: &ReferenceFrom) {
        if let Some(inner) = self.inner.as_mut() {
            inner.visit_reference_from(node);
        }
        node.name.accept(self);
        if let Some(on) = &node.on {
            on.accept(self);
        }
    }

    fn visit_subquery_from(&mut self, node: &SubqueryFrom) {
        if let Some(inner) = self.inner.as_mut() {
            inner.visit_subquery_from(node);
        }
        node.subquery.accept(self);
        if let Some(on) = &node.on {
            on.accept(self);
        }
    }

    fn visit_column(&mut self, node: &Column) {
        if let Some(inner) = self.inner.as_mut() {
            inner.visit_column(node);
        }
        match node {
            Column::Star { .. } => {}
            Column::Expression { expression, .. } => expression.accept(self),
            Column::Set {
                target, expression, ..
            } => {
                target.accept(self);
                expression.accept(self);
            }
        }
    }

    fn visit_values_row(&mut self, node: &ValuesRow) {
        if let Some(inner) = self.inner.as_mut() {
            inner.visit_values_row(node);
        }
        for value in &node.values {
            value.accept(self);
        }
    }

    fn visit_reference(&mut self, node: &Reference) {
        if let Some(inner) = self.inner.as_mut() {
            inner.visit_reference(node);
        }
    }
}

impl<V: VisitorMut> VisitorMut for TreeVisitor<V> {
    fn visit_select_mut(&mut self, node: &mut SelectStatement) {
        if let Some(inner) = self.inner.as_mut() {
            inner.visit_select_mut(node);
        }
        if let Some(top) = &mut node.top {
            top.accept_mut(self);
        }
        for column in &mut node.columns {
            column.accept_mut(self);
        }
        for from in &mut node.from {
            from.accept_mut(self);
        }
        if let Some(where_clause) = &mut node.where_clause {
            where_clause.accept_mut(self);
        }
    }

    fn visit_values_insert_mut(&mut self, node: &mut ValuesInsertStatement) {
        if let Some(inner) = self.inner.as_mut() {
            inner.visit_values_insert_mut(node);
        }
        if let Some(top) = &mut node.top {
            top.accept_mut(self);
        }
        node.target.accept_mut(self);
        for column in &mut node.columns {
            column.accept_mut(self);
        }
        for row in &mut node.rows {
            row.accept_mut(self);
        }
    }

    fn visit_select_insert_mut(&mut self, node: &mut SelectInsertStatement) {
        if let Some(inner) = self.inner.as_mut() {
            inner.visit_select_insert_mut(node);
        }
        if let Some(top) = &mut node.top {
            top.accept_mut(self);
        }
        node.target.accept_mut(self);
        for column in &mut node.columns {
            column.accept_mut(self);
        }
        node.select.accept_mut(self);
    }

    fn visit_update_mut(&mut self, node: &mut UpdateStatement) {
        if let Some(inner) = self.inner.as_mut() {
            inner.visit_update_mut(node);
        }
        if let Some(top) = &mut node.top {
            top.accept_mut(self);
        }
        node.target.accept_mut(self);
        for column in &mut node.set {
            column.accept_mut(self);
        }
        for from in &mut node.from {
            from.accept_mut(self);
        }
        if let Some(where_clause) = &mut node.where_clause {
            where_clause.accept_mut(self);
        }
    }

    fn visit_delete_mut(&mut self, node: &mut DeleteStatement) {
        if let Some(inner) = self.inner.as_mut() {
            inner.visit_delete_mut(node);
        }
        if let Some(top) = &mut node.top {
            top.accept_mut(self);
        }
        node.target.accept_mut(self);
        for from in &mut node.from {
            from.accept_mut(self);
        }
        if let Some(where_clause) = &mut node.where_clause {
            where_clause.accept_mut(self);
        }
    }

    fn visit_if_mut(&mut self, node: &mut IfStatement) {
        if let Some(inner) = self.inner.as_mut() {
            inner.visit_if_mut(node);
        }
        node.test.accept_mut(self);
        node.then_branch.accept_mut(self);
        if let Some(else_branch) = &mut node.else_branch {
            else_branch.accept_mut(self);
        }
    }

    fn visit_while_mut(&mut self, node: &mut WhileStatement) {
        if let Some(inner) = self.inner.as_mut() {
            inner.visit_while_mut(node);
        }
        node.test.accept_mut(self);
        node.body.accept_mut(self);
    }

    fn visit_block_mut(&mut self, node: &mut BlockStatement) {
        if let Some(inner) = self.inner.as_mut() {
            inner.visit_block_mut(node);
        }
        for statement in &mut node.body {
            statement.accept_mut(self);
        }
    }

    fn visit_empty_mut(&mut self, node: &mut EmptyStatement) {
        if let Some(inner) = self.inner.as_mut() {
            inner.visit_empty_mut(node);
        }
    }

    fn visit_expression_mut(&mut self, node: &mut Expression) {
        if let Some(inner) = self.inner.as_mut() {
            inner.visit_expression_mut(node);
        }
        match node {
            Expression::Unary { operand, .. } => operand.accept_mut(self),
            Expression::Grouped { inner, .. } => inner.accept_mut(self),
            Expression::Null { .. } | Expression::Constant { .. } => {}
            Expression::Subquery { select, .. } => select.accept_mut(self),
            Expression::Reference(reference) => reference.accept_mut(self),
            Expression::FunctionCall { arguments, .. } => {
                for argument in arguments {
                    argument.accept_mut(self);
                }
            }
            Expression::Binary { left, right, .. } => {
                left.accept_mut(self);
                right.accept_mut(self);
            }
        }
    }

    fn visit_boolean_mut(&mut self, node: &mut BooleanExpression) {
        if let Some(inner) = self.inner.as_mut() {
            inner.visit_boolean_mut(node);
        }
        match node {
            BooleanExpression::Not { inner, .. } | BooleanExpression::Grouped { inner, .. } => {
                inner.accept_mut(self)
            }
            BooleanExpression::Exists { subquery, .. } => subquery.accept_mut(self),
            BooleanExpression::InSubquery { left, subquery, .. }
            | BooleanExpression::Range { left, subquery, .. } => {
                left.accept_mut(self);
                subquery.accept_mut(self);
            }
            BooleanExpression::InList { left, list, .. } => {
                left.accept_mut(self);
                for item in list {
                    item.accept_mut(self);
                }
            }
            BooleanExpression::Between {
                left, low, high, ..
            } => {
                left.accept_mut(self);
                low.accept_mut(self);
                high.accept_mut(self);
            }
            BooleanExpression::NullCheck { left, .. } => left.accept_mut(self),
            BooleanExpression::Comparison { left, right, .. } => {
                left.accept_mut(self);
                right.accept_mut(self);
            }
            BooleanExpression::Binary { left, right, .. } => {
                left.accept_mut(self);
                right.accept_mut(self);
            }
        }
    }

    fn visit_reference_from_mut(&mut self, node: &mut ReferenceFrom) {
        if let Some(inner) = self.inner.as_mut() {
            inner.visit_reference_from_mut(node);
        }
        node.name.accept_mut(self);
        if let Some(on) = &mut node.on {
            on.accept_mut(self);
        }
    }

    fn visit_subquery_from_mut(&mut self, node: &mut SubqueryFrom) {
        if let Some(inner) = self.inner.as_mut() {
            inner.visit_subquery_from_mut(node);
        }
        node.subquery.accept_mut(self);
        if let Some(on) = &mut node.on {
            on.accept_mut(self);
        }
    }

    fn visit_column_mut(&mut self, node: &mut Column) {
        if let Some(inner) = self.inner.as_mut() {
            inner.visit_column_mut(node);
        }
        match node {
            Column::Star { .. } => {}
            Column::Expression { expression, .. } => expression.accept_mut(self),
            Column::Set {
                target, expression, ..
            } => {
                target.accept_mut(self);
                expression.accept_mut(self);
            }
        }
    }

    fn visit_values_row_mut(&mut self, node: &mut ValuesRow) {
        if let Some(inner) = self.inner.as_mut() {
            inner.visit_values_row_mut(node);
        }
        for value in &mut node.values {
            value.accept_mut(self);
        }
    }

    fn visit_reference_mut(&mut self, node: &mut Reference) {
        if let Some(inner) = self.inner.as_mut() {
            inner.visit_reference_mut(node);
        }
    }
}

/// Walk `statements` in pre-order with `visitor` and hand it back.
pub fn walk<V: Visitor>(statements: &[Statement], mut visitor: V) -> V {
    let mut tree = TreeVisitor::new(&mut visitor);
    for statement in statements {
        statement.accept(&mut tree);
    }
    visitor
}

/// Walk `statements` in pre-order with a rewriting `visitor` and hand it back.
pub fn walk_mut<V: VisitorMut>(statements: &mut [Statement], mut visitor: V) -> V {
    let mut tree = TreeVisitor::new(&mut visitor);
    for statement in statements.iter_mut() {
        statement.accept_mut(&mut tree);
    }
    visitor
}
