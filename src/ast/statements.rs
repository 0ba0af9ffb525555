use super::{BooleanExpression, Column, Expression, FromSource, Origin, Reference, TableHint};

/// `SELECT [TOP (n)] columns [FROM ...] [WHERE ...]`
///
/// Also used for subqueries, which never carry a terminator.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectStatement {
    pub origin: Origin,
    pub top: Option<Expression>,
    pub columns: Vec<Column>,
    pub from: Vec<FromSource>,
    pub where_clause: Option<BooleanExpression>,
    pub has_terminator: bool,
}

/// One parenthesized row of a `VALUES` list.
#[derive(Debug, Clone, PartialEq)]
pub struct ValuesRow {
    pub origin: Origin,
    pub values: Vec<Expression>,
}

/// `INSERT [TOP (n)] [INTO] target [WITH (...)] [(columns)] VALUES (...)[, (...)]`
#[derive(Debug, Clone, PartialEq)]
pub struct ValuesInsertStatement {
    pub origin: Origin,
    pub top: Option<Expression>,
    pub target: Reference,
    pub hints: Vec<TableHint>,
    pub columns: Vec<Reference>,
    pub rows: Vec<ValuesRow>,
    pub has_terminator: bool,
}

/// `INSERT [TOP (n)] [INTO] target [WITH (...)] [(columns)] SELECT ...`
#[derive(Debug, Clone, PartialEq)]
pub struct SelectInsertStatement {
    pub origin: Origin,
    pub top: Option<Expression>,
    pub target: Reference,
    pub hints: Vec<TableHint>,
    pub columns: Vec<Reference>,
    pub select: SelectStatement,
    pub has_terminator: bool,
}

/// `UPDATE [TOP n] target SET a = x, ... [FROM ...] [WHERE ...]`
///
/// `set` only ever holds [`Column::Set`] entries.
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateStatement {
    pub origin: Origin,
    pub top: Option<Expression>,
    pub target: Reference,
    pub set: Vec<Column>,
    pub from: Vec<FromSource>,
    pub where_clause: Option<BooleanExpression>,
    pub has_terminator: bool,
}

/// `DELETE [TOP (n)] [FROM] target [FROM ...] [WHERE ...]`
#[derive(Debug, Clone, PartialEq)]
pub struct DeleteStatement {
    pub origin: Origin,
    pub top: Option<Expression>,
    pub target: Reference,
    pub from: Vec<FromSource>,
    pub where_clause: Option<BooleanExpression>,
    pub has_terminator: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IfStatement {
    pub origin: Origin,
    pub test: BooleanExpression,
    pub then_branch: Box<Statement>,
    pub else_branch: Option<Box<Statement>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WhileStatement {
    pub origin: Origin,
    pub test: BooleanExpression,
    pub body: Box<Statement>,
}

/// `BEGIN ... END`
#[derive(Debug, Clone, PartialEq)]
pub struct BlockStatement {
    pub origin: Origin,
    pub body: Vec<Statement>,
}

/// A lone `;`
#[derive(Debug, Clone, PartialEq)]
pub struct EmptyStatement {
    pub origin: Origin,
    pub has_terminator: bool,
}

/// Top-level or nested statement.
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    Select(SelectStatement),
    ValuesInsert(ValuesInsertStatement),
    SelectInsert(SelectInsertStatement),
    Update(UpdateStatement),
    Delete(DeleteStatement),
    If(IfStatement),
    While(WhileStatement),
    Block(BlockStatement),
    Empty(EmptyStatement),
}

impl Statement {
    pub fn origin(&self) -> &Origin {
        match self {
            Statement::Select(s) => &s.origin,
            Statement::ValuesInsert(s) => &s.origin,
            Statement::SelectInsert(s) => &s.origin,
            Statement::Update(s) => &s.origin,
            Statement::Delete(s) => &s.origin,
            Statement::If(s) => &s.origin,
            Statement::While(s) => &s.origin,
            Statement::Block(s) => &s.origin,
            Statement::Empty(s) => &s.origin,
        }
    }

    /// Whether a trailing `;` was consumed. `None` for statements that never
    /// take one (`IF`, `WHILE`, blocks).
    pub fn has_terminator(&self) -> Option<bool> {
        match self {
            Statement::Select(s) => Some(s.has_terminator),
            Statement::ValuesInsert(s) => Some(s.has_terminator),
            Statement::SelectInsert(s) => Some(s.has_terminator),
            Statement::Update(s) => Some(s.has_terminator),
            Statement::Delete(s) => Some(s.has_terminator),
            Statement::Empty(s) => Some(s.has_terminator),
            Statement::If(_) | Statement::While(_) | Statement::Block(_) => None,
        }
    }

    pub(crate) fn set_terminator(&mut self, terminated: bool) {
        match self {
            Statement::Select(s) => s.has_terminator = terminated,
            Statement::ValuesInsert(s) => s.has_terminator = terminated,
            Statement::SelectInsert(s) => s.has_terminator = terminated,
            Statement::Update(s) => s.has_terminator = terminated,
            Statement::Delete(s) => s.has_terminator = terminated,
            Statement::Empty(s) => s.has_terminator = terminated,
            Statement::If(_) | Statement::While(_) | Statement::Block(_) => {}
        }
    }
}
