use super::{BooleanExpression, Origin, Reference, SelectStatement, TableHint};

/// How a `FROM` entry relates to the entries before it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinType {
    /// The first entry of a `FROM` list
    Primary,
    Inner,
    Left,
    Right,
    /// `FULL [OUTER] JOIN`
    Full,
    CrossJoin,
    CrossApply,
    OuterApply,
}

impl JoinType {
    /// Whether entries of this kind carry an `ON` clause.
    pub fn requires_on(self) -> bool {
        matches!(
            self,
            JoinType::Inner | JoinType::Left | JoinType::Right | JoinType::Full
        )
    }

    /// Keywords introducing the entry, with a trailing space.
    pub fn prefix(self) -> &'static str {
        match self {
            JoinType::Primary => "",
            JoinType::Inner => "INNER JOIN ",
            JoinType::Left => "LEFT JOIN ",
            JoinType::Right => "RIGHT JOIN ",
            JoinType::Full => "FULL OUTER JOIN ",
            JoinType::CrossJoin => "CROSS JOIN ",
            JoinType::CrossApply => "CROSS APPLY ",
            JoinType::OuterApply => "OUTER APPLY ",
        }
    }
}

/// Table, view or function reference in a `FROM` list.
///
/// # Example
/// ```text
/// LEFT JOIN dbo.tb_y AS y WITH (NOLOCK) ON y.id = x.id
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ReferenceFrom {
    pub origin: Origin,
    pub name: Reference,
    pub alias: Option<String>,
    pub join: JoinType,
    pub hints: Vec<TableHint>,
    pub on: Option<BooleanExpression>,
}

/// Derived table in a `FROM` list.
#[derive(Debug, Clone, PartialEq)]
pub struct SubqueryFrom {
    pub origin: Origin,
    pub subquery: Box<SelectStatement>,
    pub alias: Option<String>,
    pub join: JoinType,
    pub on: Option<BooleanExpression>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum FromSource {
    Reference(ReferenceFrom),
    Subquery(SubqueryFrom),
}

impl FromSource {
    pub fn join(&self) -> JoinType {
        match self {
            FromSource::Reference(from) => from.join,
            FromSource::Subquery(from) => from.join,
        }
    }

    pub fn alias(&self) -> Option<&str> {
        match self {
            FromSource::Reference(from) => from.alias.as_deref(),
            FromSource::Subquery(from) => from.alias.as_deref(),
        }
    }

    pub fn on(&self) -> Option<&BooleanExpression> {
        match self {
            FromSource::Reference(from) => from.on.as_ref(),
            FromSource::Subquery(from) => from.on.as_ref(),
        }
    }

    pub fn origin(&self) -> &Origin {
        match self {
            FromSource::Reference(from) => &from.origin,
            FromSource::Subquery(from) => &from.origin,
        }
    }
}
