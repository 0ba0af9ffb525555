use super::{
    ComparisonOperator, Expression, LogicalOperator, Origin, RangeQuantifier, SelectStatement,
};

/// Predicate used by `WHERE`, `ON`, `IF` and `WHILE`.
#[derive(Debug, Clone, PartialEq)]
pub enum BooleanExpression {
    /// `NOT predicate`
    Not {
        origin: Origin,
        inner: Box<BooleanExpression>,
    },

    /// `EXISTS (SELECT ...)`
    Exists {
        origin: Origin,
        subquery: Box<SelectStatement>,
    },

    /// `x [NOT] IN (SELECT ...)`
    InSubquery {
        origin: Origin,
        left: Expression,
        negated: bool,
        subquery: Box<SelectStatement>,
    },

    /// `x [NOT] IN (a, b, c)`
    InList {
        origin: Origin,
        left: Expression,
        negated: bool,
        list: Vec<Expression>,
    },

    /// `x [NOT] BETWEEN low AND high`
    Between {
        origin: Origin,
        left: Expression,
        negated: bool,
        low: Expression,
        high: Expression,
    },

    /// Parenthesized predicate
    Grouped {
        origin: Origin,
        inner: Box<BooleanExpression>,
    },

    /// Quantified subquery comparison
    ///
    /// # Example
    /// ```text
    /// price > ALL (SELECT price FROM dbo.archive)
    /// ```
    Range {
        origin: Origin,
        left: Expression,
        operator: ComparisonOperator,
        quantifier: RangeQuantifier,
        subquery: Box<SelectStatement>,
    },

    /// `x IS [NOT] NULL`
    NullCheck {
        origin: Origin,
        left: Expression,
        is_null: bool,
    },

    /// `left op right`
    Comparison {
        origin: Origin,
        left: Expression,
        operator: ComparisonOperator,
        right: Expression,
    },

    /// `left AND right`, `left OR right`
    Binary {
        origin: Origin,
        left: Box<BooleanExpression>,
        operator: LogicalOperator,
        right: Box<BooleanExpression>,
    },
}

impl BooleanExpression {
    pub fn origin(&self) -> &Origin {
        match self {
            BooleanExpression::Not { origin, .. }
            | BooleanExpression::Exists { origin, .. }
            | BooleanExpression::InSubquery { origin, .. }
            | BooleanExpression::InList { origin, .. }
            | BooleanExpression::Between { origin, .. }
            | BooleanExpression::Grouped { origin, .. }
            | BooleanExpression::Range { origin, .. }
            | BooleanExpression::NullCheck { origin, .. }
            | BooleanExpression::Comparison { origin, .. }
            | BooleanExpression::Binary { origin, .. } => origin,
        }
    }
}
