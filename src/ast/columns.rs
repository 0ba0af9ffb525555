use super::{Expression, Origin, Reference};

/// Entry of a `SELECT` column list or an `UPDATE ... SET` list.
#[derive(Debug, Clone, PartialEq)]
pub enum Column {
    /// `*` or `alias.*`
    Star {
        origin: Origin,
        table: Option<String>,
    },

    /// Expression with an optional alias
    ///
    /// The alias keeps its source form, quotes included when it was written as
    /// a string (`1 AS 'n'`).
    ///
    /// # Example
    /// ```text
    /// 1 * -2 + 5 AS b
    /// total = price * qty
    /// ```
    Expression {
        origin: Origin,
        expression: Expression,
        alias: Option<String>,
    },

    /// `target = expression`, only found in `SET` lists
    Set {
        origin: Origin,
        target: Reference,
        expression: Expression,
    },
}

impl Column {
    pub fn origin(&self) -> &Origin {
        match self {
            Column::Star { origin, .. }
            | Column::Expression { origin, .. }
            | Column::Set { origin, .. } => origin,
        }
    }
}
