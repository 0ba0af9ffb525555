use std::fmt;

use rust_decimal::Decimal;

use super::{BinaryOperator, Origin, SelectStatement, UnaryOperator};

/// SQL type of a literal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SqlType {
    Int,
    BigInt,
    Numeric,
    Real,
    Varchar,
    NVarchar,
}

/// Typed literal value.
#[derive(Debug, Clone, PartialEq)]
pub enum Constant {
    Int(i32),
    BigInt(i64),
    Numeric(Decimal),
    Real(f64),
    /// `'text'`, stored unescaped
    Varchar(String),
    /// `N'text'`, stored unescaped
    NVarchar(String),
}

impl Constant {
    pub fn sql_type(&self) -> SqlType {
        match self {
            Constant::Int(_) => SqlType::Int,
            Constant::BigInt(_) => SqlType::BigInt,
            Constant::Numeric(_) => SqlType::Numeric,
            Constant::Real(_) => SqlType::Real,
            Constant::Varchar(_) => SqlType::Varchar,
            Constant::NVarchar(_) => SqlType::NVarchar,
        }
    }
}

/// A possibly multi-part dotted name such as `db.dbo.table`.
///
/// Empty parts are kept: `db..table` is `["db", "", "table"]`, where the empty
/// part stands for the default schema.
#[derive(Debug, Clone, PartialEq)]
pub struct Reference {
    pub origin: Origin,
    pub parts: Vec<String>,
}

impl Reference {
    pub fn new(origin: Origin, parts: Vec<String>) -> Self {
        Reference { origin, parts }
    }

    /// Build a reference from a dotted name, without source position.
    pub fn parse_dotted(name: &str) -> Self {
        Reference {
            origin: Origin::default(),
            parts: name.split('.').map(str::to_string).collect(),
        }
    }

    /// The dotted name as written.
    pub fn identifier(&self) -> String {
        self.parts.join(".")
    }

    pub fn is_single_part(&self) -> bool {
        self.parts.len() == 1
    }

    /// Last part of the name, usually the object itself.
    pub fn object_name(&self) -> &str {
        self.parts.last().map(String::as_str).unwrap_or("")
    }
}

impl fmt::Display for Reference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.identifier())
    }
}

/// Value expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    /// Prefix operator applied to a primary
    ///
    /// # Example
    /// ```text
    /// -(2323)
    /// ~flags
    /// ```
    Unary {
        origin: Origin,
        operator: UnaryOperator,
        operand: Box<Expression>,
    },

    /// Parenthesized expression
    Grouped {
        origin: Origin,
        inner: Box<Expression>,
    },

    /// `NULL`
    Null { origin: Origin },

    /// Literal value
    Constant { origin: Origin, value: Constant },

    /// Parenthesized `SELECT` used as a value
    ///
    /// # Example
    /// ```text
    /// (SELECT MAX(id) FROM dbo.orders)
    /// ```
    Subquery {
        origin: Origin,
        select: Box<SelectStatement>,
    },

    /// Column, variable or other named value
    Reference(Reference),

    /// Call of a named function
    ///
    /// # Example
    /// ```text
    /// dbo.fn_(1, 'sda')
    /// ```
    FunctionCall {
        origin: Origin,
        function: Reference,
        arguments: Vec<Expression>,
    },

    /// Arithmetic or bitwise operation
    Binary {
        origin: Origin,
        left: Box<Expression>,
        operator: BinaryOperator,
        right: Box<Expression>,
    },
}

impl Expression {
    pub fn origin(&self) -> &Origin {
        match self {
            Expression::Unary { origin, .. }
            | Expression::Grouped { origin, .. }
            | Expression::Null { origin }
            | Expression::Constant { origin, .. }
            | Expression::Subquery { origin, .. }
            | Expression::FunctionCall { origin, .. }
            | Expression::Binary { origin, .. } => origin,
            Expression::Reference(reference) => &reference.origin,
        }
    }

    pub fn constant(value: Constant) -> Self {
        Expression::Constant {
            origin: Origin::default(),
            value,
        }
    }
}
