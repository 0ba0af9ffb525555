//! # T-SQL Abstract Syntax Tree
//!
//! Tokens and the syntax tree the parser builds from them.
//!
//! ## Architecture Overview
//!
//! - **[tokens]** - Lexical tokens, their kinds and payloads
//! - **[keywords]** - Reserved words and table hints
//! - **[operators]** - Unary, arithmetic, comparison and logical operators with their precedence tiers
//! - **[expressions]** - Value expressions, constants and dotted references
//! - **[boolean]** - Predicates
//! - **[from]** - `FROM` list entries and join kinds
//! - **[columns]** - Column list and `SET` list entries
//! - **[statements]** - Statements
//!
//! ## Example
//!
//! ```text
//! SELECT  TOP (10) o.id
//!        ,o.total * 1.2 AS gross
//! FROM    dbo.orders AS o WITH (NOLOCK)
//!         LEFT JOIN dbo.refunds AS r
//!           ON r.order_id = o.id
//! WHERE   r.id IS NULL
//! ```
//!
//! parses to a [`Statement::Select`] with two [`Column::Expression`] entries,
//! a primary and a [`JoinType::Left`] [`ReferenceFrom`], and a
//! [`BooleanExpression::NullCheck`] where clause.
//!
//! Every node keeps the [`Token`] it started at in an [`Origin`]. Origins do
//! not take part in equality, so trees parsed from differently formatted text
//! compare equal.
pub mod tokens;
pub mod keywords;
pub mod operators;
pub mod expressions;
pub mod boolean;
pub mod from;
pub mod columns;
pub mod statements;

pub use tokens::{Origin, Token, TokenKind, TokenValue};
pub use keywords::{Keyword, TableHint};
pub use operators::{
    precedence, BinaryOperator, ComparisonOperator, LogicalOperator, RangeQuantifier,
    UnaryOperator,
};
pub use expressions::{Constant, Expression, Reference, SqlType};
pub use boolean::BooleanExpression;
pub use from::{FromSource, JoinType, ReferenceFrom, SubqueryFrom};
pub use columns::Column;
pub use statements::{
    BlockStatement, DeleteStatement, EmptyStatement, IfStatement, SelectInsertStatement,
    SelectStatement, Statement, UpdateStatement, ValuesInsertStatement, ValuesRow,
    WhileStatement,
};
