pub mod analysis;
pub mod ast;
#[cfg(feature = "cli")]
pub mod cli;
pub mod lexer;
pub mod parser;
pub mod search;
pub mod transform;
pub mod tsql;
pub mod visitor;
pub mod writer;

pub use ast::{Statement, Token, TokenKind};
pub use lexer::{tokenize, LexError, Lexer};
pub use parser::{parse, ParseError, Parser};
pub use tsql::Error;
pub use visitor::{walk, walk_mut, TreeVisitor, Visitable, VisitableMut, Visitor, VisitorMut};
pub use writer::{to_sql, write_sql, SqlWriter};
