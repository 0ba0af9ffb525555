//! One-call entry points for lexing and parsing whole sources.
//!
//! The [`crate::lexer`] and [`crate::parser`] modules expose the pull
//! interfaces; the functions here drain them and fold every failure into a
//! single [`Error`]. Functions taking an `Option` treat `None` as a missing
//! source rather than an empty one.

use std::fs;
use std::io::{self, Read};
use std::path::Path;

use thiserror::Error;

use crate::ast::{Statement, Token};
use crate::lexer::{LexError, Lexer};
use crate::parser::{ParseError, Parser};

#[derive(Debug, Error)]
pub enum Error {
    /// No source was supplied at all
    #[error("no {0} source provided")]
    MissingSource(&'static str),

    #[error(transparent)]
    Lex(#[from] LexError),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("failed to read source: {0}")]
    Io(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

/// Lex `source` into tokens, excluding the end-of-input marker.
pub fn lex(source: &str) -> Result<Vec<Token>> {
    lex_chars(source.chars())
}

/// Lex an arbitrary character sequence.
pub fn lex_chars<I: IntoIterator<Item = char>>(chars: I) -> Result<Vec<Token>> {
    Ok(Lexer::new(chars.into_iter()).collect::<std::result::Result<_, _>>()?)
}

/// Lex a source that may be absent.
pub fn lex_source(source: Option<&str>) -> Result<Vec<Token>> {
    lex(source.ok_or(Error::MissingSource("characters"))?)
}

pub fn parse(source: &str) -> Result<Vec<Statement>> {
    parse_chars(source.chars())
}

/// Parse an arbitrary character sequence.
pub fn parse_chars<I: IntoIterator<Item = char>>(chars: I) -> Result<Vec<Statement>> {
    Ok(Parser::new(Lexer::new(chars.into_iter())).collect::<std::result::Result<_, _>>()?)
}

/// Parse a source that may be absent.
pub fn parse_source(source: Option<&str>) -> Result<Vec<Statement>> {
    parse(source.ok_or(Error::MissingSource("characters"))?)
}

/// Parse tokens lexed earlier. Comment tokens are skipped as usual.
pub fn parse_tokens<I: IntoIterator<Item = Token>>(tokens: Option<I>) -> Result<Vec<Statement>> {
    let tokens = tokens.ok_or(Error::MissingSource("tokens"))?;
    Ok(Parser::new(tokens.into_iter().map(Ok)).collect::<std::result::Result<_, _>>()?)
}

/// Parse UTF-8 encoded bytes.
pub fn parse_bytes(buffer: &[u8]) -> Result<Vec<Statement>> {
    let source = std::str::from_utf8(buffer)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    parse(source)
}

/// Read `reader` to the end and parse what it held.
pub fn parse_reader<R: Read>(mut reader: R) -> Result<Vec<Statement>> {
    let mut source = String::new();
    reader.read_to_string(&mut source)?;
    parse(&source)
}

pub fn parse_file(path: impl AsRef<Path>) -> Result<Vec<Statement>> {
    parse(&fs::read_to_string(path)?)
}
