use std::str::Chars;

use rust_decimal::Decimal;
use thiserror::Error;

use crate::ast::{Token, TokenKind, TokenValue};

/// A malformed token. Lexing stops at the first one.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LexError {
    #[error("`{expected}` expected at line {line} char {column}.")]
    Expected {
        expected: &'static str,
        line: usize,
        column: usize,
    },

    #[error("`{character}` unexpected at line {line} char {column}.")]
    UnexpectedCharacter {
        character: char,
        line: usize,
        column: usize,
    },

    #[error("invalid number `{text}` at line {line} char {column}.")]
    InvalidNumber {
        text: String,
        line: usize,
        column: usize,
    },
}

impl LexError {
    pub fn line(&self) -> usize {
        match self {
            LexError::Expected { line, .. }
            | LexError::UnexpectedCharacter { line, .. }
            | LexError::InvalidNumber { line, .. } => *line,
        }
    }

    pub fn column(&self) -> usize {
        match self {
            LexError::Expected { column, .. }
            | LexError::UnexpectedCharacter { column, .. }
            | LexError::InvalidNumber { column, .. } => *column,
        }
    }
}

/// Character-level scanner producing [`Token`]s on demand.
///
/// The lexer keeps the current character plus a single lookahead slot. Peeking
/// twice returns the same slot, so a second lookahead can never be requested.
pub struct Lexer<I: Iterator<Item = char>> {
    chars: I,
    look: Option<char>,
    peeked: Option<Option<char>>,
    line: usize,
    column: usize,
    index: usize,
    at_end: bool,
    buffer: String,
    token_line: usize,
    token_column: usize,
    token_index: usize,
    finished: bool,
}

impl<'a> Lexer<Chars<'a>> {
    pub fn from_source(source: &'a str) -> Self {
        Lexer::new(source.chars())
    }
}

impl<I: Iterator<Item = char>> Lexer<I> {
    pub fn new(chars: I) -> Self {
        let mut lexer = Lexer {
            chars,
            look: None,
            peeked: None,
            line: 1,
            column: 0,
            index: 0,
            at_end: false,
            buffer: String::new(),
            token_line: 1,
            token_column: 0,
            token_index: 0,
            finished: false,
        };
        lexer.advance();
        lexer
    }

    /// Move the lookahead (or the next source character) into the current slot.
    fn advance(&mut self) {
        self.look = match self.peeked.take() {
            Some(next) => next,
            None => self.chars.next(),
        };

        match self.look {
            Some('\n') => {
                self.index += 1;
                self.line += 1;
                self.column = 0;
            }
            Some('\r') => self.index += 1,
            Some(_) => {
                self.index += 1;
                self.column += 1;
            }
            // end of input sits one column past the last character
            None if !self.at_end => {
                self.at_end = true;
                self.index += 1;
                self.column += 1;
            }
            None => {}
        }
    }

    fn peek(&mut self) -> Option<char> {
        *self.peeked.get_or_insert_with(|| self.chars.next())
    }

    /// Append the current character to the token buffer and advance.
    fn stash(&mut self) {
        if let Some(ch) = self.look {
            self.buffer.push(ch);
        }
        self.advance();
    }

    fn take_buffer(&mut self) -> String {
        std::mem::take(&mut self.buffer)
    }

    fn skip_whitespace(&mut self) {
        while self.look.is_some_and(char::is_whitespace) {
            self.advance();
        }
    }

    fn make_token(&self, kind: TokenKind) -> Token {
        Token::new(kind, self.token_line, self.token_column, self.token_index)
    }

    fn expected(&self, expected: &'static str) -> LexError {
        LexError::Expected {
            expected,
            line: self.line,
            column: self.column,
        }
    }

    /// Produce the next token, or an [`TokenKind::Eof`] token once input is exhausted.
    pub fn next_token(&mut self) -> Result<Token, LexError> {
        self.skip_whitespace();
        self.token_line = self.line;
        self.token_column = self.column;
        self.token_index = self.index;

        let Some(ch) = self.look else {
            return Ok(self.make_token(TokenKind::Eof));
        };

        match ch {
            '.' if self.peek().is_some_and(|c| c.is_ascii_digit()) => self.read_number(),
            c if c.is_ascii_digit() => self.read_number(),
            'N' if self.peek() == Some('\'') => self.read_string(),
            '\'' => self.read_string(),
            c if c.is_alphabetic() || matches!(c, '@' | '#' | '_' | '[' | '"') => {
                self.read_identifier()
            }
            '-' if self.peek() == Some('-') => Ok(self.read_line_comment()),
            '/' if self.peek() == Some('*') => self.read_block_comment(),
            _ => self.read_operator(),
        }
    }

    fn read_number(&mut self) -> Result<Token, LexError> {
        let mut point = false;
        let mut exponent = false;

        loop {
            match self.look {
                Some(c) if c.is_ascii_digit() => self.stash(),
                Some('.') if !point && !exponent => {
                    point = true;
                    self.stash();
                }
                Some('e' | 'E') if !exponent => {
                    exponent = true;
                    self.stash();
                    if matches!(self.look, Some('+' | '-')) {
                        self.stash();
                    }
                }
                _ => break,
            }
        }

        let mut text = self.take_buffer();
        if text.starts_with('.') {
            text.insert(0, '0');
        }

        // out-of-range literals are errors, never rounded
        let value = if exponent {
            text.parse::<f64>()
                .ok()
                .filter(|real| real.is_finite())
                .map(TokenValue::Real)
        } else if point {
            if text.ends_with('.') {
                text.push('0');
            }
            Decimal::from_str_exact(&text).ok().map(TokenValue::Numeric)
        } else {
            text.parse::<i32>()
                .map(TokenValue::Int)
                .or_else(|_| text.parse::<i64>().map(TokenValue::BigInt))
                .ok()
                .or_else(|| Decimal::from_str_exact(&text).ok().map(TokenValue::Numeric))
        };

        let kind = match value {
            Some(TokenValue::Real(_)) => TokenKind::RealConstant,
            Some(TokenValue::Int(_)) => TokenKind::IntConstant,
            Some(TokenValue::BigInt(_)) => TokenKind::BigIntConstant,
            Some(TokenValue::Numeric(_)) => TokenKind::NumericConstant,
            _ => {
                return Err(LexError::InvalidNumber {
                    text,
                    line: self.token_line,
                    column: self.token_column,
                });
            }
        };

        Ok(self
            .make_token(kind)
            .with_value(value.unwrap_or(TokenValue::None)))
    }

    fn read_identifier(&mut self) -> Result<Token, LexError> {
        match self.look {
            Some(open @ ('[' | '"')) => {
                let (close, expected) = if open == '[' { (']', "]") } else { ('"', "\"") };
                self.stash();
                loop {
                    match self.look {
                        None => return Err(self.expected(expected)),
                        Some(c) if c == close => {
                            self.stash();
                            break;
                        }
                        Some(_) => self.stash(),
                    }
                }
            }
            _ => {
                while self
                    .look
                    .is_some_and(|c| c.is_alphanumeric() || matches!(c, '_' | '@' | '#' | '$'))
                {
                    self.stash();
                }
            }
        }

        let text = self.take_buffer();
        let kind = TokenKind::classify(&text);
        Ok(self.make_token(kind).with_value(TokenValue::Text(text)))
    }

    fn read_string(&mut self) -> Result<Token, LexError> {
        let national = self.look == Some('N');
        if national {
            self.advance();
        }
        self.advance();

        loop {
            match self.look {
                None => return Err(self.expected("'")),
                Some('\'') => {
                    if self.peek() == Some('\'') {
                        self.advance();
                        self.stash();
                    } else {
                        self.advance();
                        break;
                    }
                }
                Some(_) => self.stash(),
            }
        }

        let kind = if national {
            TokenKind::NvarcharConstant
        } else {
            TokenKind::VarcharConstant
        };
        let text = self.take_buffer();
        Ok(self.make_token(kind).with_value(TokenValue::Text(text)))
    }

    fn read_line_comment(&mut self) -> Token {
        self.advance();
        self.advance();
        while self.look.is_some_and(|c| c != '\r' && c != '\n') {
            self.stash();
        }
        let text = self.take_buffer();
        self.make_token(TokenKind::LineComment)
            .with_value(TokenValue::Text(text))
    }

    fn read_block_comment(&mut self) -> Result<Token, LexError> {
        self.advance();
        self.advance();
        loop {
            let ch = self.look;
            match ch {
                None => return Err(self.expected("*/")),
                Some('*') if self.peek() == Some('/') => {
                    self.advance();
                    self.advance();
                    break;
                }
                Some(_) => self.stash(),
            }
        }
        let text = self.take_buffer();
        Ok(self
            .make_token(TokenKind::BlockComment)
            .with_value(TokenValue::Text(text)))
    }

    /// Take the current character and, when the next one is `=`, that too.
    fn with_assign(&mut self, plain: TokenKind, assign: TokenKind) -> TokenKind {
        self.advance();
        if self.look == Some('=') {
            self.advance();
            assign
        } else {
            plain
        }
    }

    fn read_operator(&mut self) -> Result<Token, LexError> {
        let Some(ch) = self.look else {
            return Ok(self.make_token(TokenKind::Eof));
        };

        let kind = match ch {
            '.' => {
                self.advance();
                TokenKind::Dot
            }
            ':' => {
                self.advance();
                if self.look != Some(':') {
                    return Err(self.expected(":"));
                }
                self.advance();
                TokenKind::DoubleColon
            }
            '+' => self.with_assign(TokenKind::Plus, TokenKind::PlusEq),
            '-' => self.with_assign(TokenKind::Minus, TokenKind::MinusEq),
            '*' => self.with_assign(TokenKind::Star, TokenKind::StarEq),
            '/' => self.with_assign(TokenKind::Slash, TokenKind::SlashEq),
            '%' => self.with_assign(TokenKind::Percent, TokenKind::PercentEq),
            '&' => self.with_assign(TokenKind::Ampersand, TokenKind::AmpersandEq),
            '^' => self.with_assign(TokenKind::Caret, TokenKind::CaretEq),
            '|' => self.with_assign(TokenKind::Pipe, TokenKind::PipeEq),
            '~' => {
                self.advance();
                TokenKind::Tilde
            }
            '<' => {
                self.advance();
                match self.look {
                    Some('>') => {
                        self.advance();
                        TokenKind::LtGt
                    }
                    Some('=') => {
                        self.advance();
                        TokenKind::LtEq
                    }
                    _ => TokenKind::Lt,
                }
            }
            '>' => self.with_assign(TokenKind::Gt, TokenKind::GtEq),
            '!' => {
                self.advance();
                let kind = match self.look {
                    Some('<') => TokenKind::NotLt,
                    Some('>') => TokenKind::NotGt,
                    Some('=') => TokenKind::NotEq,
                    _ => return Err(self.expected("=")),
                };
                self.advance();
                kind
            }
            '=' => {
                self.advance();
                TokenKind::Eq
            }
            ',' => {
                self.advance();
                TokenKind::Comma
            }
            '(' => {
                self.advance();
                TokenKind::LParen
            }
            ')' => {
                self.advance();
                TokenKind::RParen
            }
            ';' => {
                self.advance();
                TokenKind::Semicolon
            }
            other => {
                return Err(LexError::UnexpectedCharacter {
                    character: other,
                    line: self.token_line,
                    column: self.token_column,
                });
            }
        };

        Ok(self.make_token(kind))
    }
}

/// Yields every token up to, but not including, the end of input. Iteration
/// stops after the first error.
impl<I: Iterator<Item = char>> Iterator for Lexer<I> {
    type Item = Result<Token, LexError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        match self.next_token() {
            Ok(token) if token.kind == TokenKind::Eof => {
                self.finished = true;
                None
            }
            Ok(token) => Some(Ok(token)),
            Err(e) => {
                self.finished = true;
                Some(Err(e))
            }
        }
    }
}

/// Lex a whole string into tokens, excluding the end-of-input marker.
pub fn tokenize(source: &str) -> Result<Vec<Token>, LexError> {
    Lexer::from_source(source).collect()
}

#[test]
fn test_compound_assignment_consumes_equals() {
    let kinds: Vec<TokenKind> = tokenize("- += =")
        .unwrap()
        .into_iter()
        .map(|t| t.kind)
        .collect();
    assert_eq!(kinds, vec![TokenKind::Minus, TokenKind::PlusEq, TokenKind::Eq]);
}

#[test]
fn test_peek_is_idempotent() {
    let mut lexer = Lexer::from_source("ab");
    assert_eq!(lexer.peek(), Some('b'));
    assert_eq!(lexer.peek(), Some('b'));
    lexer.advance();
    assert_eq!(lexer.look, Some('b'));
    assert_eq!(lexer.peek(), None);
}

#[test]
fn test_positions() {
    let tokens = tokenize("select\n  x").unwrap();
    assert_eq!((tokens[0].line, tokens[0].column, tokens[0].character_index), (1, 1, 1));
    assert_eq!((tokens[1].line, tokens[1].column, tokens[1].character_index), (2, 3, 10));
}

#[test]
fn test_eof_token_is_repeatable() {
    let mut lexer = Lexer::from_source(" ");
    assert_eq!(lexer.next_token().unwrap().kind, TokenKind::Eof);
    assert_eq!(lexer.next_token().unwrap().kind, TokenKind::Eof);
}
