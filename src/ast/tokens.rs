use std::fmt;

use rust_decimal::Decimal;

use super::keywords::Keyword;

/// Classification of a lexical token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// Plain, bracketed (`[x]`) or quoted (`"x"`) identifier, including `@variables`
    /// and `#temp` names.
    Identifier,

    // Constants
    /// Integer literal that fits in 32 bits
    IntConstant,
    /// Integer literal that fits in 64 bits
    BigIntConstant,
    /// Literal with a decimal point, or an integer too wide for 64 bits
    NumericConstant,
    /// Literal with an exponent
    ///
    /// # Examples
    /// ```text
    /// 3e+4
    /// 1.5E-2
    /// ```
    RealConstant,
    /// `'text'`
    VarcharConstant,
    /// `N'text'`
    NvarcharConstant,

    // Comments
    /// `-- text` up to the end of the line
    LineComment,
    /// `/* text */`
    BlockComment,

    /// Reserved word. The token text keeps the source casing.
    Keyword(Keyword),

    // Operators
    /// `.`
    Dot,
    /// `::`
    DoubleColon,
    /// `+`
    Plus,
    /// `+=`
    PlusEq,
    /// `-`
    Minus,
    /// `-=`
    MinusEq,
    /// `*`
    Star,
    /// `*=`
    StarEq,
    /// `/`
    Slash,
    /// `/=`
    SlashEq,
    /// `%`
    Percent,
    /// `%=`
    PercentEq,
    /// `&`
    Ampersand,
    /// `&=`
    AmpersandEq,
    /// `^`
    Caret,
    /// `^=`
    CaretEq,
    /// `|`
    Pipe,
    /// `|=`
    PipeEq,
    /// `~`
    Tilde,
    /// `=`
    Eq,
    /// `<`
    Lt,
    /// `<=`
    LtEq,
    /// `<>`
    LtGt,
    /// `>`
    Gt,
    /// `>=`
    GtEq,
    /// `!=`
    NotEq,
    /// `!<`
    NotLt,
    /// `!>`
    NotGt,

    // Punctuation
    Comma,
    LParen,
    RParen,
    Semicolon,

    /// End of input. Always the last token a lexer produces.
    Eof,
}

impl TokenKind {
    /// Classify a scanned word: a keyword when the reserved table knows it,
    /// otherwise a plain identifier.
    pub fn classify(word: &str) -> TokenKind {
        match Keyword::lookup(word) {
            Some(keyword) => TokenKind::Keyword(keyword),
            None => TokenKind::Identifier,
        }
    }

    pub fn is_comment(self) -> bool {
        matches!(self, TokenKind::LineComment | TokenKind::BlockComment)
    }

    pub fn is_keyword(self, keyword: Keyword) -> bool {
        self == TokenKind::Keyword(keyword)
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::Keyword(keyword) => f.write_str(keyword.as_str()),
            other => write!(f, "{:?}", other),
        }
    }
}

/// Payload carried by a token; which variant is populated follows from the kind.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenValue {
    /// Operators, punctuation and end of input
    None,
    /// Identifiers, keywords, string constants and comment bodies
    Text(String),
    Int(i32),
    BigInt(i64),
    Numeric(Decimal),
    Real(f64),
}

/// A classified, positioned lexical unit.
///
/// `line` is 1-based, `column` counts characters since the last `\n` (carriage
/// returns are not counted) and `character_index` is the 1-based ordinal of the
/// token's first character in the whole source.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub line: usize,
    pub column: usize,
    pub character_index: usize,
    pub value: TokenValue,
}

impl Token {
    pub fn new(kind: TokenKind, line: usize, column: usize, character_index: usize) -> Self {
        Token {
            kind,
            line,
            column,
            character_index,
            value: TokenValue::None,
        }
    }

    pub fn with_value(mut self, value: TokenValue) -> Self {
        self.value = value;
        self
    }

    /// Text payload, or the empty string for tokens that carry none.
    pub fn text(&self) -> &str {
        match &self.value {
            TokenValue::Text(text) => text,
            _ => "",
        }
    }

    pub fn int_value(&self) -> Option<i32> {
        match self.value {
            TokenValue::Int(value) => Some(value),
            _ => None,
        }
    }

    pub fn big_int_value(&self) -> Option<i64> {
        match self.value {
            TokenValue::BigInt(value) => Some(value),
            _ => None,
        }
    }

    pub fn numeric_value(&self) -> Option<Decimal> {
        match self.value {
            TokenValue::Numeric(value) => Some(value),
            _ => None,
        }
    }

    pub fn real_value(&self) -> Option<f64> {
        match self.value {
            TokenValue::Real(value) => Some(value),
            _ => None,
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Token {},{} - {}", self.line, self.column, self.kind)?;
        match (&self.kind, &self.value) {
            (TokenKind::VarcharConstant, TokenValue::Text(text)) => {
                write!(f, " => '{}'", text.replace('\'', "''"))
            }
            (TokenKind::NvarcharConstant, TokenValue::Text(text)) => {
                write!(f, " => N'{}'", text.replace('\'', "''"))
            }
            (TokenKind::Keyword(_), _) => Ok(()),
            (_, TokenValue::Text(text)) => write!(f, " => {}", text),
            (_, TokenValue::Int(value)) => write!(f, " => {}", value),
            (_, TokenValue::BigInt(value)) => write!(f, " => {}", value),
            (_, TokenValue::Numeric(value)) => write!(f, " => {}", value),
            (_, TokenValue::Real(value)) => write!(f, " => {}", value),
            (_, TokenValue::None) => Ok(()),
        }
    }
}

/// The token an AST node was built from.
///
/// Two origins always compare equal, so structural equality of nodes ignores
/// where in the source they came from.
#[derive(Debug, Clone)]
pub struct Origin(pub Token);

impl Origin {
    pub fn token(&self) -> &Token {
        &self.0
    }

    pub fn line(&self) -> usize {
        self.0.line
    }

    pub fn column(&self) -> usize {
        self.0.column
    }
}

impl From<Token> for Origin {
    fn from(token: Token) -> Self {
        Origin(token)
    }
}

/// An origin with no source position, for nodes built in code.
impl Default for Origin {
    fn default() -> Self {
        Origin(Token::new(TokenKind::Eof, 0, 0, 0))
    }
}

impl PartialEq for Origin {
    fn eq(&self, _other: &Self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_words() {
        assert_eq!(TokenKind::classify("delete"), TokenKind::Keyword(Keyword::Delete));
        assert_eq!(TokenKind::classify("tb_table"), TokenKind::Identifier);
        assert_eq!(TokenKind::classify("@count"), TokenKind::Identifier);
    }

    #[test]
    fn kind_display() {
        assert_eq!(TokenKind::Keyword(Keyword::Select).to_string(), "SELECT");
        assert_eq!(TokenKind::LtEq.to_string(), "LtEq");
        assert_eq!(TokenKind::Eof.to_string(), "Eof");
    }

    #[test]
    fn token_display() {
        let token = Token::new(TokenKind::VarcharConstant, 2, 4, 9)
            .with_value(TokenValue::Text("it's".to_string()));
        assert_eq!(token.to_string(), "Token 2,4 - VarcharConstant => 'it''s'");

        let token = Token::new(TokenKind::IntConstant, 1, 0, 1).with_value(TokenValue::Int(7));
        assert_eq!(token.to_string(), "Token 1,0 - IntConstant => 7");

        let token = Token::new(TokenKind::Comma, 1, 3, 4);
        assert_eq!(token.to_string(), "Token 1,3 - Comma");
    }

    #[test]
    fn origins_ignore_position() {
        let a = Origin::from(Token::new(TokenKind::Identifier, 1, 1, 1));
        let b = Origin::from(Token::new(TokenKind::Identifier, 9, 4, 120));
        assert_eq!(a, b);
        assert_eq!(b.line(), 9);
    }
}
