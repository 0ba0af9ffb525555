// tests/lexer_tests.rs

use std::str::FromStr;

use rust_decimal::Decimal;
use tsqlc::ast::{Keyword, Token, TokenKind};
use tsqlc::lexer::{tokenize, LexError, Lexer};
use tsqlc::tsql;

fn kinds(source: &str) -> Vec<TokenKind> {
    tokenize(source)
        .unwrap()
        .into_iter()
        .map(|t| t.kind)
        .collect()
}

fn single(source: &str) -> Token {
    let mut tokens = tokenize(source).unwrap();
    assert_eq!(tokens.len(), 1, "expected exactly one token in {source:?}");
    tokens.remove(0)
}

// ============================================================================
// Empty input
// ============================================================================

#[test]
fn test_empty_input_yields_no_tokens() {
    assert!(tokenize("").unwrap().is_empty());
}

#[test]
fn test_whitespace_input_yields_no_tokens() {
    assert!(tokenize(" \t \n \r \r \u{b}").unwrap().is_empty());
}

#[test]
fn test_missing_source_is_a_construction_error() {
    let err = tsql::lex_source(None).unwrap_err();
    assert!(matches!(err, tsql::Error::MissingSource("characters")));
}

// ============================================================================
// Constants
// ============================================================================

#[test]
fn test_varchar_constant() {
    let token = single(" 'hello' ");
    assert_eq!(token.kind, TokenKind::VarcharConstant);
    assert_eq!(token.text(), "hello");
}

#[test]
fn test_nvarchar_constant() {
    let token = single(" N'hello' ");
    assert_eq!(token.kind, TokenKind::NvarcharConstant);
    assert_eq!(token.text(), "hello");
}

#[test]
fn test_doubled_quote_collapses() {
    let token = single("'it''s'");
    assert_eq!(token.text(), "it's");
}

#[test]
fn test_int_constant() {
    let token = single(" 123 ");
    assert_eq!(token.kind, TokenKind::IntConstant);
    assert_eq!(token.int_value(), Some(123));
}

#[test]
fn test_big_int_constant() {
    let token = single(" 6000000000 ");
    assert_eq!(token.kind, TokenKind::BigIntConstant);
    assert_eq!(token.big_int_value(), Some(6_000_000_000));
}

#[test]
fn test_integer_past_bigint_is_numeric() {
    let token = single("99999999999999999999");
    assert_eq!(token.kind, TokenKind::NumericConstant);
    assert_eq!(
        token.numeric_value(),
        Some(Decimal::from_str("99999999999999999999").unwrap())
    );
}

#[test]
fn test_real_constant() {
    let token = single(" 3e+4 ");
    assert_eq!(token.kind, TokenKind::RealConstant);
    assert_eq!(token.character_index, 2);
    assert_eq!(token.real_value(), Some(30000.0));
}

#[test]
fn test_numeric_constant() {
    let token = single(" 100.001 ");
    assert_eq!(token.kind, TokenKind::NumericConstant);
    assert_eq!(token.numeric_value(), Some(Decimal::from_str("100.001").unwrap()));
}

#[test]
fn test_numeric_with_leading_point() {
    let token = single(".5");
    assert_eq!(token.numeric_value(), Some(Decimal::from_str("0.5").unwrap()));
}

// ============================================================================
// Identifiers and keywords
// ============================================================================

#[test]
fn test_identifier() {
    let token = single(" bye ");
    assert_eq!(token.kind, TokenKind::Identifier);
    assert_eq!(token.text(), "bye");
}

#[test]
fn test_variables_and_temp_tables_are_identifiers() {
    assert_eq!(kinds("@count #tmp"), vec![TokenKind::Identifier, TokenKind::Identifier]);
}

#[test]
fn test_square_bracket_identifier() {
    let token = single(" [  hello  ] ");
    assert_eq!(token.kind, TokenKind::Identifier);
    assert_eq!(token.text(), "[  hello  ]");
}

#[test]
fn test_double_quoted_identifier() {
    let token = single(" \"  hello\" ");
    assert_eq!(token.kind, TokenKind::Identifier);
    assert_eq!(token.text(), "\"  hello\"");
}

#[test]
fn test_keywords_ignore_case() {
    let tokens = tokenize(" SELECT FRoM delete ").unwrap();
    assert_eq!(tokens.len(), 3);
    assert_eq!(tokens[0].kind, TokenKind::Keyword(Keyword::Select));
    assert_eq!(tokens[0].text(), "SELECT");
    assert_eq!(tokens[1].kind, TokenKind::Keyword(Keyword::From));
    assert_eq!(tokens[1].text(), "FRoM");
    assert_eq!(tokens[2].kind, TokenKind::Keyword(Keyword::Delete));
    assert_eq!(tokens[2].text(), "delete");
}

// ============================================================================
// Comments
// ============================================================================

#[test]
fn test_line_comment() {
    let tokens = tokenize("sdsd -- hello").unwrap();
    assert_eq!(tokens.len(), 2);
    assert_eq!(tokens[1].kind, TokenKind::LineComment);
    assert_eq!(tokens[1].text(), " hello");
}

#[test]
fn test_block_comment() {
    let tokens = tokenize("sdsd /* hello\ntodo\n*/ end").unwrap();
    assert_eq!(tokens.len(), 3);
    assert_eq!(tokens[1].kind, TokenKind::BlockComment);
    assert_eq!(tokens[1].character_index, 6);
    assert_eq!(tokens[1].text(), " hello\ntodo\n");
    assert_eq!(tokens[2].kind, TokenKind::Keyword(Keyword::End));
    assert_eq!((tokens[2].line, tokens[2].column), (3, 4));
}

#[test]
fn test_block_comment_with_inner_star() {
    let tokens = tokenize("/* a*b **/ x").unwrap();
    assert_eq!(tokens[0].kind, TokenKind::BlockComment);
    assert_eq!(tokens[0].text(), " a*b *");
    assert_eq!(tokens[1].kind, TokenKind::Identifier);
}

// ============================================================================
// Operators
// ============================================================================

#[test]
fn test_operator_tokens() {
    assert_eq!(
        kinds("- += ="),
        vec![TokenKind::Minus, TokenKind::PlusEq, TokenKind::Eq]
    );
}

#[test]
fn test_comparison_operators() {
    assert_eq!(
        kinds("< <= <> > >= != !< !>"),
        vec![
            TokenKind::Lt,
            TokenKind::LtEq,
            TokenKind::LtGt,
            TokenKind::Gt,
            TokenKind::GtEq,
            TokenKind::NotEq,
            TokenKind::NotLt,
            TokenKind::NotGt,
        ]
    );
}

#[test]
fn test_punctuation_and_scope() {
    assert_eq!(
        kinds("a::b(1,2);"),
        vec![
            TokenKind::Identifier,
            TokenKind::DoubleColon,
            TokenKind::Identifier,
            TokenKind::LParen,
            TokenKind::IntConstant,
            TokenKind::Comma,
            TokenKind::IntConstant,
            TokenKind::RParen,
            TokenKind::Semicolon,
        ]
    );
}

// ============================================================================
// Errors
// ============================================================================

#[test]
fn test_never_ending_identifier() {
    let err = tokenize("[ sadsdsd  ").unwrap_err();
    assert_eq!(err.to_string(), "`]` expected at line 1 char 12.");
}

#[test]
fn test_never_ending_string() {
    let err = tokenize("' sad sd sd ").unwrap_err();
    assert_eq!(err.to_string(), "`'` expected at line 1 char 13.");
}

#[test]
fn test_never_ending_block_comment() {
    let err = tokenize("/* open").unwrap_err();
    assert!(matches!(err, LexError::Expected { expected: "*/", .. }));
}

#[test]
fn test_real_overflow_is_invalid() {
    let err = tokenize("select 1e400").unwrap_err();
    assert_eq!(
        err,
        LexError::InvalidNumber {
            text: "1e400".to_string(),
            line: 1,
            column: 8,
        }
    );
    assert!(tsql::parse("select -1E+999").is_err());
}

#[test]
fn test_numeric_past_decimal_precision_is_invalid() {
    let smallest = single("0.0000000000000000000000000001");
    assert_eq!(smallest.kind, TokenKind::NumericConstant);
    assert_eq!(
        smallest.numeric_value(),
        Some(Decimal::from_str("0.0000000000000000000000000001").unwrap())
    );

    let err = tokenize("0.000000000000000000000000000001").unwrap_err();
    assert!(matches!(err, LexError::InvalidNumber { line: 1, column: 1, .. }));

    let err = tokenize("select 1.2345678901234567890123456789012").unwrap_err();
    assert!(matches!(err, LexError::InvalidNumber { column: 8, .. }));

    let err = tokenize("123456789012345678901234567890123").unwrap_err();
    assert!(matches!(err, LexError::InvalidNumber { .. }));
}

#[test]
fn test_unknown_character() {
    let err = tokenize("select ?").unwrap_err();
    assert_eq!(
        err,
        LexError::UnexpectedCharacter {
            character: '?',
            line: 1,
            column: 8
        }
    );
}

#[test]
fn test_iteration_stops_after_error() {
    let mut lexer = Lexer::from_source("a ? b");
    assert!(matches!(lexer.next(), Some(Ok(_))));
    assert!(matches!(lexer.next(), Some(Err(_))));
    assert!(lexer.next().is_none());
}

// ============================================================================
// Pull interface
// ============================================================================

#[test]
fn test_next_token_ends_with_eof() {
    let mut lexer = Lexer::from_source("x");
    assert_eq!(lexer.next_token().unwrap().kind, TokenKind::Identifier);
    let eof = lexer.next_token().unwrap();
    assert_eq!(eof.kind, TokenKind::Eof);
    assert_eq!((eof.line, eof.column), (1, 2));
}

#[test]
fn test_lexing_from_any_char_source() {
    let tokens = tsql::lex_chars("select 1".chars().collect::<Vec<_>>()).unwrap();
    assert_eq!(tokens.len(), 2);
}
