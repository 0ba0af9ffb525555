use std::mem;
use std::str::Chars;

use thiserror::Error;

use crate::ast::{
    precedence, BinaryOperator, BlockStatement, BooleanExpression, Column, ComparisonOperator,
    Constant, DeleteStatement, EmptyStatement, Expression, FromSource, IfStatement, JoinType,
    Keyword, LogicalOperator, Origin, RangeQuantifier, Reference, ReferenceFrom,
    SelectInsertStatement, SelectStatement, Statement, SubqueryFrom, TableHint, Token, TokenKind,
    TokenValue, UnaryOperator, UpdateStatement, ValuesInsertStatement, ValuesRow, WhileStatement,
};
use crate::lexer::{LexError, Lexer};

/// The token stream does not match the grammar. Parsing stops at the first one.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    #[error("`{found}` unexpected at line {line} char {column}.")]
    Unexpected {
        found: TokenKind,
        line: usize,
        column: usize,
    },

    #[error("'{expected}' expected at line {line} char {column}. Found `{found}`")]
    Expected {
        expected: String,
        found: TokenKind,
        line: usize,
        column: usize,
    },

    #[error(transparent)]
    Lex(#[from] LexError),
}

/// Result of reading a parenthesized group in predicate position, where it is
/// not known up front whether the group holds a predicate or a value.
enum Operand {
    Boolean(BooleanExpression),
    Value(Expression),
}

/// Recursive-descent parser over a token stream.
///
/// Comments are skipped. The parser holds exactly one token of lookahead and
/// never backtracks; statements are produced one at a time by
/// [`Parser::next_statement`] or by iterating.
pub struct Parser<T: Iterator<Item = Result<Token, LexError>>> {
    tokens: T,
    current: Token,
    started: bool,
    finished: bool,
}

impl<'a> Parser<Lexer<Chars<'a>>> {
    pub fn from_source(source: &'a str) -> Self {
        Parser::new(Lexer::from_source(source))
    }
}

impl<T: Iterator<Item = Result<Token, LexError>>> Parser<T> {
    pub fn new(tokens: T) -> Self {
        Parser {
            tokens,
            current: Token::new(TokenKind::Eof, 1, 0, 0),
            started: false,
            finished: false,
        }
    }

    /// Parse the next top-level statement; `Ok(None)` once input is exhausted.
    pub fn next_statement(&mut self) -> Result<Option<Statement>, ParseError> {
        if !self.started {
            self.started = true;
            self.current = self.read_token()?;
        }
        if self.check(TokenKind::Eof) {
            return Ok(None);
        }
        self.parse_statement().map(Some)
    }

    // ------------------------------------------------------------------
    // Token cursor
    // ------------------------------------------------------------------

    /// Next non-comment token. End of input is reported as an `Eof` token at
    /// the position of the last real token.
    fn read_token(&mut self) -> Result<Token, ParseError> {
        loop {
            match self.tokens.next() {
                Some(Ok(token)) if token.kind.is_comment() => continue,
                Some(Ok(token)) => return Ok(token),
                Some(Err(e)) => return Err(e.into()),
                None => {
                    return Ok(Token::new(
                        TokenKind::Eof,
                        self.current.line,
                        self.current.column,
                        self.current.character_index,
                    ));
                }
            }
        }
    }

    /// Consume the current token and return it.
    fn bump(&mut self) -> Result<Token, ParseError> {
        let next = self.read_token()?;
        Ok(mem::replace(&mut self.current, next))
    }

    fn check(&self, kind: TokenKind) -> bool {
        self.current.kind == kind
    }

    fn check_keyword(&self, keyword: Keyword) -> bool {
        self.current.kind.is_keyword(keyword)
    }

    fn eat(&mut self, kind: TokenKind) -> Result<bool, ParseError> {
        if self.check(kind) {
            self.bump()?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    fn eat_keyword(&mut self, keyword: Keyword) -> Result<bool, ParseError> {
        self.eat(TokenKind::Keyword(keyword))
    }

    fn expect(&mut self, kind: TokenKind) -> Result<Token, ParseError> {
        if self.check(kind) {
            self.bump()
        } else {
            Err(self.expected(kind.to_string()))
        }
    }

    fn expect_keyword(&mut self, keyword: Keyword) -> Result<Token, ParseError> {
        self.expect(TokenKind::Keyword(keyword))
    }

    fn expected(&self, expected: impl Into<String>) -> ParseError {
        ParseError::Expected {
            expected: expected.into(),
            found: self.current.kind,
            line: self.current.line,
            column: self.current.column,
        }
    }

    fn unexpected(&self) -> ParseError {
        ParseError::Unexpected {
            found: self.current.kind,
            line: self.current.line,
            column: self.current.column,
        }
    }

    fn origin(&self) -> Origin {
        Origin::from(self.current.clone())
    }

    // ------------------------------------------------------------------
    // Statements
    // ------------------------------------------------------------------

    fn parse_statement(&mut self) -> Result<Statement, ParseError> {
        let mut statement = match self.current.kind {
            TokenKind::Keyword(Keyword::Select) => Statement::Select(self.parse_select()?),
            TokenKind::Keyword(Keyword::Insert) => self.parse_insert()?,
            TokenKind::Keyword(Keyword::Update) => Statement::Update(self.parse_update()?),
            TokenKind::Keyword(Keyword::Delete) => Statement::Delete(self.parse_delete()?),
            TokenKind::Keyword(Keyword::If) => return self.parse_if().map(Statement::If),
            TokenKind::Keyword(Keyword::While) => return self.parse_while().map(Statement::While),
            TokenKind::Keyword(Keyword::Begin) => return self.parse_block().map(Statement::Block),
            TokenKind::Semicolon => {
                let token = self.bump()?;
                return Ok(Statement::Empty(EmptyStatement {
                    origin: token.into(),
                    has_terminator: true,
                }));
            }
            _ => return Err(self.unexpected()),
        };

        let terminated = self.eat(TokenKind::Semicolon)?;
        statement.set_terminator(terminated);
        Ok(statement)
    }

    fn parse_select(&mut self) -> Result<SelectStatement, ParseError> {
        let origin = self.expect_keyword(Keyword::Select)?.into();
        let top = self.parse_top(true)?;

        let mut columns = vec![self.parse_column()?];
        while self.eat(TokenKind::Comma)? {
            columns.push(self.parse_column()?);
        }

        let from = self.parse_optional_from()?;
        let where_clause = self.parse_where()?;

        Ok(SelectStatement {
            origin,
            top,
            columns,
            from,
            where_clause,
            has_terminator: false,
        })
    }

    fn parse_insert(&mut self) -> Result<Statement, ParseError> {
        let origin: Origin = self.expect_keyword(Keyword::Insert)?.into();
        let top = self.parse_top(true)?;
        self.eat_keyword(Keyword::Into)?;
        let target = self.parse_reference()?;
        // a bare parenthesis here opens the column list
        let hints = self.parse_hints(false)?;

        let mut columns = Vec::new();
        if self.eat(TokenKind::LParen)? {
            columns.push(self.parse_reference()?);
            while self.eat(TokenKind::Comma)? {
                columns.push(self.parse_reference()?);
            }
            self.expect(TokenKind::RParen)?;
        }

        match self.current.kind {
            TokenKind::Keyword(Keyword::Values) => {
                self.bump()?;
                let mut rows = vec![self.parse_values_row()?];
                while self.eat(TokenKind::Comma)? {
                    rows.push(self.parse_values_row()?);
                }
                Ok(Statement::ValuesInsert(ValuesInsertStatement {
                    origin,
                    top,
                    target,
                    hints,
                    columns,
                    rows,
                    has_terminator: false,
                }))
            }
            TokenKind::Keyword(Keyword::Select) => {
                let select = self.parse_select()?;
                Ok(Statement::SelectInsert(SelectInsertStatement {
                    origin,
                    top,
                    target,
                    hints,
                    columns,
                    select,
                    has_terminator: false,
                }))
            }
            _ => Err(self.expected("VALUES")),
        }
    }

    fn parse_values_row(&mut self) -> Result<ValuesRow, ParseError> {
        let origin = self.expect(TokenKind::LParen)?.into();
        let values = self.parse_expression_list()?;
        self.expect(TokenKind::RParen)?;
        Ok(ValuesRow { origin, values })
    }

    fn parse_update(&mut self) -> Result<UpdateStatement, ParseError> {
        let origin = self.expect_keyword(Keyword::Update)?.into();
        let top = self.parse_top(false)?;
        let target = self.parse_reference()?;
        self.expect_keyword(Keyword::Set)?;

        let mut set = vec![self.parse_set_column()?];
        while self.eat(TokenKind::Comma)? {
            set.push(self.parse_set_column()?);
        }

        let from = self.parse_optional_from()?;
        let where_clause = self.parse_where()?;

        Ok(UpdateStatement {
            origin,
            top,
            target,
            set,
            from,
            where_clause,
            has_terminator: false,
        })
    }

    fn parse_delete(&mut self) -> Result<DeleteStatement, ParseError> {
        let origin = self.expect_keyword(Keyword::Delete)?.into();
        let top = self.parse_top(true)?;
        self.eat_keyword(Keyword::From)?;
        let target = self.parse_reference()?;
        let from = self.parse_optional_from()?;
        let where_clause = self.parse_where()?;

        Ok(DeleteStatement {
            origin,
            top,
            target,
            from,
            where_clause,
            has_terminator: false,
        })
    }

    fn parse_if(&mut self) -> Result<IfStatement, ParseError> {
        let origin = self.expect_keyword(Keyword::If)?.into();
        let test = self.parse_boolean()?;
        let then_branch = Box::new(self.parse_statement()?);
        let else_branch = if self.eat_keyword(Keyword::Else)? {
            Some(Box::new(self.parse_statement()?))
        } else {
            None
        };

        Ok(IfStatement {
            origin,
            test,
            then_branch,
            else_branch,
        })
    }

    fn parse_while(&mut self) -> Result<WhileStatement, ParseError> {
        let origin = self.expect_keyword(Keyword::While)?.into();
        let test = self.parse_boolean()?;
        let body = Box::new(self.parse_statement()?);
        Ok(WhileStatement { origin, test, body })
    }

    fn parse_block(&mut self) -> Result<BlockStatement, ParseError> {
        let origin = self.expect_keyword(Keyword::Begin)?.into();
        let mut body = Vec::new();
        while !self.check_keyword(Keyword::End) {
            if self.check(TokenKind::Eof) {
                return Err(self.expected("END"));
            }
            body.push(self.parse_statement()?);
        }
        self.bump()?;
        Ok(BlockStatement { origin, body })
    }

    // ------------------------------------------------------------------
    // Clauses
    // ------------------------------------------------------------------

    /// `TOP (expr)`, or `TOP expr` where parentheses are optional.
    fn parse_top(&mut self, parenthesized: bool) -> Result<Option<Expression>, ParseError> {
        if !self.eat_keyword(Keyword::Top)? {
            return Ok(None);
        }
        if parenthesized && !self.check(TokenKind::LParen) {
            return Err(self.expected("("));
        }
        let top = if parenthesized {
            self.parse_primary()?
        } else {
            self.parse_expression()?
        };
        Ok(Some(top))
    }

    fn parse_where(&mut self) -> Result<Option<BooleanExpression>, ParseError> {
        if self.eat_keyword(Keyword::Where)? {
            Ok(Some(self.parse_boolean()?))
        } else {
            Ok(None)
        }
    }

    fn parse_column(&mut self) -> Result<Column, ParseError> {
        let origin = self.origin();
        if self.eat(TokenKind::Star)? {
            return Ok(Column::Star {
                origin,
                table: None,
            });
        }

        let primary = self.parse_primary()?;

        // `t.*` arrives as a reference with a trailing empty part
        if let Expression::Reference(reference) = &primary {
            if reference.parts.len() > 1
                && reference.object_name().is_empty()
                && self.check(TokenKind::Star)
            {
                self.bump()?;
                let table = reference.parts[..reference.parts.len() - 1].join(".");
                return Ok(Column::Star {
                    origin,
                    table: Some(table),
                });
            }
        }

        if self.check(TokenKind::Eq) {
            if let Some(alias) = leading_alias(&primary) {
                self.bump()?;
                let expression = self.parse_expression()?;
                return Ok(Column::Expression {
                    origin,
                    expression,
                    alias: Some(alias),
                });
            }
        }

        let expression = self.climb_expression(primary, precedence::ADDITIVE)?;
        let alias = self.parse_alias(true)?;
        Ok(Column::Expression {
            origin,
            expression,
            alias,
        })
    }

    fn parse_set_column(&mut self) -> Result<Column, ParseError> {
        let origin = self.origin();
        let target = self.parse_reference()?;
        self.expect(TokenKind::Eq)?;
        let expression = self.parse_expression()?;
        Ok(Column::Set {
            origin,
            target,
            expression,
        })
    }

    /// `AS name`, or a bare identifier. Column aliases may also be strings.
    fn parse_alias(&mut self, allow_string: bool) -> Result<Option<String>, ParseError> {
        let explicit = self.eat_keyword(Keyword::As)?;
        match self.current.kind {
            TokenKind::Identifier => Ok(Some(self.bump()?.text().to_string())),
            TokenKind::VarcharConstant if explicit && allow_string => {
                let token = self.bump()?;
                Ok(Some(quote(token.text())))
            }
            _ if explicit => Err(self.expected("Identifier")),
            _ => Ok(None),
        }
    }

    fn parse_optional_from(&mut self) -> Result<Vec<FromSource>, ParseError> {
        if !self.eat_keyword(Keyword::From)? {
            return Ok(Vec::new());
        }
        let mut sources = vec![self.parse_from_source(JoinType::Primary)?];
        while let Some(join) = self.parse_join_type()? {
            sources.push(self.parse_from_source(join)?);
        }
        Ok(sources)
    }

    fn parse_join_type(&mut self) -> Result<Option<JoinType>, ParseError> {
        let join = match self.current.kind {
            TokenKind::Keyword(Keyword::Join) => {
                self.bump()?;
                JoinType::Inner
            }
            TokenKind::Keyword(Keyword::Inner) => {
                self.bump()?;
                self.expect_keyword(Keyword::Join)?;
                JoinType::Inner
            }
            TokenKind::Keyword(keyword @ (Keyword::Left | Keyword::Right | Keyword::Full)) => {
                self.bump()?;
                self.eat_keyword(Keyword::Outer)?;
                self.expect_keyword(Keyword::Join)?;
                match keyword {
                    Keyword::Left => JoinType::Left,
                    Keyword::Right => JoinType::Right,
                    _ => JoinType::Full,
                }
            }
            TokenKind::Keyword(Keyword::Cross) => {
                self.bump()?;
                if self.eat_keyword(Keyword::Join)? {
                    JoinType::CrossJoin
                } else if self.eat_apply()? {
                    JoinType::CrossApply
                } else {
                    return Err(self.expected("JOIN"));
                }
            }
            TokenKind::Keyword(Keyword::Outer) => {
                self.bump()?;
                if !self.eat_apply()? {
                    return Err(self.expected("APPLY"));
                }
                JoinType::OuterApply
            }
            _ => return Ok(None),
        };
        Ok(Some(join))
    }

    /// `APPLY` is not reserved, so it arrives as an identifier.
    fn eat_apply(&mut self) -> Result<bool, ParseError> {
        if self.check(TokenKind::Identifier) && self.current.text().eq_ignore_ascii_case("APPLY") {
            self.bump()?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    fn parse_from_source(&mut self, join: JoinType) -> Result<FromSource, ParseError> {
        let origin = self.origin();

        if self.eat(TokenKind::LParen)? {
            let subquery = Box::new(self.parse_select()?);
            self.expect(TokenKind::RParen)?;
            let alias = self.parse_alias(false)?;
            let on = self.parse_on(join)?;
            return Ok(FromSource::Subquery(SubqueryFrom {
                origin,
                subquery,
                alias,
                join,
                on,
            }));
        }

        let name = self.parse_reference()?;
        let alias = self.parse_alias(false)?;
        let hints = self.parse_hints(true)?;
        let on = self.parse_on(join)?;
        Ok(FromSource::Reference(ReferenceFrom {
            origin,
            name,
            alias,
            join,
            hints,
            on,
        }))
    }

    fn parse_on(&mut self, join: JoinType) -> Result<Option<BooleanExpression>, ParseError> {
        if !join.requires_on() {
            return Ok(None);
        }
        self.expect_keyword(Keyword::On)?;
        Ok(Some(self.parse_boolean()?))
    }

    /// `WITH (hint, ...)`; with `bare` set, `(hint, ...)` without `WITH` too.
    fn parse_hints(&mut self, bare: bool) -> Result<Vec<TableHint>, ParseError> {
        let with = self.eat_keyword(Keyword::With)?;
        if !with && !(bare && self.check(TokenKind::LParen)) {
            return Ok(Vec::new());
        }

        self.expect(TokenKind::LParen)?;
        let mut hints = vec![self.parse_hint()?];
        while self.eat(TokenKind::Comma)? {
            hints.push(self.parse_hint()?);
        }
        self.expect(TokenKind::RParen)?;
        Ok(hints)
    }

    fn parse_hint(&mut self) -> Result<TableHint, ParseError> {
        let hint = match self.current.kind {
            TokenKind::Identifier | TokenKind::Keyword(Keyword::Holdlock) => {
                TableHint::lookup(self.current.text())
            }
            _ => None,
        };
        match hint {
            Some(hint) => {
                self.bump()?;
                Ok(hint)
            }
            None => Err(self.unexpected()),
        }
    }

    /// Dotted name. A `.` at the start or after another `.` stands for an
    /// empty part, as does a trailing `.`.
    fn parse_reference(&mut self) -> Result<Reference, ParseError> {
        let origin = self.origin();
        let mut parts = Vec::new();
        let mut after_dot = true;
        let mut has_identifier = false;

        loop {
            match self.current.kind {
                TokenKind::Dot => {
                    if after_dot {
                        parts.push(String::new());
                    }
                    self.bump()?;
                    after_dot = true;
                }
                TokenKind::Identifier if after_dot => {
                    parts.push(self.bump()?.text().to_string());
                    after_dot = false;
                    has_identifier = true;
                }
                _ => break,
            }
        }

        if !has_identifier {
            return Err(self.expected("Identifier"));
        }
        if after_dot {
            parts.push(String::new());
        }
        Ok(Reference::new(origin, parts))
    }

    // ------------------------------------------------------------------
    // Expressions
    // ------------------------------------------------------------------

    /// Parse a value expression.
    pub fn parse_expression(&mut self) -> Result<Expression, ParseError> {
        let primary = self.parse_primary()?;
        self.climb_expression(primary, precedence::ADDITIVE)
    }

    fn parse_expression_list(&mut self) -> Result<Vec<Expression>, ParseError> {
        let mut list = vec![self.parse_expression()?];
        while self.eat(TokenKind::Comma)? {
            list.push(self.parse_expression()?);
        }
        Ok(list)
    }

    /// Fold binary operators of tier `min` or tighter onto `left`.
    fn climb_expression(&mut self, mut left: Expression, min: u8) -> Result<Expression, ParseError> {
        while let Some(operator) = BinaryOperator::from_token(self.current.kind) {
            let tier = operator.precedence();
            if tier < min {
                break;
            }
            let origin = self.bump()?.into();
            let mut right = self.parse_primary()?;
            while let Some(next) = BinaryOperator::from_token(self.current.kind) {
                if next.precedence() <= tier {
                    break;
                }
                right = self.climb_expression(right, next.precedence())?;
            }
            left = Expression::Binary {
                origin,
                left: Box::new(left),
                operator,
                right: Box::new(right),
            };
        }
        Ok(left)
    }

    fn parse_primary(&mut self) -> Result<Expression, ParseError> {
        match self.current.kind {
            TokenKind::IntConstant
            | TokenKind::BigIntConstant
            | TokenKind::NumericConstant
            | TokenKind::RealConstant
            | TokenKind::VarcharConstant
            | TokenKind::NvarcharConstant => {
                let token = self.bump()?;
                let value = constant_value(&token).ok_or(ParseError::Unexpected {
                    found: token.kind,
                    line: token.line,
                    column: token.column,
                })?;
                Ok(Expression::Constant {
                    origin: token.into(),
                    value,
                })
            }
            kind @ (TokenKind::Plus | TokenKind::Minus | TokenKind::Tilde) => {
                let origin = self.bump()?.into();
                let operator = match UnaryOperator::from_token(kind) {
                    Some(operator) => operator,
                    None => return Err(self.unexpected()),
                };
                let operand = Box::new(self.parse_primary()?);
                Ok(Expression::Unary {
                    origin,
                    operator,
                    operand,
                })
            }
            TokenKind::Keyword(Keyword::Null) => Ok(Expression::Null {
                origin: self.bump()?.into(),
            }),
            TokenKind::Identifier | TokenKind::Dot => {
                let reference = self.parse_reference()?;
                if self.check(TokenKind::LParen) {
                    self.parse_function_call(reference)
                } else {
                    Ok(Expression::Reference(reference))
                }
            }
            // reserved words that double as built-in functions
            TokenKind::Keyword(
                Keyword::Coalesce | Keyword::Nullif | Keyword::Left | Keyword::Right,
            ) => {
                let token = self.bump()?;
                let name = token.text().to_string();
                let reference = Reference::new(token.into(), vec![name]);
                if !self.check(TokenKind::LParen) {
                    return Err(self.expected("("));
                }
                self.parse_function_call(reference)
            }
            TokenKind::LParen => {
                let origin = self.bump()?.into();
                if self.check_keyword(Keyword::Select) {
                    let select = Box::new(self.parse_select()?);
                    self.expect(TokenKind::RParen)?;
                    return Ok(Expression::Subquery { origin, select });
                }
                let inner = Box::new(self.parse_expression()?);
                self.expect(TokenKind::RParen)?;
                Ok(Expression::Grouped { origin, inner })
            }
            _ => Err(self.unexpected()),
        }
    }

    fn parse_function_call(&mut self, function: Reference) -> Result<Expression, ParseError> {
        let origin = function.origin.clone();
        self.expect(TokenKind::LParen)?;
        let arguments = if self.check(TokenKind::RParen) {
            Vec::new()
        } else {
            self.parse_expression_list()?
        };
        self.expect(TokenKind::RParen)?;
        Ok(Expression::FunctionCall {
            origin,
            function,
            arguments,
        })
    }

    // ------------------------------------------------------------------
    // Predicates
    // ------------------------------------------------------------------

    /// Parse a predicate, with `AND` binding tighter than `OR`.
    pub fn parse_boolean(&mut self) -> Result<BooleanExpression, ParseError> {
        let primary = self.parse_boolean_primary()?;
        self.climb_boolean(primary, precedence::OR)
    }

    fn climb_boolean(
        &mut self,
        mut left: BooleanExpression,
        min: u8,
    ) -> Result<BooleanExpression, ParseError> {
        while let Some(operator) = LogicalOperator::from_token(self.current.kind) {
            let tier = operator.precedence();
            if tier < min {
                break;
            }
            let origin = self.bump()?.into();
            let mut right = self.parse_boolean_primary()?;
            while let Some(next) = LogicalOperator::from_token(self.current.kind) {
                if next.precedence() <= tier {
                    break;
                }
                right = self.climb_boolean(right, next.precedence())?;
            }
            left = BooleanExpression::Binary {
                origin,
                left: Box::new(left),
                operator,
                right: Box::new(right),
            };
        }
        Ok(left)
    }

    fn parse_boolean_primary(&mut self) -> Result<BooleanExpression, ParseError> {
        match self.current.kind {
            TokenKind::Keyword(Keyword::Not) => {
                let origin = self.bump()?.into();
                let inner = Box::new(self.parse_boolean_primary()?);
                Ok(BooleanExpression::Not { origin, inner })
            }
            TokenKind::Keyword(Keyword::Exists) => {
                let origin = self.bump()?.into();
                let subquery = Box::new(self.parse_subquery()?);
                Ok(BooleanExpression::Exists { origin, subquery })
            }
            TokenKind::LParen => match self.parenthesized()? {
                Operand::Boolean(group) => Ok(group),
                Operand::Value(value) => {
                    let left = self.climb_expression(value, precedence::ADDITIVE)?;
                    self.parse_predicate(left)
                }
            },
            _ => {
                let left = self.parse_expression()?;
                self.parse_predicate(left)
            }
        }
    }

    /// Parse `( ... )` in predicate position, deciding from its content whether
    /// it groups a predicate or a value.
    fn parenthesized(&mut self) -> Result<Operand, ParseError> {
        let origin: Origin = self.expect(TokenKind::LParen)?.into();

        match self.current.kind {
            TokenKind::Keyword(Keyword::Select) => {
                let select = Box::new(self.parse_select()?);
                self.expect(TokenKind::RParen)?;
                return Ok(Operand::Value(Expression::Subquery { origin, select }));
            }
            TokenKind::Keyword(Keyword::Not | Keyword::Exists) => {
                let inner = Box::new(self.parse_boolean()?);
                self.expect(TokenKind::RParen)?;
                return Ok(Operand::Boolean(BooleanExpression::Grouped { origin, inner }));
            }
            _ => {}
        }

        let operand = if self.check(TokenKind::LParen) {
            self.parenthesized()?
        } else {
            Operand::Value(self.parse_primary()?)
        };

        let inner = match operand {
            Operand::Boolean(group) => Operand::Boolean(self.climb_boolean(group, precedence::OR)?),
            Operand::Value(value) => {
                let value = self.climb_expression(value, precedence::ADDITIVE)?;
                if self.starts_predicate() {
                    let predicate = self.parse_predicate(value)?;
                    Operand::Boolean(self.climb_boolean(predicate, precedence::OR)?)
                } else {
                    Operand::Value(value)
                }
            }
        };
        self.expect(TokenKind::RParen)?;

        Ok(match inner {
            Operand::Boolean(inner) => Operand::Boolean(BooleanExpression::Grouped {
                origin,
                inner: Box::new(inner),
            }),
            Operand::Value(inner) => Operand::Value(Expression::Grouped {
                origin,
                inner: Box::new(inner),
            }),
        })
    }

    fn starts_predicate(&self) -> bool {
        ComparisonOperator::from_token(self.current.kind).is_some()
            || matches!(
                self.current.kind,
                TokenKind::Keyword(Keyword::Not | Keyword::Between | Keyword::In | Keyword::Is)
            )
    }

    /// Parse whatever follows the left operand of a predicate.
    fn parse_predicate(&mut self, left: Expression) -> Result<BooleanExpression, ParseError> {
        match self.current.kind {
            TokenKind::Keyword(Keyword::Is) => {
                let origin = self.bump()?.into();
                let negated = self.eat_keyword(Keyword::Not)?;
                self.expect_keyword(Keyword::Null)?;
                Ok(BooleanExpression::NullCheck {
                    origin,
                    left,
                    is_null: !negated,
                })
            }
            TokenKind::Keyword(Keyword::Not) => {
                let origin: Origin = self.bump()?.into();
                match self.current.kind {
                    TokenKind::Keyword(Keyword::Between) => self.parse_between(left, true),
                    TokenKind::Keyword(Keyword::In) => self.parse_in(left, true),
                    TokenKind::Keyword(Keyword::Like) => {
                        let like = self.bump()?.into();
                        let right = self.parse_expression()?;
                        Ok(BooleanExpression::Not {
                            origin,
                            inner: Box::new(BooleanExpression::Comparison {
                                origin: like,
                                left,
                                operator: ComparisonOperator::Like,
                                right,
                            }),
                        })
                    }
                    _ => Err(self.expected("LIKE")),
                }
            }
            TokenKind::Keyword(Keyword::Between) => self.parse_between(left, false),
            TokenKind::Keyword(Keyword::In) => self.parse_in(left, false),
            kind => {
                let Some(operator) = ComparisonOperator::from_token(kind) else {
                    return Err(self.unexpected());
                };
                let origin = self.bump()?.into();
                if let Some(quantifier) = RangeQuantifier::from_token(self.current.kind) {
                    self.bump()?;
                    let subquery = Box::new(self.parse_subquery()?);
                    return Ok(BooleanExpression::Range {
                        origin,
                        left,
                        operator,
                        quantifier,
                        subquery,
                    });
                }
                let right = self.parse_expression()?;
                Ok(BooleanExpression::Comparison {
                    origin,
                    left,
                    operator,
                    right,
                })
            }
        }
    }

    fn parse_between(
        &mut self,
        left: Expression,
        negated: bool,
    ) -> Result<BooleanExpression, ParseError> {
        let origin = self.expect_keyword(Keyword::Between)?.into();
        let low = self.parse_expression()?;
        self.expect_keyword(Keyword::And)?;
        let high = self.parse_expression()?;
        Ok(BooleanExpression::Between {
            origin,
            left,
            negated,
            low,
            high,
        })
    }

    fn parse_in(&mut self, left: Expression, negated: bool) -> Result<BooleanExpression, ParseError> {
        let origin = self.expect_keyword(Keyword::In)?.into();
        self.expect(TokenKind::LParen)?;

        if self.check_keyword(Keyword::Select) {
            let subquery = Box::new(self.parse_select()?);
            self.expect(TokenKind::RParen)?;
            return Ok(BooleanExpression::InSubquery {
                origin,
                left,
                negated,
                subquery,
            });
        }

        let list = self.parse_expression_list()?;
        self.expect(TokenKind::RParen)?;
        Ok(BooleanExpression::InList {
            origin,
            left,
            negated,
            list,
        })
    }

    /// `(SELECT ...)`
    fn parse_subquery(&mut self) -> Result<SelectStatement, ParseError> {
        self.expect(TokenKind::LParen)?;
        let select = self.parse_select()?;
        self.expect(TokenKind::RParen)?;
        Ok(select)
    }
}

/// Token payload as a typed constant.
fn constant_value(token: &Token) -> Option<Constant> {
    match (token.kind, &token.value) {
        (TokenKind::VarcharConstant, TokenValue::Text(text)) => Some(Constant::Varchar(text.clone())),
        (TokenKind::NvarcharConstant, TokenValue::Text(text)) => {
            Some(Constant::NVarchar(text.clone()))
        }
        (_, TokenValue::Int(value)) => Some(Constant::Int(*value)),
        (_, TokenValue::BigInt(value)) => Some(Constant::BigInt(*value)),
        (_, TokenValue::Numeric(value)) => Some(Constant::Numeric(*value)),
        (_, TokenValue::Real(value)) => Some(Constant::Real(*value)),
        _ => None,
    }
}

/// Alias of an `alias = expression` column, when the primary can be one.
fn leading_alias(primary: &Expression) -> Option<String> {
    match primary {
        Expression::Reference(reference)
            if reference.is_single_part() && !reference.object_name().is_empty() =>
        {
            Some(reference.identifier())
        }
        Expression::Constant {
            value: Constant::Varchar(text),
            ..
        } => Some(quote(text)),
        _ => None,
    }
}

fn quote(text: &str) -> String {
    format!("'{}'", text.replace('\'', "''"))
}

/// Yields statements until input is exhausted or the first error.
impl<T: Iterator<Item = Result<Token, LexError>>> Iterator for Parser<T> {
    type Item = Result<Statement, ParseError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        match self.next_statement() {
            Ok(Some(statement)) => Some(Ok(statement)),
            Ok(None) => {
                self.finished = true;
                None
            }
            Err(e) => {
                self.finished = true;
                Some(Err(e))
            }
        }
    }
}

/// Parse a whole string into statements.
pub fn parse(source: &str) -> Result<Vec<Statement>, ParseError> {
    Parser::from_source(source).collect()
}
