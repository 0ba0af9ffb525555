use super::{Keyword, TokenKind};

/// Binding strength of binary operators. A higher tier binds tighter; the
/// arithmetic and the logical grammars each have two tiers.
pub mod precedence {
    /// `+ - & | ^`
    pub const ADDITIVE: u8 = 1;
    /// `* / %`
    pub const MULTIPLICATIVE: u8 = 2;
    /// `OR`
    pub const OR: u8 = 1;
    /// `AND`
    pub const AND: u8 = 2;
}

/// Prefix operators applied to a primary expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOperator {
    /// `+`
    Positive,
    /// `-`
    Negative,
    /// `~`
    BitwiseNot,
}

impl UnaryOperator {
    pub fn from_token(kind: TokenKind) -> Option<Self> {
        match kind {
            TokenKind::Plus => Some(UnaryOperator::Positive),
            TokenKind::Minus => Some(UnaryOperator::Negative),
            TokenKind::Tilde => Some(UnaryOperator::BitwiseNot),
            _ => None,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            UnaryOperator::Positive => "+",
            UnaryOperator::Negative => "-",
            UnaryOperator::BitwiseNot => "~",
        }
    }
}

/// Arithmetic and bitwise operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOperator {
    // Additive tier
    /// Addition or string concatenation (`+`)
    Add,
    /// Subtraction (`-`)
    Subtract,
    /// Bitwise AND (`&`)
    BitwiseAnd,
    /// Bitwise OR (`|`)
    BitwiseOr,
    /// Bitwise exclusive OR (`^`)
    BitwiseXor,

    // Multiplicative tier
    /// Multiplication (`*`)
    Multiply,
    /// Division (`/`)
    Divide,
    /// Modulo (`%`)
    Modulo,
}

impl BinaryOperator {
    pub fn from_token(kind: TokenKind) -> Option<Self> {
        match kind {
            TokenKind::Plus => Some(BinaryOperator::Add),
            TokenKind::Minus => Some(BinaryOperator::Subtract),
            TokenKind::Ampersand => Some(BinaryOperator::BitwiseAnd),
            TokenKind::Pipe => Some(BinaryOperator::BitwiseOr),
            TokenKind::Caret => Some(BinaryOperator::BitwiseXor),
            TokenKind::Star => Some(BinaryOperator::Multiply),
            TokenKind::Slash => Some(BinaryOperator::Divide),
            TokenKind::Percent => Some(BinaryOperator::Modulo),
            _ => None,
        }
    }

    pub fn precedence(self) -> u8 {
        match self {
            BinaryOperator::Add
            | BinaryOperator::Subtract
            | BinaryOperator::BitwiseAnd
            | BinaryOperator::BitwiseOr
            | BinaryOperator::BitwiseXor => precedence::ADDITIVE,
            BinaryOperator::Multiply | BinaryOperator::Divide | BinaryOperator::Modulo => {
                precedence::MULTIPLICATIVE
            }
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            BinaryOperator::Add => "+",
            BinaryOperator::Subtract => "-",
            BinaryOperator::BitwiseAnd => "&",
            BinaryOperator::BitwiseOr => "|",
            BinaryOperator::BitwiseXor => "^",
            BinaryOperator::Multiply => "*",
            BinaryOperator::Divide => "/",
            BinaryOperator::Modulo => "%",
        }
    }
}

/// Predicates comparing two values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComparisonOperator {
    /// `=`
    Equal,
    /// `<>` or `!=`
    NotEqual,
    /// `<`
    LessThan,
    /// `<=`
    LessThanOrEqual,
    /// `>`
    GreaterThan,
    /// `>=`
    GreaterThanOrEqual,
    /// `!<`
    NotLessThan,
    /// `!>`
    NotGreaterThan,
    /// `LIKE`
    Like,
}

impl ComparisonOperator {
    pub fn from_token(kind: TokenKind) -> Option<Self> {
        match kind {
            TokenKind::Eq => Some(ComparisonOperator::Equal),
            TokenKind::LtGt | TokenKind::NotEq => Some(ComparisonOperator::NotEqual),
            TokenKind::Lt => Some(ComparisonOperator::LessThan),
            TokenKind::LtEq => Some(ComparisonOperator::LessThanOrEqual),
            TokenKind::Gt => Some(ComparisonOperator::GreaterThan),
            TokenKind::GtEq => Some(ComparisonOperator::GreaterThanOrEqual),
            TokenKind::NotLt => Some(ComparisonOperator::NotLessThan),
            TokenKind::NotGt => Some(ComparisonOperator::NotGreaterThan),
            TokenKind::Keyword(Keyword::Like) => Some(ComparisonOperator::Like),
            _ => None,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            ComparisonOperator::Equal => "=",
            ComparisonOperator::NotEqual => "<>",
            ComparisonOperator::LessThan => "<",
            ComparisonOperator::LessThanOrEqual => "<=",
            ComparisonOperator::GreaterThan => ">",
            ComparisonOperator::GreaterThanOrEqual => ">=",
            ComparisonOperator::NotLessThan => "!<",
            ComparisonOperator::NotGreaterThan => "!>",
            ComparisonOperator::Like => "LIKE",
        }
    }
}

/// Boolean connectives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogicalOperator {
    And,
    Or,
}

impl LogicalOperator {
    pub fn from_token(kind: TokenKind) -> Option<Self> {
        match kind {
            TokenKind::Keyword(Keyword::And) => Some(LogicalOperator::And),
            TokenKind::Keyword(Keyword::Or) => Some(LogicalOperator::Or),
            _ => None,
        }
    }

    pub fn precedence(self) -> u8 {
        match self {
            LogicalOperator::And => precedence::AND,
            LogicalOperator::Or => precedence::OR,
        }
    }

    pub fn keyword(self) -> &'static str {
        match self {
            LogicalOperator::And => "AND",
            LogicalOperator::Or => "OR",
        }
    }
}

/// Quantifier of a subquery comparison such as `x > ALL (SELECT ...)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeQuantifier {
    All,
    Any,
    Some,
}

impl RangeQuantifier {
    pub fn from_token(kind: TokenKind) -> Option<Self> {
        match kind {
            TokenKind::Keyword(Keyword::All) => Some(RangeQuantifier::All),
            TokenKind::Keyword(Keyword::Any) => Some(RangeQuantifier::Any),
            TokenKind::Keyword(Keyword::Some) => Some(RangeQuantifier::Some),
            _ => None,
        }
    }

    pub fn keyword(self) -> &'static str {
        match self {
            RangeQuantifier::All => "ALL",
            RangeQuantifier::Any => "ANY",
            RangeQuantifier::Some => "SOME",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn multiplicative_binds_tighter() {
        assert!(BinaryOperator::Multiply.precedence() > BinaryOperator::Add.precedence());
        assert_eq!(
            BinaryOperator::BitwiseXor.precedence(),
            BinaryOperator::Subtract.precedence()
        );
        assert!(LogicalOperator::And.precedence() > LogicalOperator::Or.precedence());
    }

    #[test]
    fn both_not_equal_spellings() {
        assert_eq!(
            ComparisonOperator::from_token(TokenKind::LtGt),
            ComparisonOperator::from_token(TokenKind::NotEq)
        );
    }
}
