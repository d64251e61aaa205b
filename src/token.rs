/// Possible tokens to find in an expression
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    /// A numeric literal or a function name
    Value(String),
    /// An arithmetic operator
    Op(Op),
    /// Left parenthesis
    LParen,
    /// Right parenthesis
    RParen,
}

/// Operators accepted by the expression evaluator
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Op {
    /// `+`
    Plus,
    /// `-`
    Minus,
    /// `*`
    Mul,
    /// `/`
    Div,
    /// `%`
    Rem,
    /// Unary minus
    Neg,
    /// `^` or `**`
    Exp,
}

impl Op {
    /// Get the operator precedence. Operators with higher precedence should be
    /// evaluated first.
    pub fn precedence(self) -> u8 {
        match self {
            Self::Plus | Self::Minus => 1,
            Self::Mul | Self::Div | Self::Rem => 2,
            Self::Neg => 3,
            Self::Exp => 4,
        }
    }

    /// Check if the operator is left associative
    pub fn is_left_associative(self) -> bool {
        match self {
            Self::Plus | Self::Minus | Self::Mul | Self::Div | Self::Rem => true,
            Self::Neg | Self::Exp => false,
        }
    }

    /// Check if the operator is right associative
    pub fn is_right_associative(self) -> bool {
        !self.is_left_associative()
    }

    /// Prefix operators take a single operand
    pub fn is_unary(self) -> bool {
        self == Self::Neg
    }
}
