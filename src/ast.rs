use crate::error::Error;
use crate::token::{Op, Token};
use crate::util::FUNCTIONS;

/// Deepest tree accepted. Building, evaluating and dropping the tree all
/// recurse once per level.
pub const MAX_DEPTH: usize = 256;

/// Ast nodes for the expressions
#[derive(Debug, Clone)]
pub enum Ast {
    /// A constant value
    Value(f64),
    /// -<operand>
    Neg(Box<Ast>),
    /// <left> + <right>
    Add(Box<Ast>, Box<Ast>),
    /// <left> - <right>
    Sub(Box<Ast>, Box<Ast>),
    /// <left> * <right>
    Mul(Box<Ast>, Box<Ast>),
    /// <left> / <right>
    Div(Box<Ast>, Box<Ast>),
    /// <left> % <right>
    Rem(Box<Ast>, Box<Ast>),
    /// <left> ^ <right>
    Exp(Box<Ast>, Box<Ast>),
    /// fn(<arg>)
    Function(fn(f64) -> f64, Box<Ast>),
}

impl PartialEq<Self> for Ast {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Ast::Value(v), Ast::Value(v2)) => v.to_le_bytes() == v2.to_le_bytes(),
            (Ast::Neg(a), Ast::Neg(a2)) => a == a2,
            (Ast::Add(a, b), Ast::Add(a2, b2)) => a == a2 && b == b2,
            (Ast::Sub(a, b), Ast::Sub(a2, b2)) => a == a2 && b == b2,
            (Ast::Mul(a, b), Ast::Mul(a2, b2)) => a == a2 && b == b2,
            (Ast::Div(a, b), Ast::Div(a2, b2)) => a == a2 && b == b2,
            (Ast::Rem(a, b), Ast::Rem(a2, b2)) => a == a2 && b == b2,
            (Ast::Exp(a, b), Ast::Exp(a2, b2)) => a == a2 && b == b2,
            (Ast::Function(a, b), Ast::Function(a2, b2)) => *a as usize == *a2 as usize && b == b2,
            _ => false,
        }
    }
}

impl Ast {
    /// Construct the AST for a vector of tokens in reverse polish notation.
    /// All the tokens must be consumed by a single expression.
    pub fn from_tokens(mut tokens: Vec<Token>) -> Result<Self, Error> {
        let ast = Self::from_tokens_internal(&mut tokens, "", 0)?;
        if !tokens.is_empty() {
            return Err(Error::invalid("missing operator between values"));
        }
        Ok(ast)
    }

    /// This function eats the tokens as it uses them
    fn from_tokens_internal(
        tokens: &mut Vec<Token>,
        context: &str,
        depth: usize,
    ) -> Result<Self, Error> {
        if depth > MAX_DEPTH {
            return Err(Error::invalid("expression is nested too deeply"));
        }
        let depth = depth + 1;
        let token = match tokens.pop() {
            Some(token) => token,
            None => return Err(Error::invalid(format!("empty expression{}", context))),
        };
        match token {
            Token::Value(value) => {
                if let Some(&func) = FUNCTIONS.get(value.as_str()) {
                    let arg = Box::new(Self::from_tokens_internal(tokens, " in function call", depth)?);
                    Ok(Self::Function(func, arg))
                } else if let Ok(number) = value.parse() {
                    Ok(Self::Value(number))
                } else {
                    Err(Error::invalid(format!("invalid value {}", value)))
                }
            }
            Token::Op(Op::Neg) => {
                let operand = Self::from_tokens_internal(tokens, " after sign", depth)?;
                Ok(Self::Neg(Box::new(operand)))
            }
            Token::Op(op) => {
                let right = Box::new(Self::from_tokens_internal(tokens, " after operator", depth)?);
                let left = Box::new(Self::from_tokens_internal(tokens, " before operator", depth)?);
                match op {
                    Op::Plus => Ok(Self::Add(left, right)),
                    Op::Minus => Ok(Self::Sub(left, right)),
                    Op::Mul => Ok(Self::Mul(left, right)),
                    Op::Div => Ok(Self::Div(left, right)),
                    Op::Rem => Ok(Self::Rem(left, right)),
                    Op::Exp => Ok(Self::Exp(left, right)),
                    Op::Neg => Err(Error::invalid("misplaced sign")),
                }
            }
            other => Err(Error::invalid(format!(
                "unexpected {:?} after shunting yard",
                other
            ))),
        }
    }

    /// If the AST node correspond to a constant, get `Some(constant)`. Else,
    /// get `None`
    pub fn value(&self) -> Option<f64> {
        if let Self::Value(value) = *self {
            Some(value)
        } else {
            None
        }
    }

    /// Compute the value of the tree. Floating point rules apply, so the
    /// result can be infinite or `NaN`.
    pub fn eval(&self) -> f64 {
        match *self {
            Self::Value(number) => number,
            Self::Neg(ref operand) => -operand.eval(),
            Self::Add(ref left, ref right) => left.eval() + right.eval(),
            Self::Sub(ref left, ref right) => left.eval() - right.eval(),
            Self::Mul(ref left, ref right) => left.eval() * right.eval(),
            Self::Div(ref left, ref right) => left.eval() / right.eval(),
            Self::Rem(ref left, ref right) => left.eval() % right.eval(),
            Self::Exp(ref left, ref right) => left.eval().powf(right.eval()),
            Self::Function(func, ref arg) => func(arg.eval()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Ast;
    use crate::error::Error;
    use crate::lexer::Lexer;

    fn build(input: &str) -> Ast {
        Ast::from_tokens(Lexer::new(input).parse().unwrap()).unwrap()
    }

    #[test]
    fn structure() {
        assert_eq!(build("7").value(), Some(7.0));
        assert_eq!(
            build("-3"),
            Ast::Neg(Box::new(Ast::Value(3.0)))
        );
        assert_eq!(
            build("1 - 2"),
            Ast::Sub(Box::new(Ast::Value(1.0)), Box::new(Ast::Value(2.0)))
        );
        assert_eq!(build("sqrt(9)").value(), None);
    }

    #[test]
    fn evaluation() {
        assert_eq!(build("3 + 5").eval(), 8.0);
        assert_eq!(build("(3 + 5^2)*45").eval(), 1260.0);
        assert_eq!(build("sqrt(9)").eval(), 3.0);
        assert_eq!(build("7 % 4").eval(), 3.0);
        assert_eq!(build("2 ^ -1").eval(), 0.5);
        assert!(build("1 / 0").eval().is_infinite());
    }

    #[test]
    fn depth_is_bounded() {
        let long = "1+".repeat(20_000) + "1";
        let tokens = Lexer::new(&long).parse().unwrap();
        assert!(matches!(
            Ast::from_tokens(tokens),
            Err(Error::InvalidExpression(_))
        ));

        let nested = "sqrt(".repeat(300) + "1" + &")".repeat(300);
        let tokens = Lexer::new(&nested).parse().unwrap();
        assert!(matches!(
            Ast::from_tokens(tokens),
            Err(Error::InvalidExpression(_))
        ));

        let fits = "1+".repeat(200) + "1";
        assert_eq!(build(&fits).eval(), 201.0);
    }

    #[test]
    fn leftover_values_are_rejected() {
        let tokens = Lexer::new("2sin(30)").parse().unwrap();
        assert!(Ast::from_tokens(tokens).is_err());

        let tokens = Lexer::new("()").parse().unwrap();
        assert!(Ast::from_tokens(tokens).is_err());
    }
}
