use crate::ast::Ast;
use crate::lexer::Lexer;
use crate::Error;

/// Evaluate a single expression from `input`.
///
/// Returns `Ok(result)` if the expression parses, or `Err(cause)` if it does
/// not. The result follows floating point rules and is not rounded.
///
/// # Example
///
/// ```
/// # use deskcalc::eval;
/// assert_eq!(eval("45 - 2^3"), Ok(37.0));
/// assert_eq!(eval("sqrt(16) * -2"), Ok(-8.0));
/// ```
pub fn eval(input: &str) -> Result<f64, Error> {
    Expr::parse(input).map(|expr| expr.eval())
}

/// A parsed mathematical expression.
///
/// # Examples
/// ```
/// # use deskcalc::Expr;
/// let expr = Expr::parse("3 + 5 * 2").unwrap();
/// assert_eq!(expr.eval(), 13.0);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Expr {
    ast: Ast,
}

impl Expr {
    /// Parse the given mathematical `expression` into an `Expr`.
    ///
    /// # Examples
    /// ```
    /// # use deskcalc::Expr;
    /// // A valid expression
    /// assert!(Expr::parse("3 + 5 * 2").is_ok());
    /// // an invalid expression
    /// assert!(Expr::parse("3eff + 5 * 2").is_err());
    /// ```
    pub fn parse(expression: &str) -> Result<Self, Error> {
        let mut lexer = Lexer::new(expression);
        let ast = Ast::from_tokens(lexer.parse()?)?;
        Ok(Self { ast })
    }

    /// Evaluate the expression.
    pub fn eval(&self) -> f64 {
        self.ast.eval()
    }

    /// The parsed tree.
    pub fn ast(&self) -> &Ast {
        &self.ast
    }
}

#[cfg(test)]
mod tests {
    use super::Expr;

    #[test]
    fn parse() {
        let valid_expressions = [
            "3 + +5",
            "(3 + -5)*45",
            "(3. + 5.0)*\t\n45",
            "(3 + 5^5)*45",
            "sin(34.0) ^ sqrt(28.0)",
            "ln(log(100))",
            "2 ** 3 % 5",
        ];
        for expr in &valid_expressions {
            assert!(Expr::parse(expr).is_ok(), "{} should parse", expr);
        }

        let invalid_expressions = ["", "3 +", "* 2", "1..2", "sin()", "Math.sin(1)", "2 3"];
        for expr in &invalid_expressions {
            assert!(Expr::parse(expr).is_err(), "{} should not parse", expr);
        }
    }

    #[test]
    fn eval() {
        let eval_pairs = [
            ("3 + 5", 8.0),
            ("2 - 5", -3.0),
            ("2 * 5", 10.0),
            ("10 / 5", 2.0),
            ("2 ^ 3", 8.0),
            ("2 ** 3", 8.0),
            ("-3", -3.0),
            ("25 + -3", 22.0),
            ("25 - -3", 28.0),
            ("3 + 5 * 2", 13.0),
            ("2 ^ 3 ^ 2", 512.0),
            ("-2 ^ 2", -4.0),
            ("sqrt(9)", 3.0),
            ("ln(1)", 0.0),
            ("10 % 4", 2.0),
        ];
        for &(input, expected) in &eval_pairs {
            assert_eq!(super::eval(input), Ok(expected), "{}", input);
        }

        let log = super::eval("log(1000)").unwrap();
        assert!((log - 3.0).abs() < 1e-12);

        let result = super::eval("2 * z");
        assert_eq!(
            result.err().unwrap().to_string(),
            "invalid expression: unknown function: z"
        );
    }
}
