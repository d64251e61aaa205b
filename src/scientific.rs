//! Evaluation of the expressions composed on the keypad with the scientific
//! functions.

use crate::error::{Error, Result};
use crate::expr::Expr;
use crate::util::{round_to, FUNCTION_NAMES};

/// Decimal places kept in a computed result.
pub const RESULT_PLACES: usize = 10;

/// Check if `text` calls one of the scientific functions, e.g. `2+sin(30`.
pub fn contains_function(text: &str) -> bool {
    FUNCTION_NAMES
        .iter()
        .any(|name| text.contains(&format!("{}(", name)))
}

/// Append the closing parentheses the keypad user did not type, so that
/// `sin(90` reads as `sin(90)`.
pub fn close_parentheses(text: &str) -> String {
    let mut depth = 0_i32;
    for c in text.chars() {
        match c {
            '(' => depth += 1,
            ')' => depth -= 1,
            _ => {}
        }
    }
    let mut closed = text.to_string();
    for _ in 0..depth.max(0) {
        closed.push(')');
    }
    closed
}

/// Evaluate a keypad expression.
///
/// Trigonometric arguments are in degrees and the result is rounded to 10
/// decimal places. Fails with [`Error::InvalidExpression`] when the text does
/// not parse or when the result is not a finite number.
///
/// ```
/// # use deskcalc::evaluate_scientific;
/// assert_eq!(evaluate_scientific("sin(90)"), Ok(1.0));
/// assert_eq!(evaluate_scientific("sqrt(16"), Ok(4.0));
/// assert!(evaluate_scientific("ln(0)").is_err());
/// ```
pub fn evaluate_scientific(expression: &str) -> Result<f64> {
    let expr = Expr::parse(&close_parentheses(expression))?;
    let value = expr.eval();
    if value.is_nan() {
        return Err(Error::invalid(format!("{} is not a number", expression)));
    }
    if value.is_infinite() {
        return Err(Error::invalid(format!("{} is not finite", expression)));
    }
    let value = round_to(value, RESULT_PLACES);
    tracing::debug!(expression, value, "evaluated scientific expression");
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("sin(90)" => Ok(1.0) ; "sine of right angle")]
    #[test_case("sin(30)" => Ok(0.5) ; "sine of thirty degrees")]
    #[test_case("cos(60)" => Ok(0.5) ; "cosine")]
    #[test_case("tan(45)" => Ok(1.0) ; "tangent")]
    #[test_case("sin(180)" => Ok(0.0) ; "rounding removes noise")]
    #[test_case("log(100)" => Ok(2.0) ; "common logarithm")]
    #[test_case("ln(1)" => Ok(0.0) ; "natural logarithm")]
    #[test_case("sqrt(2)" => Ok(1.4142135624) ; "ten decimal places")]
    #[test_case("2*sqrt(9)+1" => Ok(7.0) ; "arithmetic around a call")]
    #[test_case("sqrt(sqrt(16" => Ok(2.0) ; "nested calls are closed")]
    #[test_case("sin(90)^2" => Ok(1.0) ; "power after a call")]
    fn evaluates(expression: &str) -> Result<f64> {
        evaluate_scientific(expression)
    }

    #[test_case("sqrt(-1)" ; "not a number")]
    #[test_case("ln(0)" ; "infinite")]
    #[test_case("1/sin(0)" ; "division by zero")]
    #[test_case("sin(" ; "missing argument")]
    #[test_case("sin(1)2" ; "trailing digits")]
    #[test_case("sin(1));alert(1" ; "injected text")]
    fn rejects(expression: &str) {
        assert!(matches!(
            evaluate_scientific(expression),
            Err(Error::InvalidExpression(_))
        ));
    }

    #[test]
    fn overlong_chain_is_an_error() {
        let expression = "sin(0)+".to_string() + &"1+".repeat(20_000) + "1";
        assert!(matches!(
            evaluate_scientific(&expression),
            Err(Error::InvalidExpression(_))
        ));
        assert_eq!(evaluate_scientific(&("1+".repeat(99) + "sqrt(1)")), Ok(100.0));
    }

    #[test]
    fn detection() {
        assert!(contains_function("sin(45"));
        assert!(contains_function("2+ln(3)"));
        assert!(!contains_function("123.5"));
        assert!(!contains_function("sin"));
        assert!(!contains_function("(2+3)"));
    }

    #[test]
    fn closing() {
        assert_eq!(close_parentheses("sin(90"), "sin(90)");
        assert_eq!(close_parentheses("sqrt(sin(90"), "sqrt(sin(90))");
        assert_eq!(close_parentheses("(1))"), "(1))");
        assert_eq!(close_parentheses("7"), "7");
    }
}
