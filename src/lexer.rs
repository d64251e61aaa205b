use crate::error::Error;
use crate::token::{Op, Token};
use crate::util::FUNCTIONS;
use std::iter::Peekable;
use std::str::Chars;

#[must_use]
/// Check if `ident` is the name of a function the evaluator knows
///
/// # Examples
///
/// ```
/// # use deskcalc::is_function;
///
/// assert_eq!(is_function("sqrt"), true);
/// assert_eq!(is_function("exp"), false);
/// ```
pub fn is_function(ident: &str) -> bool {
    FUNCTIONS.contains_key(ident)
}

/// An helper struct for lexing the input
pub struct Lexer<'a> {
    input: Peekable<Chars<'a>>,
    /// Whether the previous token can end an operand. Decides if a `-` is
    /// binary or a sign.
    after_operand: bool,
}

impl<'a> Lexer<'a> {
    /// Lexer over `string`.
    pub fn new(string: &'a str) -> Lexer<'a> {
        Lexer {
            input: string.chars().peekable(),
            after_operand: false,
        }
    }

    /// Convert the input to reverse polish notation using the shunting-yard
    /// algorithm.
    pub fn parse(&mut self) -> Result<Vec<Token>, Error> {
        let mut output = Vec::new();
        let mut operators = Vec::new();

        'tokens: while let Some(token) = self.next_token()? {
            match token {
                Token::Value(ref name) if is_function(name) => {
                    operators.push(token.clone());
                }
                Token::Value(_) => output.push(token),
                Token::Op(o1) if o1.is_unary() => operators.push(token),
                Token::Op(o1) => {
                    'operators: while let Some(top) = operators.last().cloned() {
                        match top {
                            Token::Op(o2) => {
                                let pop_me =
                                    o1.is_left_associative() && o1.precedence() <= o2.precedence();
                                let pop_me = pop_me
                                    || o1.is_right_associative()
                                        && o1.precedence() < o2.precedence();
                                if pop_me {
                                    operators.pop();
                                    output.push(Token::Op(o2));
                                } else {
                                    break 'operators;
                                }
                            }
                            _ => break 'operators,
                        }
                    }
                    operators.push(token)
                }
                Token::LParen => operators.push(token),
                Token::RParen => {
                    while let Some(top) = operators.pop() {
                        match top {
                            Token::LParen => {
                                let next_is_fn = match operators.last() {
                                    Some(Token::Value(name)) => is_function(name),
                                    _ => false,
                                };
                                if next_is_fn {
                                    if let Some(function) = operators.pop() {
                                        output.push(function);
                                    }
                                }
                                continue 'tokens;
                            }
                            Token::Op(_) => output.push(top),
                            other => {
                                return Err(Error::invalid(format!(
                                    "unexpected {:?} before ')'",
                                    other
                                )))
                            }
                        }
                    }
                    return Err(Error::invalid("mismatched parenthesis"));
                }
            }
        }

        while let Some(token) = operators.pop() {
            match token {
                Token::LParen => return Err(Error::invalid("mismatched parenthesis")),
                Token::Op(_) => output.push(token),
                other => {
                    return Err(Error::invalid(format!(
                        "unexpected {:?} at end of input",
                        other
                    )))
                }
            }
        }
        Ok(output)
    }

    fn next_token(&mut self) -> Result<Option<Token>, Error> {
        // whitespace and unary plus carry no token
        let c = loop {
            match self.input.next() {
                Some(' ') | Some('\t') | Some('\n') | Some('\r') => continue,
                Some('+') if !self.after_operand => continue,
                Some(c) => break c,
                None => return Ok(None),
            }
        };
        let token = match c {
            c if is_number_part(c) => {
                let mut number = String::new();
                number.push(c);
                while let Some(&c) = self.input.peek() {
                    if !is_number_part(c) {
                        break;
                    }
                    self.input.next();
                    number.push(c);
                }
                Token::Value(number)
            }
            c if c.is_ascii_alphabetic() => {
                let mut name = String::new();
                name.push(c);
                while let Some(&c) = self.input.peek() {
                    if !c.is_ascii_alphanumeric() {
                        break;
                    }
                    self.input.next();
                    name.push(c);
                }
                if !is_function(&name) {
                    return Err(Error::invalid(format!("unknown function: {}", name)));
                }
                self.skip_whitespace();
                if self.input.peek() != Some(&'(') {
                    return Err(Error::invalid(format!("expected '(' after {}", name)));
                }
                Token::Value(name)
            }
            '-' if !self.after_operand => Token::Op(Op::Neg),
            '+' => Token::Op(Op::Plus),
            '-' => Token::Op(Op::Minus),
            '*' if self.input.peek() == Some(&'*') => {
                self.input.next();
                Token::Op(Op::Exp)
            }
            '*' | '×' => Token::Op(Op::Mul),
            '/' | '÷' => Token::Op(Op::Div),
            '%' => Token::Op(Op::Rem),
            '^' => Token::Op(Op::Exp),
            '(' => Token::LParen,
            ')' => Token::RParen,
            other => {
                return Err(Error::invalid(format!(
                    "unexpected character in input: {}",
                    other
                )));
            }
        };
        self.after_operand = match token {
            Token::Value(ref name) => !is_function(name),
            Token::RParen => true,
            Token::Op(_) | Token::LParen => false,
        };
        Ok(Some(token))
    }

    fn skip_whitespace(&mut self) {
        while let Some(c) = self.input.peek() {
            if !c.is_whitespace() {
                break;
            }
            self.input.next();
        }
    }
}

/// Check if `c` can appear inside a numeric literal
fn is_number_part(c: char) -> bool {
    c == '.' || c.is_ascii_digit()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::{Op, Token};
    use test_case::test_case;

    fn value(text: &str) -> Token {
        Token::Value(text.to_string())
    }

    #[test_case("2 + 2" => Ok(vec![value("2"), value("2"), Token::Op(Op::Plus)]) ; "addition is parsed properly")]
    #[test_case("2+2" => Ok(vec![value("2"), value("2"), Token::Op(Op::Plus)]) ; "spaces are optional")]
    #[test_case("2-5" => Ok(vec![value("2"), value("5"), Token::Op(Op::Minus)]) ; "binary minus without spaces")]
    #[test_case("-2^2" => Ok(vec![value("2"), value("2"), Token::Op(Op::Exp), Token::Op(Op::Neg)]) ; "sign binds looser than power")]
    #[test_case("2**3" => Ok(vec![value("2"), value("3"), Token::Op(Op::Exp)]) ; "double star is power")]
    #[test_case("sin(30)" => Ok(vec![value("30"), value("sin")]) ; "function call")]
    #[test_case("(1" => Err(Error::invalid("mismatched parenthesis")) ; "unclosed parenthesis")]
    #[test_case("1)" => Err(Error::invalid("mismatched parenthesis")) ; "unopened parenthesis")]
    fn parse(equation: &str) -> Result<Vec<Token>, Error> {
        Lexer::new(equation).parse()
    }

    #[test]
    fn long_runs_of_signs() {
        let input = "+".repeat(50_000) + "1";
        assert_eq!(Lexer::new(&input).parse(), Ok(vec![value("1")]));
        let input = " ".repeat(50_000) + "1 +" + &" ".repeat(50_000) + "+2";
        assert_eq!(
            Lexer::new(&input).parse(),
            Ok(vec![value("1"), value("2"), Token::Op(Op::Plus)])
        );
    }

    #[test]
    fn unknown_names_are_rejected() {
        assert!(Lexer::new("exp(1)").parse().is_err());
        assert!(Lexer::new("alert(1)").parse().is_err());
        assert!(Lexer::new("sin 30").parse().is_err());
    }

    #[test]
    fn foreign_characters_are_rejected() {
        for input in &["1;2", "1 = 2", "[1]", "1,5", "\"x\""] {
            assert!(Lexer::new(input).parse().is_err(), "{} was accepted", input);
        }
    }

    #[test]
    fn numbers() {
        let parts = ['0', '5', '9', '.'];
        for c in &parts {
            assert!(is_number_part(*c));
        }

        let non_parts = ['e', '+', '-', '_', 'x', ' '];
        for c in &non_parts {
            assert!(!is_number_part(*c));
        }
    }
}
