//! Input events and their keyboard mapping.

use crate::engine::{Function, Operator};
use crate::error::{Error, Result};

/// One discrete input to the [`Calculator`](crate::Calculator)
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Input {
    /// `0` to `9`
    Digit(char),
    /// `.`
    DecimalPoint,
    /// A binary operator
    Operator(Operator),
    /// `(`
    OpenParen,
    /// `)`
    CloseParen,
    /// A function key, typed as `name(`
    Function(Function),
    /// `=` or Enter
    Evaluate,
    /// AC or Escape
    ClearAll,
    /// CE
    ClearEntry,
    /// Backspace
    DeleteLastChar,
    /// Show history entry `n`, 0 being the newest
    RecallHistory(usize),
    /// Delete the history
    ClearHistory,
}

impl Input {
    /// Map a keyboard key name, like `"7"`, `"Enter"` or `"Backspace"`.
    ///
    /// ```
    /// # use deskcalc::Input;
    /// assert_eq!(Input::from_key("Escape"), Some(Input::ClearAll));
    /// assert_eq!(Input::from_key("F5"), None);
    /// ```
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "Enter" => Some(Self::Evaluate),
            "Escape" => Some(Self::ClearAll),
            "Backspace" => Some(Self::DeleteLastChar),
            _ => {
                let mut chars = key.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Self::from_char(c),
                    _ => None,
                }
            }
        }
    }

    fn from_char(c: char) -> Option<Self> {
        match c {
            '0'..='9' => Some(Self::Digit(c)),
            '.' => Some(Self::DecimalPoint),
            '(' => Some(Self::OpenParen),
            ')' => Some(Self::CloseParen),
            '=' => Some(Self::Evaluate),
            c => Operator::from_char(c).map(Self::Operator),
        }
    }
}

/// Read a typed line as a sequence of inputs.
///
/// Characters map like keys. Words are function names (a `(` right after
/// the name is part of the call) or one of `ac` (clear all), `ce` (clear
/// entry) and `del` (delete last character). Whitespace separates words and
/// is otherwise ignored.
///
/// ```
/// # use deskcalc::{parse_keys, Input};
/// let inputs = parse_keys("sin(9").unwrap();
/// assert_eq!(inputs.len(), 2);
/// assert_eq!(inputs[1], Input::Digit('9'));
/// ```
pub fn parse_keys(line: &str) -> Result<Vec<Input>> {
    let mut inputs = Vec::new();
    let mut chars = line.chars().peekable();
    while let Some(c) = chars.next() {
        if c.is_whitespace() {
            continue;
        }
        if !c.is_ascii_alphabetic() {
            let input = Input::from_char(c).ok_or_else(|| Error::UnknownKey(c.to_string()))?;
            inputs.push(input);
            continue;
        }
        let mut word = c.to_string();
        while let Some(&next) = chars.peek() {
            if !next.is_ascii_alphabetic() {
                break;
            }
            word.push(next);
            chars.next();
        }
        let input = match word.to_ascii_lowercase().as_str() {
            "ac" => Input::ClearAll,
            "ce" => Input::ClearEntry,
            "del" => Input::DeleteLastChar,
            name => {
                let function = Function::from_name(name).ok_or(Error::UnknownKey(word))?;
                if chars.peek() == Some(&'(') {
                    chars.next();
                }
                Input::Function(function)
            }
        };
        inputs.push(input);
    }
    Ok(inputs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("5" => Some(Input::Digit('5')) ; "digit")]
    #[test_case("." => Some(Input::DecimalPoint) ; "decimal point")]
    #[test_case("%" => Some(Input::Operator(Operator::Modulo)) ; "modulo")]
    #[test_case("=" => Some(Input::Evaluate) ; "equals")]
    #[test_case("Enter" => Some(Input::Evaluate) ; "enter")]
    #[test_case("Backspace" => Some(Input::DeleteLastChar) ; "backspace")]
    #[test_case("(" => Some(Input::OpenParen) ; "parenthesis")]
    #[test_case("a" => None ; "letter")]
    #[test_case("Tab" => None ; "other key")]
    fn keyboard(key: &str) -> Option<Input> {
        Input::from_key(key)
    }

    #[test]
    fn sequences() {
        assert_eq!(
            parse_keys("7 + 3 =").unwrap(),
            vec![
                Input::Digit('7'),
                Input::Operator(Operator::Add),
                Input::Digit('3'),
                Input::Evaluate,
            ]
        );
        assert_eq!(
            parse_keys("SQRT(2) ce del AC").unwrap(),
            vec![
                Input::Function(Function::Sqrt),
                Input::Digit('2'),
                Input::CloseParen,
                Input::ClearEntry,
                Input::DeleteLastChar,
                Input::ClearAll,
            ]
        );
    }

    #[test]
    fn unknown_keys() {
        assert_eq!(parse_keys("2 & 3"), Err(Error::UnknownKey("&".to_string())));
        assert_eq!(parse_keys("exp(1)"), Err(Error::UnknownKey("exp".to_string())));
        assert!(parse_keys("").unwrap().is_empty());
    }
}
