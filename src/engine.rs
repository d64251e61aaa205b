//! The keypad state machine.
//!
//! A [`Calculator`] turns discrete inputs (digits, operators, functions) into
//! a display value. Binary operators are applied eagerly from left to right,
//! the way a pocket calculator does it: `4 + 3 * 2 =` shows `14`. Text that
//! calls one of the scientific functions is evaluated as a whole by
//! [`evaluate_scientific`] when `=` is pressed.

use crate::error::{Error, Result};
use crate::format::{format_display, format_number, is_sentinel, ERROR};
use crate::history::HistoryLog;
use crate::keys::Input;
use crate::scientific::{close_parentheses, contains_function, evaluate_scientific, RESULT_PLACES};
use crate::store::KeyValueStore;
use crate::util::round_to;
use tracing::{debug, trace};

/// Binary operators of the keypad
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    /// `+`
    Add,
    /// `-`
    Subtract,
    /// `*`, shown as `×`
    Multiply,
    /// `/`, shown as `÷`
    Divide,
    /// `%`, the remainder
    Modulo,
    /// `^`
    Power,
}

impl Operator {
    /// The operator typed as `c`. `×` and `÷` are accepted too.
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            '+' => Some(Self::Add),
            '-' => Some(Self::Subtract),
            '*' | '×' => Some(Self::Multiply),
            '/' | '÷' => Some(Self::Divide),
            '%' => Some(Self::Modulo),
            '^' => Some(Self::Power),
            _ => None,
        }
    }

    /// Character appended to an expression under composition
    pub fn as_char(self) -> char {
        match self {
            Self::Add => '+',
            Self::Subtract => '-',
            Self::Multiply => '*',
            Self::Divide => '/',
            Self::Modulo => '%',
            Self::Power => '^',
        }
    }

    /// Symbol shown in the pending summary and in history expressions
    pub fn symbol(self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Subtract => "-",
            Self::Multiply => "×",
            Self::Divide => "÷",
            Self::Modulo => "%",
            Self::Power => "^",
        }
    }

    /// Compute `left <op> right`. A zero divisor is an error rather than an
    /// infinity, and so is a `NaN` result.
    pub fn apply(self, left: f64, right: f64) -> Result<f64> {
        let result = match self {
            Self::Add => left + right,
            Self::Subtract => left - right,
            Self::Multiply => left * right,
            Self::Divide | Self::Modulo if right == 0.0 => return Err(Error::DivisionByZero),
            Self::Divide => left / right,
            Self::Modulo => left % right,
            Self::Power => left.powf(right),
        };
        if result.is_nan() {
            return Err(Error::invalid(format!(
                "{} {} {} is not a number",
                left,
                self.symbol(),
                right
            )));
        }
        Ok(result)
    }
}

/// Scientific functions of the keypad
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Function {
    /// Sine, in degrees
    Sin,
    /// Cosine, in degrees
    Cos,
    /// Tangent, in degrees
    Tan,
    /// Base 10 logarithm
    Log,
    /// Natural logarithm
    Ln,
    /// Square root
    Sqrt,
}

impl Function {
    /// Every function, in keypad order
    pub const ALL: [Function; 6] = [
        Self::Sin,
        Self::Cos,
        Self::Tan,
        Self::Log,
        Self::Ln,
        Self::Sqrt,
    ];

    /// Name used in expressions, e.g. `sqrt`.
    pub fn name(self) -> &'static str {
        match self {
            Self::Sin => "sin",
            Self::Cos => "cos",
            Self::Tan => "tan",
            Self::Log => "log",
            Self::Ln => "ln",
            Self::Sqrt => "sqrt",
        }
    }

    /// Text inserted on the display, e.g. `sin(`
    pub fn prefix(self) -> String {
        format!("{}(", self.name())
    }

    /// The function called `name`, if any.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|function| function.name() == name)
    }
}

/// Keypad layout in use
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Digits and the four operations
    Basic,
    /// Adds the functions and parentheses
    Scientific,
}

impl Default for Mode {
    fn default() -> Self {
        Self::Basic
    }
}

/// Left operand and operator waiting for the right operand
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pending {
    /// Left-hand value
    pub operand: f64,
    /// Operator to apply
    pub operator: Operator,
}

/// Everything the keypad remembers between two inputs
#[derive(Debug, Clone, PartialEq)]
pub struct CalculatorState {
    /// Number being typed, last result, expression under composition, or a
    /// sentinel (`Error`, `Infinity`, `-Infinity`)
    pub display_value: String,
    /// Operation waiting for its right operand
    pub pending: Option<Pending>,
    /// The next digit starts a new number instead of extending the display
    pub awaiting_new_entry: bool,
    /// Set while the display shows the failure of the last evaluation
    pub error: Option<Error>,
    /// Keypad layout
    pub mode: Mode,
}

impl Default for CalculatorState {
    fn default() -> Self {
        Self {
            display_value: "0".to_string(),
            pending: None,
            awaiting_new_entry: false,
            error: None,
            mode: Mode::default(),
        }
    }
}

/// The calculator engine. Successful evaluations go to its history log.
#[derive(Debug)]
pub struct Calculator<S> {
    state: CalculatorState,
    history: HistoryLog<S>,
}

impl<S: KeyValueStore> Calculator<S> {
    /// A calculator showing `0`, recording into `history`.
    pub fn new(history: HistoryLog<S>) -> Self {
        Self {
            state: CalculatorState::default(),
            history,
        }
    }

    /// Full state, for inspection.
    pub fn state(&self) -> &CalculatorState {
        &self.state
    }

    /// The history log.
    pub fn history(&self) -> &HistoryLog<S> {
        &self.history
    }

    /// Raw display text, before output formatting.
    pub fn display_value(&self) -> &str {
        &self.state.display_value
    }

    /// Display text as shown to the user.
    pub fn display(&self) -> String {
        format_display(&self.state.display_value)
    }

    /// `"<operand> <symbol>"` while an operator is pending, empty otherwise.
    pub fn pending_summary(&self) -> String {
        self.state
            .pending
            .map(|pending| {
                format!(
                    "{} {}",
                    format_number(pending.operand),
                    pending.operator.symbol()
                )
            })
            .unwrap_or_default()
    }

    /// Left operand of the pending operation.
    pub fn pending_operand(&self) -> Option<f64> {
        self.state.pending.map(|pending| pending.operand)
    }

    /// Operator of the pending operation.
    pub fn pending_operator(&self) -> Option<Operator> {
        self.state.pending.map(|pending| pending.operator)
    }

    /// Why the display shows `Error`, if it does.
    pub fn last_error(&self) -> Option<&Error> {
        self.state.error.as_ref()
    }

    /// True while the display shows `Error`.
    pub fn is_error(&self) -> bool {
        self.state.error.is_some()
    }

    /// The keypad layout.
    pub fn mode(&self) -> Mode {
        self.state.mode
    }

    /// Dispatch one input event. Only a history recall can fail; evaluation
    /// failures end up on the display instead.
    pub fn handle(&mut self, input: Input) -> Result<()> {
        trace!(?input, display = %self.state.display_value, "input");
        match input {
            Input::Digit(digit) => self.input_digit(digit),
            Input::DecimalPoint => self.input_decimal_point(),
            Input::Operator(operator) => self.input_operator(operator),
            Input::OpenParen => self.open_paren(),
            Input::CloseParen => self.close_paren(),
            Input::Function(function) => self.input_function(function),
            Input::Evaluate => self.evaluate(),
            Input::ClearAll => self.clear_all(),
            Input::ClearEntry => self.clear_entry(),
            Input::DeleteLastChar => self.delete_last_char(),
            Input::RecallHistory(index) => return self.recall_history(index),
            Input::ClearHistory => self.clear_history(),
        }
        Ok(())
    }

    /// Type a digit. The digit is not validated.
    pub fn input_digit(&mut self, digit: char) {
        self.state.error = None;
        if self.state.awaiting_new_entry || self.state.display_value == "0" {
            self.state.display_value = digit.to_string();
            self.state.awaiting_new_entry = false;
        } else {
            self.state.display_value.push(digit);
        }
    }

    /// Type a decimal point, once per number.
    pub fn input_decimal_point(&mut self) {
        self.state.error = None;
        if self.state.awaiting_new_entry {
            self.state.display_value = "0.".to_string();
            self.state.awaiting_new_entry = false;
            return;
        }
        let display = &mut self.state.display_value;
        if display.ends_with(')') || trailing_number(display).contains('.') {
            return;
        }
        if display.ends_with(|c: char| c.is_ascii_digit()) {
            display.push('.');
        } else {
            display.push_str("0.");
        }
    }

    /// Insert a function call such as `sin(`.
    pub fn input_function(&mut self, function: Function) {
        self.insert_text(&function.prefix());
    }

    /// Type `(`.
    pub fn open_paren(&mut self) {
        self.insert_text("(");
    }

    /// Close a parenthesis of an expression under composition. Ignored on a
    /// plain number.
    pub fn close_paren(&mut self) {
        if !self.state.awaiting_new_entry && self.is_composing() {
            self.state.display_value.push(')');
        }
    }

    fn insert_text(&mut self, text: &str) {
        self.state.error = None;
        if self.state.awaiting_new_entry || self.state.display_value == "0" {
            self.state.display_value = text.to_string();
            self.state.awaiting_new_entry = false;
        } else {
            self.state.display_value.push_str(text);
        }
    }

    /// Press a binary operator.
    ///
    /// The first operator makes the display the pending operand. A later one
    /// applies the pending operator first and shows that result. Inside an
    /// expression under composition the operator is typed into the text.
    pub fn input_operator(&mut self, operator: Operator) {
        self.state.error = None;
        if self.is_composing() {
            self.state.display_value.push(operator.as_char());
            return;
        }
        let input = match self.current_operand() {
            Ok((_, value)) => value,
            Err(err) => return self.fail(err),
        };
        let operand = match self.state.pending.take() {
            None => input,
            Some(pending) => match pending.operator.apply(pending.operand, input) {
                Ok(result) => {
                    let result = round_to(result, RESULT_PLACES);
                    self.state.display_value = format_number(result);
                    result
                }
                Err(err) => return self.fail(err),
            },
        };
        self.state.pending = Some(Pending { operand, operator });
        self.state.awaiting_new_entry = true;
    }

    /// Press `=`.
    ///
    /// Completes the pending operation if there is one, otherwise evaluates
    /// the display when it calls a scientific function. Does nothing on
    /// anything else, including parentheses without a call.
    pub fn evaluate(&mut self) {
        self.state.error = None;
        if let Some(pending) = self.state.pending {
            let (text, input) = match self.current_operand() {
                Ok(operand) => operand,
                Err(err) => return self.fail(err),
            };
            match pending.operator.apply(pending.operand, input) {
                Ok(result) => {
                    let result = round_to(result, RESULT_PLACES);
                    if result.is_finite() {
                        let expression = format!(
                            "{} {} {}",
                            format_number(pending.operand),
                            pending.operator.symbol(),
                            text
                        );
                        self.history.append(expression, result);
                    }
                    self.show_result(result);
                }
                Err(err) => self.fail(err),
            }
        } else if contains_function(&self.state.display_value) {
            let expression = close_parentheses(&self.state.display_value);
            match evaluate_scientific(&expression) {
                Ok(result) => {
                    self.history.append(expression, result);
                    self.show_result(result);
                }
                Err(err) => self.fail(err),
            }
        }
    }

    /// Back to the initial state. The mode is kept.
    pub fn clear_all(&mut self) {
        self.state = CalculatorState {
            mode: self.state.mode,
            ..CalculatorState::default()
        };
    }

    /// Reset the display only; a pending operation survives.
    pub fn clear_entry(&mut self) {
        self.state.display_value = "0".to_string();
        self.state.error = None;
    }

    /// Backspace. An emptied display or an error shows `0` again.
    pub fn delete_last_char(&mut self) {
        if is_sentinel(&self.state.display_value) {
            self.state.display_value = "0".to_string();
            self.state.error = None;
            return;
        }
        self.state.display_value.pop();
        if self.state.display_value.is_empty() || self.state.display_value == "-" {
            self.state.display_value = "0".to_string();
        }
    }

    /// Put the result of history entry `index` (0 is the newest) on the
    /// display.
    pub fn recall_history(&mut self, index: usize) -> Result<()> {
        let result = self.history.get(index)?.result;
        self.state.pending = None;
        self.state.error = None;
        self.show_result(result);
        Ok(())
    }

    /// Delete every history entry.
    pub fn clear_history(&mut self) {
        self.history.clear();
    }

    /// Change the keypad layout. Switching clears the calculator.
    pub fn switch_mode(&mut self, mode: Mode) {
        self.state.mode = mode;
        self.clear_all();
    }

    fn show_result(&mut self, result: f64) {
        self.state.display_value = format_number(result);
        self.state.pending = None;
        self.state.awaiting_new_entry = true;
    }

    fn fail(&mut self, err: Error) {
        debug!(error = %err, display = %self.state.display_value, "evaluation failed");
        self.state.display_value = ERROR.to_string();
        self.state.error = Some(err);
        self.state.pending = None;
        self.state.awaiting_new_entry = true;
    }

    /// True when the display holds an expression rather than a number.
    fn is_composing(&self) -> bool {
        let display = &self.state.display_value;
        !is_sentinel(display) && display.parse::<f64>().is_err()
    }

    /// Text and value of the right-hand operand on the display.
    fn current_operand(&self) -> Result<(String, f64)> {
        let display = &self.state.display_value;
        if self.is_composing() {
            let text = close_parentheses(display);
            let value = evaluate_scientific(&text)?;
            return Ok((text, value));
        }
        match display.parse::<f64>() {
            Ok(value) if !value.is_nan() => Ok((format_number(value), value)),
            _ => Err(Error::invalid(format!("{} is not a number", display))),
        }
    }
}

/// The number at the end of `text`, e.g. `2.5` in `sin(2.5`.
fn trailing_number(text: &str) -> &str {
    text.rsplit(|c: char| !(c.is_ascii_digit() || c == '.'))
        .next()
        .unwrap_or("")
}
