#![warn(missing_docs, clippy::all, clippy::pedantic)]
#![allow(
    clippy::needless_return,
    clippy::missing_docs_in_private_items,
    clippy::non_ascii_literal
)]

//! deskcalc, the engine of a keypad calculator.
//!
//! A [`Calculator`] is driven by discrete inputs, the way the buttons of a
//! pocket calculator drive it, and keeps a bounded history of its results:
//!
//! ```
//! use deskcalc::{parse_keys, Calculator, HistoryLog, MemoryStore};
//!
//! let store = MemoryStore::new();
//! let mut calculator = Calculator::new(HistoryLog::load(&store, 50));
//! for input in parse_keys("4 + 3 * 2 =").unwrap() {
//!     calculator.handle(input).unwrap();
//! }
//! // operators apply from left to right as they are pressed
//! assert_eq!(calculator.display(), "14");
//! assert_eq!(calculator.history().get(0).unwrap().expression, "7 × 2");
//! ```
//!
//! Failed computations show up on the display instead of being returned:
//!
//! ```
//! # use deskcalc::{parse_keys, Calculator, Error, HistoryLog, MemoryStore};
//! # let store = MemoryStore::new();
//! # let mut calculator = Calculator::new(HistoryLog::load(&store, 50));
//! for input in parse_keys("8 / 0 =").unwrap() {
//!     calculator.handle(input).unwrap();
//! }
//! assert_eq!(calculator.display(), "Error");
//! assert_eq!(calculator.last_error(), Some(&Error::DivisionByZero));
//! assert!(calculator.history().is_empty());
//! ```
//!
//! The scientific functions are typed as text and evaluated as a whole.
//! Angles are in degrees:
//!
//! ```
//! use deskcalc::evaluate_scientific;
//! assert_eq!(evaluate_scientific("sin(30) * 4"), Ok(2.0));
//! ```
//!
//! Unit conversion is independent from the calculator:
//!
//! ```
//! use deskcalc::converter::{convert, Category, Direction};
//! assert_eq!(
//!     convert(Category::Temperature, 212.0, "f", "c", Direction::Forward),
//!     Ok("100".to_string())
//! );
//! ```
//!
//! # Expression language
//!
//! Expressions composed with the scientific keys can contain:
//!
//! - decimal literals: `12`, `0.5`, `3.`;
//! - left and right parenthesis, missing right parenthesis are added at the
//!   end;
//! - operators: `+`, `-` (also as a sign), `*`, `/`, `%` for the remainder,
//!   and `^` or `**` for exponentiation;
//! - function calls: `sin`, `cos`, `tan` (degrees), `log` (base 10), `ln` and
//!   `sqrt`.
//!
//! Any other symbol is forbidden in the input. There are no variables and the
//! text is never executed as code: it goes through a shunting-yard parser
//! into a small AST which is then interpreted.

#[macro_use]
extern crate lazy_static;

mod ast;
pub mod config;
pub mod converter;
mod engine;
mod error;
mod expr;
pub mod format;
mod history;
mod keys;
mod lexer;
mod scientific;
mod session;
pub mod store;
mod theme;
mod token;
mod util;

pub use ast::Ast;
pub use config::Config;
pub use engine::{Calculator, CalculatorState, Function, Mode, Operator, Pending};
pub use error::{Error, Result};
pub use expr::{eval, Expr};
pub use history::{HistoryEntry, HistoryLog, DEFAULT_CAPACITY};
pub use keys::{parse_keys, Input};
pub use lexer::is_function;
pub use scientific::{contains_function, evaluate_scientific};
pub use session::Session;
pub use store::{FileStore, KeyValueStore, MemoryStore};
pub use theme::Theme;
pub use util::{FUNCTIONS, FUNCTION_NAMES};
