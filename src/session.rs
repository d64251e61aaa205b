use crate::config::Config;
use crate::converter::{self, Category, Direction};
use crate::engine::Calculator;
use crate::error::Result;
use crate::history::HistoryLog;
use crate::keys::Input;
use crate::store::KeyValueStore;
use crate::theme::Theme;
use std::rc::Rc;
use tracing::info;

/// Everything one user interface needs: the calculator with its history, the
/// theme preference, and access to the unit converter. All of it shares one
/// store.
pub struct Session<S> {
    store: Rc<S>,
    calculator: Calculator<Rc<S>>,
    theme: Theme,
}

impl<S: KeyValueStore> Session<S> {
    /// Load the history and the theme from `store`.
    pub fn open(store: S, config: &Config) -> Self {
        let store = Rc::new(store);
        let history = HistoryLog::load(Rc::clone(&store), config.history_capacity);
        let theme = Theme::load(&store);
        info!(history = history.len(), %theme, "session opened");
        Self {
            calculator: Calculator::new(history),
            store,
            theme,
        }
    }

    /// The calculator.
    pub fn calculator(&self) -> &Calculator<Rc<S>> {
        &self.calculator
    }

    /// The calculator, for direct input.
    pub fn calculator_mut(&mut self) -> &mut Calculator<Rc<S>> {
        &mut self.calculator
    }

    /// Feed one input to the calculator.
    pub fn handle(&mut self, input: Input) -> Result<()> {
        self.calculator.handle(input)
    }

    /// The current theme.
    pub fn theme(&self) -> Theme {
        self.theme
    }

    /// Switch between light and dark, and remember the choice.
    pub fn toggle_theme(&mut self) -> Theme {
        self.theme = self.theme.toggled();
        self.theme.save(&self.store);
        self.theme
    }

    /// Run a unit conversion. The converter keeps no state of its own.
    pub fn convert(
        &self,
        category: Category,
        value: f64,
        from: &str,
        to: &str,
        direction: Direction,
    ) -> Result<String> {
        converter::convert(category, value, from, to, direction)
    }

    /// The shared store.
    pub fn store(&self) -> &S {
        &self.store
    }
}
