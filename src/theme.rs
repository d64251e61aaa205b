use crate::error::Error;
use crate::store::{KeyValueStore, THEME_KEY};
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;
use tracing::warn;

/// Color theme preference, persisted under `calculatorTheme`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Theme {
    /// The default
    Light,
    /// Light text on dark keys
    Dark,
}

impl Default for Theme {
    fn default() -> Self {
        Self::Light
    }
}

impl Theme {
    /// Stored name, `light` or `dark`.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }

    /// The other theme.
    #[must_use]
    pub fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }

    /// Read the stored preference. Anything missing or unrecognized is the
    /// light theme.
    pub fn load<S: KeyValueStore>(store: &S) -> Self {
        match store.get(THEME_KEY) {
            Ok(Some(text)) => text.parse().unwrap_or_else(|err| {
                warn!(error = %err, "ignoring stored theme");
                Self::default()
            }),
            Ok(None) => Self::default(),
            Err(err) => {
                warn!(error = %err, "cannot read theme");
                Self::default()
            }
        }
    }

    /// Store the preference. Best effort, like every other write.
    pub fn save<S: KeyValueStore>(self, store: &S) {
        if let Err(err) = store.set(THEME_KEY, self.as_str()) {
            warn!(error = %err, "cannot save theme");
        }
    }
}

impl Display for Theme {
    fn fmt(&self, fmt: &mut Formatter) -> fmt::Result {
        fmt.write_str(self.as_str())
    }
}

impl FromStr for Theme {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Error> {
        match s {
            "light" => Ok(Self::Light),
            "dark" => Ok(Self::Dark),
            other => Err(Error::Storage(format!("unknown theme {}", other))),
        }
    }
}
