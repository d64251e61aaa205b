use thiserror::Error;

/// Error type for the deskcalc crate
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// Division or modulo with a zero divisor
    #[error("division by zero")]
    DivisionByZero,
    /// Malformed expression, or a computation that is not a finite number
    #[error("invalid expression: {0}")]
    InvalidExpression(String),
    /// Unit missing from the conversion table of a category
    #[error("unknown {category} unit '{unit}'")]
    UnknownUnit {
        /// Category the lookup was made in
        category: String,
        /// The unit that was not found
        unit: String,
    },
    /// History recall with an index past the end of the log
    #[error("history index {index} out of range for {len} entries")]
    IndexOutOfRange {
        /// Requested index
        index: usize,
        /// Number of entries in the log
        len: usize,
    },
    /// Key or word that does not map to any calculator input
    #[error("unknown key '{0}'")]
    UnknownKey(String),
    /// Failure in the key-value store
    #[error("storage error: {0}")]
    Storage(String),
    /// Failure while loading the configuration
    #[error("configuration error: {0}")]
    Config(String),
}

impl Error {
    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidExpression(message.into())
    }

    pub(crate) fn unknown_unit(category: impl Into<String>, unit: impl Into<String>) -> Self {
        Self::UnknownUnit {
            category: category.into(),
            unit: unit.into(),
        }
    }
}

/// Result alias used across the crate
pub type Result<T> = std::result::Result<T, Error>;
