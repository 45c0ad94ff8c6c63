//! Calendar value error types.

use thiserror::Error;

/// Calendar value error variants.
#[derive(Debug, Error, PartialEq, Eq)]
#[allow(missing_docs)]
pub enum DateError {
    #[error("invalid calendar value: {raw}")]
    InvalidValue { raw: String },

    #[error("start of week index out of range: {index}")]
    InvalidStartOfWeek { index: u8 },
}

impl DateError {
    /// Creates an invalid value error.
    #[must_use]
    pub fn invalid_value(raw: impl Into<String>) -> Self {
        Self::InvalidValue { raw: raw.into() }
    }

    /// Creates a start-of-week range error.
    #[must_use]
    pub const fn invalid_start_of_week(index: u8) -> Self {
        Self::InvalidStartOfWeek { index }
    }
}
