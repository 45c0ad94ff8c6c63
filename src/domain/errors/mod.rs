//! Error types.

/// Calendar value errors.
pub mod date_error;

pub use date_error::DateError;
