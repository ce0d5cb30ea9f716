//! Error types for exact rational arithmetic.

use thiserror::Error;

/// Result type for rational operations.
pub type Result<T> = std::result::Result<T, RationalError>;

/// Errors raised while building or parsing a [`Rational`](crate::Rational).
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RationalError {
    /// A zero denominator was supplied.
    #[error("Denominator cannot be zero")]
    ZeroDenominator,

    /// Text could not be read as `num/den` or a decimal number.
    #[error("Invalid rational literal: {0:?}")]
    Parse(String),

    /// The value does not fit the i64 numerator/denominator pair.
    #[error("Rational value out of range")]
    Overflow,

    /// NaN or infinity was supplied.
    #[error("Non-finite value: {0}")]
    NonFinite(String),
}

impl RationalError {
    /// Create a parse error for the given input.
    pub fn parse(input: impl Into<String>) -> Self {
        Self::Parse(input.into())
    }
}
