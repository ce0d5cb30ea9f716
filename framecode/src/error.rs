//! Error types for timecode operations.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type for timecode operations.
pub type Result<T> = std::result::Result<T, TimecodeError>;

/// Errors that can occur during timecode operations.
#[derive(Debug, Clone, Error, Serialize, Deserialize, PartialEq, Eq)]
pub enum TimecodeError {
    /// Frame rate is zero, negative or could not be read.
    #[error("Invalid frame rate: {rate}")]
    InvalidFrameRate {
        /// The rejected input, as written by the caller.
        rate: String,
    },

    /// Frame count is not a positive integer.
    #[error("Invalid frame count: {frames} (must be at least 1)")]
    InvalidFrameCount {
        /// The rejected count.
        frames: i64,
    },

    /// Timecode text has the wrong number of fields or a non-numeric field.
    #[error("Malformed timecode {input:?}: {message}")]
    MalformedTimecode {
        /// The text that failed to parse.
        input: String,
        /// Description of the format error.
        message: String,
    },

    /// A timestamp was built from a negative number of seconds.
    #[error("Timestamp cannot be negative, got {seconds}")]
    NegativeTimestamp {
        /// The rejected value, in seconds.
        seconds: String,
    },

    /// An operand kind the operation does not accept.
    #[error("Operand {operand} not supported for {operation}")]
    UnsupportedOperand {
        /// The operation that rejected the operand.
        operation: String,
        /// The kind of operand supplied.
        operand: String,
    },

    /// A seconds start position that is zero or negative.
    #[error("Start seconds must be positive, got {seconds}")]
    NonPositiveSeconds {
        /// The rejected value, in seconds.
        seconds: String,
    },

    /// A timestamp that does not fit an exact rational number of seconds.
    #[error("Timestamp for frame {frames} is out of range")]
    TimestampOverflow {
        /// The frame count being projected.
        frames: u64,
    },

    /// Frame count division by zero.
    #[error("Division of frame count by zero")]
    DivisionByZero,
}

impl TimecodeError {
    /// Create an invalid frame rate error.
    pub fn invalid_frame_rate(rate: impl Into<String>) -> Self {
        Self::InvalidFrameRate { rate: rate.into() }
    }

    /// Create an invalid frame count error.
    pub fn invalid_frame_count(frames: impl Into<i64>) -> Self {
        Self::InvalidFrameCount {
            frames: frames.into(),
        }
    }

    /// Create a malformed timecode error.
    pub fn malformed(input: impl Into<String>, message: impl Into<String>) -> Self {
        Self::MalformedTimecode {
            input: input.into(),
            message: message.into(),
        }
    }

    /// Create a negative timestamp error.
    pub fn negative_timestamp(seconds: impl ToString) -> Self {
        Self::NegativeTimestamp {
            seconds: seconds.to_string(),
        }
    }

    /// Create an unsupported operand error.
    pub fn unsupported_operand(operation: impl Into<String>, operand: impl Into<String>) -> Self {
        Self::UnsupportedOperand {
            operation: operation.into(),
            operand: operand.into(),
        }
    }

    /// Create a timestamp overflow error.
    pub fn timestamp_overflow(frames: u64) -> Self {
        Self::TimestampOverflow { frames }
    }

    /// Create a non-positive seconds error.
    pub fn non_positive_seconds(seconds: impl ToString) -> Self {
        Self::NonPositiveSeconds {
            seconds: seconds.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_error_display() {
        let err = TimecodeError::malformed("00:00", "expected 4 fields, found 2");
        assert_eq!(
            err.to_string(),
            "Malformed timecode \"00:00\": expected 4 fields, found 2"
        );

        let err = TimecodeError::invalid_frame_count(0);
        assert_eq!(err.to_string(), "Invalid frame count: 0 (must be at least 1)");

        let err = TimecodeError::unsupported_operand("add", "text");
        assert_eq!(err.to_string(), "Operand text not supported for add");

        let err = TimecodeError::timestamp_overflow(42);
        assert_eq!(err.to_string(), "Timestamp for frame 42 is out of range");

        let err = TimecodeError::DivisionByZero;
        assert_eq!(err.to_string(), "Division of frame count by zero");
    }

    #[test]
    fn test_error_serialization() {
        let err = TimecodeError::invalid_frame_rate("-25");
        let json = serde_json::to_string(&err).unwrap();
        let decoded: TimecodeError = serde_json::from_str(&json).unwrap();
        assert_eq!(err, decoded);
    }
}
