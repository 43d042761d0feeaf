//! # Error Types
//!
//! Field-level parse errors for tally-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  tally-core errors (this file)                                         │
//! │  └── ParseError   - one field's raw value could not be typed           │
//! │                     (recovered at the field boundary, never returned   │
//! │                      from the normalizer)                              │
//! │                                                                         │
//! │  tally-db errors (separate crate)                                      │
//! │  ├── ConnectError - store could not be opened                          │
//! │  └── StoreError   - connection / query / unexpected failure            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

/// A single field's raw value could not be parsed into its typed form.
///
/// Each variant carries the offending value in display form so the
/// warning diagnostic can show what the store actually sent.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// Value feeding a decimal field is not a finite number.
    #[error("invalid decimal value: {0:?}")]
    InvalidDecimal(String),

    /// Value feeding an integer field is not a whole number.
    #[error("invalid integer value: {0:?}")]
    InvalidInteger(String),

    /// Value feeding a date field is neither a date nor `YYYY-MM-DD` text.
    #[error("invalid date value: {0:?}")]
    InvalidDate(String),

    /// Value feeding a time field is neither a time, text, nor `HH:MM:SS`.
    #[error("invalid time value: {0:?}")]
    InvalidTime(String),

    /// Row has no transaction identifier.
    #[error("missing transaction identifier")]
    MissingIdentifier,
}

/// Result type for field parsing.
pub type ParseResult<T> = Result<T, ParseError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_quote_the_raw_value() {
        let err = ParseError::InvalidDate("05/01/2024".to_string());
        assert_eq!(err.to_string(), "invalid date value: \"05/01/2024\"");

        assert_eq!(
            ParseError::MissingIdentifier.to_string(),
            "missing transaction identifier"
        );
    }
}
