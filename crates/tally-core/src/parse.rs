//! # Field Parsers
//!
//! One parser per field kind. Each turns a [`RawValue`] into its typed
//! form or a [`ParseError`]; recovering from the error is the normalizer's
//! job, not the parser's.
//!
//! ## Rules
//! ```text
//! ┌──────────┬──────────────────┬──────────────────────────────────────────┐
//! │ Kind     │ Falsy value      │ Otherwise                                │
//! ├──────────┼──────────────────┼──────────────────────────────────────────┤
//! │ text     │ ""               │ trimmed (non-text: display form)         │
//! │ decimal  │ 0.0              │ int/float as is, text parsed (trimmed)   │
//! │ integer  │ 0                │ int as is, float truncated, text parsed  │
//! │ date     │ ""               │ date/datetime formatted, text must be    │
//! │          │                  │ exactly YYYY-MM-DD                       │
//! │ time     │ ""               │ time formatted, text passed through,     │
//! │          │                  │ anything else must read as HH:MM:SS      │
//! └──────────┴──────────────────┴──────────────────────────────────────────┘
//! ```
//! Falsy: `Null`, `0`, `0.0`, `""`.

use chrono::{NaiveDate, NaiveTime};

use crate::error::{ParseError, ParseResult};
use crate::types::RawValue;
use crate::{DATE_FORMAT, TIME_FORMAT};

/// Parses a text field. Never fails.
pub fn parse_text(value: &RawValue) -> String {
    if value.is_falsy() {
        return String::new();
    }

    match value {
        RawValue::Text(s) => s.trim().to_string(),
        other => other.to_string().trim().to_string(),
    }
}

/// Parses a decimal field.
pub fn parse_decimal(value: &RawValue) -> ParseResult<f64> {
    if value.is_falsy() {
        return Ok(0.0);
    }

    let parsed = match value {
        RawValue::Int(n) => *n as f64,
        RawValue::Float(x) => *x,
        RawValue::Text(s) => s
            .trim()
            .parse::<f64>()
            .map_err(|_| ParseError::InvalidDecimal(s.clone()))?,
        other => return Err(ParseError::InvalidDecimal(other.to_string())),
    };

    if !parsed.is_finite() {
        return Err(ParseError::InvalidDecimal(value.to_string()));
    }

    Ok(parsed)
}

/// Parses an integer field. Floats and decimal text truncate toward zero.
pub fn parse_integer(value: &RawValue) -> ParseResult<i64> {
    if value.is_falsy() {
        return Ok(0);
    }

    match value {
        RawValue::Int(n) => Ok(*n),
        RawValue::Float(x) if x.is_finite() => Ok(x.trunc() as i64),
        RawValue::Text(s) => {
            let trimmed = s.trim();
            trimmed
                .parse::<i64>()
                .or_else(|_| match trimmed.parse::<f64>() {
                    Ok(x) if x.is_finite() => Ok(x.trunc() as i64),
                    _ => Err(ParseError::InvalidInteger(s.clone())),
                })
        }
        other => Err(ParseError::InvalidInteger(other.to_string())),
    }
}

/// Parses a date field into `YYYY-MM-DD`.
pub fn parse_date(value: &RawValue) -> ParseResult<String> {
    if value.is_falsy() {
        return Ok(String::new());
    }

    match value {
        RawValue::Date(date) => Ok(date.format(DATE_FORMAT).to_string()),
        RawValue::DateTime(datetime) => Ok(datetime.date().format(DATE_FORMAT).to_string()),
        other => {
            let text = other.to_string();
            NaiveDate::parse_from_str(&text, DATE_FORMAT)
                .map(|date| date.format(DATE_FORMAT).to_string())
                .map_err(|_| ParseError::InvalidDate(text))
        }
    }
}

/// Parses a time field into `HH:MM:SS`.
///
/// Text is returned unchanged: the store keeps some times as free-form
/// strings and the report shows them as recorded.
pub fn parse_time(value: &RawValue) -> ParseResult<String> {
    if value.is_falsy() {
        return Ok(String::new());
    }

    match value {
        RawValue::Time(time) => Ok(time.format(TIME_FORMAT).to_string()),
        RawValue::Text(s) => Ok(s.clone()),
        other => {
            let text = other.to_string();
            NaiveTime::parse_from_str(&text, TIME_FORMAT)
                .map(|time| time.format(TIME_FORMAT).to_string())
                .map_err(|_| ParseError::InvalidTime(text))
        }
    }
}

/// Stringifies the transaction identifier.
pub fn parse_folio(value: &RawValue) -> ParseResult<String> {
    match value {
        RawValue::Null => Err(ParseError::MissingIdentifier),
        other => Ok(other.to_string()),
    }
}
