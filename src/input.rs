//! Request extractors and the coercion rules shared by the request bodies.

use axum::{
    Json,
    extract::{FromRequest, FromRequestParts, Query},
};
use serde::{Deserialize, Serialize};
use time::{
    Date, OffsetDateTime, PrimitiveDateTime, UtcOffset, format_description::well_known::Rfc3339,
    macros::format_description,
};

use crate::Error;

/// A JSON body extractor that rejects malformed bodies with a JSON [Error].
#[derive(Debug, FromRequest)]
#[from_request(via(Json), rejection(Error))]
pub struct ApiJson<T>(pub T);

/// A query string extractor that rejects malformed queries with a JSON [Error].
#[derive(Debug, FromRequestParts)]
#[from_request(via(Query), rejection(Error))]
pub struct ApiQuery<T>(pub T);

/// An amount as sent by a client, either a JSON number or a numeric string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AmountInput {
    /// e.g. `12.5`
    Number(f64),
    /// e.g. `"12.5"`
    Text(String),
}

impl AmountInput {
    /// Whether the amount is an empty string, which counts as missing.
    pub(crate) fn is_blank(&self) -> bool {
        matches!(self, AmountInput::Text(text) if text.trim().is_empty())
    }

    /// Coerce the amount to a number.
    ///
    /// # Errors
    /// Returns [Error::InvalidAmount] if the amount is not a finite number greater than zero.
    pub fn parse(&self) -> Result<f64, Error> {
        let amount = match self {
            AmountInput::Number(number) => *number,
            AmountInput::Text(text) => text
                .trim()
                .parse::<f64>()
                .map_err(|_| Error::InvalidAmount(text.to_owned()))?,
        };

        if amount.is_finite() && amount > 0.0 {
            Ok(amount)
        } else {
            Err(Error::InvalidAmount(amount.to_string()))
        }
    }
}

/// Whether a required field is absent.
///
/// Blank strings count as absent.
pub(crate) fn is_missing_text(value: &Option<String>) -> bool {
    value.as_deref().is_none_or(|text| text.trim().is_empty())
}

/// Treat blank optional query values as absent.
pub(crate) fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|text| !text.trim().is_empty())
}

/// Parse a date sent by a client.
///
/// Accepts RFC 3339 date-times, date-times without an offset and plain dates.
/// Values without an offset are read as UTC, plain dates as midnight UTC.
/// The result is always in UTC.
///
/// # Errors
/// Returns [Error::InvalidDate] if `text` is not in one of the accepted formats.
pub fn parse_date_input(text: &str) -> Result<OffsetDateTime, Error> {
    let trimmed = text.trim();

    if let Ok(date_time) = OffsetDateTime::parse(trimmed, &Rfc3339) {
        return Ok(date_time.to_offset(UtcOffset::UTC));
    }

    let naive_format = format_description!(
        version = 2,
        "[year]-[month]-[day]T[hour]:[minute][optional [:[second][optional [.[subsecond]]]]]"
    );
    if let Ok(date_time) = PrimitiveDateTime::parse(trimmed, &naive_format) {
        return Ok(date_time.assume_utc());
    }

    let date_format = format_description!("[year]-[month]-[day]");
    if let Ok(date) = Date::parse(trimmed, &date_format) {
        return Ok(date.midnight().assume_utc());
    }

    Err(Error::InvalidDate(text.to_owned()))
}

/// Parse an optional date filter, treating blank values as absent.
pub(crate) fn parse_optional_date(text: Option<&str>) -> Result<Option<OffsetDateTime>, Error> {
    non_blank(text).map(parse_date_input).transpose()
}
