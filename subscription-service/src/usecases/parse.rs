//! Validation and parsing of text-shaped boundary input.

use super::error::ErrorKind;
use chrono::NaiveDate;
use uuid::Uuid;

/// Day-month-year with a four digit year, e.g. `31-12-2025`.
pub const DATE_FORMAT: &str = "%d-%m-%Y";

/// Parse a `DD-MM-YYYY` date. Any other shape is rejected, including
/// unpadded days or months.
pub fn parse_date(value: &str) -> Result<NaiveDate, ErrorKind> {
    if value.is_empty() {
        return Err(ErrorKind::EmptyDate);
    }

    let bytes = value.as_bytes();
    let well_shaped = bytes.len() == 10
        && bytes.iter().enumerate().all(|(i, b)| match i {
            2 | 5 => *b == b'-',
            _ => b.is_ascii_digit(),
        });
    if !well_shaped {
        return Err(ErrorKind::InvalidDate);
    }

    NaiveDate::parse_from_str(value, DATE_FORMAT).map_err(|_| ErrorKind::InvalidDate)
}

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Parse a user id; the empty check runs before the syntax check and the
/// nil UUID is refused.
pub fn parse_user_id(value: &str) -> Result<Uuid, ErrorKind> {
    if value.is_empty() {
        return Err(ErrorKind::EmptyUserId);
    }

    match Uuid::parse_str(value) {
        Ok(id) if !id.is_nil() => Ok(id),
        _ => Err(ErrorKind::InvalidUserId),
    }
}

pub fn validate_subscription_id(id: i64) -> Result<(), ErrorKind> {
    if id <= 0 {
        return Err(ErrorKind::InvalidSubscriptionId);
    }
    Ok(())
}

/// Optional filter text; an empty value counts as not supplied.
pub fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}
