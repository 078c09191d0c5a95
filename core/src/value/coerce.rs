use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, NaiveTime};
use ruleql::TypeTag;
use thiserror::Error;
use uuid::Uuid;

use crate::options::DateMode;
use crate::value::Value;

#[derive(Debug, Clone, Error, PartialEq)]
#[error("Invalid format '{value}' for type {type_tag}")]
pub struct CoercionError {
    pub value: String,
    pub type_tag: TypeTag,
}

/// Date-times without an offset, tried in order
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %I:%M:%S %p",
    "%m/%d/%Y %H:%M",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%m/%d/%Y"];

/// Parse a raw widget value against its declared type.
///
/// `string` never fails. Every other type rejects the empty string. `date` truncates to midnight; `datetime` keeps
/// the time of day. Inputs carrying a UTC offset are converted to a wall clock according to `date_mode`; inputs
/// without one are taken as given.
pub fn coerce(raw: &str, type_tag: TypeTag, date_mode: DateMode) -> Result<Value, CoercionError> {
    let invalid = || CoercionError { value: raw.to_string(), type_tag };
    let trimmed = raw.trim();

    match type_tag {
        TypeTag::String => Ok(Value::String(raw.to_string())),
        TypeTag::Integer => trimmed.parse::<i64>().map(Value::I64).map_err(|_| invalid()),
        TypeTag::Double => trimmed.parse::<f64>().ok().filter(|f| f.is_finite()).map(Value::F64).ok_or_else(invalid),
        TypeTag::Boolean => {
            if trimmed.eq_ignore_ascii_case("true") {
                Ok(Value::Bool(true))
            } else if trimmed.eq_ignore_ascii_case("false") {
                Ok(Value::Bool(false))
            } else {
                Err(invalid())
            }
        }
        TypeTag::Date => {
            let datetime = parse_datetime(trimmed, date_mode).ok_or_else(invalid)?;
            Ok(Value::DateTime(datetime.date().and_time(NaiveTime::MIN)))
        }
        TypeTag::DateTime => parse_datetime(trimmed, date_mode).map(Value::DateTime).ok_or_else(invalid),
        TypeTag::Guid => Uuid::parse_str(trimmed).map(Value::Uuid).map_err(|_| invalid()),
    }
}

fn parse_datetime(input: &str, date_mode: DateMode) -> Option<NaiveDateTime> {
    if input.is_empty() {
        return None;
    }

    if let Ok(with_offset) = DateTime::parse_from_rfc3339(input) {
        return Some(match date_mode {
            DateMode::Utc => with_offset.naive_utc(),
            DateMode::Local => with_offset.with_timezone(&Local).naive_local(),
        });
    }

    DATETIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(input, format).ok())
        .or_else(|| DATE_FORMATS.iter().find_map(|format| NaiveDate::parse_from_str(input, format).ok()).map(|d| d.and_time(NaiveTime::MIN)))
}
