use serde_json::Value;
use thiserror::Error;
use url::Url;

use crate::conf::{FieldConfig, FieldKind};
use crate::store::Record;

use super::ResourceDef;

/// A request body rejected before it reaches the store. The message is the
/// one sent to the client.
#[derive(Debug, Error, PartialEq)]
pub enum FieldError {
    #[error("{message}")]
    Missing { field: String, message: String },
    #[error("{message}")]
    Invalid { field: String, message: String },
    #[error("{0}")]
    NoUpdateFields(String),
    #[error("Request body must be a JSON object")]
    NotAnObject,
}

/// Checks a create body and projects it onto the configured fields.
///
/// Every field is checked for presence (in declaration order) before any
/// field is checked for type, so the first missing field always wins.
pub fn validate_create(def: &ResourceDef, body: &Value) -> Result<Record, FieldError> {
    let body = body.as_object().ok_or(FieldError::NotAnObject)?;

    for field in &def.fields {
        if !is_present(field, body.get(&field.name)) {
            return Err(FieldError::Missing {
                field: field.name.clone(),
                message: def.messages.missing(&field.name),
            });
        }
    }

    let mut record = Record::new();
    for field in &def.fields {
        // presence checked above
        let Some(value) = body.get(&field.name) else {
            continue;
        };
        record.insert(field.name.clone(), check_value(field, value)?);
    }
    Ok(record)
}

/// Checks a partial update body. Unknown keys are dropped; at least one
/// configured field must be present.
pub fn validate_update(def: &ResourceDef, body: &Value) -> Result<Record, FieldError> {
    let body = body.as_object().ok_or(FieldError::NotAnObject)?;

    let mut record = Record::new();
    for field in &def.fields {
        let value = body.get(&field.name);
        if !is_present(field, value) {
            continue;
        }
        if let Some(value) = value {
            record.insert(field.name.clone(), check_value(field, value)?);
        }
    }

    if record.is_empty() {
        return Err(FieldError::NoUpdateFields(def.messages.no_update(&def.field_names())));
    }
    Ok(record)
}

fn is_present(field: &FieldConfig, value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::String(s)) if field.non_empty => !s.is_empty(),
        Some(_) => true,
    }
}

fn check_value(field: &FieldConfig, value: &Value) -> Result<Value, FieldError> {
    let checked = match field.kind {
        FieldKind::Text => value.is_string().then(|| value.clone()),
        FieldKind::Url => value
            .as_str()
            .is_some_and(is_web_url)
            .then(|| value.clone()),
        FieldKind::Integer => as_integer(value)
            .filter(|n| in_range(field, *n))
            .map(Value::from),
    };
    checked.ok_or_else(|| FieldError::Invalid {
        field: field.name.clone(),
        message: invalid_message(field),
    })
}

/// Whole-valued numbers count as integers, so `2.0` is stored as `2`.
fn as_integer(value: &Value) -> Option<i64> {
    if let Some(n) = value.as_i64() {
        return Some(n);
    }
    let f = value.as_f64()?;
    // i64::MAX as f64 rounds up to 2^63, which is out of range
    if f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64 {
        Some(f as i64)
    } else {
        None
    }
}

fn in_range(field: &FieldConfig, n: i64) -> bool {
    field.min.is_none_or(|min| n >= min) && field.max.is_none_or(|max| n <= max)
}

/// Absolute http(s) URL with a host.
pub(crate) fn is_web_url(input: &str) -> bool {
    match Url::parse(input) {
        Ok(url) => matches!(url.scheme(), "http" | "https") && url.has_host(),
        Err(_) => false,
    }
}

fn invalid_message(field: &FieldConfig) -> String {
    if let Some(message) = &field.message {
        return message.clone();
    }
    let expected = match (field.kind, field.min, field.max) {
        (FieldKind::Text, _, _) => String::from("a string"),
        (FieldKind::Url, _, _) => String::from("a valid URL"),
        (FieldKind::Integer, Some(min), Some(max)) => {
            format!("an integer between {min} and {max}")
        }
        (FieldKind::Integer, Some(min), None) => format!("an integer of at least {min}"),
        (FieldKind::Integer, None, Some(max)) => format!("an integer of at most {max}"),
        (FieldKind::Integer, None, None) => String::from("an integer"),
    };
    format!("'{}' must be {}", field.name, expected)
}
