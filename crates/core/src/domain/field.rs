//! Field kinds and value coercion for job configuration binding
//!
//! Job data values arrive untyped. A field declares one [`FieldKind`]; the raw
//! value is coerced to that kind right before the field's setter runs.
//!
//! Coercion rules:
//! - `Uri`: text is parsed as an absolute URI; other shapes are rejected
//! - `Text`: strings as-is, numbers and booleans rendered as text
//! - `Integer` / `Float`: JSON numbers, or text parsed as a number
//! - `Boolean`: JSON booleans, or `"true"` / `"false"` in any case
//! - `Json`: the raw value, untouched

use super::error::{BindError, Result};
use serde_json::Value;
use std::fmt;
use url::Url;

/// Declared value kind of a writable job field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    Text,
    Integer,
    Float,
    Boolean,
    Uri,
    Json,
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldKind::Text => write!(f, "TEXT"),
            FieldKind::Integer => write!(f, "INTEGER"),
            FieldKind::Float => write!(f, "FLOAT"),
            FieldKind::Boolean => write!(f, "BOOLEAN"),
            FieldKind::Uri => write!(f, "URI"),
            FieldKind::Json => write!(f, "JSON"),
        }
    }
}

/// A value already coerced to a field's kind
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    Integer(i64),
    Float(f64),
    Boolean(bool),
    Uri(Url),
    Json(Value),
}

impl FieldValue {
    pub fn kind(&self) -> FieldKind {
        match self {
            FieldValue::Text(_) => FieldKind::Text,
            FieldValue::Integer(_) => FieldKind::Integer,
            FieldValue::Float(_) => FieldKind::Float,
            FieldValue::Boolean(_) => FieldKind::Boolean,
            FieldValue::Uri(_) => FieldKind::Uri,
            FieldValue::Json(_) => FieldKind::Json,
        }
    }
}

impl FieldKind {
    /// Coerce a raw job data value for the field named `field`
    pub fn coerce(self, field: &str, raw: Value) -> Result<FieldValue> {
        match (self, raw) {
            (FieldKind::Json, raw) => Ok(FieldValue::Json(raw)),

            (FieldKind::Uri, Value::String(text)) => match Url::parse(&text) {
                Ok(uri) => Ok(FieldValue::Uri(uri)),
                Err(source) => Err(BindError::InvalidUri {
                    field: field.to_string(),
                    value: text,
                    source,
                }),
            },

            (FieldKind::Text, Value::String(text)) => Ok(FieldValue::Text(text)),
            (FieldKind::Text, Value::Number(n)) => Ok(FieldValue::Text(n.to_string())),
            (FieldKind::Text, Value::Bool(b)) => Ok(FieldValue::Text(b.to_string())),

            (FieldKind::Integer, Value::Number(n)) => {
                n.as_i64()
                    .map(FieldValue::Integer)
                    .ok_or_else(|| BindError::InvalidNumber {
                        field: field.to_string(),
                        value: n.to_string(),
                    })
            }
            (FieldKind::Integer, Value::String(text)) => text
                .trim()
                .parse::<i64>()
                .map(FieldValue::Integer)
                .map_err(|_| BindError::InvalidNumber {
                    field: field.to_string(),
                    value: text,
                }),

            (FieldKind::Float, Value::Number(n)) => {
                n.as_f64()
                    .map(FieldValue::Float)
                    .ok_or_else(|| BindError::InvalidNumber {
                        field: field.to_string(),
                        value: n.to_string(),
                    })
            }
            (FieldKind::Float, Value::String(text)) => text
                .trim()
                .parse::<f64>()
                .map(FieldValue::Float)
                .map_err(|_| BindError::InvalidNumber {
                    field: field.to_string(),
                    value: text,
                }),

            (FieldKind::Boolean, Value::Bool(b)) => Ok(FieldValue::Boolean(b)),
            (FieldKind::Boolean, Value::String(text)) => {
                if text.trim().eq_ignore_ascii_case("true") {
                    Ok(FieldValue::Boolean(true))
                } else if text.trim().eq_ignore_ascii_case("false") {
                    Ok(FieldValue::Boolean(false))
                } else {
                    Err(BindError::InvalidBoolean {
                        field: field.to_string(),
                        value: text,
                    })
                }
            }

            (expected, raw) => Err(BindError::TypeMismatch {
                field: field.to_string(),
                expected,
                actual: json_type_name(&raw).to_string(),
            }),
        }
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Rust types a job field setter can accept
///
/// The associated `KIND` decides which coercion runs before the setter.
pub trait FieldType: Sized + 'static {
    const KIND: FieldKind;

    fn from_field_value(value: FieldValue) -> Option<Self>;
}

impl FieldType for String {
    const KIND: FieldKind = FieldKind::Text;

    fn from_field_value(value: FieldValue) -> Option<Self> {
        match value {
            FieldValue::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl FieldType for i64 {
    const KIND: FieldKind = FieldKind::Integer;

    fn from_field_value(value: FieldValue) -> Option<Self> {
        match value {
            FieldValue::Integer(n) => Some(n),
            _ => None,
        }
    }
}

impl FieldType for f64 {
    const KIND: FieldKind = FieldKind::Float;

    fn from_field_value(value: FieldValue) -> Option<Self> {
        match value {
            FieldValue::Float(n) => Some(n),
            _ => None,
        }
    }
}

impl FieldType for bool {
    const KIND: FieldKind = FieldKind::Boolean;

    fn from_field_value(value: FieldValue) -> Option<Self> {
        match value {
            FieldValue::Boolean(b) => Some(b),
            _ => None,
        }
    }
}

impl FieldType for Url {
    const KIND: FieldKind = FieldKind::Uri;

    fn from_field_value(value: FieldValue) -> Option<Self> {
        match value {
            FieldValue::Uri(uri) => Some(uri),
            _ => None,
        }
    }
}

impl FieldType for Value {
    const KIND: FieldKind = FieldKind::Json;

    fn from_field_value(value: FieldValue) -> Option<Self> {
        match value {
            FieldValue::Json(v) => Some(v),
            _ => None,
        }
    }
}
