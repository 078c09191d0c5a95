mod coerce;

pub use coerce::{coerce, CoercionError};

use chrono::NaiveDateTime;
use std::fmt::Display;
use uuid::Uuid;

/// A native field value after widening record members into the handful of comparison domains.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Bool(bool),
    I64(i64),
    F64(f64),
    String(String),
    /// Wall-clock date and time, no zone attached
    DateTime(NaiveDateTime),
    Uuid(Uuid),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueType {
    Bool,
    I64,
    F64,
    String,
    DateTime,
    Uuid,
}

impl ValueType {
    pub fn of(v: &Value) -> Self {
        match v {
            Value::Bool(_) => ValueType::Bool,
            Value::I64(_) => ValueType::I64,
            Value::F64(_) => ValueType::F64,
            Value::String(_) => ValueType::String,
            Value::DateTime(_) => ValueType::DateTime,
            Value::Uuid(_) => ValueType::Uuid,
        }
    }

    /// The zero value a non-nullable member holds when nothing was assigned
    pub fn default_value(&self) -> Value {
        match self {
            ValueType::Bool => Value::Bool(false),
            ValueType::I64 => Value::I64(0),
            ValueType::F64 => Value::F64(0.0),
            ValueType::String => Value::String(String::new()),
            ValueType::DateTime => Value::DateTime(NaiveDateTime::default()),
            ValueType::Uuid => Value::Uuid(Uuid::nil()),
        }
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Bool(bool) => write!(f, "{}", bool),
            Value::I64(int) => write!(f, "{}", int),
            Value::F64(float) => write!(f, "{:?}", float),
            Value::String(string) => write!(f, "{:?}", string),
            Value::DateTime(datetime) => write!(f, "{}", datetime),
            Value::Uuid(uuid) => write!(f, "{}", uuid),
        }
    }
}

impl Display for ValueType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ValueType::Bool => "bool",
            ValueType::I64 => "integer",
            ValueType::F64 => "float",
            ValueType::String => "string",
            ValueType::DateTime => "datetime",
            ValueType::Uuid => "uuid",
        };
        f.write_str(name)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self { Value::Bool(value) }
}
impl From<i64> for Value {
    fn from(value: i64) -> Self { Value::I64(value) }
}
impl From<f64> for Value {
    fn from(value: f64) -> Self { Value::F64(value) }
}
impl From<String> for Value {
    fn from(value: String) -> Self { Value::String(value) }
}
impl From<&str> for Value {
    fn from(value: &str) -> Self { Value::String(value.to_string()) }
}
impl From<NaiveDateTime> for Value {
    fn from(value: NaiveDateTime) -> Self { Value::DateTime(value) }
}
impl From<Uuid> for Value {
    fn from(value: Uuid) -> Self { Value::Uuid(value) }
}
