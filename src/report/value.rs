use crate::error::{ReportError, ReportResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use strum_macros::{Display, EnumIter, EnumString};

/// A single report cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(untagged)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(i) => Some(*i as f64),
            Value::Float(f) => Some(*f),
            Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => Ok(()),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(i) => write!(f, "{}", i),
            Value::Float(x) => write!(f, "{}", x),
            Value::Text(s) => f.write_str(s),
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int(v as i64)
    }
}

impl From<usize> for Value {
    fn from(v: usize) -> Self {
        Value::Int(v as i64)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Value::Float(v as f64)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Null, Into::into)
    }
}

/// Declared scalar type of a report field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum DType {
    #[strum(to_string = "int", serialize = "int64", serialize = "integer")]
    Int,
    #[strum(to_string = "float", serialize = "float64", serialize = "double")]
    Float,
    Bool,
    #[strum(to_string = "str", serialize = "string", serialize = "text")]
    Str,
    Object,
}

impl DType {
    /// Converts `value` to this type, or `None` when it has no faithful
    /// representation. Nulls always stay null.
    pub fn cast(&self, value: &Value) -> Option<Value> {
        if value.is_null() {
            return Some(Value::Null);
        }
        match self {
            DType::Object => Some(value.clone()),
            DType::Str => Some(Value::Text(value.to_string())),
            DType::Int => match value {
                Value::Int(i) => Some(Value::Int(*i)),
                Value::Bool(b) => Some(Value::Int(*b as i64)),
                Value::Float(f)
                    if f.fract() == 0.0 && *f >= i64::MIN as f64 && *f < i64::MAX as f64 =>
                {
                    Some(Value::Int(*f as i64))
                }
                Value::Text(s) => s.trim().parse().ok().map(Value::Int),
                _ => None,
            },
            DType::Float => match value {
                Value::Text(s) => s.trim().parse().ok().map(Value::Float),
                other => other.as_f64().map(Value::Float),
            },
            DType::Bool => match value {
                Value::Bool(b) => Some(Value::Bool(*b)),
                Value::Int(i) => Some(Value::Bool(*i != 0)),
                Value::Float(f) => Some(Value::Bool(*f != 0.0)),
                Value::Text(s) => match s.trim().to_ascii_lowercase().as_str() {
                    "true" => Some(Value::Bool(true)),
                    "false" => Some(Value::Bool(false)),
                    _ => None,
                },
                Value::Null => None,
            },
        }
    }

    /// Best-effort cast: unconvertible values are returned unchanged.
    pub fn cast_lenient(&self, value: Value) -> Value {
        self.cast(&value).unwrap_or(value)
    }
}

/// What a scoring function hands back for one run.
#[derive(Debug, Clone, PartialEq)]
pub enum ScoreOutput {
    Scalar(Value),
    Tuple(Vec<Value>),
}

impl ScoreOutput {
    /// Normalizes into exactly `arity` values.
    pub fn into_row(self, arity: usize) -> ReportResult<Vec<Value>> {
        match self {
            ScoreOutput::Scalar(v) if arity == 1 => Ok(vec![v]),
            ScoreOutput::Scalar(_) => Err(ReportError::ScoreArity {
                expected: arity,
                got: 1,
            }),
            ScoreOutput::Tuple(values) if values.len() == arity => Ok(values),
            ScoreOutput::Tuple(values) => Err(ReportError::ScoreArity {
                expected: arity,
                got: values.len(),
            }),
        }
    }
}

impl ScoreOutput {
    pub fn scalar(v: impl Into<Value>) -> Self {
        ScoreOutput::Scalar(v.into())
    }

    pub fn tuple<I, V>(values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        ScoreOutput::Tuple(values.into_iter().map(Into::into).collect())
    }
}

impl From<Value> for ScoreOutput {
    fn from(v: Value) -> Self {
        ScoreOutput::Scalar(v)
    }
}

impl From<Vec<Value>> for ScoreOutput {
    fn from(values: Vec<Value>) -> Self {
        ScoreOutput::Tuple(values)
    }
}
