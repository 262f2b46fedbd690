//! Path types
//!
//! A path is parsed once (from config or code) and then reused for every page.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// One lookup step: an object key or an array index
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathSegment {
    /// Object member name
    Key(String),
    /// Array position; negative values count from the end
    Index(i64),
}

impl PathSegment {
    /// Parse a segment from a JSON scalar
    pub fn from_value(value: &Value) -> Result<Self> {
        match value {
            Value::String(key) => Ok(Self::Key(key.clone())),
            Value::Number(n) => n.as_i64().map(Self::Index).ok_or_else(|| {
                Error::invalid_path(format!(
                    "Unexpected value for path segment: {n}, use a string key or an integer index"
                ))
            }),
            other => Err(Error::invalid_path(format!(
                "Unexpected value for path segment: {other}, use a string key or an integer index"
            ))),
        }
    }

    fn to_value(&self) -> Value {
        match self {
            Self::Key(key) => Value::String(key.clone()),
            Self::Index(index) => Value::from(*index),
        }
    }
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Key(key) => write!(f, "{key}"),
            Self::Index(index) => write!(f, "[{index}]"),
        }
    }
}

impl From<&str> for PathSegment {
    fn from(key: &str) -> Self {
        Self::Key(key.to_string())
    }
}

impl From<String> for PathSegment {
    fn from(key: String) -> Self {
        Self::Key(key)
    }
}

impl From<i64> for PathSegment {
    fn from(index: i64) -> Self {
        Self::Index(index)
    }
}

impl From<i32> for PathSegment {
    fn from(index: i32) -> Self {
        Self::Index(i64::from(index))
    }
}

/// Location of a value inside a nested JSON document
///
/// Deserializes from a string (one key), an integer (one index), or a
/// list of strings and integers. Anything else is rejected at parse time.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Value", into = "Value")]
pub struct DataPath {
    segments: Vec<PathSegment>,
}

impl DataPath {
    /// Create a path from segments
    pub fn new(segments: Vec<PathSegment>) -> Self {
        Self { segments }
    }

    /// Create a single-key path
    pub fn key(key: impl Into<String>) -> Self {
        Self::new(vec![PathSegment::Key(key.into())])
    }

    /// Create a path of object keys
    pub fn keys<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(
            keys.into_iter()
                .map(|k| PathSegment::Key(k.into()))
                .collect(),
        )
    }

    /// Append a segment
    #[must_use]
    pub fn then(mut self, segment: impl Into<PathSegment>) -> Self {
        self.segments.push(segment.into());
        self
    }

    /// Parse a path from its JSON form
    pub fn from_value(value: &Value) -> Result<Self> {
        match value {
            Value::String(_) | Value::Number(_) => {
                Ok(Self::new(vec![PathSegment::from_value(value)?]))
            }
            Value::Array(items) => items
                .iter()
                .map(PathSegment::from_value)
                .collect::<Result<Vec<_>>>()
                .map(Self::new),
            other => Err(Error::invalid_path(format!(
                "Unexpected data type for path: {other}, use a string, an integer or a list"
            ))),
        }
    }

    /// Path segments in lookup order
    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    /// First segment, if any
    pub fn first(&self) -> Option<&PathSegment> {
        self.segments.first()
    }

    /// Whether this path refers to the whole document
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Number of segments
    pub fn len(&self) -> usize {
        self.segments.len()
    }
}

impl fmt::Display for DataPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.segments.is_empty() {
            return write!(f, "$");
        }
        for (i, segment) in self.segments.iter().enumerate() {
            match segment {
                PathSegment::Key(key) if i > 0 => write!(f, ".{key}")?,
                other => write!(f, "{other}")?,
            }
        }
        Ok(())
    }
}

impl TryFrom<Value> for DataPath {
    type Error = Error;

    fn try_from(value: Value) -> Result<Self> {
        Self::from_value(&value)
    }
}

impl From<DataPath> for Value {
    fn from(path: DataPath) -> Self {
        Value::Array(path.segments.iter().map(PathSegment::to_value).collect())
    }
}

impl From<&str> for DataPath {
    fn from(key: &str) -> Self {
        Self::key(key)
    }
}

impl From<Vec<PathSegment>> for DataPath {
    fn from(segments: Vec<PathSegment>) -> Self {
        Self::new(segments)
    }
}
