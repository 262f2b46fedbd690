//! Path lookup against JSON documents

use super::types::{DataPath, PathSegment};
use crate::error::{Error, Result};
use serde_json::Value;

/// Look up the value at `path` inside `content`
///
/// Segments apply left to right with no backtracking. A missing key, an
/// out-of-range index, or a lookup against a scalar fails with
/// [`Error::PathLookup`]. An empty path returns `content` itself.
pub fn extract<'a>(content: &'a Value, path: &DataPath) -> Result<&'a Value> {
    let mut current = content;
    for segment in path.segments() {
        current = step(current, segment)
            .ok_or_else(|| Error::path_lookup(path.to_string(), segment.to_string()))?;
    }
    Ok(current)
}

/// Mutable counterpart of [`extract`], for moving values out of a body
pub fn extract_mut<'a>(content: &'a mut Value, path: &DataPath) -> Result<&'a mut Value> {
    let mut current = content;
    for segment in path.segments() {
        current = step_mut(current, segment)
            .ok_or_else(|| Error::path_lookup(path.to_string(), segment.to_string()))?;
    }
    Ok(current)
}

/// Parse `path` from its JSON form, then look it up
///
/// A malformed path is a configuration error, reported before any lookup.
pub fn extract_with<'a>(content: &'a Value, path: &Value) -> Result<&'a Value> {
    let path = DataPath::from_value(path)?;
    extract(content, &path)
}

fn step<'a>(current: &'a Value, segment: &PathSegment) -> Option<&'a Value> {
    match (current, segment) {
        (Value::Object(map), PathSegment::Key(key)) => map.get(key),
        (Value::Array(items), PathSegment::Index(index)) => {
            items.get(position(items.len(), *index)?)
        }
        _ => None,
    }
}

fn step_mut<'a>(current: &'a mut Value, segment: &PathSegment) -> Option<&'a mut Value> {
    match (current, segment) {
        (Value::Object(map), PathSegment::Key(key)) => map.get_mut(key),
        (Value::Array(items), PathSegment::Index(index)) => {
            let at = position(items.len(), *index)?;
            items.get_mut(at)
        }
        _ => None,
    }
}

/// Array position for an index; negative indices count from the end
fn position(len: usize, index: i64) -> Option<usize> {
    let len = i64::try_from(len).ok()?;
    usize::try_from(if index < 0 { len + index } else { index }).ok()
}
