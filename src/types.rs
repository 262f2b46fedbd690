//! Common types used throughout autopaginate
//!
//! This module contains shared type definitions, type aliases,
//! and utility functions used across multiple modules.

use serde_json::Value;
use std::collections::HashMap;

// ============================================================================
// Type Aliases
// ============================================================================

/// JSON value type (re-exported from serde_json)
pub type JsonValue = serde_json::Value;

/// JSON object type
pub type JsonObject = serde_json::Map<String, JsonValue>;

/// Generic key-value map with string keys and values
pub type StringMap = HashMap<String, String>;

// ============================================================================
// Query Values
// ============================================================================

/// Render a JSON value as a query string value
///
/// Strings are used as-is (no surrounding quotes); everything else
/// uses its JSON representation.
pub fn query_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}
