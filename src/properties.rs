//! The "valid properties" filter applied to manifest blocks.
//!
//! Discovery clients treat an empty string the same as a bad value, so a
//! block is trimmed down to the keys that actually carry something before it
//! is published. A pair survives when its value is:
//!
//! - a non-empty array, or
//! - a truthy scalar: a non-empty string, a non-zero number, `true`,
//!   or any object.
//!
//! `null`, `""`, `0`, `false` and `[]` are dropped. Surviving keys keep their
//! original order.

use serde_json::{Map, Value};

/// Whether a value is worth publishing.
pub fn is_valid_property(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(_) => true,
    }
}

/// Keep only the pairs of `properties` whose value passes [`is_valid_property`].
pub fn with_valid_properties(properties: Map<String, Value>) -> Map<String, Value> {
    properties
        .into_iter()
        .filter(|(_, value)| is_valid_property(value))
        .collect()
}
