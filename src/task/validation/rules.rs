//! Individual field rules.
//!
//! Each rule converts one raw JSON value into its validated form or
//! returns the message reported for that field.

use crate::task::domain::TaskTitle;
use serde_json::Value;

/// Message reported for a required field that is absent.
pub const FIELD_REQUIRED: &str = "field required";

/// Message reported for fields outside the task schema.
pub const EXTRA_FIELD: &str = "extra fields not permitted";

/// Validates a title, coercing JSON numbers to their string form.
///
/// Every JSON number is coerced, floats included: `1.5` becomes `"1.5"` and
/// `2.0` becomes `"2.0"`, where a strictly integer-only schema would reject
/// them.
///
/// # Errors
///
/// Returns the rejection message when the value is neither a string nor a
/// number, is blank, or is longer than [`TaskTitle::MAX_CHARS`] characters.
pub fn title(value: &Value) -> Result<TaskTitle, String> {
    let raw = match value {
        Value::String(text) => text.clone(),
        Value::Number(number) => number.to_string(),
        _ => return Err("Title must be a string".to_owned()),
    };
    TaskTitle::new(raw).map_err(|err| err.to_string())
}

/// Validates an optional description. JSON `null` clears the value.
///
/// # Errors
///
/// Returns the rejection message when the value is neither a string nor
/// `null`.
pub fn description(value: &Value) -> Result<Option<String>, String> {
    match value {
        Value::Null => Ok(None),
        Value::String(text) => Ok(Some(text.clone())),
        _ => Err("str type expected".to_owned()),
    }
}
