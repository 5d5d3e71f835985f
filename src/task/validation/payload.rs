//! Request-body validation for task creation and partial updates.

use super::{
    error::{FieldError, ValidationErrors},
    rules::{self, EXTRA_FIELD, FIELD_REQUIRED},
};
use crate::task::domain::{NewTask, TaskChanges};
use serde_json::{Map, Value};

const TITLE: &str = "title";
const DESCRIPTION: &str = "description";
const BODY: &str = "body";

/// Parses raw request bytes into a JSON value.
///
/// # Errors
///
/// Returns a single error located at `body` when the bytes are not valid
/// JSON.
pub fn parse_json_body(bytes: &[u8]) -> Result<Value, ValidationErrors> {
    serde_json::from_slice(bytes).map_err(|err| {
        ValidationErrors::single(FieldError::at(BODY, format!("Invalid JSON: {err}")))
    })
}

/// Validates a creation body: `title` is required, `description` optional.
///
/// # Errors
///
/// Returns every field error found: a missing or invalid title, an invalid
/// description, unknown fields, or a body that is not a JSON object.
pub fn parse_new_task(body: &Value) -> Result<NewTask, ValidationErrors> {
    let object = as_object(body)?;
    let mut errors = unknown_fields(object);

    let title = match object.get(TITLE) {
        None => {
            errors.push(FieldError::at(TITLE, FIELD_REQUIRED));
            None
        }
        Some(value) => collect(rules::title(value), TITLE, &mut errors),
    };
    let description = object
        .get(DESCRIPTION)
        .and_then(|value| collect(rules::description(value), DESCRIPTION, &mut errors))
        .flatten();

    ValidationErrors::check(errors)?;
    let Some(title) = title else {
        return Err(ValidationErrors::single(FieldError::at(TITLE, FIELD_REQUIRED)));
    };
    Ok(NewTask::new(title).with_description(description))
}

/// Validates a partial-update body. Every field is optional; an explicit
/// `null` description clears the stored value.
///
/// # Errors
///
/// Returns every field error found: an invalid title or description,
/// unknown fields, or a body that is not a JSON object.
pub fn parse_task_changes(body: &Value) -> Result<TaskChanges, ValidationErrors> {
    let object = as_object(body)?;
    let mut errors = unknown_fields(object);
    let mut changes = TaskChanges::new();

    if let Some(title) = object
        .get(TITLE)
        .and_then(|value| collect(rules::title(value), TITLE, &mut errors))
    {
        changes = changes.with_title(title);
    }
    if let Some(description) = object
        .get(DESCRIPTION)
        .and_then(|value| collect(rules::description(value), DESCRIPTION, &mut errors))
    {
        changes = changes.with_description(description);
    }

    ValidationErrors::check(errors)?;
    Ok(changes)
}

fn as_object(body: &Value) -> Result<&Map<String, Value>, ValidationErrors> {
    body.as_object().ok_or_else(|| {
        ValidationErrors::single(FieldError::at(BODY, "value is not a valid dict"))
    })
}

fn unknown_fields(object: &Map<String, Value>) -> Vec<FieldError> {
    object
        .keys()
        .filter(|key| !matches!(key.as_str(), TITLE | DESCRIPTION))
        .map(|key| FieldError::at(key, EXTRA_FIELD))
        .collect()
}

fn collect<T>(result: Result<T, String>, field: &str, errors: &mut Vec<FieldError>) -> Option<T> {
    result
        .map_err(|message| errors.push(FieldError::at(field, message)))
        .ok()
}
