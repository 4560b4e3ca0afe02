//! Input schemas for every JSON body the API accepts.
//!
//! Every schema field deserializes leniently: a missing or wrong-typed
//! value becomes an empty one, so shape problems surface from `validate()`
//! as field errors instead of as a serde rejection. Handlers call
//! `validate()` (or [`parse_payload`] for raw bodies) at the point in the
//! request where it belongs, after existence and ownership checks for
//! updates.

use serde::de::{DeserializeOwned, Deserializer};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use validator::{Validate, ValidationError, ValidationErrors};

use crate::error::{AppError, AppResult};

/// Any JSON value as a string field; non-strings read as empty.
fn lenient_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => s,
        _ => String::new(),
    })
}

fn validate_tags(tags: &Value) -> Result<(), ValidationError> {
    match tags {
        Value::Array(items) if items.iter().all(Value::is_string) => Ok(()),
        _ => Err(ValidationError::new("tags")),
    }
}

#[derive(Deserialize, Validate)]
pub struct RegisterPayload {
    #[serde(default, deserialize_with = "lenient_text")]
    #[validate(length(min = 2, message = "Name must be at least 2 characters."))]
    pub name: String,

    #[serde(default, deserialize_with = "lenient_text")]
    #[validate(email(message = "Please enter a valid email address."))]
    pub email: String,

    #[serde(default, deserialize_with = "lenient_text")]
    #[validate(length(min = 8, message = "Password must be at least 8 characters."))]
    pub password: String,
}

#[derive(Deserialize, Validate)]
pub struct LoginPayload {
    #[serde(default, deserialize_with = "lenient_text")]
    #[validate(email(message = "Enter a valid email address."))]
    pub email: String,

    #[serde(default, deserialize_with = "lenient_text")]
    #[validate(length(min = 1, message = "Password is required."))]
    pub password: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct ForumPayload {
    #[serde(default, deserialize_with = "lenient_text")]
    #[validate(length(
        min = 3,
        max = 100,
        message = "Title must be between 3 and 100 characters."
    ))]
    pub title: String,

    #[serde(default, deserialize_with = "lenient_text")]
    #[validate(length(min = 10, message = "Description must be at least 10 characters."))]
    pub description: String,

    /// Kept as raw JSON until validated; `null` and absent both mean no tags.
    #[serde(default)]
    #[validate(custom(function = "validate_tags", message = "Tags must be a list of strings."))]
    pub tags: Option<Value>,
}

impl ForumPayload {
    /// Tags as stored: omitted means empty.
    pub fn tags(&self) -> Vec<String> {
        match &self.tags {
            Some(Value::Array(items)) => items
                .iter()
                .filter_map(|v| v.as_str().map(str::to_string))
                .collect(),
            _ => Vec::new(),
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct CommentPayload {
    #[serde(default, deserialize_with = "lenient_text")]
    #[validate(length(min = 3, message = "Comment must be at least 3 characters."))]
    pub content: String,
}

/// Decode and validate a raw request body. Used by handlers that must run
/// their existence and ownership checks before looking at the body.
pub fn parse_payload<T>(body: &[u8]) -> AppResult<T>
where
    T: DeserializeOwned + Validate,
{
    let payload: T = serde_json::from_slice(body)
        .map_err(|e| AppError::BadRequest(format!("Invalid JSON body: {}", e)))?;
    payload.validate()?;
    Ok(payload)
}

/// One failed rule on one input field, as reported to clients.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

/// Flatten validator output into a stable, field-sorted list.
pub fn field_errors(errors: &ValidationErrors) -> Vec<FieldError> {
    let mut out: Vec<FieldError> = errors
        .field_errors()
        .into_iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |e| FieldError {
                field: field.to_string(),
                message: e
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| e.code.to_string()),
            })
        })
        .collect();
    out.sort_by(|a, b| a.field.cmp(&b.field));
    out
}
