//! Shared validation rules for incoming DTOs.
//!
//! Field-level rules are declared with `validator` derives on the DTOs;
//! [`validate_dto`] flattens every violation of a DTO into one message.

use regex::Regex;
use serde_json::Value;
use std::borrow::Cow;
use std::sync::LazyLock;
use validator::{Validate, ValidationError, ValidationErrors};

pub static USERNAME_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z0-9]+$").expect("Username pattern is a valid regex"));

pub static FULL_NAME_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z ]*$").expect("Full name pattern is a valid regex"));

pub const USERNAME_PATTERN_MESSAGE: &str =
    "'Username' must be consisted of small letters and numbers without space.";

pub const FULL_NAME_PATTERN_MESSAGE: &str =
    "'Full Name' must be consisted of letters and spaces only.";

#[derive(Debug, PartialEq, thiserror::Error)]
#[error("{0}")]
pub struct DtoValidationError(pub String);

/// Rejects strings made of whitespace only.
pub fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("not_blank"));
    }
    Ok(())
}

pub fn validate_dto<T: Validate>(dto: &T) -> Result<(), DtoValidationError> {
    dto.validate()
        .map_err(|errors| DtoValidationError(describe_errors(&errors)))
}

fn describe_errors(errors: &ValidationErrors) -> String {
    let mut field_errors: Vec<_> = errors.field_errors().into_iter().collect();
    field_errors.sort_by(|(a, _), (b, _)| a.cmp(b));

    field_errors
        .iter()
        .flat_map(|(field, errors)| errors.iter().map(|error| describe(field, error)))
        .collect::<Vec<_>>()
        .join(" ")
}

fn describe(field: &str, error: &ValidationError) -> String {
    if let Some(message) = &error.message {
        return message.to_string();
    }
    let name = display_name(field);
    match error.code.as_ref() {
        "length" => format!(
            "'{}' must be between {} and {} characters.",
            name,
            param(error, "min"),
            param(error, "max")
        ),
        "range" => format!(
            "'{}' must be between {} and {}.",
            name,
            param(error, "min"),
            param(error, "max")
        ),
        "email" => format!("'{}' is not a valid email address.", name),
        "not_blank" => format!("'{}' must not be empty.", name),
        code => format!("'{}' is invalid ({}).", name, code),
    }
}

fn param(error: &ValidationError, key: &'static str) -> String {
    match error.params.get(&Cow::Borrowed(key)) {
        Some(Value::String(s)) => s.clone(),
        Some(value) => value.to_string(),
        None => "?".to_string(),
    }
}

/// `full_name` -> `Full Name`
fn display_name(field: &str) -> String {
    field
        .split('_')
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
