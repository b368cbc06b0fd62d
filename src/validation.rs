//! Input validation for wizard answers and repeatable items.
//!
//! Errors carry a field key, a short message and an optional suggestion so the chat
//! can show them inline next to the question that was rejected.

use std::fmt;

use chrono::NaiveDate;
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

lazy_static! {
    static ref DATA_URI: Regex =
        Regex::new(r"^data:([a-zA-Z0-9.+-]+/[a-zA-Z0-9.+-]+)(;[^,]*)?,").expect("valid regex");
    static ref EMAIL: Regex =
        Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("valid regex");
}

/// Validation error with a user-facing message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ValidationError {
    pub field: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

impl ValidationError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
            suggestion: None,
        }
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    pub fn empty_field(field: &str) -> Self {
        Self::new(field, "This field is required").with_suggestion("Please enter a value to continue")
    }

    pub fn cannot_skip(field: &str) -> Self {
        Self::new(field, "This question is required and cannot be skipped")
    }

    pub fn empty_section(field: &str) -> Self {
        Self::new(field, "Add at least one item before finishing this section")
    }

    pub fn invalid_option(field: &str, value: &str, options: &[&str]) -> Self {
        Self::new(field, format!("'{}' is not one of the available options", value))
            .with_suggestion(format!("Choose one of: {}", options.join(", ")))
    }

    pub fn invalid_date(field: &str, value: &str) -> Self {
        Self::new(field, format!("'{}' is not a valid date", value))
            .with_suggestion("Use the format YYYY-MM-DD, for example 2024-03-15")
    }

    pub fn invalid_number(field: &str, value: &str) -> Self {
        Self::new(field, format!("'{}' is not a valid number", value))
            .with_suggestion("Enter a non-negative number such as 12 or 12.5")
    }

    pub fn invalid_file(field: &str, accept: &str) -> Self {
        Self::new(field, "The uploaded file is not accepted for this question")
            .with_suggestion(format!("Upload a file of type {}", accept))
    }

    pub fn invalid_email(field: &str, value: &str) -> Self {
        Self::new(field, format!("'{}' is not a valid email address", value))
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.field, self.message)?;
        if let Some(ref suggestion) = self.suggestion {
            write!(f, ". {}", suggestion)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}

/// Collection of validation errors.
#[derive(Debug, Default, Clone, PartialEq, Serialize)]
pub struct ValidationErrors {
    errors: Vec<ValidationError>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self { errors: Vec::new() }
    }

    pub fn add(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn errors(&self) -> &[ValidationError] {
        &self.errors
    }

    /// Multi-line message suitable for the chat transcript.
    pub fn to_message(&self) -> String {
        match self.errors.as_slice() {
            [] => String::new(),
            [single] => single.to_string(),
            many => many
                .iter()
                .enumerate()
                .map(|(i, error)| format!("{}. {}", i + 1, error))
                .collect::<Vec<_>>()
                .join("\n"),
        }
    }

    pub fn into_result(self) -> Result<(), ValidationErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl From<ValidationError> for ValidationErrors {
    fn from(error: ValidationError) -> Self {
        Self { errors: vec![error] }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_message())
    }
}

/// Trait for validating request objects.
pub trait Validator {
    fn validate(&self) -> Result<(), ValidationErrors>;
}

// ============================================================================
// Validation functions
// ============================================================================

pub fn validate_required(value: &str, field: &str, errors: &mut ValidationErrors) {
    if value.trim().is_empty() {
        errors.add(ValidationError::empty_field(field));
    }
}

/// Parse an ISO `YYYY-MM-DD` date.
pub fn parse_iso_date(value: &str, field: &str) -> Result<NaiveDate, ValidationError> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map_err(|_| ValidationError::invalid_date(field, value))
}

/// Parse a finite, non-negative number.
pub fn parse_amount(value: &str, field: &str) -> Result<f64, ValidationError> {
    match value.trim().parse::<f64>() {
        Ok(n) if n.is_finite() && n >= 0.0 => Ok(n),
        _ => Err(ValidationError::invalid_number(field, value)),
    }
}

pub fn validate_amount(value: f64, field: &str, errors: &mut ValidationErrors) {
    if !value.is_finite() || value < 0.0 {
        errors.add(ValidationError::invalid_number(field, &value.to_string()));
    }
}

/// Match `value` against `options` ignoring case, returning the canonical option.
pub fn match_option(value: &str, options: &[&'static str], field: &str) -> Result<&'static str, ValidationError> {
    let trimmed = value.trim();
    options
        .iter()
        .find(|option| option.eq_ignore_ascii_case(trimmed))
        .copied()
        .ok_or_else(|| ValidationError::invalid_option(field, trimmed, options))
}

/// Check a `data:` URI against an `accept` filter such as `image/*` or `application/pdf`.
pub fn validate_data_uri(value: &str, accept: Option<&str>, field: &str) -> Result<(), ValidationError> {
    let accept_label = accept.unwrap_or("*/*");
    let mime = DATA_URI
        .captures(value)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_ascii_lowercase())
        .ok_or_else(|| ValidationError::invalid_file(field, accept_label))?;

    let Some(accept) = accept else {
        return Ok(());
    };

    let accepted = accept.split(',').map(str::trim).any(|pattern| {
        let pattern = pattern.to_ascii_lowercase();
        match pattern.strip_suffix("/*") {
            Some(major) => mime.split('/').next() == Some(major),
            None => pattern == "*/*" || pattern == mime,
        }
    });

    if accepted {
        Ok(())
    } else {
        Err(ValidationError::invalid_file(field, accept_label))
    }
}

/// `true` for `data:image/...` URIs that can be embedded in an `<img>` tag.
pub fn is_image_data_uri(value: &str) -> bool {
    DATA_URI
        .captures(value)
        .and_then(|caps| caps.get(1))
        .is_some_and(|m| m.as_str().to_ascii_lowercase().starts_with("image/"))
}

pub fn validate_email(value: &str, field: &str) -> Result<(), ValidationError> {
    if EMAIL.is_match(value.trim()) {
        Ok(())
    } else {
        Err(ValidationError::invalid_email(field, value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_rejects_whitespace() {
        let mut errors = ValidationErrors::new();
        validate_required("   \t", "buyer_name", &mut errors);
        validate_required("Acme", "buyer_address", &mut errors);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors.errors()[0].field, "buyer_name");
    }

    #[test]
    fn test_match_option_is_case_insensitive() {
        assert_eq!(match_option("yes", &["Yes", "No"], "f"), Ok("Yes"));
        assert_eq!(match_option(" NO ", &["Yes", "No"], "f"), Ok("No"));
        assert!(match_option("maybe", &["Yes", "No"], "f").is_err());
    }

    #[test]
    fn test_parse_amount_rejects_negative_and_nan() {
        assert_eq!(parse_amount("12.5", "q"), Ok(12.5));
        assert!(parse_amount("-1", "q").is_err());
        assert!(parse_amount("NaN", "q").is_err());
        assert!(parse_amount("abc", "q").is_err());
    }

    #[test]
    fn test_parse_iso_date() {
        assert!(parse_iso_date("2024-02-29", "d").is_ok());
        assert!(parse_iso_date("29/02/2024", "d").is_err());
    }

    #[test]
    fn test_data_uri_accept_filter() {
        let png = "data:image/png;base64,iVBORw0KGgo=";
        assert!(validate_data_uri(png, Some("image/*"), "logo").is_ok());
        assert!(validate_data_uri(png, Some("application/pdf"), "logo").is_err());
        assert!(validate_data_uri(png, None, "logo").is_ok());
        assert!(validate_data_uri("not a uri", Some("image/*"), "logo").is_err());
    }

    #[test]
    fn test_error_display_includes_suggestion() {
        let error = ValidationError::invalid_date("invoice_date", "tomorrow");
        let text = error.to_string();
        assert!(text.starts_with("[invoice_date]"));
        assert!(text.contains("YYYY-MM-DD"));
    }

    #[test]
    fn test_to_message_numbers_multiple_errors() {
        let mut errors = ValidationErrors::new();
        errors.add(ValidationError::empty_field("a"));
        errors.add(ValidationError::empty_field("b"));
        let message = errors.to_message();
        assert!(message.starts_with("1. [a]"));
        assert!(message.contains("\n2. [b]"));
    }
}
