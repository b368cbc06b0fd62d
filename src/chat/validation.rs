//! Per-type answer checks for scalar questions.

use crate::catalog::{FieldDefinition, FieldType, SKIPPED};
use crate::validation::{
    match_option, parse_amount, parse_iso_date, validate_data_uri, validate_email, ValidationError,
};

/// Outcome of normalizing a raw answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnswerValue {
    /// Value to store, already in canonical form.
    Value(String),
    /// Blank answer to an optional question.
    Skip,
}

fn section_error(def: &FieldDefinition) -> ValidationError {
    ValidationError::new(def.field, "This section is filled item by item")
        .with_suggestion("Add each item, then finish the section")
}

/// Validate `raw` for `def` and return what should be written to the answer map.
pub fn normalize_answer(def: &FieldDefinition, raw: &str) -> Result<AnswerValue, ValidationError> {
    let value = raw.trim();

    if def.field_type.is_repeatable() {
        return Err(section_error(def));
    }

    // The skip marker is reserved and never a stored answer.
    if value.is_empty() || value == SKIPPED {
        return if def.required {
            Err(ValidationError::empty_field(def.field))
        } else {
            Ok(AnswerValue::Skip)
        };
    }

    let normalized = match def.field_type {
        FieldType::Text | FieldType::Textarea => {
            if def.field.ends_with("_email") {
                validate_email(value, def.field)?;
            }
            value.to_string()
        }
        FieldType::Select => match_option(value, def.options, def.field)?.to_string(),
        FieldType::Multiselect => {
            let chosen = value
                .split(',')
                .map(str::trim)
                .filter(|item| !item.is_empty())
                .map(|item| match_option(item, def.options, def.field))
                .collect::<Result<Vec<_>, _>>()?;
            if chosen.is_empty() {
                return normalize_answer(def, "");
            }
            chosen.join(", ")
        }
        FieldType::Date => parse_iso_date(value, def.field)?.format("%Y-%m-%d").to_string(),
        FieldType::Number => {
            parse_amount(value, def.field)?;
            value.to_string()
        }
        FieldType::File => {
            validate_data_uri(value, def.accept, def.field)?;
            value.to_string()
        }
        FieldType::Products | FieldType::Packing => return Err(section_error(def)),
    };

    Ok(AnswerValue::Value(normalized))
}
