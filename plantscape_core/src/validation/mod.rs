//! Contact form validation

pub mod rules;
pub mod validators;

pub use rules::*;
pub use validators::*;

use crate::error::FieldErrors;
use serde::{Deserialize, Serialize};
use validator::ValidationErrors;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResult {
    pub is_valid: bool,
    pub errors: FieldErrors,
}

impl ValidationResult {
    pub fn success() -> Self {
        Self {
            is_valid: true,
            errors: FieldErrors::new(),
        }
    }

    pub fn from_validation_errors(errors: ValidationErrors) -> Self {
        let mut result = Self::success();

        for (field, field_errors) in errors.field_errors() {
            for error in field_errors {
                match &error.message {
                    Some(message) => result.add_error(&field.to_string(), message),
                    None => result.add_error(
                        &field.to_string(),
                        &format!("Validation failed for field '{}'", field),
                    ),
                }
            }
        }

        result
    }

    pub fn add_error(&mut self, field: &str, message: &str) {
        self.is_valid = false;
        self.errors
            .entry(field.to_string())
            .or_default()
            .push(message.to_string());
    }

    pub fn has_error(&self, field: &str) -> bool {
        self.errors.get(field).is_some_and(|errors| !errors.is_empty())
    }

    pub fn failed_fields(&self) -> Vec<&str> {
        self.errors.keys().map(String::as_str).collect()
    }
}
