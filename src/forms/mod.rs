//! Form definitions backing the dashboard routes.

use std::collections::BTreeMap;

use serde::Serialize;
use thiserror::Error;
use validator::ValidationErrors;

pub mod auth;
pub mod lead;

/// Field name to the message shown under that field.
#[derive(Clone, Debug, Default, Serialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, String>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `message` for `field` unless the field already has one.
    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0
            .entry(field.to_string())
            .or_insert_with(|| message.into());
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

impl From<&ValidationErrors> for FieldErrors {
    /// Keeps the first message of every failing field.
    fn from(errors: &ValidationErrors) -> Self {
        let mut fields = FieldErrors::new();
        for (field, errors) in errors.field_errors() {
            if let Some(error) = errors.first() {
                let message = error
                    .message
                    .as_ref()
                    .map(|message| message.to_string())
                    .unwrap_or_else(|| format!("Invalid {field}"));
                fields.add(&field.to_string(), message);
            }
        }
        fields
    }
}

#[derive(Debug, Error)]
/// Errors that can occur when processing form data.
pub enum FormError {
    #[error("validation errors: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("invalid fields: {}", .0.len())]
    Fields(FieldErrors),

    #[error("passwords do not match")]
    PasswordMismatch,
}

impl FormError {
    /// Per-field messages for inline display.
    pub fn field_errors(&self) -> FieldErrors {
        match self {
            FormError::Validation(errors) => FieldErrors::from(errors),
            FormError::Fields(fields) => fields.clone(),
            FormError::PasswordMismatch => {
                let mut fields = FieldErrors::new();
                fields.add("confirm_password", "Passwords do not match");
                fields
            }
        }
    }
}
