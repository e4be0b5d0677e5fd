//! DTOs for the create/edit lead page.

use serde::Serialize;

use crate::domain::types::{LeadId, LeadSource, LeadStatus};
use crate::forms::FieldErrors;
use crate::forms::lead::LeadForm;

/// Whether the form creates a new lead or edits an existing one.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Edit(LeadId),
}

#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct SelectOption {
    pub value: &'static str,
    pub label: &'static str,
}

/// Data required to render `leads/form.html`.
#[derive(Clone, Debug, Serialize)]
pub struct LeadFormPageData {
    pub title: &'static str,
    pub subtitle: &'static str,
    pub action: String,
    pub submit_label: &'static str,
    /// Submit button text while the request is in flight.
    pub busy_label: &'static str,
    pub form: LeadForm,
    pub qualified: bool,
    pub errors: FieldErrors,
    pub sources: Vec<SelectOption>,
    pub statuses: Vec<SelectOption>,
}

impl LeadFormPageData {
    pub fn new(mode: &FormMode, form: LeadForm, errors: FieldErrors) -> Self {
        let (title, subtitle, action, submit_label, busy_label) = match mode {
            FormMode::Create => (
                "Create New Lead",
                "Create a new lead entry",
                "/leads/new".to_string(),
                "Create Lead",
                "Creating...",
            ),
            FormMode::Edit(id) => (
                "Edit Lead",
                "Update lead information",
                format!("/leads/{id}/edit"),
                "Update Lead",
                "Updating...",
            ),
        };

        Self {
            title,
            subtitle,
            action,
            submit_label,
            busy_label,
            qualified: form.qualified(),
            form,
            errors,
            sources: LeadSource::ALL
                .into_iter()
                .map(|source| SelectOption {
                    value: source.as_str(),
                    label: source.label(),
                })
                .collect(),
            statuses: LeadStatus::ALL
                .into_iter()
                .map(|status| SelectOption {
                    value: status.as_str(),
                    label: status.label(),
                })
                .collect(),
        }
    }
}
