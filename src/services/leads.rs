//! Create and edit workflows for a single lead.

use crate::domain::auth::AccessToken;
use crate::domain::lead::{Lead, LeadPayload};
use crate::domain::types::LeadId;
use crate::dto::leads::{FormMode, LeadFormPageData};
use crate::forms::FieldErrors;
use crate::forms::lead::LeadForm;
use crate::repository::{LeadReader, LeadWriter};
use crate::services::{ServiceError, ServiceResult};

/// Blank form for `/leads/new`.
pub fn new_lead_form() -> LeadFormPageData {
    LeadFormPageData::new(&FormMode::Create, LeadForm::default(), FieldErrors::new())
}

/// Parses a lead id taken from the URL. Anything unusable is not found.
pub fn parse_lead_id(raw: &str) -> ServiceResult<LeadId> {
    LeadId::new(raw).map_err(|_| ServiceError::NotFound)
}

/// Loads a lead and pre-fills the edit form with its values.
pub async fn load_lead_form<R>(
    repo: &R,
    token: &AccessToken,
    lead_id: &str,
) -> ServiceResult<LeadFormPageData>
where
    R: LeadReader + ?Sized,
{
    let lead_id = parse_lead_id(lead_id)?;

    let lead = repo.get_lead(token, &lead_id).await.map_err(|err| {
        log::error!("Failed to load lead {lead_id}: {err}");
        ServiceError::from(err)
    })?;

    Ok(LeadFormPageData::new(
        &FormMode::Edit(lead_id),
        LeadForm::from(&lead),
        FieldErrors::new(),
    ))
}

/// Validates the form and creates a lead. Nothing is sent to the API when
/// validation fails.
pub async fn create_lead<R>(repo: &R, token: &AccessToken, form: &LeadForm) -> ServiceResult<Lead>
where
    R: LeadWriter + ?Sized,
{
    let payload = LeadPayload::try_from(form)?;

    repo.create_lead(token, &payload).await.map_err(|err| {
        log::error!("Failed to create lead: {err}");
        ServiceError::from(err)
    })
}

/// Validates the form and updates the lead `lead_id`.
pub async fn update_lead<R>(
    repo: &R,
    token: &AccessToken,
    lead_id: &LeadId,
    form: &LeadForm,
) -> ServiceResult<Lead>
where
    R: LeadWriter + ?Sized,
{
    let payload = LeadPayload::try_from(form)?;

    repo.update_lead(token, lead_id, &payload)
        .await
        .map_err(|err| {
            log::error!("Failed to update lead {lead_id}: {err}");
            ServiceError::from(err)
        })
}
