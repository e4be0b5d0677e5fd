//! Request-independent workflows sitting between routes and the remote API.

use thiserror::Error;

use crate::forms::{FieldErrors, FormError};
use crate::repository::errors::RepositoryError;

pub mod auth;
pub mod dashboard;
pub mod leads;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("unauthorized")]
    Unauthorized,

    #[error("not found")]
    NotFound,

    /// Input failed validation; messages are keyed by field.
    #[error("invalid form input")]
    Invalid(FieldErrors),

    #[error("form error: {0}")]
    Form(String),

    /// The API refused the request, optionally explaining why.
    #[error("rejected by the API")]
    Rejected(Option<String>),

    #[error("repository error: {0}")]
    Repository(RepositoryError),
}

pub type ServiceResult<T> = Result<T, ServiceError>;

impl From<RepositoryError> for ServiceError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::Unauthorized => ServiceError::Unauthorized,
            RepositoryError::NotFound => ServiceError::NotFound,
            RepositoryError::Rejected { message, .. } => ServiceError::Rejected(message),
            other => ServiceError::Repository(other),
        }
    }
}

impl From<FormError> for ServiceError {
    fn from(err: FormError) -> Self {
        ServiceError::Invalid(err.field_errors())
    }
}
