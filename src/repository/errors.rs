use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RepositoryError {
    #[error("Entity not found")]
    NotFound,

    #[error("Not authorized")]
    Unauthorized,

    #[error("Request rejected with status {status}")]
    Rejected {
        status: u16,
        message: Option<String>,
    },

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Decode error: {0}")]
    Decode(String),

    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

pub type RepositoryResult<T> = Result<T, RepositoryError>;

#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

impl RepositoryError {
    /// Maps a non-success status and its body to an error. A JSON body with a
    /// `message` field keeps that message for the user.
    pub fn from_status(status: u16, body: &str) -> Self {
        match status {
            401 => RepositoryError::Unauthorized,
            404 => RepositoryError::NotFound,
            _ => {
                let message = serde_json::from_str::<ErrorBody>(body)
                    .ok()
                    .and_then(|body| body.message)
                    .map(|message| message.trim().to_string())
                    .filter(|message| !message.is_empty());
                RepositoryError::Rejected { status, message }
            }
        }
    }

    /// Server-provided message, when the API sent one.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            RepositoryError::Rejected { message, .. } => message.as_deref(),
            _ => None,
        }
    }
}
