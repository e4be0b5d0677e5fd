//! Cookie session holding the access token and the resolved user.

use actix_identity::Identity;
use actix_identity::error::LoginError;
use actix_session::{Session, SessionInsertError};
use actix_web::{HttpMessage, HttpRequest};
use thiserror::Error;

use crate::domain::auth::{AccessToken, AuthSession, StoredSession, User};

pub const TOKEN_KEY: &str = "access_token";
pub const USER_KEY: &str = "user";

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("failed to write session: {0}")]
    Insert(#[from] SessionInsertError),

    #[error("failed to attach identity: {0}")]
    Login(#[from] LoginError),
}

/// Reads the stored token and user. Unreadable entries count as absent.
pub fn load(session: &Session) -> StoredSession {
    let token = read::<AccessToken>(session, TOKEN_KEY);
    let user = read::<User>(session, USER_KEY);
    StoredSession { token, user }
}

fn read<T: serde::de::DeserializeOwned>(session: &Session, key: &str) -> Option<T> {
    session
        .get::<T>(key)
        .map_err(|err| log::warn!("Ignoring unreadable session entry {key}: {err}"))
        .ok()
        .flatten()
}

/// Starts a session after login or registration.
pub fn initialize(
    req: &HttpRequest,
    session: &Session,
    auth: &AuthSession,
) -> Result<(), SessionError> {
    Identity::login(&req.extensions(), auth.user.id.to_string())?;
    session.insert(TOKEN_KEY, &auth.token)?;
    session.insert(USER_KEY, &auth.user)?;
    Ok(())
}

/// Stores a user resolved for an existing token.
pub fn refresh(session: &Session, user: &User) -> Result<(), SessionError> {
    session.insert(USER_KEY, user)?;
    Ok(())
}

/// Removes everything the session holds, identity included.
pub fn teardown(session: &Session) {
    session.purge();
}
