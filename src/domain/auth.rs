//! Signed-in user, session state and the route gate.

use serde::{Deserialize, Serialize};

use crate::domain::types::UserId;

/// User profile returned by the auth API.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct User {
    #[serde(rename = "_id", alias = "id")]
    pub id: UserId,
    pub email: String,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
}

impl User {
    /// Name shown in the layout header, falling back to the email.
    pub fn display_name(&self) -> String {
        let name = [self.first_name.as_deref(), self.last_name.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(" ");
        if name.is_empty() {
            self.email.clone()
        } else {
            name
        }
    }
}

/// Bearer token issued by the auth API.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct AccessToken(String);

impl AccessToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Result of a successful login or registration.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct AuthSession {
    pub token: AccessToken,
    pub user: User,
}

#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct Registration {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
}

/// A resolved, signed-in session handed to protected handlers.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SignedIn {
    pub user: User,
    pub token: AccessToken,
}

/// What the cookie session holds before it is resolved.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StoredSession {
    pub token: Option<AccessToken>,
    pub user: Option<User>,
}

/// Where the session stands for the current request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SessionState {
    /// A token exists but the user has not been resolved yet.
    Loading,
    Authenticated(SignedIn),
    Anonymous,
}

impl SessionState {
    pub fn user(&self) -> Option<&User> {
        match self {
            SessionState::Authenticated(signed_in) => Some(&signed_in.user),
            _ => None,
        }
    }
}

impl From<&StoredSession> for SessionState {
    /// State implied by the stored values alone, before any refresh.
    fn from(stored: &StoredSession) -> Self {
        match (&stored.token, &stored.user) {
            (Some(token), Some(user)) => SessionState::Authenticated(SignedIn {
                user: user.clone(),
                token: token.clone(),
            }),
            (Some(_), None) => SessionState::Loading,
            (None, _) => SessionState::Anonymous,
        }
    }
}

/// Access class of a dashboard route.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RouteAccess {
    /// Only for signed-out visitors (login, register).
    Public,
    /// Only for signed-in users.
    Protected,
    /// Not gated at all.
    Open,
}

impl RouteAccess {
    /// Classifies a request path.
    pub fn for_path(path: &str) -> Self {
        match path {
            "/login" | "/register" => RouteAccess::Public,
            "/dashboard" | "/logout" => RouteAccess::Protected,
            _ if path.starts_with("/leads/") => RouteAccess::Protected,
            _ => RouteAccess::Open,
        }
    }
}

pub const LOGIN_PATH: &str = "/login";
pub const DASHBOARD_PATH: &str = "/dashboard";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GateDecision {
    Render,
    Placeholder,
    Redirect(&'static str),
}

/// Decides what a request for a route of `access` gets in `state`.
pub fn gate(state: &SessionState, access: RouteAccess) -> GateDecision {
    match (state, access) {
        (_, RouteAccess::Open) => GateDecision::Render,
        (SessionState::Loading, _) => GateDecision::Placeholder,
        (SessionState::Authenticated(_), RouteAccess::Public) => {
            GateDecision::Redirect(DASHBOARD_PATH)
        }
        (SessionState::Anonymous, RouteAccess::Protected) => GateDecision::Redirect(LOGIN_PATH),
        _ => GateDecision::Render,
    }
}
