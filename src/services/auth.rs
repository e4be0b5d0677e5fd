//! Login, registration and session resolution against the auth API.

use crate::domain::auth::{
    AccessToken, AuthSession, Credentials, Registration, SessionState, SignedIn, StoredSession,
};
use crate::forms::auth::{LoginForm, RegisterForm};
use crate::repository::AuthGateway;
use crate::repository::errors::RepositoryError;
use crate::services::{ServiceError, ServiceResult};

/// Validates the login form and exchanges the credentials for a session.
pub async fn login<R>(repo: &R, form: LoginForm) -> ServiceResult<AuthSession>
where
    R: AuthGateway + ?Sized,
{
    let credentials = Credentials::try_from(form)?;

    repo.login(&credentials).await.map_err(|err| {
        log::error!("Login failed: {err}");
        ServiceError::from(err)
    })
}

/// Validates the registration form and creates the account.
pub async fn register<R>(repo: &R, form: RegisterForm) -> ServiceResult<AuthSession>
where
    R: AuthGateway + ?Sized,
{
    let registration = Registration::try_from(form)?;

    repo.register(&registration).await.map_err(|err| {
        log::error!("Registration failed: {err}");
        ServiceError::from(err)
    })
}

/// Resolves what the stored cookie values mean for this request.
///
/// A token without a user is refreshed through `/auth/me`. A rejected token
/// makes the visitor anonymous; an unreachable API keeps the session loading.
pub async fn resolve_session<R>(repo: &R, stored: &StoredSession) -> SessionState
where
    R: AuthGateway + ?Sized,
{
    let (Some(token), None) = (&stored.token, &stored.user) else {
        return SessionState::from(stored);
    };

    match repo.current_user(token).await {
        Ok(user) => SessionState::Authenticated(SignedIn {
            user,
            token: token.clone(),
        }),
        Err(RepositoryError::Unauthorized) => SessionState::Anonymous,
        Err(err) => {
            log::error!("Failed to refresh the current user: {err}");
            SessionState::Loading
        }
    }
}

/// Tells the API the token is no longer used. Failures are only logged.
pub async fn logout<R>(repo: &R, token: &AccessToken)
where
    R: AuthGateway + ?Sized,
{
    if let Err(err) = repo.logout(token).await {
        log::warn!("Remote logout failed: {err}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::auth::User;
    use crate::domain::types::UserId;
    use crate::repository::mock::MockRepository;

    fn user() -> User {
        User {
            id: UserId::new("u1").unwrap(),
            email: "rep@example.com".into(),
            first_name: Some("Sam".into()),
            last_name: Some("Rep".into()),
        }
    }

    fn token_only() -> StoredSession {
        StoredSession {
            token: Some(AccessToken::new("t")),
            user: None,
        }
    }

    #[actix_web::test]
    async fn login_sends_normalized_credentials() {
        let mut repo = MockRepository::new();
        repo.expect_login()
            .withf(|credentials| credentials.email == "rep@example.com")
            .times(1)
            .returning(|_| {
                Ok(AuthSession {
                    token: AccessToken::new("t"),
                    user: user(),
                })
            });
        let form = LoginForm {
            email: "Rep@Example.com".into(),
            password: "secret".into(),
        };

        let session = login(&repo, form).await.unwrap();

        assert_eq!(session.token.as_str(), "t");
    }

    #[actix_web::test]
    async fn invalid_login_form_never_reaches_the_api() {
        let mut repo = MockRepository::new();
        repo.expect_login().never();
        let form = LoginForm {
            email: "rep".into(),
            password: String::new(),
        };

        let result = login(&repo, form).await;

        assert!(matches!(result, Err(ServiceError::Invalid(errors)) if errors.len() == 2));
    }

    #[actix_web::test]
    async fn wrong_password_is_rejected_with_message() {
        let mut repo = MockRepository::new();
        repo.expect_login().returning(|_| {
            Err(RepositoryError::Rejected {
                status: 400,
                message: Some("Invalid credentials".into()),
            })
        });
        let form = LoginForm {
            email: "rep@example.com".into(),
            password: "nope".into(),
        };

        let result = login(&repo, form).await;

        assert!(matches!(
            result,
            Err(ServiceError::Rejected(Some(message))) if message == "Invalid credentials"
        ));
    }

    #[actix_web::test]
    async fn mismatched_passwords_never_reach_the_api() {
        let mut repo = MockRepository::new();
        repo.expect_register().never();
        let form = RegisterForm {
            first_name: "Sam".into(),
            last_name: "Rep".into(),
            email: "rep@example.com".into(),
            password: "secret1".into(),
            confirm_password: "secret2".into(),
        };

        let result = register(&repo, form).await;

        assert!(matches!(result, Err(ServiceError::Invalid(errors)) if errors.contains("confirm_password")));
    }

    #[actix_web::test]
    async fn complete_session_is_not_refreshed() {
        let mut repo = MockRepository::new();
        repo.expect_current_user().never();
        let stored = StoredSession {
            token: Some(AccessToken::new("t")),
            user: Some(user()),
        };

        let state = resolve_session(&repo, &stored).await;

        assert_eq!(state.user(), Some(&user()));
    }

    #[actix_web::test]
    async fn token_without_user_is_refreshed() {
        let mut repo = MockRepository::new();
        repo.expect_current_user()
            .times(1)
            .returning(|_| Ok(user()));

        let state = resolve_session(&repo, &token_only()).await;

        assert!(matches!(state, SessionState::Authenticated(_)));
    }

    #[actix_web::test]
    async fn rejected_token_becomes_anonymous() {
        let mut repo = MockRepository::new();
        repo.expect_current_user()
            .returning(|_| Err(RepositoryError::Unauthorized));

        let state = resolve_session(&repo, &token_only()).await;

        assert_eq!(state, SessionState::Anonymous);
    }

    #[actix_web::test]
    async fn unreachable_api_keeps_loading() {
        let mut repo = MockRepository::new();
        repo.expect_current_user()
            .returning(|_| Err(RepositoryError::Transport("timed out".into())));

        let state = resolve_session(&repo, &token_only()).await;

        assert_eq!(state, SessionState::Loading);
    }

    #[actix_web::test]
    async fn failed_remote_logout_is_ignored() {
        let mut repo = MockRepository::new();
        repo.expect_logout()
            .times(1)
            .returning(|_| Err(RepositoryError::Transport("down".into())));

        logout(&repo, &AccessToken::new("t")).await;
    }
}
