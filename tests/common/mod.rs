//! In-memory stand-in for the remote lead API and an app factory for tests.
#![allow(dead_code)]

use std::sync::Mutex;

use actix_identity::Identity;
use actix_session::Session;
use actix_web::cookie::Cookie;
use actix_web::dev::ServiceResponse;
use actix_web::{HttpMessage, HttpRequest, HttpResponse, web};
use async_trait::async_trait;
use serde::Deserialize;
use tera::Tera;

use lead_dashboard::domain::auth::{
    AccessToken, AuthSession, Credentials, Registration, User,
};
use lead_dashboard::domain::filter::FilterField;
use lead_dashboard::domain::lead::{Lead, LeadPage, LeadPayload};
use lead_dashboard::domain::types::{LeadId, LeadSource, LeadStatus, UserId};
use lead_dashboard::models::config::ServerConfig;
use lead_dashboard::repository::errors::{RepositoryError, RepositoryResult};
use lead_dashboard::repository::{AuthGateway, LeadListQuery, LeadReader, LeadWriter};
use lead_dashboard::session;

pub const GOOD_TOKEN: &str = "good-token";
pub const EXPIRED_TOKEN: &str = "expired-token";
pub const OFFLINE_TOKEN: &str = "offline-token";

pub fn user() -> User {
    User {
        id: UserId::new("u1").unwrap(),
        email: "rep@example.com".into(),
        first_name: Some("Sam".into()),
        last_name: Some("Rep".into()),
    }
}

pub fn lead(id: &str, status: LeadStatus, score: i64, qualified: bool) -> Lead {
    Lead {
        id: LeadId::new(id).unwrap(),
        first_name: "Lead".into(),
        last_name: id.to_uppercase(),
        email: format!("{id}@example.com"),
        phone: "555-0100".into(),
        company: "Acme".into(),
        city: "Springfield".into(),
        state: "IL".into(),
        source: LeadSource::Website,
        status,
        score,
        lead_value: 1000.0,
        is_qualified: qualified,
        last_activity_at: None,
        created_at: None,
        updated_at: None,
        created_by: None,
    }
}

/// Fake API keeping leads in memory and recording every call.
#[derive(Default)]
pub struct FakeApi {
    pub leads: Mutex<Vec<Lead>>,
    pub calls: Mutex<Vec<String>>,
    pub list_queries: Mutex<Vec<LeadListQuery>>,
    pub fail_deletes: Mutex<bool>,
}

impl FakeApi {
    pub fn with_leads(leads: Vec<Lead>) -> Self {
        Self {
            leads: Mutex::new(leads),
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn last_list_query(&self) -> Option<LeadListQuery> {
        self.list_queries.lock().unwrap().last().cloned()
    }

    pub fn lead(&self, id: &str) -> Option<Lead> {
        self.leads
            .lock()
            .unwrap()
            .iter()
            .find(|lead| lead.id.as_str() == id)
            .cloned()
    }

    fn record(&self, call: &str) {
        self.calls.lock().unwrap().push(call.to_string());
    }

    fn check(&self, token: &AccessToken) -> RepositoryResult<()> {
        match token.as_str() {
            GOOD_TOKEN => Ok(()),
            OFFLINE_TOKEN => Err(RepositoryError::Transport("connection refused".into())),
            _ => Err(RepositoryError::Unauthorized),
        }
    }

    fn apply(lead: &mut Lead, payload: &LeadPayload) {
        lead.first_name = payload.first_name.to_string();
        lead.last_name = payload.last_name.to_string();
        lead.email = payload.email.to_string();
        lead.phone = payload.phone.to_string();
        lead.company = payload.company.to_string();
        lead.city = payload.city.to_string();
        lead.state = payload.state.to_string();
        lead.source = payload.source;
        lead.status = payload.status;
        lead.score = i64::from(payload.score);
        lead.lead_value = payload.lead_value.get();
        lead.is_qualified = payload.is_qualified;
        lead.last_activity_at = payload.last_activity_at;
    }
}

#[async_trait]
impl LeadReader for FakeApi {
    async fn list_leads(
        &self,
        token: &AccessToken,
        query: &LeadListQuery,
    ) -> RepositoryResult<LeadPage> {
        self.record("list");
        self.check(token)?;
        self.list_queries.lock().unwrap().push(query.clone());

        let status = query.filters.value_of(FilterField::Status).to_string();
        let email = query.filters.value_of(FilterField::Email).to_string();
        let matching: Vec<Lead> = self
            .leads
            .lock()
            .unwrap()
            .iter()
            .filter(|lead| status.is_empty() || lead.status.as_str() == status)
            .filter(|lead| email.is_empty() || lead.email.contains(&email))
            .cloned()
            .collect();

        let total = matching.len();
        let data = matching
            .into_iter()
            .skip((query.page - 1) * query.limit)
            .take(query.limit)
            .collect();

        Ok(LeadPage {
            data,
            page: query.page,
            limit: query.limit,
            total,
            total_pages: total.div_ceil(query.limit),
        })
    }

    async fn get_lead(&self, token: &AccessToken, id: &LeadId) -> RepositoryResult<Lead> {
        self.record("get");
        self.check(token)?;
        self.lead(id.as_str()).ok_or(RepositoryError::NotFound)
    }
}

#[async_trait]
impl LeadWriter for FakeApi {
    async fn create_lead(&self, token: &AccessToken, payload: &LeadPayload) -> RepositoryResult<Lead> {
        self.record("create");
        self.check(token)?;
        let mut leads = self.leads.lock().unwrap();
        let mut lead = lead(&format!("new{}", leads.len() + 1), LeadStatus::New, 0, false);
        Self::apply(&mut lead, payload);
        leads.push(lead.clone());
        Ok(lead)
    }

    async fn update_lead(
        &self,
        token: &AccessToken,
        id: &LeadId,
        payload: &LeadPayload,
    ) -> RepositoryResult<Lead> {
        self.record("update");
        self.check(token)?;
        let mut leads = self.leads.lock().unwrap();
        let lead = leads
            .iter_mut()
            .find(|lead| &lead.id == id)
            .ok_or(RepositoryError::NotFound)?;
        Self::apply(lead, payload);
        Ok(lead.clone())
    }

    async fn delete_lead(&self, token: &AccessToken, id: &LeadId) -> RepositoryResult<()> {
        self.record("delete");
        self.check(token)?;
        if *self.fail_deletes.lock().unwrap() {
            return Err(RepositoryError::Rejected {
                status: 500,
                message: Some("Database unavailable".into()),
            });
        }
        let mut leads = self.leads.lock().unwrap();
        let before = leads.len();
        leads.retain(|lead| &lead.id != id);
        if leads.len() == before {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}

#[async_trait]
impl AuthGateway for FakeApi {
    async fn login(&self, credentials: &Credentials) -> RepositoryResult<AuthSession> {
        self.record("login");
        if credentials.password != "secret" {
            return Err(RepositoryError::Rejected {
                status: 400,
                message: Some("Invalid credentials".into()),
            });
        }
        Ok(AuthSession {
            token: AccessToken::new(GOOD_TOKEN),
            user: user(),
        })
    }

    async fn register(&self, _registration: &Registration) -> RepositoryResult<AuthSession> {
        self.record("register");
        Ok(AuthSession {
            token: AccessToken::new(GOOD_TOKEN),
            user: user(),
        })
    }

    async fn current_user(&self, token: &AccessToken) -> RepositoryResult<User> {
        self.record("me");
        self.check(token)?;
        Ok(user())
    }

    async fn logout(&self, _token: &AccessToken) -> RepositoryResult<()> {
        self.record("logout");
        Ok(())
    }
}

pub fn tera() -> Tera {
    Tera::new(concat!(env!("CARGO_MANIFEST_DIR"), "/templates/**/*")).unwrap()
}

pub fn server_config() -> ServerConfig {
    ServerConfig {
        domain: "localhost".into(),
        address: "127.0.0.1".into(),
        port: 8080,
        templates_dir: "templates/**/*".into(),
        secret: "k".repeat(64),
        api_base_url: "http://localhost:5000/api".into(),
        page_size: 20,
        request_timeout_secs: 5,
    }
}

#[derive(Deserialize)]
pub struct SignInParams {
    token: String,
    #[serde(default)]
    token_only: bool,
}

/// Test-only route storing a session the way login does.
pub async fn test_sign_in(
    req: HttpRequest,
    session: Session,
    params: web::Query<SignInParams>,
) -> HttpResponse {
    let token = AccessToken::new(params.token.clone());
    if params.token_only {
        Identity::login(&req.extensions(), "u1".to_string()).unwrap();
        session.insert(session::TOKEN_KEY, &token).unwrap();
    } else {
        let auth = AuthSession { token, user: user() };
        session::initialize(&req, &session, &auth).unwrap();
    }
    HttpResponse::Ok().finish()
}

/// Builds the dashboard app around `$api` with the production middleware.
#[macro_export]
macro_rules! test_app {
    ($api:expr) => {{
        let key = actix_web::cookie::Key::from(&[7u8; 64]);
        let repo: std::sync::Arc<dyn lead_dashboard::repository::ApiRepository> = $api;
        actix_web::test::init_service(
            actix_web::App::new()
                .wrap(actix_web::middleware::from_fn(
                    lead_dashboard::middleware::session_gate,
                ))
                .wrap(
                    actix_web_flash_messages::FlashMessagesFramework::builder(
                        actix_web_flash_messages::storage::CookieMessageStore::builder(
                            key.clone(),
                        )
                        .build(),
                    )
                    .build(),
                )
                .wrap(actix_identity::IdentityMiddleware::default())
                .wrap(
                    actix_session::SessionMiddleware::builder(
                        actix_session::storage::CookieSessionStore::default(),
                        key.clone(),
                    )
                    .cookie_secure(false)
                    .build(),
                )
                .app_data(actix_web::web::Data::new($crate::common::tera()))
                .app_data(actix_web::web::Data::from(repo))
                .app_data(actix_web::web::Data::new(
                    lead_dashboard::services::dashboard::LeadListStore::new(),
                ))
                .app_data(actix_web::web::Data::new($crate::common::server_config()))
                .route(
                    "/test/sign-in",
                    actix_web::web::get().to($crate::common::test_sign_in),
                )
                .configure(lead_dashboard::configure),
        )
        .await
    }};
}

/// Cookies a response asked the browser to store. Removal cookies carry
/// an empty value and are left out, as a browser would drop them.
pub fn cookies_of<B>(resp: &ServiceResponse<B>) -> Vec<Cookie<'static>> {
    resp.response()
        .cookies()
        .filter(|cookie| !cookie.value().is_empty())
        .map(|cookie| cookie.into_owned())
        .collect()
}

/// Cookie jar after `resp`: its cookies replace same-named ones in `jar`,
/// and removal cookies delete them.
pub fn follow_cookies<B>(jar: &[Cookie<'static>], resp: &ServiceResponse<B>) -> Vec<Cookie<'static>> {
    let mut next: Vec<Cookie<'static>> = jar.to_vec();
    for cookie in resp.response().cookies() {
        next.retain(|kept| kept.name() != cookie.name());
        if !cookie.value().is_empty() {
            next.push(cookie.into_owned());
        }
    }
    next
}

pub fn location<B>(resp: &ServiceResponse<B>) -> Option<String> {
    resp.headers()
        .get(actix_web::http::header::LOCATION)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string)
}

pub fn has_flash<B>(resp: &ServiceResponse<B>) -> bool {
    resp.response()
        .cookies()
        .any(|cookie| cookie.name() == "_flash" && !cookie.value().is_empty())
}
