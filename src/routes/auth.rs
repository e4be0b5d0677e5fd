use actix_identity::Identity;
use actix_session::Session;
use actix_web::{HttpRequest, HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use tera::Tera;

use crate::domain::auth::{AuthSession, DASHBOARD_PATH, LOGIN_PATH, SignedIn};
use crate::forms::FieldErrors;
use crate::forms::auth::{LoginForm, RegisterForm};
use crate::repository::ApiRepository;
use crate::routes::{Alert, base_context, collect_alerts, redirect, render_template};
use crate::services::ServiceError;
use crate::services::auth as auth_service;
use crate::services::dashboard::LeadListStore;
use crate::session;

fn render_auth_page<T: serde::Serialize>(
    tera: &Tera,
    template: &str,
    current_page: &str,
    alerts: Vec<Alert>,
    form: &T,
    errors: &FieldErrors,
) -> HttpResponse {
    let mut context = base_context(alerts, None, current_page);
    context.insert("form", form);
    context.insert("errors", errors);
    render_template(tera, template, &context)
}

/// Maps a failed login or registration to inline errors and alerts.
fn failure_feedback(err: ServiceError, fallback: &str) -> (FieldErrors, Vec<Alert>) {
    match err {
        ServiceError::Invalid(errors) => (errors, vec![]),
        ServiceError::Rejected(Some(message)) => (FieldErrors::new(), vec![Alert::error(message)]),
        _ => (FieldErrors::new(), vec![Alert::error(fallback)]),
    }
}

/// Stores the new session and sends the user to the dashboard.
fn sign_in(req: &HttpRequest, session: &Session, auth: &AuthSession, welcome: &str) -> HttpResponse {
    match session::initialize(req, session, auth) {
        Ok(()) => {
            log::info!("User {} signed in", auth.user.id);
            FlashMessage::success(welcome).send();
            redirect(DASHBOARD_PATH)
        }
        Err(err) => {
            log::error!("Failed to start session: {err}");
            FlashMessage::error("Could not start your session").send();
            redirect(LOGIN_PATH)
        }
    }
}

#[get("/login")]
pub async fn show_login(
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    render_auth_page(
        &tera,
        "auth/login.html",
        "login",
        collect_alerts(&flash_messages),
        &LoginForm::default(),
        &FieldErrors::new(),
    )
}

#[post("/login")]
pub async fn login(
    req: HttpRequest,
    session: Session,
    repo: web::Data<dyn ApiRepository>,
    tera: web::Data<Tera>,
    web::Form(form): web::Form<LoginForm>,
) -> impl Responder {
    match auth_service::login(repo.get_ref(), form.clone()).await {
        Ok(auth) => sign_in(&req, &session, &auth, "Login successful"),
        Err(err) => {
            let (errors, alerts) = failure_feedback(err, "Login failed");
            render_auth_page(&tera, "auth/login.html", "login", alerts, &form, &errors)
        }
    }
}

#[get("/register")]
pub async fn show_register(
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    render_auth_page(
        &tera,
        "auth/register.html",
        "register",
        collect_alerts(&flash_messages),
        &RegisterForm::default(),
        &FieldErrors::new(),
    )
}

#[post("/register")]
pub async fn register(
    req: HttpRequest,
    session: Session,
    repo: web::Data<dyn ApiRepository>,
    tera: web::Data<Tera>,
    web::Form(form): web::Form<RegisterForm>,
) -> impl Responder {
    match auth_service::register(repo.get_ref(), form.clone()).await {
        Ok(auth) => sign_in(&req, &session, &auth, "Registration successful"),
        Err(err) => {
            let (errors, alerts) = failure_feedback(err, "Registration failed");
            render_auth_page(&tera, "auth/register.html", "register", alerts, &form, &errors)
        }
    }
}

#[post("/logout")]
pub async fn logout(
    signed_in: SignedIn,
    identity: Option<Identity>,
    session: Session,
    repo: web::Data<dyn ApiRepository>,
    store: web::Data<LeadListStore>,
) -> impl Responder {
    auth_service::logout(repo.get_ref(), &signed_in.token).await;
    store.forget(signed_in.user.id.as_str());
    if let Some(identity) = identity {
        identity.logout();
    }
    session::teardown(&session);
    redirect(LOGIN_PATH)
}
