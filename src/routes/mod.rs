//! HTTP handlers and the helpers they share.

use actix_session::Session;
use actix_web::HttpResponse;
use actix_web::http::header;
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages, Level};
use serde::Serialize;
use tera::{Context, Tera};

use crate::domain::auth::{LOGIN_PATH, SignedIn, User};
use crate::services::dashboard::LeadListStore;
use crate::session;

pub mod auth;
pub mod dashboard;
pub mod leads;
pub mod main;

/// Maps a flash level to the CSS class used by the alert partial.
pub fn alert_level_to_str(level: &Level) -> &'static str {
    match level {
        Level::Error => "danger",
        Level::Warning => "warning",
        Level::Success => "success",
        _ => "info",
    }
}

/// A message shown at the top of the page.
#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct Alert {
    pub message: String,
    pub level: &'static str,
}

impl Alert {
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            level: alert_level_to_str(&Level::Error),
        }
    }
}

/// Collects the flash messages carried over from the previous request.
pub fn collect_alerts(flash_messages: &IncomingFlashMessages) -> Vec<Alert> {
    flash_messages
        .iter()
        .map(|message| Alert {
            message: message.content().to_string(),
            level: alert_level_to_str(&message.level()),
        })
        .collect()
}

/// Context every page template expects.
pub fn base_context(alerts: Vec<Alert>, user: Option<&User>, current_page: &str) -> Context {
    let mut context = Context::new();
    context.insert("alerts", &alerts);
    context.insert("current_page", current_page);
    if let Some(user) = user {
        context.insert("current_user", user);
        context.insert("current_user_name", &user.display_name());
    }
    context
}

pub fn render_template(tera: &Tera, template: &str, context: &Context) -> HttpResponse {
    match tera.render(template, context) {
        Ok(body) => HttpResponse::Ok()
            .content_type("text/html; charset=utf-8")
            .body(body),
        Err(err) => {
            log::error!("Failed to render template '{template}': {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

pub fn redirect(location: &str) -> HttpResponse {
    HttpResponse::SeeOther()
        .insert_header((header::LOCATION, location))
        .finish()
}

/// Ends a session whose token the API no longer accepts.
pub fn expire_session(session: &Session, store: &LeadListStore, signed_in: &SignedIn) -> HttpResponse {
    log::info!("Session of user {} expired", signed_in.user.id);
    store.forget(signed_in.user.id.as_str());
    session::teardown(session);
    FlashMessage::warning("Your session has expired. Please sign in again.").send();
    redirect(LOGIN_PATH)
}
