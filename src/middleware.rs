//! Per-request session resolution and route gating.

use std::future::{Ready, ready};

use actix_identity::IdentityExt;
use actix_session::SessionExt;
use actix_web::body::{EitherBody, MessageBody};
use actix_web::dev::{Payload, ServiceRequest, ServiceResponse};
use actix_web::error::ErrorUnauthorized;
use actix_web::http::header;
use actix_web::middleware::Next;
use actix_web::{Error, FromRequest, HttpMessage, HttpRequest, HttpResponse, web};
use tera::{Context, Tera};

use crate::domain::auth::{GateDecision, RouteAccess, SessionState, SignedIn, StoredSession, gate};
use crate::repository::ApiRepository;
use crate::services::auth::resolve_session;
use crate::session;

/// Seconds a browser waits before retrying the placeholder page.
const PLACEHOLDER_RETRY_SECS: &str = "2";

/// Resolves the session of every gated request and enforces route access.
///
/// Signed-in users reach handlers with a [`SignedIn`] in the request
/// extensions. Use with [`actix_web::middleware::from_fn`].
pub async fn session_gate<B>(
    req: ServiceRequest,
    next: Next<B>,
) -> Result<ServiceResponse<EitherBody<B>>, Error>
where
    B: MessageBody + 'static,
{
    let access = RouteAccess::for_path(req.path());
    if access == RouteAccess::Open {
        return Ok(next.call(req).await?.map_into_left_body());
    }

    let session = req.get_session();
    let stored = if req.get_identity().is_ok() {
        session::load(&session)
    } else {
        StoredSession::default()
    };

    let state = match req.app_data::<web::Data<dyn ApiRepository>>() {
        Some(repo) => resolve_session(repo.get_ref(), &stored).await,
        None => SessionState::from(&stored),
    };

    match &state {
        SessionState::Authenticated(signed_in) if stored.user.is_none() => {
            if let Err(err) = session::refresh(&session, &signed_in.user) {
                log::error!("Failed to store the refreshed user: {err}");
            }
        }
        SessionState::Anonymous if stored.token.is_some() => session::teardown(&session),
        _ => {}
    }

    match gate(&state, access) {
        GateDecision::Render => {
            if let SessionState::Authenticated(signed_in) = state {
                req.extensions_mut().insert(signed_in);
            }
            Ok(next.call(req).await?.map_into_left_body())
        }
        GateDecision::Redirect(location) => {
            let response = HttpResponse::SeeOther()
                .insert_header((header::LOCATION, location))
                .finish();
            Ok(req.into_response(response).map_into_right_body())
        }
        GateDecision::Placeholder => {
            let response = placeholder(req.app_data::<web::Data<Tera>>());
            Ok(req.into_response(response).map_into_right_body())
        }
    }
}

/// Page shown while the session cannot be resolved.
fn placeholder(tera: Option<&web::Data<Tera>>) -> HttpResponse {
    let body = tera.and_then(|tera| match tera.render("loading.html", &Context::new()) {
        Ok(body) => Some(body),
        Err(err) => {
            log::error!("Failed to render the loading page: {err}");
            None
        }
    });

    HttpResponse::ServiceUnavailable()
        .insert_header((header::RETRY_AFTER, PLACEHOLDER_RETRY_SECS))
        .content_type("text/html; charset=utf-8")
        .body(body.unwrap_or_else(|| "Loading…".to_string()))
}

impl FromRequest for SignedIn {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(
            req.extensions()
                .get::<SignedIn>()
                .cloned()
                .ok_or_else(|| ErrorUnauthorized("not signed in")),
        )
    }
}
