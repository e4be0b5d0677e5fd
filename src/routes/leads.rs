use actix_session::Session;
use actix_web::{HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use tera::Tera;

use crate::domain::auth::SignedIn;
use crate::dto::leads::{FormMode, LeadFormPageData};
use crate::forms::FieldErrors;
use crate::forms::lead::LeadForm;
use crate::repository::ApiRepository;
use crate::routes::{Alert, base_context, collect_alerts, expire_session, redirect, render_template};
use crate::services::ServiceError;
use crate::services::dashboard::LeadListStore;
use crate::services::leads as lead_service;

fn render_form(
    tera: &Tera,
    signed_in: &SignedIn,
    alerts: Vec<Alert>,
    data: &LeadFormPageData,
) -> HttpResponse {
    let mut context = base_context(alerts, Some(&signed_in.user), "lead_form");
    context.insert("page", data);
    render_template(tera, "leads/form.html", &context)
}

#[get("/leads/new")]
pub async fn new_lead(
    signed_in: SignedIn,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    let data = lead_service::new_lead_form();
    render_form(&tera, &signed_in, collect_alerts(&flash_messages), &data)
}

#[get("/leads/{lead_id}/edit")]
pub async fn edit_lead(
    lead_id: web::Path<String>,
    signed_in: SignedIn,
    session: Session,
    repo: web::Data<dyn ApiRepository>,
    store: web::Data<LeadListStore>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    match lead_service::load_lead_form(repo.get_ref(), &signed_in.token, &lead_id).await {
        Ok(data) => render_form(&tera, &signed_in, collect_alerts(&flash_messages), &data),
        Err(ServiceError::Unauthorized) => expire_session(&session, &store, &signed_in),
        Err(_) => {
            FlashMessage::error("Failed to load lead data").send();
            redirect(&store.current_href(signed_in.user.id.as_str()))
        }
    }
}

#[post("/leads/new")]
pub async fn create_lead(
    signed_in: SignedIn,
    session: Session,
    repo: web::Data<dyn ApiRepository>,
    store: web::Data<LeadListStore>,
    tera: web::Data<Tera>,
    web::Form(form): web::Form<LeadForm>,
) -> impl Responder {
    let result = lead_service::create_lead(repo.get_ref(), &signed_in.token, &form).await;
    finish_save(
        result.map(|_| "Lead created successfully!"),
        &FormMode::Create,
        form,
        &tera,
        &session,
        &store,
        &signed_in,
    )
}

#[post("/leads/{lead_id}/edit")]
pub async fn update_lead(
    lead_id: web::Path<String>,
    signed_in: SignedIn,
    session: Session,
    repo: web::Data<dyn ApiRepository>,
    store: web::Data<LeadListStore>,
    tera: web::Data<Tera>,
    web::Form(form): web::Form<LeadForm>,
) -> impl Responder {
    let lead_id = match lead_service::parse_lead_id(&lead_id) {
        Ok(lead_id) => lead_id,
        Err(_) => {
            FlashMessage::error("Failed to load lead data").send();
            return redirect(&store.current_href(signed_in.user.id.as_str()));
        }
    };

    let result = lead_service::update_lead(repo.get_ref(), &signed_in.token, &lead_id, &form).await;
    finish_save(
        result.map(|_| "Lead updated successfully!"),
        &FormMode::Edit(lead_id),
        form,
        &tera,
        &session,
        &store,
        &signed_in,
    )
}

/// Redirects to the dashboard after a save, or re-renders the submitted
/// form with inline errors or the API's message.
fn finish_save(
    result: Result<&'static str, ServiceError>,
    mode: &FormMode,
    form: LeadForm,
    tera: &Tera,
    session: &Session,
    store: &LeadListStore,
    signed_in: &SignedIn,
) -> HttpResponse {
    let (errors, alerts) = match result {
        Ok(message) => {
            FlashMessage::success(message).send();
            return redirect(&store.current_href(signed_in.user.id.as_str()));
        }
        Err(ServiceError::Unauthorized) => return expire_session(session, store, signed_in),
        Err(ServiceError::Invalid(errors)) => (errors, vec![]),
        Err(ServiceError::Rejected(Some(message))) => {
            (FieldErrors::new(), vec![Alert::error(message)])
        }
        Err(_) => (FieldErrors::new(), vec![Alert::error("Failed to save lead")]),
    };

    let data = LeadFormPageData::new(mode, form, errors);
    render_form(tera, signed_in, alerts, &data)
}
