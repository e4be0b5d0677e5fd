use actix_session::Session;
use actix_web::{HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use tera::Tera;

use crate::domain::auth::SignedIn;
use crate::forms::lead::DeleteLeadForm;
use crate::models::config::ServerConfig;
use crate::repository::ApiRepository;
use crate::routes::{Alert, base_context, collect_alerts, expire_session, redirect, render_template};
use crate::services::ServiceError;
use crate::services::dashboard::{self as dashboard_service, DashboardQuery, LeadListStore};

#[get("/dashboard")]
pub async fn show_dashboard(
    query: web::Query<DashboardQuery>,
    signed_in: SignedIn,
    session: Session,
    repo: web::Data<dyn ApiRepository>,
    store: web::Data<LeadListStore>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let data = match dashboard_service::load_dashboard(
        repo.get_ref(),
        store.get_ref(),
        &signed_in,
        query.into_inner(),
        server_config.page_size,
    )
    .await
    {
        Ok(data) => data,
        Err(ServiceError::Unauthorized) => return expire_session(&session, &store, &signed_in),
        Err(err) => {
            log::error!("Failed to load the dashboard: {err}");
            return HttpResponse::InternalServerError().finish();
        }
    };

    let mut alerts = collect_alerts(&flash_messages);
    if data.fetch_failed {
        alerts.push(Alert::error("Failed to fetch leads"));
    }

    let mut context = base_context(alerts, Some(&signed_in.user), "dashboard");
    context.insert("dashboard", &data);

    render_template(&tera, "dashboard/index.html", &context)
}

#[post("/leads/{lead_id}/delete")]
pub async fn delete_lead(
    lead_id: web::Path<String>,
    signed_in: SignedIn,
    session: Session,
    repo: web::Data<dyn ApiRepository>,
    store: web::Data<LeadListStore>,
    web::Form(form): web::Form<DeleteLeadForm>,
) -> impl Responder {
    let back = store.current_href(signed_in.user.id.as_str());
    match dashboard_service::delete_lead(repo.get_ref(), &signed_in.token, &lead_id, form).await {
        Ok(()) => {
            FlashMessage::success("Lead deleted successfully").send();
        }
        Err(ServiceError::Unauthorized) => return expire_session(&session, &store, &signed_in),
        Err(ServiceError::Form(message)) => {
            log::warn!("Refused to delete lead {lead_id}: {message}");
        }
        Err(_) => {
            FlashMessage::error("Failed to delete lead").send();
        }
    }
    redirect(&back)
}
