use std::sync::Arc;

use actix_files::Files;
use actix_identity::IdentityMiddleware;
use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::Key;
use actix_web::middleware::{Compress, Logger, from_fn};
use actix_web::{App, HttpServer, web};
use actix_web_flash_messages::{FlashMessagesFramework, storage::CookieMessageStore};
use tera::Tera;

use crate::middleware::session_gate;
use crate::models::config::ServerConfig;
use crate::repository::{ApiRepository, HttpRepository};
use crate::routes::auth::{login, logout, register, show_login, show_register};
use crate::routes::dashboard::{delete_lead, show_dashboard};
use crate::routes::leads::{create_lead, edit_lead, new_lead, update_lead};
use crate::routes::main::index;
use crate::services::dashboard::LeadListStore;

/// Registers every dashboard route.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(index)
        .service(show_login)
        .service(login)
        .service(show_register)
        .service(register)
        .service(logout)
        .service(show_dashboard)
        .service(new_lead)
        .service(create_lead)
        .service(edit_lead)
        .service(update_lead)
        .service(delete_lead);
}

/// Builds and runs the Actix-Web HTTP server using the provided configuration.
pub async fn run(server_config: ServerConfig) -> std::io::Result<()> {
    let repo: Arc<dyn ApiRepository> = Arc::new(
        HttpRepository::new(&server_config.api_base_url, server_config.request_timeout())
            .map_err(|e| std::io::Error::other(format!("Invalid API base URL: {e}")))?,
    );
    let repo = web::Data::from(repo);
    let store = web::Data::new(LeadListStore::new());

    // Keys and stores for identity, sessions, and flash messages.
    let secret_key = Key::from(server_config.secret.as_bytes());

    let message_store = CookieMessageStore::builder(secret_key.clone()).build();
    let message_framework = FlashMessagesFramework::builder(message_store).build();

    let tera = Tera::new(&server_config.templates_dir)
        .map_err(|e| std::io::Error::other(format!("Template parsing error(s): {e}")))?;

    let bind_address = (server_config.address.clone(), server_config.port);
    log::info!(
        "Serving the lead dashboard on {}:{} against {}",
        bind_address.0,
        bind_address.1,
        server_config.api_base_url
    );

    HttpServer::new(move || {
        App::new()
            .wrap(from_fn(session_gate))
            .wrap(message_framework.clone())
            .wrap(IdentityMiddleware::default())
            .wrap(
                SessionMiddleware::builder(CookieSessionStore::default(), secret_key.clone())
                    .cookie_secure(false) // set to true in prod
                    .cookie_domain(Some(server_config.domain.clone()))
                    .build(),
            )
            .wrap(Compress::default())
            .wrap(Logger::default())
            .service(Files::new("/assets", "./assets"))
            .configure(configure)
            .app_data(web::Data::new(tera.clone()))
            .app_data(repo.clone())
            .app_data(store.clone())
            .app_data(web::Data::new(server_config.clone()))
    })
    .bind(bind_address)?
    .run()
    .await
}
