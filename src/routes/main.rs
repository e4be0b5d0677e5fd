use actix_web::{Responder, get};

use crate::domain::auth::DASHBOARD_PATH;
use crate::routes::redirect;

#[get("/")]
pub async fn index() -> impl Responder {
    redirect(DASHBOARD_PATH)
}
