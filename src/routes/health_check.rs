use actix_web::{HttpResponse, get};

/// Liveness probe, independent of the CRM and the SMTP server.
#[get("/health_check")]
pub async fn get() -> HttpResponse {
    HttpResponse::Ok().finish()
}
