use actix_web::{web, HttpResponse, Responder};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::AppState;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    pub ok: bool,
}

/// Public Supabase settings. The service-role key never leaves the server.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SupabaseConfigResponse {
    pub url: String,
}

#[utoipa::path(
    get,
    path = "/api/health",
    tag = "Health",
    responses(
        (status = 200, description = "Service is up", body = HealthResponse)
    )
)]
pub async fn health() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse { ok: true })
}

#[utoipa::path(
    get,
    path = "/api/config/supabase",
    tag = "Health",
    responses(
        (status = 200, description = "Public Supabase URL", body = SupabaseConfigResponse)
    )
)]
pub async fn supabase_config(state: web::Data<AppState>) -> impl Responder {
    HttpResponse::Ok().json(SupabaseConfigResponse {
        url: state.config.supabase_url.clone(),
    })
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/health").route(web::get().to(health)))
        .service(web::resource("/config/supabase").route(web::get().to(supabase_config)));
}
