use actix_web::{web, HttpRequest, HttpResponse, Responder};

use super::{ChatError, ChatEvent};
use crate::catalog::{DocumentType, SelectedTemplate};
use crate::{AppState, ErrorResponse};

/// Identity of the signed-in user, set by the auth provider in front of this service.
pub const USER_ID_HEADER: &str = "X-User-Id";
/// Whether the user has uploaded their supporting documents.
pub const DOCUMENTS_UPLOADED_HEADER: &str = "X-Documents-Uploaded";

pub fn user_id(req: &HttpRequest) -> Option<String> {
    req.headers()
        .get(USER_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

fn documents_uploaded(req: &HttpRequest) -> Option<bool> {
    req.headers()
        .get(DOCUMENTS_UPLOADED_HEADER)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.trim().parse::<bool>().ok())
}

pub(crate) fn chat_error_response(error: ChatError) -> HttpResponse {
    let message = error.to_string();
    match error {
        ChatError::Validation(errors) => {
            HttpResponse::UnprocessableEntity().json(ErrorResponse::validation_failed(&errors))
        }
        ChatError::IndexOutOfRange { .. } => HttpResponse::BadRequest().json(ErrorResponse::bad_request(&message)),
        _ => HttpResponse::Conflict().json(ErrorResponse::conflict(&message)),
    }
}

#[utoipa::path(
    get,
    path = "/api/chat/session",
    tag = "Chat",
    params(
        ("X-User-Id" = Option<String>, Header, description = "User identity; guest when absent")
    ),
    responses(
        (status = 200, description = "Current conversation snapshot, restored or fresh")
    )
)]
pub async fn get_session(state: web::Data<AppState>, req: HttpRequest) -> impl Responder {
    let user = user_id(&req);
    HttpResponse::Ok().json(state.chat.snapshot(user.as_deref()).await)
}

#[utoipa::path(
    post,
    path = "/api/chat/events",
    tag = "Chat",
    params(
        ("X-User-Id" = Option<String>, Header, description = "User identity; guest when absent"),
        ("X-Documents-Uploaded" = Option<bool>, Header, description = "Upload precondition, read by `start`")
    ),
    request_body = ChatEvent,
    responses(
        (status = 200, description = "Event applied; updated snapshot"),
        (status = 400, description = "Malformed event or index out of range", body = ErrorResponse),
        (status = 409, description = "Event not allowed in the current step", body = ErrorResponse),
        (status = 422, description = "Answer rejected", body = ErrorResponse)
    )
)]
pub async fn post_event(
    state: web::Data<AppState>,
    req: HttpRequest,
    event: web::Json<ChatEvent>,
) -> impl Responder {
    let user = user_id(&req);
    let mut event = event.into_inner();
    if let ChatEvent::Start { documents_uploaded: flag } = &mut event {
        if let Some(uploaded) = documents_uploaded(&req) {
            *flag = uploaded;
        }
    }

    match state.chat.apply(user.as_deref(), event).await {
        Ok(snapshot) => HttpResponse::Ok().json(snapshot),
        Err(e) => chat_error_response(e),
    }
}

#[utoipa::path(
    delete,
    path = "/api/chat/session",
    tag = "Chat",
    params(
        ("X-User-Id" = Option<String>, Header, description = "User identity; guest when absent")
    ),
    responses(
        (status = 200, description = "Transcript cleared; autofill and company data are kept"),
        (status = 500, description = "Storage failure", body = ErrorResponse)
    )
)]
pub async fn delete_session(state: web::Data<AppState>, req: HttpRequest) -> impl Responder {
    let user = user_id(&req);
    match state.chat.reset(user.as_deref()).await {
        Ok(()) => HttpResponse::Ok().finish(),
        Err(e) => {
            log::error!("Failed to clear chat session: {}", e);
            HttpResponse::InternalServerError().json(ErrorResponse::internal_error(&e.to_string()))
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/chat/record",
    tag = "Chat",
    params(
        ("X-User-Id" = Option<String>, Header, description = "User identity; guest when absent")
    ),
    responses(
        (status = 200, description = "Document-data record assembled from the committed answers")
    )
)]
pub async fn get_record(state: web::Data<AppState>, req: HttpRequest) -> impl Responder {
    let user = user_id(&req);
    HttpResponse::Ok().json(state.chat.record(user.as_deref()).await)
}

#[utoipa::path(
    get,
    path = "/api/templates",
    tag = "Chat",
    responses(
        (status = 200, description = "Every document type that can be selected", body = Vec<SelectedTemplate>)
    )
)]
pub async fn list_templates() -> impl Responder {
    let templates: Vec<SelectedTemplate> = DocumentType::ALL.into_iter().map(SelectedTemplate::from).collect();
    HttpResponse::Ok().json(templates)
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/chat/session")
            .route(web::get().to(get_session))
            .route(web::delete().to(delete_session)),
    )
    .service(web::resource("/chat/events").route(web::post().to(post_event)))
    .service(web::resource("/chat/record").route(web::get().to(get_record)))
    .service(web::resource("/templates").route(web::get().to(list_templates)));
}
