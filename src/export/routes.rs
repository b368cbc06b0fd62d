use actix_web::http::header::{ContentDisposition, ContentType, DispositionParam, DispositionType};
use actix_web::{web, HttpRequest, HttpResponse, Responder};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::{DeliveryError, DownloadBatch, ExportError};
use crate::chat::routes::user_id;
use crate::validation::{validate_email, ValidationErrors};
use crate::{AppState, ErrorResponse};

#[derive(Debug, Deserialize, ToSchema)]
pub struct EmailRequest {
    pub email: String,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EmailResponse {
    pub sent: bool,
    pub document_count: usize,
}

fn export_error_response(error: ExportError) -> HttpResponse {
    let message = error.to_string();
    match error {
        ExportError::NoDocuments | ExportError::IndexOutOfRange { .. } => {
            HttpResponse::NotFound().json(ErrorResponse::not_found(&message))
        }
        ExportError::Delivery(DeliveryError::NotConfigured) => {
            HttpResponse::ServiceUnavailable().json(ErrorResponse::service_unavailable(&message))
        }
        ExportError::Delivery(DeliveryError::Timeout(_)) => {
            log::warn!("Email delivery timed out: {}", message);
            HttpResponse::GatewayTimeout().json(ErrorResponse::gateway_timeout(&message))
        }
        ExportError::Delivery(_) => {
            log::warn!("Email delivery failed: {}", message);
            HttpResponse::BadGateway().json(ErrorResponse::bad_gateway(&message))
        }
        _ => {
            log::error!("Export failed: {}", message);
            HttpResponse::InternalServerError().json(ErrorResponse::internal_error(&message))
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/documents/{index}/preview",
    tag = "Documents",
    params(
        ("index" = usize, Path, description = "Position in the generated document list"),
        ("X-User-Id" = Option<String>, Header, description = "User identity; guest when absent")
    ),
    responses(
        (status = 200, description = "Rendered HTML"),
        (status = 404, description = "No such document", body = ErrorResponse)
    )
)]
pub async fn preview_document(
    state: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<usize>,
) -> impl Responder {
    let index = path.into_inner();
    let user = user_id(&req);
    let docs = state.chat.snapshot(user.as_deref()).await.generated_documents;

    let Some(doc) = docs.get(index) else {
        return export_error_response(ExportError::IndexOutOfRange {
            index,
            len: docs.len(),
        });
    };
    match doc.render() {
        Ok(rendered) => HttpResponse::Ok()
            .content_type(ContentType::html())
            .body(rendered.html),
        Err(e) => export_error_response(e.into()),
    }
}

#[utoipa::path(
    get,
    path = "/api/documents/{index}/pdf",
    tag = "Documents",
    params(
        ("index" = usize, Path, description = "Position in the generated document list"),
        ("X-User-Id" = Option<String>, Header, description = "User identity; guest when absent")
    ),
    responses(
        (status = 200, description = "PDF of one document"),
        (status = 404, description = "No such document", body = ErrorResponse),
        (status = 500, description = "Rendering failed", body = ErrorResponse)
    )
)]
pub async fn download_document(
    state: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<usize>,
) -> impl Responder {
    let index = path.into_inner();
    let user = user_id(&req);
    let docs = state.chat.snapshot(user.as_deref()).await.generated_documents;

    let file = match state.export.download_one(docs, index).await {
        Ok(file) => file,
        Err(e) => return export_error_response(e),
    };
    let bytes = match file.decode_data() {
        Ok(bytes) => bytes,
        Err(e) => return HttpResponse::InternalServerError().json(ErrorResponse::internal_error(&e.to_string())),
    };

    HttpResponse::Ok()
        .content_type("application/pdf")
        .insert_header(ContentDisposition {
            disposition: DispositionType::Attachment,
            parameters: vec![DispositionParam::Filename(file.metadata.filename)],
        })
        .body(bytes)
}

#[utoipa::path(
    get,
    path = "/api/documents/pdf",
    tag = "Documents",
    params(
        ("X-User-Id" = Option<String>, Header, description = "User identity; guest when absent")
    ),
    responses(
        (status = 200, description = "One PDF per document, stopping at the first failure", body = DownloadBatch),
        (status = 404, description = "Nothing generated yet", body = ErrorResponse)
    )
)]
pub async fn download_all_documents(state: web::Data<AppState>, req: HttpRequest) -> impl Responder {
    let user = user_id(&req);
    let docs = state.chat.snapshot(user.as_deref()).await.generated_documents;
    match state.export.download_all(docs).await {
        Ok(batch) => HttpResponse::Ok().json(batch),
        Err(e) => export_error_response(e),
    }
}

#[utoipa::path(
    post,
    path = "/api/documents/email",
    tag = "Documents",
    params(
        ("X-User-Id" = Option<String>, Header, description = "User identity; guest when absent")
    ),
    request_body = EmailRequest,
    responses(
        (status = 200, description = "All documents sent as one combined PDF", body = EmailResponse),
        (status = 404, description = "Nothing generated yet", body = ErrorResponse),
        (status = 422, description = "Invalid recipient", body = ErrorResponse),
        (status = 502, description = "Delivery service rejected the request", body = ErrorResponse),
        (status = 503, description = "Delivery is not configured", body = ErrorResponse),
        (status = 504, description = "Delivery service timed out", body = ErrorResponse)
    )
)]
pub async fn email_documents(
    state: web::Data<AppState>,
    req: HttpRequest,
    body: web::Json<EmailRequest>,
) -> impl Responder {
    let user = user_id(&req);
    if let Err(e) = validate_email(&body.email, "email") {
        return HttpResponse::UnprocessableEntity().json(ErrorResponse::validation_failed(&ValidationErrors::from(e)));
    }

    let snapshot = state.chat.snapshot(user.as_deref()).await;
    let record = snapshot.record();
    match state
        .export
        .email_all(snapshot.generated_documents, &snapshot.company_data, &record, &body.email)
        .await
    {
        Ok(document_count) => HttpResponse::Ok().json(EmailResponse {
            sent: true,
            document_count,
        }),
        Err(e) => export_error_response(e),
    }
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/documents/pdf").route(web::get().to(download_all_documents)))
        .service(web::resource("/documents/email").route(web::post().to(email_documents)))
        .service(web::resource("/documents/{index}/preview").route(web::get().to(preview_document)))
        .service(web::resource("/documents/{index}/pdf").route(web::get().to(download_document)));
}
