#[macro_use]
mod common;

use actix_web::{http::StatusCode, test};
use manudocs_server::catalog::DocumentType;
use manudocs_server::chat::{ChatEvent, ChatState, ChatStep};
use manudocs_server::ErrorResponse;
use serde_json::Value;

use common::USER;

#[actix_web::test]
async fn test_health_and_public_config() {
    let state = common::app_state();
    let app = init_app!(state);

    let req = test::TestRequest::get().uri("/api/health").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body, serde_json::json!({ "ok": true }));

    let req = test::TestRequest::get().uri("/api/config/supabase").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["url"], "https://demo.supabase.co");
    assert!(!body.to_string().contains("service-role-secret"));
}

#[actix_web::test]
async fn test_templates_cover_every_document_type() {
    let state = common::app_state();
    let app = init_app!(state);

    let req = test::TestRequest::get().uri("/api/templates").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    let templates = body.as_array().unwrap();
    assert_eq!(templates.len(), DocumentType::ALL.len());
    assert_eq!(templates[0]["id"], "commercial_invoice");
    assert_eq!(templates[0]["name"], "Commercial Invoice");
}

#[actix_web::test]
async fn test_fresh_session_is_loading() {
    let state = common::app_state();
    let app = init_app!(state);

    let req = test::TestRequest::get()
        .uri("/api/chat/session")
        .insert_header(("X-User-Id", USER))
        .to_request();
    let session: ChatState = test::call_and_read_body_json(&app, req).await;
    assert_eq!(session.current_step, ChatStep::Loading);
    assert!(session.messages.is_empty());
}

#[actix_web::test]
async fn test_upload_header_gates_start() {
    let state = common::app_state();
    let app = init_app!(state);

    let req = test::TestRequest::post()
        .uri("/api/chat/events")
        .insert_header(("X-User-Id", USER))
        .insert_header(("X-Documents-Uploaded", "false"))
        .set_json(&ChatEvent::Start { documents_uploaded: true })
        .to_request();
    let session: ChatState = test::call_and_read_body_json(&app, req).await;
    assert_eq!(session.current_step, ChatStep::NeedDocuments);

    let resp = post_event!(app, USER, ChatEvent::Start { documents_uploaded: true });
    let session: ChatState = test::read_body_json(resp).await;
    assert_eq!(session.current_step, ChatStep::TemplateSelection);
}

#[actix_web::test]
async fn test_event_errors_map_to_status_codes() {
    let state = common::app_state();
    let app = init_app!(state);

    // Answer before the wizard has started.
    let resp = post_event!(app, USER, ChatEvent::Answer { value: "Acme".to_string() });
    assert_eq!(resp.status(), StatusCode::CONFLICT);
    let body: ErrorResponse = test::read_body_json(resp).await;
    assert_eq!(body.error, "Conflict");

    post_event!(app, USER, ChatEvent::Start { documents_uploaded: true });
    let resp = post_event!(app, USER, ChatEvent::ConfirmTemplates);
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);

    post_event!(
        app,
        USER,
        ChatEvent::ToggleTemplate {
            template: DocumentType::CommercialInvoice
        }
    );
    post_event!(app, USER, ChatEvent::ConfirmTemplates);
    let resp = post_event!(app, USER, ChatEvent::Answer { value: "  ".to_string() });
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: ErrorResponse = test::read_body_json(resp).await;
    assert_eq!(body.error, "ValidationFailed");
    assert_eq!(body.errors[0].field, "exporter_company_name");
}

#[actix_web::test]
async fn test_malformed_event_is_rejected() {
    let state = common::app_state();
    let app = init_app!(state);

    let req = test::TestRequest::post()
        .uri("/api/chat/events")
        .set_json(serde_json::json!({ "type": "teleport" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn test_full_conversation_generates_invoice() {
    let state = common::app_state();
    let app = init_app!(state);

    let session = complete_invoice!(app, USER);
    assert_eq!(session.current_step, ChatStep::Completed);
    assert_eq!(session.generated_documents.len(), 1);
    assert_eq!(session.generated_documents[0].id, DocumentType::CommercialInvoice);

    let req = test::TestRequest::get()
        .uri("/api/chat/record")
        .insert_header(("X-User-Id", USER))
        .to_request();
    let record: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(record["exporter_company_name"], "Acme Exports");
    assert_eq!(record["total_amount"], 50.0);
    assert_eq!(record["products"].as_array().unwrap().len(), 1);

    // The snapshot survives a reload from the same service.
    let req = test::TestRequest::get()
        .uri("/api/chat/session")
        .insert_header(("X-User-Id", USER))
        .to_request();
    let reloaded: ChatState = test::call_and_read_body_json(&app, req).await;
    assert_eq!(reloaded, session);
}

#[actix_web::test]
async fn test_sessions_are_isolated_per_user() {
    let state = common::app_state();
    let app = init_app!(state);

    post_event!(app, USER, ChatEvent::Start { documents_uploaded: true });

    let req = test::TestRequest::get().uri("/api/chat/session").to_request();
    let guest: ChatState = test::call_and_read_body_json(&app, req).await;
    assert_eq!(guest.current_step, ChatStep::Loading);
}

#[actix_web::test]
async fn test_delete_session_resets_transcript() {
    let state = common::app_state();
    let app = init_app!(state);

    post_event!(app, USER, ChatEvent::Start { documents_uploaded: true });

    let req = test::TestRequest::delete()
        .uri("/api/chat/session")
        .insert_header(("X-User-Id", USER))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let req = test::TestRequest::get()
        .uri("/api/chat/session")
        .insert_header(("X-User-Id", USER))
        .to_request();
    let session: ChatState = test::call_and_read_body_json(&app, req).await;
    assert_eq!(session.current_step, ChatStep::Loading);
    assert!(session.messages.is_empty());
}
