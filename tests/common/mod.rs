#![allow(dead_code)]

use std::sync::Arc;

use actix_web::web;
use manudocs_server::config::AppConfig;
use manudocs_server::export::{ExportError, RasterImage, Renderer};
use manudocs_server::record::{PackingDraft, ProductDraft};
use manudocs_server::storage::MemoryStore;
use manudocs_server::templates::RenderedDocument;
use manudocs_server::AppState;

pub const USER: &str = "user-42";

/// Renderer that paints a small white page without shelling out.
pub struct WhitePageRenderer;

impl Renderer for WhitePageRenderer {
    fn render(&self, _document: &RenderedDocument, _scale: f32) -> Result<RasterImage, ExportError> {
        RasterImage::from_rgb(10, 30, vec![255; 10 * 30 * 3])
    }
}

pub fn app_state() -> web::Data<AppState> {
    let config = AppConfig {
        supabase_url: "https://demo.supabase.co".to_string(),
        supabase_service_role_key: Some("service-role-secret".to_string()),
        ..Default::default()
    };
    web::Data::new(AppState::from_parts(
        config,
        Arc::new(MemoryStore::new()),
        Arc::new(WhitePageRenderer),
        None,
    ))
}

pub fn invoice_answer(field: &str) -> Option<&'static str> {
    let value = match field {
        "exporter_company_name" => "Acme Exports",
        "exporter_address" => "12 Harbour Rd",
        "exporter_gstin" => "27ABCDE1234F1Z5",
        "buyer_name" => "Globex",
        "buyer_address" => "1 Main St",
        "buyer_country" => "USA",
        "consignee_same_as_buyer" => "Yes",
        "currency" => "USD",
        "incoterms" => "FOB",
        "payment_terms" => "Advance Payment",
        "country_of_origin" => "India",
        "country_of_destination" => "USA",
        "port_of_loading" => "Nhava Sheva",
        "port_of_discharge" => "New York",
        "authorized_signatory" => "R. Mehta",
        _ => return None,
    };
    Some(value)
}

pub fn widget() -> ProductDraft {
    ProductDraft {
        product_code: "P1".to_string(),
        description: "Widget".to_string(),
        quantity: 10.0,
        unit_price: 5.0,
        ..Default::default()
    }
}

pub fn carton() -> PackingDraft {
    PackingDraft {
        product_index: 1,
        kind_of_packages: "Carton".to_string(),
        number_of_packages: 2,
        net_weight: 20.0,
        gross_weight: 22.0,
        ..Default::default()
    }
}

macro_rules! init_app {
    ($state:expr) => {
        actix_web::test::init_service(
            actix_web::App::new()
                .app_data($state.clone())
                .service(actix_web::web::scope("/api").configure(manudocs_server::configure_api)),
        )
        .await
    };
}

macro_rules! post_event {
    ($app:expr, $user:expr, $event:expr) => {{
        let req = actix_web::test::TestRequest::post()
            .uri("/api/chat/events")
            .insert_header(("X-User-Id", $user))
            .set_json(&$event)
            .to_request();
        actix_web::test::call_service(&$app, req).await
    }};
}

/// Walk a fresh session through a single commercial invoice until it completes.
macro_rules! complete_invoice {
    ($app:expr, $user:expr) => {{
        use manudocs_server::catalog::{DocumentType, FieldType};
        use manudocs_server::chat::{ChatEvent, ChatState, ChatStep};

        let mut state: ChatState = actix_web::test::read_body_json(post_event!(
            $app,
            $user,
            ChatEvent::Start { documents_uploaded: true }
        ))
        .await;
        for event in [
            ChatEvent::ToggleTemplate {
                template: DocumentType::CommercialInvoice,
            },
            ChatEvent::ConfirmTemplates,
        ] {
            state = actix_web::test::read_body_json(post_event!($app, $user, event)).await;
        }

        while state.current_step == ChatStep::DataCollection {
            let def = state.current_field().expect("a question is pending");
            let events = match def.field_type {
                FieldType::Products => vec![
                    ChatEvent::AddProduct { product: common::widget() },
                    ChatEvent::FinishProducts,
                ],
                FieldType::Packing => vec![
                    ChatEvent::AddPacking { packing: common::carton() },
                    ChatEvent::FinishPacking,
                ],
                _ => match common::invoice_answer(def.field) {
                    Some(value) => vec![ChatEvent::Answer { value: value.to_string() }],
                    None if !def.required => vec![ChatEvent::Skip],
                    None => panic!("no answer for required field {}", def.field),
                },
            };
            for event in events {
                let resp = post_event!($app, $user, event);
                assert!(resp.status().is_success(), "event rejected at {}", def.field);
                state = actix_web::test::read_body_json(resp).await;
            }
        }
        state
    }};
}
