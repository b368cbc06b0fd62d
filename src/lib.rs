use std::sync::Arc;

use actix_cors::Cors;
use actix_web::middleware::Compress;
use actix_web::{http::header, web, App, HttpServer};
use actix_web_prometheus::PrometheusMetricsBuilder;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use utoipa::{OpenApi, ToSchema};
use utoipa_swagger_ui::SwaggerUi;

pub mod autofill;
pub mod catalog;
pub mod chat;
pub mod config;
pub mod export;
pub mod health;
pub mod record;
pub mod sequencer;
pub mod storage;
pub mod templates;
pub mod validation;

use crate::chat::ChatSessionService;
use crate::config::AppConfig;
use crate::export::{CommandRenderer, DeliveryClient, ExportService, Renderer};
use crate::storage::{FileStore, StateStore};
use crate::validation::{ValidationError, ValidationErrors};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub timestamp: String,
    /// Per-field failures, present on validation errors only.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<ValidationError>,
}

impl ErrorResponse {
    pub fn new(error_type: &str, message: &str) -> Self {
        Self {
            error: error_type.to_string(),
            message: message.to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
            errors: Vec::new(),
        }
    }

    pub fn not_found(message: &str) -> Self {
        Self::new("NotFound", message)
    }

    pub fn bad_request(message: &str) -> Self {
        Self::new("BadRequest", message)
    }

    pub fn conflict(message: &str) -> Self {
        Self::new("Conflict", message)
    }

    pub fn validation_failed(errors: &ValidationErrors) -> Self {
        Self {
            errors: errors.errors().to_vec(),
            ..Self::new("ValidationFailed", &errors.to_message())
        }
    }

    pub fn internal_error(message: &str) -> Self {
        Self::new("InternalServerError", message)
    }

    pub fn bad_gateway(message: &str) -> Self {
        Self::new("BadGateway", message)
    }

    pub fn service_unavailable(message: &str) -> Self {
        Self::new("ServiceUnavailable", message)
    }

    pub fn gateway_timeout(message: &str) -> Self {
        Self::new("GatewayTimeout", message)
    }
}

/// Shared application state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub chat: ChatSessionService,
    pub export: ExportService,
}

impl AppState {
    pub fn new(config: AppConfig) -> anyhow::Result<Self> {
        let store: Arc<dyn StateStore> = Arc::new(FileStore::new(config.data_dir.clone()));
        let renderer: Arc<dyn Renderer> = Arc::new(CommandRenderer::new(&config.render_command));

        let delivery = match &config.delivery_url {
            Some(url) => {
                let client = reqwest::Client::builder()
                    .build()
                    .context("failed to build HTTP client")?;
                Some(DeliveryClient::new(client, url, config.delivery_timeout))
            }
            None => {
                log::warn!("MANUDOCS_DELIVERY_URL is not set; emailing documents is disabled");
                None
            }
        };

        Ok(Self::from_parts(config, store, renderer, delivery))
    }

    pub fn from_parts(
        config: AppConfig,
        store: Arc<dyn StateStore>,
        renderer: Arc<dyn Renderer>,
        delivery: Option<DeliveryClient>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            chat: ChatSessionService::new(store),
            export: ExportService::new(renderer, delivery),
        }
    }
}

/// Registers every `/api` route.
pub fn configure_api(cfg: &mut web::ServiceConfig) {
    cfg.configure(health::config)
        .configure(chat::routes::config)
        .configure(export::routes::config);
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::health::health,
        crate::health::supabase_config,
        crate::chat::routes::get_session,
        crate::chat::routes::post_event,
        crate::chat::routes::delete_session,
        crate::chat::routes::get_record,
        crate::chat::routes::list_templates,
        crate::export::routes::preview_document,
        crate::export::routes::download_document,
        crate::export::routes::download_all_documents,
        crate::export::routes::email_documents
    ),
    components(
        schemas(
            ErrorResponse,
            ValidationError,
            health::HealthResponse,
            health::SupabaseConfigResponse,
            catalog::DocumentType,
            catalog::SelectedTemplate,
            chat::ChatEvent,
            chat::state::ChatStep,
            chat::state::ChatMessage,
            chat::state::Sender,
            chat::state::AutofillSuggestion,
            record::Product,
            record::ProductDraft,
            record::ProductField,
            record::PackingEntry,
            record::PackingDraft,
            record::PackingField,
            autofill::AutofillData,
            autofill::CompanyData,
            export::FileContent,
            export::FileMetadata,
            export::DownloadBatch,
            export::ExportFailure,
            export::routes::EmailRequest,
            export::routes::EmailResponse,
        )
    ),
    tags(
        (name = "Health", description = "Liveness and public settings."),
        (name = "Chat", description = "Document wizard conversation."),
        (name = "Documents", description = "Preview, PDF export and email delivery.")
    ),
    servers(
        (url = "http://127.0.0.1:8080", description = "Localhost")
    )
)]
pub struct ApiDoc;

pub async fn run() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = AppConfig::from_env().map_err(|e| {
        log::error!("Invalid configuration: {}", e);
        anyhow::Error::new(e)
    })?;
    log::info!("Loaded configuration: {:?}", config);

    let bind = (config.bind_addr.clone(), config.port);
    let origins = config.allowed_origins.clone();
    let app_state = web::Data::new(AppState::new(config)?);

    let prometheus = PrometheusMetricsBuilder::new("manudocs_server")
        .endpoint("/metrics")
        .build()
        .map_err(|e| anyhow::anyhow!("failed to create Prometheus metrics middleware: {}", e))?;

    log::info!("Starting server at http://{}:{}", bind.0, bind.1);

    HttpServer::new(move || {
        let cors = origins
            .iter()
            .fold(Cors::default(), |cors, origin| cors.allowed_origin(origin))
            .allowed_methods(vec!["GET", "POST", "DELETE", "OPTIONS"])
            .allowed_headers(vec![
                header::AUTHORIZATION,
                header::ACCEPT,
                header::CONTENT_TYPE,
                header::HeaderName::from_static("x-user-id"),
                header::HeaderName::from_static("x-documents-uploaded"),
            ])
            .supports_credentials()
            .max_age(3600);

        App::new()
            .wrap(Compress::default())
            .wrap(prometheus.clone())
            .wrap(cors)
            .app_data(app_state.clone())
            .service(web::scope("/api").configure(configure_api))
            .service(SwaggerUi::new("/swagger-ui/{_:.*}").url("/api-doc/openapi.json", ApiDoc::openapi()))
    })
    .keep_alive(actix_web::http::KeepAlive::Os)
    .bind(bind)?
    .run()
    .await?;

    Ok(())
}
