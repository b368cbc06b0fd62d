//! Export pipeline - turns generated documents into PDFs and delivers them.
//!
//! Each document is rendered to HTML, rasterized by a [`Renderer`] at a fixed page width,
//! and the resulting image is sliced onto A4 pages by [`pdf::PdfAssembler`].
//! Documents are processed one at a time in selection order.

pub mod delivery;
pub mod file;
pub mod pdf;
pub mod pipeline;
pub mod raster;
pub mod renderer;
pub mod routes;

pub use delivery::{DeliveryClient, DeliveryError};
pub use file::{FileContent, FileMetadata};
pub use pipeline::{DownloadBatch, ExportFailure, ExportService};
pub use raster::RasterImage;
pub use renderer::{CommandRenderer, Renderer};

use thiserror::Error;

use crate::templates::TemplateError;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("no generated documents to export")]
    NoDocuments,
    #[error("document {index} does not exist ({len} generated)")]
    IndexOutOfRange { index: usize, len: usize },
    #[error("failed to render document: {0}")]
    Template(#[from] TemplateError),
    #[error("failed to create temporary directory: {0}")]
    TempDir(#[source] std::io::Error),
    #[error("failed to write render input: {0}")]
    WriteHtml(#[source] std::io::Error),
    #[error("rasterizer '{command}' could not be started: {source}")]
    RenderSpawn {
        command: String,
        #[source]
        source: std::io::Error,
    },
    #[error("rasterizer exited with status {0}")]
    RenderExit(i32),
    #[error("failed to read rasterized image: {0}")]
    ReadImage(#[source] std::io::Error),
    #[error("failed to decode PNG: {0}")]
    Decode(String),
    #[error("rasterized image is empty")]
    EmptyImage,
    #[error("failed to write PDF: {0}")]
    PdfWrite(String),
    #[error("export worker failed: {0}")]
    Worker(String),
    #[error(transparent)]
    Delivery(#[from] DeliveryError),
}
