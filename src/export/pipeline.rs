//! Document export: one PDF per document, or every document combined for email.

use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::delivery::{DeliveryClient, DeliveryError, DeliveryPayload};
use super::file::FileContent;
use super::pdf::{image_to_pdf, PdfAssembler};
use super::renderer::Renderer;
use super::ExportError;
use crate::autofill::CompanyData;
use crate::record::DocumentRecord;
use crate::templates::{GeneratedDocument, RenderedDocument};

/// Raster scale for direct downloads.
pub const DOWNLOAD_SCALE: f32 = 2.0;
/// Raster scale for the emailed bundle, kept lower to bound the payload.
pub const EMAIL_SCALE: f32 = 1.0;

/// Document that stopped a batch download.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ExportFailure {
    pub index: usize,
    pub document: String,
    pub message: String,
}

/// Result of exporting every document, one file each.
///
/// The batch stops at the first failing document; files exported before it are kept.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct DownloadBatch {
    pub files: Vec<FileContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure: Option<ExportFailure>,
}

/// Every document on sequential pages of one PDF.
#[derive(Debug, Clone)]
pub struct CombinedPdf {
    pub bytes: Vec<u8>,
    pub documents: Vec<RenderedDocument>,
}

fn export_pdf(renderer: &dyn Renderer, doc: &GeneratedDocument, scale: f32) -> Result<Vec<u8>, ExportError> {
    let rendered = doc.render()?;
    let image = renderer.render(&rendered, scale)?;
    image_to_pdf(&image)
}

pub fn download_one(
    renderer: &dyn Renderer,
    docs: &[GeneratedDocument],
    index: usize,
) -> Result<FileContent, ExportError> {
    let doc = docs.get(index).ok_or(ExportError::IndexOutOfRange {
        index,
        len: docs.len(),
    })?;
    let bytes = export_pdf(renderer, doc, DOWNLOAD_SCALE)?;
    Ok(FileContent::pdf(doc.filename(), &bytes))
}

pub fn download_all(renderer: &dyn Renderer, docs: &[GeneratedDocument]) -> Result<DownloadBatch, ExportError> {
    if docs.is_empty() {
        return Err(ExportError::NoDocuments);
    }

    let mut files = Vec::with_capacity(docs.len());
    for (index, doc) in docs.iter().enumerate() {
        match export_pdf(renderer, doc, DOWNLOAD_SCALE) {
            Ok(bytes) => files.push(FileContent::pdf(doc.filename(), &bytes)),
            Err(e) => {
                log::error!("Export of {} failed: {}", doc.name, e);
                return Ok(DownloadBatch {
                    files,
                    failure: Some(ExportFailure {
                        index,
                        document: doc.name.clone(),
                        message: e.to_string(),
                    }),
                });
            }
        }
    }

    Ok(DownloadBatch { files, failure: None })
}

pub fn combined_pdf(renderer: &dyn Renderer, docs: &[GeneratedDocument]) -> Result<CombinedPdf, ExportError> {
    if docs.is_empty() {
        return Err(ExportError::NoDocuments);
    }

    let mut assembler = PdfAssembler::new();
    let mut documents = Vec::with_capacity(docs.len());
    for doc in docs {
        let rendered = doc.render()?;
        let image = renderer.render(&rendered, EMAIL_SCALE)?;
        assembler.add_image(&image)?;
        documents.push(rendered);
    }

    Ok(CombinedPdf {
        bytes: assembler.finish()?,
        documents,
    })
}

/// Async front of the pipeline. Rasterization runs on the blocking pool.
#[derive(Clone)]
pub struct ExportService {
    renderer: Arc<dyn Renderer>,
    delivery: Option<DeliveryClient>,
}

impl ExportService {
    pub fn new(renderer: Arc<dyn Renderer>, delivery: Option<DeliveryClient>) -> Self {
        Self { renderer, delivery }
    }

    pub fn delivery_configured(&self) -> bool {
        self.delivery.is_some()
    }

    async fn blocking<T, F>(&self, job: F) -> Result<T, ExportError>
    where
        F: FnOnce(&dyn Renderer) -> Result<T, ExportError> + Send + 'static,
        T: Send + 'static,
    {
        let renderer = self.renderer.clone();
        tokio::task::spawn_blocking(move || job(renderer.as_ref()))
            .await
            .map_err(|e| ExportError::Worker(e.to_string()))?
    }

    pub async fn download_one(&self, docs: Vec<GeneratedDocument>, index: usize) -> Result<FileContent, ExportError> {
        self.blocking(move |renderer| download_one(renderer, &docs, index)).await
    }

    pub async fn download_all(&self, docs: Vec<GeneratedDocument>) -> Result<DownloadBatch, ExportError> {
        self.blocking(move |renderer| download_all(renderer, &docs)).await
    }

    /// Send every document as one combined PDF. Returns the number of documents sent.
    pub async fn email_all(
        &self,
        docs: Vec<GeneratedDocument>,
        company: &CompanyData,
        record: &DocumentRecord,
        email: &str,
    ) -> Result<usize, ExportError> {
        let delivery = self.delivery.as_ref().ok_or(DeliveryError::NotConfigured)?;
        let combined = self.blocking(move |renderer| combined_pdf(renderer, &docs)).await?;

        let payload = DeliveryPayload::combined(
            email,
            &combined.documents,
            &combined.bytes,
            company,
            record,
            Utc::now(),
        );
        delivery.send(&payload).await?;
        Ok(payload.document_count)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::catalog::{DocumentType, SelectedTemplate};
    use crate::export::raster::RasterImage;
    use crate::record::{assemble, AnswerMap};
    use crate::templates::{generate_all, DocumentIds};
    use chrono::NaiveDate;
    use parking_lot::Mutex;

    /// Renderer that returns a white image and records what it was asked to draw.
    #[derive(Default)]
    pub(crate) struct FakeRenderer {
        pub calls: Mutex<Vec<(DocumentType, f32)>>,
        pub fail_on: Option<DocumentType>,
        pub height: u32,
    }

    impl Renderer for FakeRenderer {
        fn render(&self, document: &RenderedDocument, scale: f32) -> Result<RasterImage, ExportError> {
            self.calls.lock().push((document.doc_type, scale));
            if self.fail_on == Some(document.doc_type) {
                return Err(ExportError::RenderExit(1));
            }
            let height = self.height.max(1);
            RasterImage::from_rgb(10, height, vec![255; 10 * height as usize * 3])
        }
    }

    pub(crate) fn documents(types: &[DocumentType]) -> Vec<GeneratedDocument> {
        let templates: Vec<_> = types.iter().copied().map(SelectedTemplate::from).collect();
        let date = NaiveDate::from_ymd_opt(2024, 3, 7).unwrap();
        generate_all(
            &templates,
            &CompanyData::default(),
            &assemble(&AnswerMap::new(), &[], &[]),
            &DocumentIds::from_parts(date, || 1),
            date,
        )
        .unwrap()
    }

    #[test]
    fn test_download_one_names_file_after_document() {
        let renderer = FakeRenderer::default();
        let docs = documents(&[DocumentType::CommercialInvoice, DocumentType::PackingList]);
        let file = download_one(&renderer, &docs, 1).unwrap();
        assert_eq!(file.metadata.filename, "Packing_List.pdf");
        assert!(file.decode_data().unwrap().starts_with(b"%PDF"));
        assert_eq!(*renderer.calls.lock(), vec![(DocumentType::PackingList, DOWNLOAD_SCALE)]);

        assert!(matches!(
            download_one(&renderer, &docs, 2),
            Err(ExportError::IndexOutOfRange { index: 2, len: 2 })
        ));
    }

    #[test]
    fn test_download_all_halts_at_first_failure() {
        let renderer = FakeRenderer {
            fail_on: Some(DocumentType::PackingList),
            ..Default::default()
        };
        let docs = documents(&[
            DocumentType::CommercialInvoice,
            DocumentType::PackingList,
            DocumentType::BillOfLading,
        ]);
        let batch = download_all(&renderer, &docs).unwrap();
        assert_eq!(batch.files.len(), 1);
        assert_eq!(batch.files[0].metadata.filename, "Commercial_Invoice.pdf");
        let failure = batch.failure.unwrap();
        assert_eq!(failure.index, 1);
        assert_eq!(failure.document, "Packing List");
        // The bill of lading was never attempted.
        assert_eq!(renderer.calls.lock().len(), 2);
    }

    #[test]
    fn test_combined_pdf_holds_every_page_in_order() {
        let renderer = FakeRenderer {
            height: 30,
            ..Default::default()
        };
        let docs = documents(&[DocumentType::CommercialInvoice, DocumentType::PackingList]);
        let combined = combined_pdf(&renderer, &docs).unwrap();

        let pdf = lopdf::Document::load_mem(&combined.bytes).unwrap();
        assert_eq!(pdf.get_pages().len(), 6);
        let order: Vec<_> = combined.documents.iter().map(|d| d.doc_type).collect();
        assert_eq!(order, vec![DocumentType::CommercialInvoice, DocumentType::PackingList]);
        assert!(renderer.calls.lock().iter().all(|(_, scale)| *scale == EMAIL_SCALE));
    }

    #[test]
    fn test_nothing_to_export() {
        let renderer = FakeRenderer::default();
        assert!(matches!(download_all(&renderer, &[]), Err(ExportError::NoDocuments)));
        assert!(matches!(combined_pdf(&renderer, &[]), Err(ExportError::NoDocuments)));
    }

    #[tokio::test]
    async fn test_email_without_endpoint_is_not_configured() {
        let service = ExportService::new(Arc::new(FakeRenderer::default()), None);
        let result = service
            .email_all(
                documents(&[DocumentType::CommercialInvoice]),
                &CompanyData::default(),
                &DocumentRecord::default(),
                "ops@acme.example",
            )
            .await;
        assert!(matches!(
            result,
            Err(ExportError::Delivery(DeliveryError::NotConfigured))
        ));
    }
}
