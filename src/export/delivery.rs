//! Email delivery through an external HTTP endpoint.
//!
//! One POST per request with a bounded timeout. Failures are reported to the caller
//! and never retried here.

use std::time::Duration;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;

use crate::autofill::CompanyData;
use crate::catalog::DocumentType;
use crate::record::DocumentRecord;
use crate::templates::RenderedDocument;

#[derive(Debug, Error)]
pub enum DeliveryError {
    #[error("email delivery is not configured")]
    NotConfigured,
    #[error("the delivery service did not answer within {0} seconds")]
    Timeout(u64),
    #[error("the delivery service answered with status {0}")]
    Status(u16),
    #[error("delivery request failed: {0}")]
    Transport(String),
}

#[derive(Debug, Clone, Serialize)]
pub struct DocumentSummary {
    pub name: String,
    #[serde(rename = "type")]
    pub doc_type: DocumentType,
    pub content: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PdfAttachment {
    pub filename: String,
    pub base64_data: String,
    #[serde(rename = "mimetype")]
    pub mime_type: String,
    pub size: usize,
    pub document_type: String,
    pub document_name: String,
}

/// Body of the delivery request.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryPayload {
    pub action: &'static str,
    pub user_email: String,
    pub documents: Vec<DocumentSummary>,
    pub pdf_files: Vec<PdfAttachment>,
    pub company_data: CompanyData,
    pub user_inputs: DocumentRecord,
    pub timestamp: String,
    pub document_count: usize,
    pub is_combined: bool,
}

impl DeliveryPayload {
    /// Payload carrying every document in one combined PDF.
    pub fn combined(
        user_email: &str,
        documents: &[RenderedDocument],
        pdf: &[u8],
        company_data: &CompanyData,
        user_inputs: &DocumentRecord,
        now: DateTime<Utc>,
    ) -> Self {
        let attachment = PdfAttachment {
            filename: format!("Trade_Documents_{}.pdf", now.format("%Y-%m-%d")),
            base64_data: BASE64.encode(pdf),
            mime_type: "application/pdf".to_string(),
            size: pdf.len(),
            document_type: "combined".to_string(),
            document_name: "All Documents".to_string(),
        };

        Self {
            action: "send_email",
            user_email: user_email.trim().to_string(),
            documents: documents
                .iter()
                .map(|doc| DocumentSummary {
                    name: doc.title.clone(),
                    doc_type: doc.doc_type,
                    content: doc.html.clone(),
                })
                .collect(),
            pdf_files: vec![attachment],
            company_data: company_data.clone(),
            user_inputs: user_inputs.clone(),
            timestamp: now.to_rfc3339(),
            document_count: documents.len(),
            is_combined: true,
        }
    }
}

#[derive(Debug, Clone)]
pub struct DeliveryClient {
    client: reqwest::Client,
    url: String,
    timeout: Duration,
}

impl DeliveryClient {
    pub fn new(client: reqwest::Client, url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            client,
            url: url.into(),
            timeout,
        }
    }

    pub async fn send(&self, payload: &DeliveryPayload) -> Result<(), DeliveryError> {
        let response = self
            .client
            .post(&self.url)
            .timeout(self.timeout)
            .json(payload)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    DeliveryError::Timeout(self.timeout.as_secs())
                } else {
                    DeliveryError::Transport(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            log::warn!("Delivery endpoint rejected {} document(s): {}", payload.document_count, status);
            return Err(DeliveryError::Status(status.as_u16()));
        }

        log::info!(
            "Delivered {} document(s) to {}",
            payload.document_count,
            payload.user_email
        );
        Ok(())
    }
}
