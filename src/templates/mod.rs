//! Template engine - renders the assembled record into one HTML document per type.
//!
//! Each family module exposes a pure `render(&RenderContext) -> Result<String, TemplateError>`.
//! Renders never read global state, so the same context always yields the same bytes.
//! Families:
//! - `commercial_invoice`, `proforma_invoice`, `purchase_order`, `notes` (credit/debit)
//! - `packing_list`, `delivery_challan`, `shipping_bill`
//! - `bill_of_lading`, `air_waybill`, `shipping_instructions`
//! - `certificate_of_origin`, `insurance_certificate`

pub mod common;
pub mod ids;
pub mod layout;

mod air_waybill;
mod bill_of_lading;
mod certificate_of_origin;
mod commercial_invoice;
mod delivery_challan;
mod insurance_certificate;
mod notes;
mod packing_list;
mod proforma_invoice;
mod purchase_order;
mod shipping_bill;
mod shipping_instructions;

pub use ids::DocumentIds;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::autofill::CompanyData;
use crate::catalog::{DocumentType, SelectedTemplate};
use crate::record::DocumentRecord;
use common::pdf_filename;

#[derive(Debug, Error, PartialEq)]
pub enum TemplateError {
    #[error("value for '{field}' is not a finite number")]
    NonFiniteValue { field: String },
}

/// Everything a render function reads.
#[derive(Debug, Clone, Copy)]
pub struct RenderContext<'a> {
    pub company: &'a CompanyData,
    pub inputs: &'a DocumentRecord,
    pub doc_ids: &'a DocumentIds,
    pub current_date: NaiveDate,
}

/// Inputs captured for one generated document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentProps {
    pub company: CompanyData,
    pub inputs: DocumentRecord,
    pub doc_ids: DocumentIds,
    pub current_date: NaiveDate,
}

impl DocumentProps {
    pub fn context(&self) -> RenderContext<'_> {
        RenderContext {
            company: &self.company,
            inputs: &self.inputs,
            doc_ids: &self.doc_ids,
            current_date: self.current_date,
        }
    }
}

/// One entry of the generated document set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedDocument {
    pub id: DocumentType,
    pub name: String,
    pub props: DocumentProps,
}

impl GeneratedDocument {
    pub fn render(&self) -> Result<RenderedDocument, TemplateError> {
        render_document(self.id, &self.props.context())
    }

    pub fn filename(&self) -> String {
        pdf_filename(&self.name)
    }
}

/// HTML output of a render, ready for preview or rasterization.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderedDocument {
    pub doc_type: DocumentType,
    pub title: String,
    pub html: String,
}

/// Render a single document type.
pub fn render_document(doc: DocumentType, ctx: &RenderContext<'_>) -> Result<RenderedDocument, TemplateError> {
    let html = match doc {
        DocumentType::CommercialInvoice => commercial_invoice::render(ctx)?,
        DocumentType::ProformaInvoice => proforma_invoice::render(ctx)?,
        DocumentType::PackingList => packing_list::render(ctx)?,
        DocumentType::BillOfLading => bill_of_lading::render(ctx)?,
        DocumentType::AirWaybill => air_waybill::render(ctx)?,
        DocumentType::CertificateOfOrigin => certificate_of_origin::render(ctx)?,
        DocumentType::ShippingInstructions => shipping_instructions::render(ctx)?,
        DocumentType::InsuranceCertificate => insurance_certificate::render(ctx)?,
        DocumentType::PurchaseOrder => purchase_order::render(ctx)?,
        DocumentType::DeliveryChallan => delivery_challan::render(ctx)?,
        DocumentType::ShippingBill => shipping_bill::render(ctx)?,
        DocumentType::CreditNote => notes::render(ctx, notes::NoteKind::Credit)?,
        DocumentType::DebitNote => notes::render(ctx, notes::NoteKind::Debit)?,
    };
    Ok(RenderedDocument {
        doc_type: doc,
        title: doc.display_name().to_string(),
        html,
    })
}

/// Render every selected template in selection order.
///
/// Either all documents render or the first failure is returned; no partial set is kept.
pub fn generate_all(
    templates: &[SelectedTemplate],
    company: &CompanyData,
    inputs: &DocumentRecord,
    doc_ids: &DocumentIds,
    current_date: NaiveDate,
) -> Result<Vec<GeneratedDocument>, TemplateError> {
    let ctx = RenderContext {
        company,
        inputs,
        doc_ids,
        current_date,
    };

    templates
        .iter()
        .map(|template| {
            render_document(template.id, &ctx)?;
            Ok(GeneratedDocument {
                id: template.id,
                name: template.name.clone(),
                props: DocumentProps {
                    company: company.clone(),
                    inputs: inputs.clone(),
                    doc_ids: doc_ids.clone(),
                    current_date,
                },
            })
        })
        .collect()
}
