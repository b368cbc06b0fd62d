//! Question catalog - the closed set of trade documents and the questions each one needs.
//!
//! The catalog is static: every document type maps to the shared [`COMMON_FIELDS`]
//! followed by its own field list. Visibility conditions are a single equality test
//! against an earlier answer, see [`Condition`].

mod fields;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

pub use fields::COMMON_FIELDS;

/// Answer value written for optional fields the user explicitly skipped.
pub const SKIPPED: &str = "[Skipped]";

/// Fields whose answers feed the autofill cache.
pub const AUTOFILL_FIELDS: [&str; 3] = ["exporter_company_name", "exporter_address", "exporter_gstin"];

#[derive(Debug, Error, PartialEq)]
pub enum CatalogError {
    #[error("unknown document type '{0}'")]
    UnknownDocumentType(String),
}

/// Input kind of a question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    Text,
    Textarea,
    Select,
    Multiselect,
    Date,
    Number,
    File,
    Products,
    Packing,
}

impl FieldType {
    /// Repeatable sections are collected with add/finish instead of a single answer.
    pub fn is_repeatable(self) -> bool {
        matches!(self, FieldType::Products | FieldType::Packing)
    }
}

/// Show a field only when another field was answered with exactly `value`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Condition {
    pub field: &'static str,
    pub value: &'static str,
}

/// One question of the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FieldDefinition {
    pub field: &'static str,
    pub question: &'static str,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    pub required: bool,
    #[serde(skip_serializing_if = "no_options")]
    pub options: &'static [&'static str],
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accept: Option<&'static str>,
    pub category: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub condition: Option<Condition>,
}

fn no_options(options: &&'static [&'static str]) -> bool {
    options.is_empty()
}

impl FieldDefinition {
    pub(crate) const fn new(
        field: &'static str,
        question: &'static str,
        field_type: FieldType,
        required: bool,
        category: &'static str,
    ) -> Self {
        Self {
            field,
            question,
            field_type,
            required,
            options: &[],
            accept: None,
            category,
            condition: None,
        }
    }

    pub(crate) const fn with_options(mut self, options: &'static [&'static str]) -> Self {
        self.options = options;
        self
    }

    pub(crate) const fn with_accept(mut self, accept: &'static str) -> Self {
        self.accept = Some(accept);
        self
    }

    pub(crate) const fn when(mut self, field: &'static str, value: &'static str) -> Self {
        self.condition = Some(Condition { field, value });
        self
    }
}

/// The 13 trade documents the wizard can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum DocumentType {
    CommercialInvoice,
    ProformaInvoice,
    PackingList,
    BillOfLading,
    AirWaybill,
    CertificateOfOrigin,
    ShippingInstructions,
    InsuranceCertificate,
    PurchaseOrder,
    DeliveryChallan,
    ShippingBill,
    CreditNote,
    DebitNote,
}

impl DocumentType {
    pub const ALL: [DocumentType; 13] = [
        DocumentType::CommercialInvoice,
        DocumentType::ProformaInvoice,
        DocumentType::PackingList,
        DocumentType::BillOfLading,
        DocumentType::AirWaybill,
        DocumentType::CertificateOfOrigin,
        DocumentType::ShippingInstructions,
        DocumentType::InsuranceCertificate,
        DocumentType::PurchaseOrder,
        DocumentType::DeliveryChallan,
        DocumentType::ShippingBill,
        DocumentType::CreditNote,
        DocumentType::DebitNote,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            DocumentType::CommercialInvoice => "commercial_invoice",
            DocumentType::ProformaInvoice => "proforma_invoice",
            DocumentType::PackingList => "packing_list",
            DocumentType::BillOfLading => "bill_of_lading",
            DocumentType::AirWaybill => "air_waybill",
            DocumentType::CertificateOfOrigin => "certificate_of_origin",
            DocumentType::ShippingInstructions => "shipping_instructions",
            DocumentType::InsuranceCertificate => "insurance_certificate",
            DocumentType::PurchaseOrder => "purchase_order",
            DocumentType::DeliveryChallan => "delivery_challan",
            DocumentType::ShippingBill => "shipping_bill",
            DocumentType::CreditNote => "credit_note",
            DocumentType::DebitNote => "debit_note",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            DocumentType::CommercialInvoice => "Commercial Invoice",
            DocumentType::ProformaInvoice => "Proforma Invoice",
            DocumentType::PackingList => "Packing List",
            DocumentType::BillOfLading => "Bill of Lading",
            DocumentType::AirWaybill => "Air Waybill",
            DocumentType::CertificateOfOrigin => "Certificate of Origin",
            DocumentType::ShippingInstructions => "Shipping Instructions",
            DocumentType::InsuranceCertificate => "Insurance Certificate",
            DocumentType::PurchaseOrder => "Purchase Order",
            DocumentType::DeliveryChallan => "Delivery Challan",
            DocumentType::ShippingBill => "Shipping Bill",
            DocumentType::CreditNote => "Credit Note",
            DocumentType::DebitNote => "Debit Note",
        }
    }

    /// Type-specific questions, asked after [`COMMON_FIELDS`].
    pub fn fields(self) -> &'static [FieldDefinition] {
        fields::type_fields(self)
    }

    /// Full catalog for this type alone: common fields then type fields.
    pub fn catalog(self) -> impl Iterator<Item = &'static FieldDefinition> {
        COMMON_FIELDS.iter().chain(self.fields().iter())
    }
}

impl fmt::Display for DocumentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DocumentType {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DocumentType::ALL
            .into_iter()
            .find(|doc| doc.as_str() == s)
            .ok_or_else(|| CatalogError::UnknownDocumentType(s.to_string()))
    }
}

/// A document type the user picked for this session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct SelectedTemplate {
    pub id: DocumentType,
    pub name: String,
}

impl From<DocumentType> for SelectedTemplate {
    fn from(id: DocumentType) -> Self {
        Self {
            id,
            name: id.display_name().to_string(),
        }
    }
}

/// Look up a field definition anywhere in the catalog.
pub fn find_field(key: &str) -> Option<&'static FieldDefinition> {
    COMMON_FIELDS
        .iter()
        .chain(DocumentType::ALL.iter().flat_map(|doc| doc.fields().iter()))
        .find(|def| def.field == key)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_document_type_round_trips_through_id() {
        for doc in DocumentType::ALL {
            assert_eq!(doc.as_str().parse::<DocumentType>(), Ok(doc));
        }
        assert_eq!(
            "letter_of_credit".parse::<DocumentType>(),
            Err(CatalogError::UnknownDocumentType("letter_of_credit".into()))
        );
    }

    #[test]
    fn test_serde_uses_snake_case_ids() {
        let json = serde_json::to_string(&DocumentType::BillOfLading).unwrap();
        assert_eq!(json, "\"bill_of_lading\"");
    }

    #[test]
    fn test_conditions_reference_earlier_fields() {
        for doc in DocumentType::ALL {
            let mut seen = HashSet::new();
            for def in doc.catalog() {
                if let Some(cond) = def.condition {
                    assert!(
                        seen.contains(cond.field),
                        "{} in {} depends on {} which is not asked earlier",
                        def.field,
                        doc,
                        cond.field
                    );
                }
                seen.insert(def.field);
            }
        }
    }

    #[test]
    fn test_field_keys_unique_within_each_catalog() {
        for doc in DocumentType::ALL {
            let mut seen = HashSet::new();
            for def in doc.catalog() {
                assert!(seen.insert(def.field), "duplicate {} in {}", def.field, doc);
            }
        }
    }

    #[test]
    fn test_select_fields_have_options() {
        for doc in DocumentType::ALL {
            for def in doc.catalog() {
                if matches!(def.field_type, FieldType::Select | FieldType::Multiselect) {
                    assert!(!def.options.is_empty(), "{} has no options", def.field);
                }
            }
        }
    }

    #[test]
    fn test_shared_fields_have_identical_definitions() {
        // A key reused across types must mean the same question everywhere.
        for doc in DocumentType::ALL {
            for def in doc.catalog() {
                assert_eq!(find_field(def.field), Some(def));
            }
        }
    }

    #[test]
    fn test_autofill_fields_lead_the_common_list() {
        let leading: Vec<_> = COMMON_FIELDS.iter().take(3).map(|d| d.field).collect();
        assert_eq!(leading, AUTOFILL_FIELDS);
    }
}
