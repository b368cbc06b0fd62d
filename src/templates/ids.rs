use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::catalog::DocumentType;

/// Reference numbers generated once per generation pass.
///
/// Format: `<PREFIX>/YYYYMM/RRDD` with `RR` two random digits and `DD` the day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentIds {
    pub invoice: String,
    pub proforma: String,
    pub packing_list: String,
    pub bill_of_lading: String,
    pub air_waybill: String,
    pub certificate_of_origin: String,
    pub shipping_instructions: String,
    pub insurance: String,
    pub purchase_order: String,
    pub delivery_challan: String,
    pub shipping_bill: String,
    pub credit_note: String,
    pub debit_note: String,
}

fn random_two_digits() -> u8 {
    Uuid::new_v4().as_bytes()[0] % 100
}

impl DocumentIds {
    pub fn generate(today: NaiveDate) -> Self {
        Self::from_parts(today, random_two_digits)
    }

    /// Build the IDs with an explicit source for the random digits.
    pub fn from_parts(today: NaiveDate, mut next_digits: impl FnMut() -> u8) -> Self {
        let mut id = |prefix: &str| {
            format!(
                "{}/{:04}{:02}/{:02}{:02}",
                prefix,
                today.year(),
                today.month(),
                next_digits() % 100,
                today.day()
            )
        };

        Self {
            invoice: id("INV"),
            proforma: id("PI"),
            packing_list: id("PL"),
            bill_of_lading: id("BL"),
            air_waybill: id("AWB"),
            certificate_of_origin: id("COO"),
            shipping_instructions: id("SI"),
            insurance: id("INS"),
            purchase_order: id("PO"),
            delivery_challan: id("DC"),
            shipping_bill: id("SB"),
            credit_note: id("CN"),
            debit_note: id("DN"),
        }
    }

    /// Generated number for the document type's own reference.
    pub fn for_type(&self, doc: DocumentType) -> &str {
        match doc {
            DocumentType::CommercialInvoice => &self.invoice,
            DocumentType::ProformaInvoice => &self.proforma,
            DocumentType::PackingList => &self.packing_list,
            DocumentType::BillOfLading => &self.bill_of_lading,
            DocumentType::AirWaybill => &self.air_waybill,
            DocumentType::CertificateOfOrigin => &self.certificate_of_origin,
            DocumentType::ShippingInstructions => &self.shipping_instructions,
            DocumentType::InsuranceCertificate => &self.insurance,
            DocumentType::PurchaseOrder => &self.purchase_order,
            DocumentType::DeliveryChallan => &self.delivery_challan,
            DocumentType::ShippingBill => &self.shipping_bill,
            DocumentType::CreditNote => &self.credit_note,
            DocumentType::DebitNote => &self.debit_note,
        }
    }
}
