use super::common::{buyer, document_number, exporter, exporter_tax_id, format_date, resolve_consignee, NOT_AVAILABLE};
use super::layout::{amount_summary, details, header, page, parties, products_table, signature};
use super::{RenderContext, TemplateError};
use crate::record::DocumentRecord;

fn scheme_line(record: &DocumentRecord) -> String {
    match (record.get("export_scheme"), record.get("scheme_reference")) {
        (Some(scheme), Some(reference)) => format!("{} ({})", scheme, reference),
        (Some(scheme), None) => scheme.to_string(),
        (None, _) => NOT_AVAILABLE.to_string(),
    }
}

pub(super) fn render(ctx: &RenderContext<'_>) -> Result<String, TemplateError> {
    let record = ctx.inputs;
    let currency = record.value_or("currency", "");

    let rows = [
        ("Shipping Bill No.", document_number(record, "shipping_bill_number", &ctx.doc_ids.shipping_bill)),
        ("Date", format_date(None, ctx.current_date)),
        ("IEC", record.value_or("exporter_iec", NOT_AVAILABLE).to_string()),
        ("GSTIN", exporter_tax_id(record, ctx.company).to_string()),
        ("Customs House Agent", record.value_or("customs_house_agent", NOT_AVAILABLE).to_string()),
        ("Export Scheme", scheme_line(record)),
        ("Invoice No.", document_number(record, "invoice_number", &ctx.doc_ids.invoice)),
        ("Invoice Date", format_date(record.get("invoice_date"), ctx.current_date)),
        ("Port of Loading", record.value_or("port_of_loading", NOT_AVAILABLE).to_string()),
        ("Port of Discharge", record.value_or("port_of_discharge", NOT_AVAILABLE).to_string()),
        ("Country of Destination", record.value_or("country_of_destination", NOT_AVAILABLE).to_string()),
        ("Incoterms", record.value_or("incoterms", NOT_AVAILABLE).to_string()),
    ];

    let mut body = header(ctx, "SHIPPING BILL");
    body.push_str(&parties(&[
        ("Exporter", exporter(record, ctx.company)),
        ("Buyer", buyer(record)),
        ("Consignee", resolve_consignee(record)),
    ]));
    body.push_str(&details(&rows));
    body.push_str(&products_table(record, currency, true)?);
    body.push_str(&amount_summary("FOB Value", record.total_amount, currency)?);
    body.push_str(&signature(ctx, "Exporter / Customs House Agent"));

    Ok(page("Shipping Bill", &body))
}
