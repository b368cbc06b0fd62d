use super::common::{
    document_number, exporter, format_date, resolve_consignee, resolve_notify_party, NOT_AVAILABLE,
};
use super::layout::{details, header, packing_table, page, parties, products_table, signature, text_section};
use super::{RenderContext, TemplateError};
use crate::record::DocumentRecord;

/// "Prepaid", or "Collect" with the place of payment.
pub(super) fn freight_line(record: &DocumentRecord) -> String {
    match record.get("freight_terms") {
        Some("Collect") => format!(
            "Collect, payable at {}",
            record.value_or("freight_payable_at", NOT_AVAILABLE)
        ),
        Some(terms) => terms.to_string(),
        None => NOT_AVAILABLE.to_string(),
    }
}

pub(super) fn render(ctx: &RenderContext<'_>) -> Result<String, TemplateError> {
    let record = ctx.inputs;

    let rows = [
        ("B/L No.", document_number(record, "bl_number", &ctx.doc_ids.bill_of_lading)),
        ("Date of Issue", format_date(None, ctx.current_date)),
        ("Carrier", record.value_or("carrier_name", NOT_AVAILABLE).to_string()),
        ("Vessel / Voyage", record.value_or("vessel_name", NOT_AVAILABLE).to_string()),
        ("Port of Loading", record.value_or("port_of_loading", NOT_AVAILABLE).to_string()),
        ("Port of Discharge", record.value_or("port_of_discharge", NOT_AVAILABLE).to_string()),
        ("Place of Delivery", record.value_or("final_destination", NOT_AVAILABLE).to_string()),
        ("Freight", freight_line(record)),
        ("Original B/Ls", record.value_or("number_of_originals", "3").to_string()),
        ("Total Packages", record.total_packages().to_string()),
    ];

    let mut body = header(ctx, "BILL OF LADING");
    body.push_str(&parties(&[
        ("Shipper", exporter(record, ctx.company)),
        ("Consignee", resolve_consignee(record)),
        ("Notify Party", resolve_notify_party(record)),
    ]));
    body.push_str(&details(&rows));
    body.push_str(&text_section("Marks & Numbers", record.get("marks_and_numbers")));
    body.push_str(&products_table(record, "", false)?);
    body.push_str(&packing_table(record)?);
    body.push_str(&signature(ctx, "Signed as agent for the carrier"));

    Ok(page("Bill of Lading", &body))
}
