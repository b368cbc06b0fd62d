use super::common::{document_number, exporter, format_date, resolve_consignee, NOT_AVAILABLE};
use super::layout::{details, header, page, parties, products_table, signature, text_section};
use super::{RenderContext, TemplateError};
use crate::record::DocumentRecord;

fn preference_line(record: &DocumentRecord) -> String {
    if record.is_yes("preferential_treatment") {
        format!("Claimed under {}", record.value_or("trade_agreement", NOT_AVAILABLE))
    } else {
        "Not claimed".to_string()
    }
}

pub(super) fn render(ctx: &RenderContext<'_>) -> Result<String, TemplateError> {
    let record = ctx.inputs;
    let origin = record.value_or("country_of_origin", NOT_AVAILABLE);

    let rows = [
        ("Certificate No.", document_number(record, "coo_number", &ctx.doc_ids.certificate_of_origin)),
        ("Date", format_date(None, ctx.current_date)),
        ("Invoice No.", document_number(record, "invoice_number", &ctx.doc_ids.invoice)),
        ("Invoice Date", format_date(record.get("invoice_date"), ctx.current_date)),
        ("Country of Origin", origin.to_string()),
        ("Country of Destination", record.value_or("country_of_destination", NOT_AVAILABLE).to_string()),
        ("Mode of Transport", record.value_or("shipment_mode", NOT_AVAILABLE).to_string()),
        ("Port of Loading", record.value_or("port_of_loading", NOT_AVAILABLE).to_string()),
        ("Port of Discharge", record.value_or("port_of_discharge", NOT_AVAILABLE).to_string()),
        ("Preferential Treatment", preference_line(record)),
    ];

    let declaration = format!(
        "The undersigned hereby declares that the goods described above originate in {} \
and comply with the origin requirements for export to {}.",
        origin,
        record.value_or("country_of_destination", NOT_AVAILABLE)
    );

    let mut body = header(ctx, "CERTIFICATE OF ORIGIN");
    body.push_str(&parties(&[
        ("Exporter", exporter(record, ctx.company)),
        ("Consignee", resolve_consignee(record)),
    ]));
    body.push_str(&details(&rows));
    body.push_str(&text_section("Marks & Numbers", record.get("marks_and_numbers")));
    body.push_str(&products_table(record, "", false)?);
    body.push_str(&text_section("Declaration by the Exporter", Some(declaration.as_str())));
    body.push_str(&text_section(
        "Certification",
        Some(record.value_or("issuing_authority", "Issuing authority to certify")),
    ));
    body.push_str(&signature(ctx, "Authorised Signatory"));

    Ok(page("Certificate of Origin", &body))
}
