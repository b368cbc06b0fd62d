use super::common::{buyer, document_number, exporter, format_date, resolve_consignee, NOT_AVAILABLE};
use super::layout::{details, header, packing_table, page, parties, products_table, signature, text_section};
use super::{RenderContext, TemplateError};

pub(super) fn render(ctx: &RenderContext<'_>) -> Result<String, TemplateError> {
    let record = ctx.inputs;

    let rows = [
        ("Packing List No.", document_number(record, "packing_list_number", &ctx.doc_ids.packing_list)),
        ("Date", format_date(None, ctx.current_date)),
        ("Invoice No.", document_number(record, "invoice_number", &ctx.doc_ids.invoice)),
        ("Invoice Date", format_date(record.get("invoice_date"), ctx.current_date)),
        ("Port of Loading", record.value_or("port_of_loading", NOT_AVAILABLE).to_string()),
        ("Port of Discharge", record.value_or("port_of_discharge", NOT_AVAILABLE).to_string()),
        ("Vessel / Voyage", record.value_or("vessel_name", NOT_AVAILABLE).to_string()),
        ("Total Packages", record.total_packages().to_string()),
    ];

    let mut body = header(ctx, "PACKING LIST");
    body.push_str(&parties(&[
        ("Exporter", exporter(record, ctx.company)),
        ("Buyer", buyer(record)),
        ("Consignee", resolve_consignee(record)),
    ]));
    body.push_str(&details(&rows));
    body.push_str(&text_section("Marks & Numbers", record.get("marks_and_numbers")));
    body.push_str(&products_table(record, "", false)?);
    body.push_str(&packing_table(record)?);
    if let Some(remarks) = record.get("remarks") {
        body.push_str(&text_section("Remarks", Some(remarks)));
    }
    body.push_str(&signature(ctx, "Authorised Signatory"));

    Ok(page("Packing List", &body))
}
