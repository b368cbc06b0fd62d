use super::common::{buyer, document_number, exporter, format_date, resolve_consignee, NOT_AVAILABLE};
use super::layout::{amount_summary, details, header, page, parties, products_table, signature, text_section};
use super::{RenderContext, TemplateError};

fn validity(days: Option<&str>) -> String {
    match days {
        Some(days) => format!("{} days from the date above", days),
        None => NOT_AVAILABLE.to_string(),
    }
}

pub(super) fn render(ctx: &RenderContext<'_>) -> Result<String, TemplateError> {
    let record = ctx.inputs;
    let currency = record.value_or("currency", "");

    let mut rows = vec![
        ("Proforma No.", document_number(record, "proforma_number", &ctx.doc_ids.proforma)),
        ("Date", format_date(record.get("proforma_date"), ctx.current_date)),
        ("Offer Validity", validity(record.get("validity_days"))),
        ("Incoterms", record.value_or("incoterms", NOT_AVAILABLE).to_string()),
        ("Payment Terms", record.value_or("payment_terms", NOT_AVAILABLE).to_string()),
    ];
    if let Some(lc) = record.get("lc_number") {
        rows.push(("L/C No.", lc.to_string()));
    }
    rows.push(("Port of Loading", record.value_or("port_of_loading", NOT_AVAILABLE).to_string()));
    rows.push(("Port of Discharge", record.value_or("port_of_discharge", NOT_AVAILABLE).to_string()));

    let mut body = header(ctx, "PROFORMA INVOICE");
    body.push_str(&parties(&[
        ("Seller", exporter(record, ctx.company)),
        ("Buyer", buyer(record)),
        ("Consignee", resolve_consignee(record)),
    ]));
    body.push_str(&details(&rows));
    body.push_str(&products_table(record, currency, true)?);
    body.push_str(&amount_summary("Total Proforma Value", record.total_amount, currency)?);
    body.push_str(&text_section("Bank Details", record.get("bank_details")));
    if let Some(remarks) = record.get("remarks") {
        body.push_str(&text_section("Remarks", Some(remarks)));
    }
    body.push_str(&signature(ctx, "Authorised Signatory"));

    Ok(page("Proforma Invoice", &body))
}
