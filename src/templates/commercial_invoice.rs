use super::common::{buyer, document_number, exporter, format_date, resolve_consignee, NOT_AVAILABLE};
use super::layout::{amount_summary, details, header, page, parties, products_table, signature, text_section};
use super::{RenderContext, TemplateError};

const DECLARATION: &str = "We declare that this invoice shows the actual price of the goods described \
and that all particulars are true and correct.";

pub(super) fn render(ctx: &RenderContext<'_>) -> Result<String, TemplateError> {
    let record = ctx.inputs;
    let currency = record.value_or("currency", "");

    let mut rows = vec![
        ("Invoice No.", document_number(record, "invoice_number", &ctx.doc_ids.invoice)),
        ("Invoice Date", format_date(record.get("invoice_date"), ctx.current_date)),
        ("Buyer's Order No.", record.value_or("buyer_order_number", NOT_AVAILABLE).to_string()),
        ("Incoterms", record.value_or("incoterms", NOT_AVAILABLE).to_string()),
        ("Payment Terms", record.value_or("payment_terms", NOT_AVAILABLE).to_string()),
    ];
    if let Some(lc) = record.get("lc_number") {
        rows.push(("L/C No.", lc.to_string()));
    }
    rows.extend([
        ("Country of Origin", record.value_or("country_of_origin", NOT_AVAILABLE).to_string()),
        ("Final Destination", record.value_or("country_of_destination", NOT_AVAILABLE).to_string()),
        ("Port of Loading", record.value_or("port_of_loading", NOT_AVAILABLE).to_string()),
        ("Port of Discharge", record.value_or("port_of_discharge", NOT_AVAILABLE).to_string()),
        ("Vessel / Voyage", record.value_or("vessel_name", NOT_AVAILABLE).to_string()),
        ("Buyer Country", record.value_or("buyer_country", NOT_AVAILABLE).to_string()),
    ]);

    let mut body = header(ctx, "COMMERCIAL INVOICE");
    body.push_str(&parties(&[
        ("Exporter", exporter(record, ctx.company)),
        ("Buyer", buyer(record)),
        ("Consignee", resolve_consignee(record)),
    ]));
    body.push_str(&details(&rows));
    body.push_str(&products_table(record, currency, true)?);
    body.push_str(&amount_summary("Total Invoice Value", record.total_amount, currency)?);
    body.push_str(&text_section("Bank Details", record.get("bank_details")));
    if let Some(remarks) = record.get("remarks") {
        body.push_str(&text_section("Remarks", Some(remarks)));
    }
    body.push_str(&text_section("Declaration", Some(DECLARATION)));
    body.push_str(&signature(ctx, "Authorised Signatory"));

    Ok(page("Commercial Invoice", &body))
}
