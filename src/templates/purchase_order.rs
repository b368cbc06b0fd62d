use super::common::{buyer, document_number, exporter, format_date, resolve_consignee, Party, NOT_AVAILABLE};
use super::layout::{amount_summary, details, header, page, parties, products_table, signature, text_section};
use super::{RenderContext, TemplateError};

pub(super) fn render(ctx: &RenderContext<'_>) -> Result<String, TemplateError> {
    let record = ctx.inputs;
    let currency = record.value_or("currency", "");

    let deliver_to = match record.get("delivery_address") {
        Some(address) => Party {
            name: resolve_consignee(record).name,
            address: address.to_string(),
        },
        None => resolve_consignee(record),
    };

    let mut rows = vec![
        ("PO No.", document_number(record, "po_number", &ctx.doc_ids.purchase_order)),
        ("PO Date", format_date(record.get("po_date"), ctx.current_date)),
        (
            "Delivery Date",
            record
                .get("delivery_date")
                .map(|date| format_date(Some(date), ctx.current_date))
                .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
        ),
        ("Incoterms", record.value_or("incoterms", NOT_AVAILABLE).to_string()),
        ("Payment Terms", record.value_or("payment_terms", NOT_AVAILABLE).to_string()),
    ];
    if let Some(lc) = record.get("lc_number") {
        rows.push(("L/C No.", lc.to_string()));
    }

    let mut body = header(ctx, "PURCHASE ORDER");
    body.push_str(&parties(&[
        ("Supplier", exporter(record, ctx.company)),
        ("Buyer", buyer(record)),
        ("Deliver To", deliver_to),
    ]));
    body.push_str(&details(&rows));
    body.push_str(&products_table(record, currency, true)?);
    body.push_str(&amount_summary("Order Value", record.total_amount, currency)?);
    if let Some(remarks) = record.get("remarks") {
        body.push_str(&text_section("Terms & Remarks", Some(remarks)));
    }
    body.push_str(&signature(ctx, "Authorised Signatory"));

    Ok(page("Purchase Order", &body))
}
