use super::common::{document_number, escape_html, exporter, format_date, resolve_consignee, NOT_AVAILABLE};
use super::layout::{amount_summary, details, header, page, parties, products_table, signature, text_section};
use super::{RenderContext, TemplateError};

pub(super) fn render(ctx: &RenderContext<'_>) -> Result<String, TemplateError> {
    let record = ctx.inputs;
    let currency = record.value_or("currency", "");

    let rows = [
        ("Challan No.", document_number(record, "challan_number", &ctx.doc_ids.delivery_challan)),
        ("Challan Date", format_date(record.get("challan_date"), ctx.current_date)),
        ("Transporter", record.value_or("transporter_name", NOT_AVAILABLE).to_string()),
        ("Vehicle No.", record.value_or("vehicle_number", NOT_AVAILABLE).to_string()),
        ("E-way Bill No.", record.value_or("eway_bill_number", NOT_AVAILABLE).to_string()),
        ("Purpose", record.value_or("challan_purpose", NOT_AVAILABLE).to_string()),
    ];

    let consignee = resolve_consignee(record);

    let mut body = header(ctx, "DELIVERY CHALLAN");
    body.push_str(&parties(&[
        ("Consignor", exporter(record, ctx.company)),
        ("Consignee", consignee.clone()),
    ]));
    body.push_str(&details(&rows));
    body.push_str(&products_table(record, currency, true)?);
    body.push_str(&amount_summary("Approximate Value", record.total_amount, currency)?);
    if let Some(remarks) = record.get("remarks") {
        body.push_str(&text_section("Remarks", Some(remarks)));
    }
    body.push_str(&format!(
        "<div class=\"section\"><h4>Received in good condition</h4><div>For {}</div><br><br>\
         <div>Receiver's signature &amp; stamp</div></div>",
        escape_html(&consignee.name)
    ));
    body.push_str(&signature(ctx, "Authorised Signatory"));

    Ok(page("Delivery Challan", &body))
}
