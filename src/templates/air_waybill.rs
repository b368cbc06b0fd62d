use super::common::{
    document_number, exporter, format_date, format_weight, resolve_consignee, resolve_notify_party, NOT_AVAILABLE,
};
use super::layout::{details, finite, header, packing_table, page, parties, products_table, signature, text_section};
use super::{RenderContext, TemplateError};

pub(super) fn render(ctx: &RenderContext<'_>) -> Result<String, TemplateError> {
    let record = ctx.inputs;
    let gross = finite(record.total_gross_weight(), "gross_weight")?;

    let rows = [
        ("Air Waybill No.", document_number(record, "awb_number", &ctx.doc_ids.air_waybill)),
        ("Date of Issue", format_date(None, ctx.current_date)),
        ("Issuing Carrier", record.value_or("airline_name", NOT_AVAILABLE).to_string()),
        ("Flight", record.value_or("flight_number", NOT_AVAILABLE).to_string()),
        ("Airport of Departure", record.value_or("airport_of_departure", NOT_AVAILABLE).to_string()),
        ("Airport of Destination", record.value_or("airport_of_destination", NOT_AVAILABLE).to_string()),
        ("Declared Value for Carriage", record.value_or("declared_value_carriage", "NVD").to_string()),
        ("Currency", record.value_or("currency", NOT_AVAILABLE).to_string()),
        ("No. of Pieces", record.total_packages().to_string()),
        ("Gross Weight (kg)", format_weight(gross)),
    ];

    let mut body = header(ctx, "AIR WAYBILL");
    body.push_str(&parties(&[
        ("Shipper", exporter(record, ctx.company)),
        ("Consignee", resolve_consignee(record)),
        ("Notify Party", resolve_notify_party(record)),
    ]));
    body.push_str(&details(&rows));
    body.push_str(&text_section("Handling Information", record.get("handling_information")));
    body.push_str(&products_table(record, "", false)?);
    body.push_str(&packing_table(record)?);
    body.push_str(&signature(ctx, "Signature of shipper or agent"));

    Ok(page("Air Waybill", &body))
}
