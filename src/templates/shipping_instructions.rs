use super::bill_of_lading::freight_line;
use super::common::{
    document_number, exporter, format_date, resolve_consignee, resolve_notify_party, NOT_AVAILABLE,
};
use super::layout::{details, header, packing_table, page, parties, products_table, signature, text_section};
use super::{RenderContext, TemplateError};
use crate::record::DocumentRecord;

/// Multiselect answers are stored comma separated; show one per line.
fn documents_required(record: &DocumentRecord) -> Option<String> {
    record.get("documents_required").map(|list| {
        list.split(',')
            .map(str::trim)
            .filter(|item| !item.is_empty())
            .collect::<Vec<_>>()
            .join("\n")
    })
}

pub(super) fn render(ctx: &RenderContext<'_>) -> Result<String, TemplateError> {
    let record = ctx.inputs;

    let rows = [
        ("Reference", document_number(record, "si_number", &ctx.doc_ids.shipping_instructions)),
        ("Date", format_date(None, ctx.current_date)),
        ("Forwarder", record.value_or("forwarder_name", NOT_AVAILABLE).to_string()),
        ("Booking No.", record.value_or("booking_number", NOT_AVAILABLE).to_string()),
        ("Mode of Shipment", record.value_or("shipment_mode", NOT_AVAILABLE).to_string()),
        ("Shipment Date", format_date(record.get("shipment_date"), ctx.current_date)),
        ("Port of Loading", record.value_or("port_of_loading", NOT_AVAILABLE).to_string()),
        ("Port of Discharge", record.value_or("port_of_discharge", NOT_AVAILABLE).to_string()),
        ("Freight", freight_line(record)),
        ("Total Packages", record.total_packages().to_string()),
    ];

    let mut body = header(ctx, "SHIPPING INSTRUCTIONS");
    body.push_str(&parties(&[
        ("Shipper", exporter(record, ctx.company)),
        ("Consignee", resolve_consignee(record)),
        ("Notify Party", resolve_notify_party(record)),
    ]));
    body.push_str(&details(&rows));
    body.push_str(&products_table(record, "", false)?);
    body.push_str(&packing_table(record)?);
    body.push_str(&text_section("Documents Required", documents_required(record).as_deref()));
    body.push_str(&text_section("Special Instructions", record.get("special_instructions")));
    body.push_str(&signature(ctx, "Shipper"));

    Ok(page("Shipping Instructions", &body))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{assemble, AnswerMap};

    #[test]
    fn test_documents_required_one_per_line() {
        let mut answers = AnswerMap::new();
        answers.insert("documents_required".into(), "Commercial Invoice, Packing List".into());
        let record = assemble(&answers, &[], &[]);
        assert_eq!(
            documents_required(&record).as_deref(),
            Some("Commercial Invoice\nPacking List")
        );
    }
}
