use super::common::{buyer, document_number, exporter, format_date, NOT_AVAILABLE};
use super::layout::{amount_summary, details, finite, header, page, parties, products_table, signature, text_section};
use super::{RenderContext, TemplateError};
use crate::record::{round2, DocumentRecord};

/// Cover is customarily 110% of the invoice value.
const DEFAULT_INSURED_PERCENT: f64 = 110.0;

fn insured_value(record: &DocumentRecord) -> Result<f64, TemplateError> {
    let percent = record
        .get("insured_value_percent")
        .and_then(|raw| raw.parse::<f64>().ok())
        .unwrap_or(DEFAULT_INSURED_PERCENT);
    let total = finite(record.total_amount, "total_amount")?;
    finite(round2(total * percent / 100.0), "insured_value_percent")
}

pub(super) fn render(ctx: &RenderContext<'_>) -> Result<String, TemplateError> {
    let record = ctx.inputs;
    let currency = record.value_or("currency", "");
    let insured = insured_value(record)?;

    let claims = if record.is_yes("claims_payable_abroad") {
        format!("At destination through {}", record.value_or("claims_agent", NOT_AVAILABLE))
    } else {
        "At origin".to_string()
    };

    let rows = [
        ("Certificate No.", document_number(record, "certificate_number", &ctx.doc_ids.insurance)),
        ("Date of Issue", format_date(None, ctx.current_date)),
        ("Policy No.", record.value_or("policy_number", NOT_AVAILABLE).to_string()),
        ("Insurer", record.value_or("insurer_name", NOT_AVAILABLE).to_string()),
        ("Vessel / Voyage", record.value_or("vessel_name", NOT_AVAILABLE).to_string()),
        ("Sailing Date", format_date(record.get("shipment_date"), ctx.current_date)),
        ("From", record.value_or("port_of_loading", NOT_AVAILABLE).to_string()),
        ("To", record.value_or("port_of_discharge", NOT_AVAILABLE).to_string()),
        ("Conditions", record.value_or("coverage_type", NOT_AVAILABLE).to_string()),
        ("Claims Payable", claims),
    ];

    let mut body = header(ctx, "INSURANCE CERTIFICATE");
    body.push_str(&parties(&[
        ("Assured", exporter(record, ctx.company)),
        ("Buyer", buyer(record)),
    ]));
    body.push_str(&details(&rows));
    body.push_str(&products_table(record, currency, false)?);
    body.push_str(&amount_summary("Sum Insured", insured, currency)?);
    body.push_str(&text_section(
        "Notice",
        Some("In the event of loss or damage, notify the claims agent immediately and retain all packing."),
    ));
    body.push_str(&signature(ctx, "For and on behalf of the assured"));

    Ok(page("Insurance Certificate", &body))
}
