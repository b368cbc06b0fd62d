//! HTML building blocks shared by every document family.
//!
//! All text coming from answers passes through [`escape_html`]; image data URIs are
//! only embedded when they look like a real `data:image/...` URI.

use std::fmt::Write;

use super::common::{
    amount_in_words, escape_html, escape_multiline, exporter, exporter_tax_id, format_amount,
    format_quantity, format_weight, Party, NOT_AVAILABLE,
};
use super::{RenderContext, TemplateError};
use crate::record::DocumentRecord;
use crate::validation::is_image_data_uri;

/// Logical page width in CSS pixels (A4 at 96 dpi).
pub const PAGE_WIDTH_PX: u32 = 794;

const STYLE: &str = r#"
* { box-sizing: border-box; }
body { margin: 0; font-family: Arial, Helvetica, sans-serif; font-size: 12px; color: #111; }
.page { width: 794px; padding: 32px; background: #fff; }
.doc-header { display: flex; justify-content: space-between; align-items: flex-start; border-bottom: 2px solid #1f3b73; padding-bottom: 12px; }
.doc-header img.logo { max-height: 64px; max-width: 180px; }
.doc-title { font-size: 20px; font-weight: bold; color: #1f3b73; text-align: right; }
.exporter-name { font-size: 15px; font-weight: bold; }
.parties { display: flex; gap: 12px; margin-top: 12px; }
.party { flex: 1; border: 1px solid #999; padding: 8px; }
.party h4, .section h4 { margin: 0 0 4px 0; font-size: 11px; text-transform: uppercase; color: #555; }
table { width: 100%; border-collapse: collapse; margin-top: 12px; }
th, td { border: 1px solid #999; padding: 4px 6px; vertical-align: top; }
th { background: #eef1f7; text-align: left; }
td.num, th.num { text-align: right; }
table.details td.label { width: 22%; background: #f7f7f7; font-weight: bold; }
tr.total td { font-weight: bold; }
.section { margin-top: 12px; border: 1px solid #999; padding: 8px; }
.words { margin-top: 6px; font-style: italic; }
.signature { margin-top: 24px; text-align: right; }
.signature img { max-height: 60px; max-width: 200px; }
"#;

/// Wrap a body into a complete standalone HTML page.
pub fn page(title: &str, body: &str) -> String {
    let mut html = String::with_capacity(body.len() + STYLE.len() + 256);
    html.push_str("<!DOCTYPE html>\n<html><head><meta charset=\"utf-8\">");
    let _ = write!(html, "<title>{}</title>", escape_html(title));
    html.push_str("<style>");
    html.push_str(STYLE);
    html.push_str("</style></head><body><div class=\"page\">");
    html.push_str(body);
    html.push_str("</div></body></html>\n");
    html
}

fn image(class: &str, data_uri: Option<&str>, alt: &str) -> String {
    match data_uri.filter(|uri| is_image_data_uri(uri)) {
        Some(uri) => format!(
            "<img class=\"{}\" src=\"{}\" alt=\"{}\">",
            class,
            escape_html(uri),
            escape_html(alt)
        ),
        None => String::new(),
    }
}

/// Exporter letterhead with the optional logo and the document title.
pub fn header(ctx: &RenderContext<'_>, title: &str) -> String {
    let record = ctx.inputs;
    let party = exporter(record, ctx.company);

    let mut html = String::from("<div class=\"doc-header\"><div>");
    html.push_str(&image("logo", record.get("company_logo"), "logo"));
    let _ = write!(
        html,
        "<div class=\"exporter-name\">{}</div><div>{}</div>",
        escape_html(&party.name),
        escape_multiline(&party.address)
    );
    let _ = write!(
        html,
        "<div>GSTIN: {}</div>",
        escape_html(exporter_tax_id(record, ctx.company))
    );
    for (label, key) in [("IEC", "exporter_iec"), ("Email", "exporter_email"), ("Phone", "exporter_phone")] {
        if let Some(value) = record.get(key) {
            let _ = write!(html, "<div>{}: {}</div>", label, escape_html(value));
        }
    }
    let _ = write!(
        html,
        "</div><div class=\"doc-title\">{}</div></div>",
        escape_html(title)
    );
    html
}

/// Side-by-side name/address boxes.
pub fn parties(blocks: &[(&str, Party)]) -> String {
    let mut html = String::from("<div class=\"parties\">");
    for (heading, party) in blocks {
        let _ = write!(
            html,
            "<div class=\"party\"><h4>{}</h4><strong>{}</strong><div>{}</div></div>",
            escape_html(heading),
            escape_html(&party.name),
            escape_multiline(&party.address)
        );
    }
    html.push_str("</div>");
    html
}

/// Two-column label/value grid, two pairs per row.
pub fn details(rows: &[(&str, String)]) -> String {
    let mut html = String::from("<table class=\"details\">");
    for pair in rows.chunks(2) {
        html.push_str("<tr>");
        for (label, value) in pair {
            let _ = write!(
                html,
                "<td class=\"label\">{}</td><td>{}</td>",
                escape_html(label),
                escape_multiline(value)
            );
        }
        if pair.len() == 1 {
            html.push_str("<td class=\"label\"></td><td></td>");
        }
        html.push_str("</tr>");
    }
    html.push_str("</table>");
    html
}

/// Titled free-text box. Absent values render the placeholder.
pub fn text_section(heading: &str, value: Option<&str>) -> String {
    format!(
        "<div class=\"section\"><h4>{}</h4><div>{}</div></div>",
        escape_html(heading),
        escape_multiline(value.unwrap_or(NOT_AVAILABLE))
    )
}

pub(super) fn finite(value: f64, field: &str) -> Result<f64, TemplateError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(TemplateError::NonFiniteValue {
            field: field.to_string(),
        })
    }
}

fn or_placeholder(value: &str) -> &str {
    if value.trim().is_empty() {
        NOT_AVAILABLE
    } else {
        value
    }
}

/// Line items. `priced` adds unit price and amount columns plus the grand total row.
pub fn products_table(record: &DocumentRecord, currency: &str, priced: bool) -> Result<String, TemplateError> {
    let mut html = String::from(
        "<table class=\"products\"><tr><th>#</th><th>Code</th><th>Description</th><th>HS Code</th>\
         <th class=\"num\">Qty</th><th>Unit</th>",
    );
    if priced {
        let _ = write!(
            html,
            "<th class=\"num\">Rate ({0})</th><th class=\"num\">Amount ({0})</th>",
            escape_html(currency)
        );
    }
    html.push_str("</tr>");

    if record.products.is_empty() {
        let span = if priced { 8 } else { 6 };
        let _ = write!(html, "<tr><td colspan=\"{}\">No products listed</td></tr>", span);
    }

    for (i, product) in record.products.iter().enumerate() {
        let quantity = finite(product.quantity(), "quantity")?;
        let _ = write!(
            html,
            "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td class=\"num\">{}</td><td>{}</td>",
            i + 1,
            escape_html(or_placeholder(&product.product_code)),
            escape_html(or_placeholder(&product.description)),
            escape_html(or_placeholder(&product.hs_code)),
            format_quantity(quantity),
            escape_html(or_placeholder(&product.unit))
        );
        if priced {
            let _ = write!(
                html,
                "<td class=\"num\">{}</td><td class=\"num\">{}</td>",
                format_amount(finite(product.unit_price(), "unit_price")?),
                format_amount(finite(product.total_amount(), "total_amount")?)
            );
        }
        html.push_str("</tr>");
    }

    if priced {
        let _ = write!(
            html,
            "<tr class=\"total\"><td colspan=\"4\">Total</td><td class=\"num\">{}</td><td></td><td></td>\
             <td class=\"num\">{} {}</td></tr>",
            format_quantity(finite(record.total_quantity(), "quantity")?),
            escape_html(currency),
            format_amount(finite(record.total_amount, "total_amount")?)
        );
    }
    html.push_str("</table>");
    Ok(html)
}

/// Amount line followed by the amount in words.
pub fn amount_summary(label: &str, amount: f64, currency: &str) -> Result<String, TemplateError> {
    let amount = finite(amount, "total_amount")?;
    Ok(format!(
        "<div class=\"section\"><h4>{}</h4><strong>{} {}</strong><div class=\"words\">{}</div></div>",
        escape_html(label),
        escape_html(currency),
        format_amount(amount),
        escape_html(&amount_in_words(amount, currency))
    ))
}

/// Packing rows joined with their product, plus package and weight totals.
pub fn packing_table(record: &DocumentRecord) -> Result<String, TemplateError> {
    let mut html = String::from(
        "<table class=\"packing\"><tr><th>#</th><th>Description</th><th>Kind of Packages</th>\
         <th class=\"num\">Packages</th><th class=\"num\">Net Wt (kg)</th><th class=\"num\">Gross Wt (kg)</th>\
         <th>Measurements</th></tr>",
    );

    if record.packing_info.is_empty() {
        html.push_str("<tr><td colspan=\"7\">No packing details provided</td></tr>");
    }

    for (i, entry) in record.packing_info.iter().enumerate() {
        let description = record
            .product_for(entry)
            .map(|product| product.description.as_str())
            .unwrap_or(NOT_AVAILABLE);
        let _ = write!(
            html,
            "<tr><td>{}</td><td>{}</td><td>{}</td><td class=\"num\">{}</td><td class=\"num\">{}</td>\
             <td class=\"num\">{}</td><td>{}</td></tr>",
            i + 1,
            escape_html(or_placeholder(description)),
            escape_html(or_placeholder(&entry.kind_of_packages)),
            entry.number_of_packages,
            format_weight(finite(entry.net_weight, "net_weight")?),
            format_weight(finite(entry.gross_weight, "gross_weight")?),
            escape_html(or_placeholder(entry.measurements()))
        );
    }

    let _ = write!(
        html,
        "<tr class=\"total\"><td colspan=\"3\">Total</td><td class=\"num\">{}</td><td class=\"num\">{}</td>\
         <td class=\"num\">{}</td><td></td></tr></table>",
        record.total_packages(),
        format_weight(finite(record.total_net_weight(), "net_weight")?),
        format_weight(finite(record.total_gross_weight(), "gross_weight")?)
    );
    Ok(html)
}

/// "For <exporter>" block with the optional signature image and signatory name.
pub fn signature(ctx: &RenderContext<'_>, caption: &str) -> String {
    let record = ctx.inputs;
    let party = exporter(record, ctx.company);
    format!(
        "<div class=\"signature\"><div>For {}</div>{}<div><strong>{}</strong></div><div>{}</div></div>",
        escape_html(&party.name),
        image("sign", record.get("signature"), "signature"),
        escape_html(record.value_or("authorized_signatory", "Authorised Signatory")),
        escape_html(caption)
    )
}
