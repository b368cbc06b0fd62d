//! Shared helpers for document rendering: number and date formatting, amount in
//! words, party resolution and HTML escaping.

use chrono::NaiveDate;

use crate::autofill::CompanyData;
use crate::record::DocumentRecord;

pub const NOT_AVAILABLE: &str = "N/A";

/// Monetary amount with exactly two decimals.
pub fn format_amount(value: f64) -> String {
    format!("{:.2}", value)
}

/// Weights always carry two decimals.
pub fn format_weight(value: f64) -> String {
    format!("{:.2}", value)
}

/// Counts are shown as-is; fractional quantities keep their decimals.
pub fn format_quantity(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{:.0}", value)
    } else {
        value.to_string()
    }
}

/// Render an ISO date as `DD/MM/YYYY`, falling back to `today` when absent.
///
/// Values that are not ISO dates are shown verbatim.
pub fn format_date(value: Option<&str>, today: NaiveDate) -> String {
    match value.map(str::trim).filter(|v| !v.is_empty()) {
        None => today.format("%d/%m/%Y").to_string(),
        Some(raw) => NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .map(|date| date.format("%d/%m/%Y").to_string())
            .unwrap_or_else(|_| raw.to_string()),
    }
}

/// Explicit document number from the answers, or the generated one.
pub fn document_number(record: &DocumentRecord, key: &str, generated: &str) -> String {
    record.get(key).unwrap_or(generated).to_string()
}

/// Download filename for a document display name.
pub fn pdf_filename(display_name: &str) -> String {
    format!("{}.pdf", display_name.replace(' ', "_"))
}

/// Escape text for inclusion in HTML element content or attribute values.
pub fn escape_html(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

/// Escape text and keep its line breaks.
pub fn escape_multiline(value: &str) -> String {
    escape_html(value).replace('\n', "<br>")
}

// ============================================================================
// Parties
// ============================================================================

/// Name and address block of one party on a document.
#[derive(Debug, Clone, PartialEq)]
pub struct Party {
    pub name: String,
    pub address: String,
}

impl Party {
    fn from_record(record: &DocumentRecord, name_key: &str, address_key: &str) -> Self {
        Self {
            name: record.value_or(name_key, NOT_AVAILABLE).to_string(),
            address: record.value_or(address_key, NOT_AVAILABLE).to_string(),
        }
    }
}

/// Exporter block, preferring the answers over the stored company profile.
pub fn exporter(record: &DocumentRecord, company: &CompanyData) -> Party {
    let name = record
        .get("exporter_company_name")
        .or_else(|| non_empty(&company.company_name))
        .unwrap_or("Your Company Name");
    let address = record
        .get("exporter_address")
        .or_else(|| non_empty(&company.comp_reg_address))
        .unwrap_or("Your Company Address");
    Party {
        name: name.to_string(),
        address: address.to_string(),
    }
}

pub fn exporter_tax_id<'a>(record: &'a DocumentRecord, company: &'a CompanyData) -> &'a str {
    record
        .get("exporter_gstin")
        .or_else(|| non_empty(&company.gstin))
        .unwrap_or(NOT_AVAILABLE)
}

pub fn buyer(record: &DocumentRecord) -> Party {
    Party::from_record(record, "buyer_name", "buyer_address")
}

/// Buyer details when the consignee is the buyer, otherwise the consignee fields.
pub fn resolve_consignee(record: &DocumentRecord) -> Party {
    if record.is_yes("consignee_same_as_buyer") {
        buyer(record)
    } else {
        Party::from_record(record, "consignee_name", "consignee_address")
    }
}

/// Consignee when the notify party is the consignee, otherwise the notify fields.
pub fn resolve_notify_party(record: &DocumentRecord) -> Party {
    if record.is_yes("notify_same_as_consignee") {
        resolve_consignee(record)
    } else {
        Party::from_record(record, "notify_party_name", "notify_party_address")
    }
}

fn non_empty(value: &str) -> Option<&str> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then_some(trimmed)
}

// ============================================================================
// Amount in words
// ============================================================================

const ONES: [&str; 20] = [
    "ZERO", "ONE", "TWO", "THREE", "FOUR", "FIVE", "SIX", "SEVEN", "EIGHT", "NINE", "TEN", "ELEVEN",
    "TWELVE", "THIRTEEN", "FOURTEEN", "FIFTEEN", "SIXTEEN", "SEVENTEEN", "EIGHTEEN", "NINETEEN",
];
const TENS: [&str; 10] = [
    "", "", "TWENTY", "THIRTY", "FORTY", "FIFTY", "SIXTY", "SEVENTY", "EIGHTY", "NINETY",
];

fn below_hundred(n: u64) -> String {
    match n {
        0..=19 => ONES[n as usize].to_string(),
        _ if n % 10 == 0 => TENS[(n / 10) as usize].to_string(),
        _ => format!("{} {}", TENS[(n / 10) as usize], ONES[(n % 10) as usize]),
    }
}

/// Whole number in words using the Indian scale (thousand, lakh, crore).
fn whole_in_words(n: u64) -> String {
    if n == 0 {
        return ONES[0].to_string();
    }

    let mut parts = Vec::new();
    let crore = n / 10_000_000;
    let lakh = (n / 100_000) % 100;
    let thousand = (n / 1_000) % 100;
    let hundred = (n / 100) % 10;
    let rest = n % 100;

    if crore > 0 {
        parts.push(format!("{} CRORE", whole_in_words(crore)));
    }
    if lakh > 0 {
        parts.push(format!("{} LAKH", below_hundred(lakh)));
    }
    if thousand > 0 {
        parts.push(format!("{} THOUSAND", below_hundred(thousand)));
    }
    if hundred > 0 {
        parts.push(format!("{} HUNDRED", ONES[hundred as usize]));
    }
    if rest > 0 {
        parts.push(below_hundred(rest));
    }

    parts.join(" ")
}

/// Currency name and fractional unit used in words.
fn currency_words(currency: &str) -> (String, &'static str) {
    match currency.trim().to_ascii_uppercase().as_str() {
        "" | "INR" => ("RUPEES".to_string(), "PAISE"),
        code => (code.to_string(), "CENTS"),
    }
}

/// Uppercase English words for an amount, e.g. `ONE LAKH RUPEES ONLY`.
pub fn amount_in_words(amount: f64, currency: &str) -> String {
    let amount = if amount.is_finite() { amount } else { 0.0 };
    let minus = if amount < 0.0 { "MINUS " } else { "" };

    let cents_total = (amount.abs() * 100.0).round() as u64;
    let whole = cents_total / 100;
    let fraction = cents_total % 100;
    let (name, unit) = currency_words(currency);

    let mut words = format!("{}{} {}", minus, whole_in_words(whole), name);
    if fraction > 0 {
        words.push_str(&format!(" AND {} {}", below_hundred(fraction), unit));
    }
    words.push_str(" ONLY");
    words
}
