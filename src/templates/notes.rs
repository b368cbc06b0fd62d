//! Credit and debit notes share one layout.

use super::common::{buyer, document_number, exporter, format_date, NOT_AVAILABLE};
use super::layout::{amount_summary, details, header, page, parties, products_table, signature, text_section};
use super::{RenderContext, TemplateError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum NoteKind {
    Credit,
    Debit,
}

impl NoteKind {
    fn title(self) -> &'static str {
        match self {
            NoteKind::Credit => "Credit Note",
            NoteKind::Debit => "Debit Note",
        }
    }

    fn number_key(self) -> &'static str {
        match self {
            NoteKind::Credit => "credit_note_number",
            NoteKind::Debit => "debit_note_number",
        }
    }

    fn statement(self) -> &'static str {
        match self {
            NoteKind::Credit => "We have credited your account with the amount below.",
            NoteKind::Debit => "We have debited your account with the amount below.",
        }
    }
}

pub(super) fn render(ctx: &RenderContext<'_>, kind: NoteKind) -> Result<String, TemplateError> {
    let record = ctx.inputs;
    let currency = record.value_or("currency", "");
    let generated = match kind {
        NoteKind::Credit => &ctx.doc_ids.credit_note,
        NoteKind::Debit => &ctx.doc_ids.debit_note,
    };

    let rows = [
        ("Note No.", document_number(record, kind.number_key(), generated)),
        ("Note Date", format_date(record.get("note_date"), ctx.current_date)),
        ("Against Invoice", record.value_or("reference_invoice_number", NOT_AVAILABLE).to_string()),
        ("Invoice Date", format_date(record.get("reference_invoice_date"), ctx.current_date)),
    ];

    let mut body = header(ctx, &kind.title().to_uppercase());
    body.push_str(&parties(&[
        ("Issued By", exporter(record, ctx.company)),
        ("Issued To", buyer(record)),
    ]));
    body.push_str(&details(&rows));
    body.push_str(&text_section("Reason", record.get("note_reason")));
    body.push_str(&products_table(record, currency, true)?);
    body.push_str(&amount_summary(kind.statement(), record.total_amount, currency)?);
    body.push_str(&signature(ctx, "Authorised Signatory"));

    Ok(page(kind.title(), &body))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::autofill::CompanyData;
    use crate::record::{assemble, AnswerMap};
    use crate::templates::DocumentIds;
    use chrono::NaiveDate;

    #[test]
    fn test_kind_selects_number_and_title() {
        let today = NaiveDate::from_ymd_opt(2024, 5, 9).unwrap();
        let ids = DocumentIds::from_parts(today, || 3);
        let mut answers = AnswerMap::new();
        answers.insert("credit_note_number".into(), "CN-7".into());
        let record = assemble(&answers, &[], &[]);
        let company = CompanyData::default();
        let ctx = RenderContext {
            company: &company,
            inputs: &record,
            doc_ids: &ids,
            current_date: today,
        };

        let credit = render(&ctx, NoteKind::Credit).unwrap();
        assert!(credit.contains("CREDIT NOTE"));
        assert!(credit.contains("CN-7"));

        let debit = render(&ctx, NoteKind::Debit).unwrap();
        assert!(debit.contains("DEBIT NOTE"));
        assert!(debit.contains("DN/202405/0309"));
        assert!(!debit.contains("CN-7"));
    }
}
