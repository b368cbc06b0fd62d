//! Pure transition function of the conversation.
//!
//! `apply` never touches storage or the clock. Everything non-deterministic (current
//! time, freshly generated document IDs, cached autofill values) arrives through [`Env`],
//! and writes to the autofill/company stores leave as [`Effect`]s for the caller to run.
//! A rejected event returns an error and leaves the input state untouched.

use chrono::{DateTime, NaiveDate, Utc};

use super::state::{AutofillSuggestion, ChatMessage, ChatState, ChatStep, EditSession, Sender};
use super::validation::{normalize_answer, AnswerValue};
use super::{ChatError, ChatEvent};
use crate::autofill::{AutofillData, CompanyData};
use crate::catalog::{DocumentType, FieldDefinition, FieldType, SelectedTemplate, AUTOFILL_FIELDS, SKIPPED};
use crate::record::{PackingDraft, PackingEntry, Product, ProductDraft};
use crate::sequencer::get_next_valid_index;
use crate::templates::{generate_all, DocumentIds};
use crate::validation::{ValidationError, Validator};

const NEED_DOCUMENTS: &str =
    "Before I can prepare trade documents, please upload your supporting documents.";
const WELCOME: &str = "Hi! I'm your export documentation assistant. I'll ask a few questions \
and prepare ready-to-print trade documents for you.";
const TEMPLATE_PROMPT: &str = "Which documents do you need? Select one or more, then continue.";
const FOLLOW_UP_ACK: &str = "Thanks for your message! Your documents are ready above. \
You can preview, edit or export them at any time.";

/// Inputs the reducer may read besides the state itself.
#[derive(Debug, Clone)]
pub struct Env {
    pub now: DateTime<Utc>,
    /// IDs used if this event triggers a first generation pass.
    pub doc_ids: DocumentIds,
    pub autofill: AutofillData,
    /// Stored company profile, seeded into fresh sessions.
    pub company: CompanyData,
}

impl Env {
    pub fn new(now: DateTime<Utc>, autofill: AutofillData, company: CompanyData) -> Self {
        Self {
            now,
            doc_ids: DocumentIds::generate(now.date_naive()),
            autofill,
            company,
        }
    }

    pub fn today(&self) -> NaiveDate {
        self.now.date_naive()
    }
}

/// Side effect requested by a transition.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Merge-write into the autofill cache.
    SaveAutofill(AutofillData),
    /// Overwrite the stored company profile.
    SaveCompanyData(CompanyData),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    pub state: ChatState,
    pub effects: Vec<Effect>,
}

/// Apply one event.
pub fn apply(state: &ChatState, event: ChatEvent, env: &Env) -> Result<Transition, ChatError> {
    let mut machine = Machine {
        state: state.clone(),
        effects: Vec::new(),
        env,
    };
    machine.handle(event)?;
    Ok(Transition {
        state: machine.state,
        effects: machine.effects,
    })
}

struct Machine<'a> {
    state: ChatState,
    effects: Vec<Effect>,
    env: &'a Env,
}

impl Machine<'_> {
    fn handle(&mut self, event: ChatEvent) -> Result<(), ChatError> {
        let name = event.name();
        if self.state.current_step == ChatStep::Error && !matches!(event, ChatEvent::Restart) {
            return Err(self.wrong_step(name));
        }

        match event {
            ChatEvent::Start { documents_uploaded } => self.start(documents_uploaded),
            ChatEvent::ToggleTemplate { template } => self.toggle_template(name, template),
            ChatEvent::ConfirmTemplates => self.confirm_templates(name),
            ChatEvent::Answer { value } => self.answer(name, &value),
            ChatEvent::UploadFile { data_uri } => self.upload_file(name, &data_uri),
            ChatEvent::Skip => self.skip(name),
            ChatEvent::ConfirmAutofill => self.confirm_autofill(name),
            ChatEvent::AddProduct { product } => self.add_product(name, product),
            ChatEvent::FinishProducts => self.finish_section(name, FieldType::Products),
            ChatEvent::AddPacking { packing } => self.add_packing(name, packing),
            ChatEvent::FinishPacking => self.finish_section(name, FieldType::Packing),
            ChatEvent::FollowUp { message } => self.follow_up(name, &message),
            ChatEvent::Restart => self.restart(name),
            ChatEvent::SelectDocument { index } => self.select_document(name, index),
            ChatEvent::StartEdit => self.start_edit(name),
            ChatEvent::EditAnswer { field, value } => self.edit_answer(name, &field, &value),
            ChatEvent::EditProduct { index, field, value } => {
                let session = self.edit_session(name)?;
                let len = session.products.len();
                session
                    .products
                    .get_mut(index)
                    .ok_or(ChatError::IndexOutOfRange { index, len })?
                    .update(field, &value)?;
                Ok(())
            }
            ChatEvent::AddEditProduct { product } => self.add_edit_product(name, product),
            ChatEvent::RemoveEditProduct { index } => self.remove_edit_product(name, index),
            ChatEvent::EditPacking { index, field, value } => {
                let session = self.edit_session(name)?;
                let product_count = session.products.len();
                let len = session.packing_info.len();
                session
                    .packing_info
                    .get_mut(index)
                    .ok_or(ChatError::IndexOutOfRange { index, len })?
                    .update(field, &value, product_count)?;
                Ok(())
            }
            ChatEvent::AddEditPacking { packing } => self.add_edit_packing(name, packing),
            ChatEvent::RemoveEditPacking { index } => {
                let session = self.edit_session(name)?;
                let len = session.packing_info.len();
                if index >= len {
                    return Err(ChatError::IndexOutOfRange { index, len });
                }
                session.packing_info.remove(index);
                Ok(())
            }
            ChatEvent::SaveEdit => self.save_edit(name),
            ChatEvent::CancelEdit => self.cancel_edit(name),
        }
    }

    // ------------------------------------------------------------------
    // Transcript
    // ------------------------------------------------------------------

    fn push(&mut self, sender: Sender, field: Option<&str>, text: impl Into<String>) {
        let id = self.state.messages.len();
        self.state.messages.push(ChatMessage {
            id,
            sender,
            text: text.into(),
            field: field.map(str::to_string),
            timestamp: self.env.now,
        });
    }

    fn bot(&mut self, text: impl Into<String>) {
        self.push(Sender::Bot, None, text);
    }

    fn user(&mut self, field: &str, text: impl Into<String>) {
        self.push(Sender::User, Some(field), text);
    }

    // ------------------------------------------------------------------
    // Guards
    // ------------------------------------------------------------------

    fn wrong_step(&self, event: &'static str) -> ChatError {
        ChatError::WrongStep {
            event,
            step: self.state.current_step,
        }
    }

    fn expect_step(&self, event: &'static str, step: ChatStep) -> Result<(), ChatError> {
        if self.state.current_step == step {
            Ok(())
        } else {
            Err(self.wrong_step(event))
        }
    }

    /// Question awaiting input, or a step error when none is pending.
    fn pending_question(&self, event: &'static str) -> Result<&'static FieldDefinition, ChatError> {
        self.state.current_field().ok_or_else(|| self.wrong_step(event))
    }

    fn pending_section(&self, event: &'static str, kind: FieldType) -> Result<&'static FieldDefinition, ChatError> {
        let def = self.pending_question(event)?;
        if def.field_type == kind {
            Ok(def)
        } else {
            Err(ValidationError::new(def.field, "The current question is not this section")
                .with_suggestion("Answer the question shown in the chat")
                .into())
        }
    }

    fn edit_session(&mut self, event: &'static str) -> Result<&mut EditSession, ChatError> {
        self.expect_step(event, ChatStep::Completed)?;
        self.state.edit_session.as_mut().ok_or(ChatError::NoEditSession)
    }

    fn next_id(&mut self, prefix: &str) -> String {
        self.state.next_item_id += 1;
        format!("{}-{}", prefix, self.state.next_item_id)
    }

    // ------------------------------------------------------------------
    // Entry and template selection
    // ------------------------------------------------------------------

    fn start(&mut self, documents_uploaded: bool) -> Result<(), ChatError> {
        let step = self.state.current_step;
        if !matches!(step, ChatStep::Loading | ChatStep::NeedDocuments) {
            // A restored conversation simply continues.
            return Ok(());
        }

        self.state.initialized = true;
        self.state.awaiting_input = false;

        if !documents_uploaded {
            if step != ChatStep::NeedDocuments {
                self.bot(NEED_DOCUMENTS);
            }
            self.state.current_step = ChatStep::NeedDocuments;
            return Ok(());
        }

        if self.state.company_data == CompanyData::default() {
            self.state.company_data = self.env.company.clone();
        }
        self.state.current_step = ChatStep::TemplateSelection;
        self.welcome();
        Ok(())
    }

    fn welcome(&mut self) {
        self.bot(WELCOME);
        self.bot(TEMPLATE_PROMPT);
        self.state.show_continue_button = !self.state.selected_templates.is_empty();
    }

    fn toggle_template(&mut self, event: &'static str, template: DocumentType) -> Result<(), ChatError> {
        self.expect_step(event, ChatStep::TemplateSelection)?;
        let selected = &mut self.state.selected_templates;
        match selected.iter().position(|t| t.id == template) {
            Some(position) => {
                selected.remove(position);
            }
            None => selected.push(SelectedTemplate::from(template)),
        }
        self.state.show_continue_button = !self.state.selected_templates.is_empty();
        Ok(())
    }

    fn confirm_templates(&mut self, event: &'static str) -> Result<(), ChatError> {
        self.expect_step(event, ChatStep::TemplateSelection)?;
        if self.state.selected_templates.is_empty() {
            return Err(ValidationError::new("selectedTemplates", "Select at least one document to continue").into());
        }

        let names = self
            .state
            .selected_templates
            .iter()
            .map(|t| t.name.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        self.push(Sender::User, None, format!("I need: {}", names));
        self.bot(format!(
            "Great, let's prepare your {}. I'll ask one question at a time.",
            names
        ));

        self.state.show_continue_button = false;
        self.state.current_step = ChatStep::DataCollection;
        self.state.current_question = 0;
        self.state.awaiting_input = false;
        self.advance();
        Ok(())
    }

    // ------------------------------------------------------------------
    // Data collection
    // ------------------------------------------------------------------

    /// Ask the next askable question, or generate when none is left.
    fn advance(&mut self) {
        let questions = self.state.questions();
        let index = get_next_valid_index(&questions, &self.state.user_inputs, self.state.current_question);
        self.state.current_question = index;
        match questions.get(index) {
            Some(def) => self.ask(def),
            None => self.generate(),
        }
    }

    fn ask(&mut self, def: &'static FieldDefinition) {
        self.state.awaiting_input = true;
        self.state.pending_autofill = None;

        let mut text = def.question.to_string();

        if AUTOFILL_FIELDS.contains(&def.field) && !self.state.user_inputs.contains_key(def.field) {
            if let Some(cached) = self.env.autofill.get(def.field) {
                text.push_str(&format!(
                    "\nI found a saved value: \"{}\". Confirm it or type a new answer.",
                    cached
                ));
                self.state.pending_autofill = Some(AutofillSuggestion {
                    field: def.field.to_string(),
                    value: cached.to_string(),
                });
            }
        }

        if !def.options.is_empty() {
            text.push_str(&format!("\nOptions: {}", def.options.join(", ")));
        }
        match def.field_type {
            FieldType::Products => text.push_str("\nAdd each product, then finish the list."),
            FieldType::Packing => text.push_str("\nAdd packing for each product, then finish the list."),
            _ => {}
        }
        if !def.required {
            text.push_str("\n(Optional, you can skip this.)");
        }

        self.push(Sender::Bot, Some(def.field), text);
    }

    /// Advance past the current question and continue.
    fn move_next(&mut self) {
        self.state.current_question += 1;
        self.state.awaiting_input = false;
        self.state.pending_autofill = None;
        self.advance();
    }

    fn commit(&mut self, def: &'static FieldDefinition, value: String) {
        let shown = if def.field_type == FieldType::File {
            "Uploaded a file".to_string()
        } else {
            value.clone()
        };

        match def.field {
            "company_logo" => self.state.logo_preview = Some(value.clone()),
            "signature" => self.state.signature_preview = Some(value.clone()),
            _ => {}
        }
        if AUTOFILL_FIELDS.contains(&def.field) {
            self.remember_identity(def.field, &value);
        }

        self.state.user_inputs.insert(def.field.to_string(), value);
        self.user(def.field, shown);
        self.move_next();
    }

    fn remember_identity(&mut self, field: &str, value: &str) {
        if value.trim().is_empty() || value == SKIPPED {
            return;
        }
        if let Some(partial) = AutofillData::for_field(field, value) {
            self.effects.push(Effect::SaveAutofill(partial));
        }
        self.state.company_data.apply(field, value);
        self.effects.push(Effect::SaveCompanyData(self.state.company_data.clone()));
    }

    fn skip_current(&mut self, def: &'static FieldDefinition) {
        self.state.user_inputs.insert(def.field.to_string(), SKIPPED.to_string());
        self.user(def.field, "Skipped");
        self.move_next();
    }

    fn answer(&mut self, event: &'static str, raw: &str) -> Result<(), ChatError> {
        let def = self.pending_question(event)?;
        match normalize_answer(def, raw)? {
            AnswerValue::Value(value) => self.commit(def, value),
            AnswerValue::Skip => self.skip_current(def),
        }
        Ok(())
    }

    fn upload_file(&mut self, event: &'static str, data_uri: &str) -> Result<(), ChatError> {
        let def = self.pending_question(event)?;
        if def.field_type != FieldType::File {
            return Err(ValidationError::new(def.field, "This question does not take a file").into());
        }
        self.answer(event, data_uri)
    }

    fn skip(&mut self, event: &'static str) -> Result<(), ChatError> {
        let def = self.pending_question(event)?;
        if def.required {
            return Err(ValidationError::cannot_skip(def.field).into());
        }
        self.skip_current(def);
        Ok(())
    }

    fn confirm_autofill(&mut self, event: &'static str) -> Result<(), ChatError> {
        let def = self.pending_question(event)?;
        let suggestion = self
            .state
            .pending_autofill
            .clone()
            .filter(|s| s.field == def.field)
            .ok_or_else(|| ValidationError::new(def.field, "There is no saved value to confirm"))?;
        self.commit(def, suggestion.value);
        Ok(())
    }

    fn add_product(&mut self, event: &'static str, draft: ProductDraft) -> Result<(), ChatError> {
        self.pending_section(event, FieldType::Products)?;
        draft.validate()?;

        let id = self.next_id("product");
        let product = Product::new(id, draft);
        let summary = format!(
            "Added product {}: {} ({} x {} = {:.2}). Add another or finish the list.",
            self.state.products.len() + 1,
            product.description,
            product.quantity(),
            product.unit_price(),
            product.total_amount()
        );
        self.state.products.push(product);
        self.push(Sender::Bot, Some("products"), summary);
        Ok(())
    }

    fn add_packing(&mut self, event: &'static str, draft: PackingDraft) -> Result<(), ChatError> {
        let def = self.pending_section(event, FieldType::Packing)?;
        draft.validate_for(self.state.products.len())?;

        let id = self.next_id("packing");
        let entry = PackingEntry::new(id, draft);
        let summary = format!(
            "Added packing for product #{}: {} package(s). Add another or finish the list.",
            entry.product_index, entry.number_of_packages
        );
        self.state.packing_info.push(entry);
        self.push(Sender::Bot, Some(def.field), summary);
        Ok(())
    }

    fn finish_section(&mut self, event: &'static str, kind: FieldType) -> Result<(), ChatError> {
        let def = self.pending_section(event, kind)?;
        let count = match kind {
            FieldType::Products => self.state.products.len(),
            _ => self.state.packing_info.len(),
        };
        if def.required && count == 0 {
            return Err(ValidationError::empty_section(def.field).into());
        }
        self.user(def.field, format!("Done, {} item(s) added", count));
        self.move_next();
        Ok(())
    }

    fn generate(&mut self) {
        self.state.current_step = ChatStep::Generating;
        self.state.awaiting_input = false;
        self.state.pending_autofill = None;

        let record = self.state.record();
        match generate_all(
            &self.state.selected_templates,
            &self.state.company_data,
            &record,
            &self.env.doc_ids,
            self.env.today(),
        ) {
            Ok(documents) => {
                let names = documents
                    .iter()
                    .map(|d| d.name.as_str())
                    .collect::<Vec<_>>()
                    .join(", ");
                self.bot(format!(
                    "All set! I generated {} document(s): {}. Preview, edit or export them below.",
                    documents.len(),
                    names
                ));
                self.state.generated_documents = documents;
                self.state.active_doc_index = 0;
                self.state.current_step = ChatStep::Completed;
            }
            Err(e) => {
                self.state.generated_documents.clear();
                self.state.current_step = ChatStep::Error;
                self.bot(format!(
                    "I couldn't generate your documents ({}). Please restart to try again.",
                    e
                ));
            }
        }
    }

    // ------------------------------------------------------------------
    // Completed
    // ------------------------------------------------------------------

    fn follow_up(&mut self, event: &'static str, message: &str) -> Result<(), ChatError> {
        self.expect_step(event, ChatStep::Completed)?;
        let message = message.trim();
        if message.is_empty() {
            return Err(ValidationError::empty_field("message").into());
        }
        self.push(Sender::User, None, message);
        self.bot(FOLLOW_UP_ACK);
        Ok(())
    }

    fn restart(&mut self, event: &'static str) -> Result<(), ChatError> {
        if self.state.is_editing() {
            return Err(ChatError::EditInProgress);
        }
        if matches!(self.state.current_step, ChatStep::Loading | ChatStep::NeedDocuments) {
            return Err(self.wrong_step(event));
        }

        self.state = ChatState {
            initialized: true,
            current_step: ChatStep::TemplateSelection,
            company_data: std::mem::take(&mut self.state.company_data),
            next_item_id: self.state.next_item_id,
            ..ChatState::default()
        };
        self.welcome();
        Ok(())
    }

    fn select_document(&mut self, event: &'static str, index: usize) -> Result<(), ChatError> {
        self.expect_step(event, ChatStep::Completed)?;
        let len = self.state.generated_documents.len();
        if index >= len {
            return Err(ChatError::IndexOutOfRange { index, len });
        }
        self.state.active_doc_index = index;
        Ok(())
    }

    // ------------------------------------------------------------------
    // Edit / regenerate
    // ------------------------------------------------------------------

    fn start_edit(&mut self, event: &'static str) -> Result<(), ChatError> {
        self.expect_step(event, ChatStep::Completed)?;
        if self.state.is_editing() {
            return Err(ChatError::EditInProgress);
        }
        self.state.edit_session = Some(EditSession {
            answers: self.state.user_inputs.clone(),
            products: self.state.products.clone(),
            packing_info: self.state.packing_info.clone(),
        });
        self.bot("Edit mode is on. Change anything you need, then save to regenerate the documents.");
        Ok(())
    }

    fn edit_answer(&mut self, event: &'static str, field: &str, raw: &str) -> Result<(), ChatError> {
        self.edit_session(event)?;
        let def = self
            .state
            .questions()
            .into_iter()
            .find(|def| def.field == field)
            .ok_or_else(|| ValidationError::new(field, "This question is not part of the selected documents"))?;
        let value = match normalize_answer(def, raw)? {
            AnswerValue::Value(value) => value,
            AnswerValue::Skip => SKIPPED.to_string(),
        };
        self.edit_session(event)?.answers.insert(def.field.to_string(), value);
        Ok(())
    }

    fn add_edit_product(&mut self, event: &'static str, draft: ProductDraft) -> Result<(), ChatError> {
        self.edit_session(event)?;
        draft.validate()?;
        let id = self.next_id("product");
        self.edit_session(event)?.products.push(Product::new(id, draft));
        Ok(())
    }

    fn remove_edit_product(&mut self, event: &'static str, index: usize) -> Result<(), ChatError> {
        let session = self.edit_session(event)?;
        let len = session.products.len();
        if index >= len {
            return Err(ChatError::IndexOutOfRange { index, len });
        }
        session.products.remove(index);

        // Packing rows point at products by 1-based position.
        let removed = index + 1;
        session.packing_info.retain(|entry| entry.product_index != removed);
        for entry in &mut session.packing_info {
            if entry.product_index > removed {
                entry.product_index -= 1;
            }
        }
        Ok(())
    }

    fn add_edit_packing(&mut self, event: &'static str, draft: PackingDraft) -> Result<(), ChatError> {
        let product_count = self.edit_session(event)?.products.len();
        draft.validate_for(product_count)?;
        let id = self.next_id("packing");
        self.edit_session(event)?.packing_info.push(PackingEntry::new(id, draft));
        Ok(())
    }

    fn save_edit(&mut self, event: &'static str) -> Result<(), ChatError> {
        let session = self.edit_session(event)?.clone();

        for def in self.state.questions() {
            let empty = match def.field_type {
                FieldType::Products => session.products.is_empty(),
                FieldType::Packing => session.packing_info.is_empty(),
                _ => false,
            };
            if def.required && empty {
                return Err(ValidationError::empty_section(def.field).into());
            }
        }

        self.state.edit_session = None;

        let mut company = self.state.company_data.clone();
        let mut changed = Vec::new();
        for field in AUTOFILL_FIELDS {
            let Some(value) = session.answers.get(field) else {
                continue;
            };
            if value.trim().is_empty() || value == SKIPPED || self.state.user_inputs.get(field) == Some(value) {
                continue;
            }
            company.apply(field, value);
            changed.push((field, value.clone()));
        }

        // Reference numbers stay stable across edits of the same set.
        let doc_ids = self
            .state
            .generated_documents
            .first()
            .map(|doc| doc.props.doc_ids.clone())
            .unwrap_or_else(|| self.env.doc_ids.clone());

        match generate_all(
            &self.state.selected_templates,
            &company,
            &session.record(),
            &doc_ids,
            self.env.today(),
        ) {
            Ok(documents) => {
                self.state.user_inputs = session.answers;
                self.state.logo_preview = self.committed_image("company_logo");
                self.state.signature_preview = self.committed_image("signature");
                self.state.products = session.products;
                self.state.packing_info = session.packing_info;
                self.state.company_data = company;
                if !changed.is_empty() {
                    for (field, value) in &changed {
                        if let Some(partial) = AutofillData::for_field(field, value) {
                            self.effects.push(Effect::SaveAutofill(partial));
                        }
                    }
                    self.effects.push(Effect::SaveCompanyData(self.state.company_data.clone()));
                }
                self.state.active_doc_index = self.state.active_doc_index.min(documents.len().saturating_sub(1));
                self.state.generated_documents = documents;
                self.bot("Your changes are saved and the documents were regenerated.");
            }
            Err(e) => {
                // Committed answers and the previous documents stay as they were.
                self.state.current_step = ChatStep::Error;
                self.bot(format!(
                    "I couldn't regenerate your documents ({}). Please restart to try again.",
                    e
                ));
            }
        }
        Ok(())
    }

    /// Committed data URI for an image question, if it was answered.
    fn committed_image(&self, field: &str) -> Option<String> {
        self.state
            .user_inputs
            .get(field)
            .filter(|value| !value.trim().is_empty() && value.as_str() != SKIPPED)
            .cloned()
    }

    fn cancel_edit(&mut self, event: &'static str) -> Result<(), ChatError> {
        self.edit_session(event)?;
        self.state.edit_session = None;
        self.bot("Edit cancelled. Nothing was changed.");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{PackingField, ProductField};
    use chrono::TimeZone;
    use std::collections::HashMap;

    fn env() -> Env {
        let now = Utc.with_ymd_and_hms(2024, 3, 7, 10, 0, 0).unwrap();
        Env {
            now,
            doc_ids: DocumentIds::from_parts(now.date_naive(), || 42),
            autofill: AutofillData::default(),
            company: CompanyData::default(),
        }
    }

    fn step(state: &ChatState, event: ChatEvent) -> ChatState {
        apply(state, event, &env()).unwrap().state
    }

    fn started() -> ChatState {
        step(&ChatState::default(), ChatEvent::Start { documents_uploaded: true })
    }

    fn collecting(types: &[DocumentType]) -> ChatState {
        let mut state = started();
        for doc in types {
            state = step(&state, ChatEvent::ToggleTemplate { template: *doc });
        }
        step(&state, ChatEvent::ConfirmTemplates)
    }

    fn widget() -> ProductDraft {
        ProductDraft {
            product_code: "P1".into(),
            description: "Widget".into(),
            quantity: 10.0,
            unit_price: 5.0,
            ..Default::default()
        }
    }

    fn invoice_answers() -> HashMap<&'static str, &'static str> {
        HashMap::from([
            ("exporter_company_name", "Acme Exports"),
            ("exporter_address", "12 Harbour Rd"),
            ("exporter_gstin", "27ABCDE1234F1Z5"),
            ("buyer_name", "Globex"),
            ("buyer_address", "1 Main St"),
            ("buyer_country", "USA"),
            ("consignee_same_as_buyer", "Yes"),
            ("currency", "USD"),
            ("incoterms", "FOB"),
            ("payment_terms", "Advance Payment"),
            ("country_of_origin", "India"),
            ("country_of_destination", "USA"),
            ("port_of_loading", "Nhava Sheva"),
            ("port_of_discharge", "New York"),
            ("authorized_signatory", "R. Mehta"),
        ])
    }

    /// Drive data collection to the end: answer from `answers`, skip optional
    /// questions, add one widget and one packing row for the sections.
    fn complete(mut state: ChatState, answers: &HashMap<&str, &str>) -> ChatState {
        while state.current_step == ChatStep::DataCollection {
            let def = state.current_field().expect("a question is pending");
            state = match def.field_type {
                FieldType::Products => {
                    let state = step(&state, ChatEvent::AddProduct { product: widget() });
                    step(&state, ChatEvent::FinishProducts)
                }
                FieldType::Packing => {
                    let state = step(
                        &state,
                        ChatEvent::AddPacking {
                            packing: PackingDraft {
                                product_index: 1,
                                kind_of_packages: "Carton".into(),
                                number_of_packages: 2,
                                net_weight: 20.0,
                                gross_weight: 22.0,
                                ..Default::default()
                            },
                        },
                    );
                    step(&state, ChatEvent::FinishPacking)
                }
                _ => match answers.get(def.field) {
                    Some(value) => step(&state, ChatEvent::Answer { value: value.to_string() }),
                    None if !def.required => step(&state, ChatEvent::Skip),
                    None => panic!("no answer for required field {}", def.field),
                },
            };
        }
        state
    }

    fn completed_invoice() -> ChatState {
        complete(collecting(&[DocumentType::CommercialInvoice]), &invoice_answers())
    }

    #[test]
    fn test_start_without_documents_waits_for_upload() {
        let state = step(&ChatState::default(), ChatEvent::Start { documents_uploaded: false });
        assert_eq!(state.current_step, ChatStep::NeedDocuments);
        assert_eq!(state.messages.len(), 1);

        // Repeated start without documents does not repeat the message.
        let again = step(&state, ChatEvent::Start { documents_uploaded: false });
        assert_eq!(again.messages.len(), 1);

        let ready = step(&again, ChatEvent::Start { documents_uploaded: true });
        assert_eq!(ready.current_step, ChatStep::TemplateSelection);

        let err = apply(&state, ChatEvent::ToggleTemplate { template: DocumentType::PackingList }, &env());
        assert!(matches!(err, Err(ChatError::WrongStep { .. })));
    }

    #[test]
    fn test_start_welcomes_and_seeds_company() {
        let mut env = env();
        env.company.company_name = "Profile Co".into();
        let state = apply(&ChatState::default(), ChatEvent::Start { documents_uploaded: true }, &env)
            .unwrap()
            .state;
        assert_eq!(state.current_step, ChatStep::TemplateSelection);
        assert!(state.initialized);
        assert_eq!(state.messages.len(), 2);
        assert_eq!(state.company_data.company_name, "Profile Co");
        assert!(!state.show_continue_button);

        // Start on a restored session is a no-op.
        assert_eq!(step(&state, ChatEvent::Start { documents_uploaded: true }), state);
    }

    #[test]
    fn test_confirm_requires_a_template() {
        let state = started();
        let result = apply(&state, ChatEvent::ConfirmTemplates, &env());
        assert!(matches!(result, Err(ChatError::Validation(_))));

        let toggled = step(&state, ChatEvent::ToggleTemplate { template: DocumentType::CommercialInvoice });
        assert!(toggled.show_continue_button);
        let untoggled = step(&toggled, ChatEvent::ToggleTemplate { template: DocumentType::CommercialInvoice });
        assert!(untoggled.selected_templates.is_empty());
        assert!(!untoggled.show_continue_button);
    }

    #[test]
    fn test_confirm_asks_the_first_question() {
        let state = collecting(&[DocumentType::CommercialInvoice]);
        assert_eq!(state.current_step, ChatStep::DataCollection);
        assert_eq!(state.current_question, 0);
        assert!(state.awaiting_input);
        let last = state.messages.last().unwrap();
        assert_eq!(last.field.as_deref(), Some("exporter_company_name"));
    }

    #[test]
    fn test_scenario_single_invoice_generates_fifty() {
        let state = completed_invoice();
        assert_eq!(state.current_step, ChatStep::Completed);
        assert_eq!(state.generated_documents.len(), 1);

        let doc = &state.generated_documents[0];
        assert_eq!(doc.id, DocumentType::CommercialInvoice);
        assert_eq!(doc.props.inputs.total_amount, 50.0);
        assert_eq!(doc.props.doc_ids.invoice, "INV/202403/4207");
        let html = doc.render().unwrap().html;
        assert!(html.contains("USD 50.00"));
    }

    #[test]
    fn test_required_blank_answer_does_not_advance() {
        let state = collecting(&[DocumentType::CommercialInvoice]);
        let result = apply(&state, ChatEvent::Answer { value: "   ".into() }, &env());
        match result {
            Err(ChatError::Validation(errors)) => {
                assert_eq!(errors.errors()[0].field, "exporter_company_name");
            }
            other => panic!("expected validation error, got {:?}", other),
        }

        let next = step(&state, ChatEvent::Answer { value: "Acme".into() });
        assert_eq!(next.current_question, state.current_question + 1);
        assert_eq!(next.user_inputs.get("exporter_company_name").map(String::as_str), Some("Acme"));
    }

    #[test]
    fn test_skip_semantics() {
        let state = collecting(&[DocumentType::CommercialInvoice]);
        assert!(matches!(
            apply(&state, ChatEvent::Skip, &env()),
            Err(ChatError::Validation(_))
        ));

        let mut state = state;
        for value in ["Acme", "12 Harbour Rd", "27ABCDE1234F1Z5"] {
            state = step(&state, ChatEvent::Answer { value: value.into() });
        }
        assert_eq!(state.current_field().unwrap().field, "exporter_iec");
        let skipped = step(&state, ChatEvent::Skip);
        assert_eq!(skipped.user_inputs.get("exporter_iec").map(String::as_str), Some(SKIPPED));
        assert_eq!(skipped.current_question, state.current_question + 1);
    }

    #[test]
    fn test_typed_skip_marker_cannot_bypass_required_field() {
        let state = collecting(&[DocumentType::CommercialInvoice]);
        let result = apply(&state, ChatEvent::Answer { value: SKIPPED.into() }, &env());
        match result {
            Err(ChatError::Validation(errors)) => {
                assert_eq!(errors.errors()[0].field, "exporter_company_name");
            }
            other => panic!("expected validation error, got {:?}", other),
        }

        // Nothing reached the answer map or the identity stores.
        let mut state = state;
        for value in ["Acme", "12 Harbour Rd", "27ABCDE1234F1Z5"] {
            state = step(&state, ChatEvent::Answer { value: value.into() });
        }
        let transition = apply(&state, ChatEvent::Answer { value: SKIPPED.into() }, &env()).unwrap();
        assert_eq!(
            transition.state.user_inputs.get("exporter_iec").map(String::as_str),
            Some(SKIPPED)
        );
        assert!(transition.effects.is_empty());
    }

    #[test]
    fn test_unmet_condition_is_bypassed() {
        let answers = invoice_answers();
        let mut state = collecting(&[DocumentType::CommercialInvoice]);
        while state.current_field().map(|d| d.field) != Some("consignee_same_as_buyer") {
            let def = state.current_field().unwrap();
            state = match answers.get(def.field) {
                Some(v) => step(&state, ChatEvent::Answer { value: v.to_string() }),
                None => step(&state, ChatEvent::Skip),
            };
        }
        let next = step(&state, ChatEvent::Answer { value: "yes".into() });
        assert_eq!(next.current_field().unwrap().field, "currency");
        assert!(!next.user_inputs.contains_key("consignee_name"));

        let asked = step(&state, ChatEvent::Answer { value: "No".into() });
        assert_eq!(asked.current_field().unwrap().field, "consignee_name");
    }

    #[test]
    fn test_autofill_requires_confirmation() {
        let mut env = env();
        env.autofill.exporter_company_name = Some("Cached Exports".into());
        let mut state = apply(&ChatState::default(), ChatEvent::Start { documents_uploaded: true }, &env)
            .unwrap()
            .state;
        state = apply(&state, ChatEvent::ToggleTemplate { template: DocumentType::PackingList }, &env)
            .unwrap()
            .state;
        state = apply(&state, ChatEvent::ConfirmTemplates, &env).unwrap().state;

        assert!(state.messages.last().unwrap().text.contains("Cached Exports"));
        assert!(!state.user_inputs.contains_key("exporter_company_name"));
        assert_eq!(state.current_question, 0);

        let confirmed = apply(&state, ChatEvent::ConfirmAutofill, &env).unwrap();
        assert_eq!(
            confirmed.state.user_inputs.get("exporter_company_name").map(String::as_str),
            Some("Cached Exports")
        );
        assert_eq!(confirmed.state.current_question, 1);

        // Typing a new value overrides the suggestion.
        let typed = apply(&state, ChatEvent::Answer { value: "New Name".into() }, &env).unwrap();
        assert_eq!(
            typed.state.user_inputs.get("exporter_company_name").map(String::as_str),
            Some("New Name")
        );

        // Nothing to confirm on the next question.
        assert!(apply(&confirmed.state, ChatEvent::ConfirmAutofill, &env).is_err());
    }

    #[test]
    fn test_identity_answers_emit_store_effects() {
        let state = collecting(&[DocumentType::CommercialInvoice]);
        let transition = apply(&state, ChatEvent::Answer { value: "Acme".into() }, &env()).unwrap();
        assert_eq!(
            transition.effects,
            vec![
                Effect::SaveAutofill(AutofillData {
                    exporter_company_name: Some("Acme".into()),
                    ..Default::default()
                }),
                Effect::SaveCompanyData(CompanyData {
                    company_name: "Acme".into(),
                    ..Default::default()
                }),
            ]
        );
        assert_eq!(transition.state.company_data.company_name, "Acme");

        let buyer = apply(&transition.state, ChatEvent::Answer { value: "x".into() }, &env()).unwrap();
        assert_eq!(buyer.effects.len(), 2);
    }

    #[test]
    fn test_products_section_rules() {
        let answers = invoice_answers();
        let mut state = collecting(&[DocumentType::CommercialInvoice]);
        while state.current_field().map(|d| d.field_type) != Some(FieldType::Products) {
            let def = state.current_field().unwrap();
            state = match answers.get(def.field) {
                Some(v) => step(&state, ChatEvent::Answer { value: v.to_string() }),
                None => step(&state, ChatEvent::Skip),
            };
        }

        assert!(matches!(
            apply(&state, ChatEvent::FinishProducts, &env()),
            Err(ChatError::Validation(_))
        ));
        assert!(apply(&state, ChatEvent::Answer { value: "Widget".into() }, &env()).is_err());
        assert!(apply(&state, ChatEvent::FinishPacking, &env()).is_err());

        let mut bad = widget();
        bad.description.clear();
        assert!(apply(&state, ChatEvent::AddProduct { product: bad }, &env()).is_err());

        let added = step(&state, ChatEvent::AddProduct { product: widget() });
        let added = step(&added, ChatEvent::AddProduct { product: widget() });
        assert_eq!(added.current_question, state.current_question);
        assert_eq!(added.products[0].id, "product-1");
        assert_eq!(added.products[1].id, "product-2");

        let finished = step(&added, ChatEvent::FinishProducts);
        assert_eq!(finished.current_question, state.current_question + 1);
        // The list is closed once finished.
        assert!(apply(&finished, ChatEvent::AddProduct { product: widget() }, &env()).is_err());
    }

    #[test]
    fn test_packing_checks_product_reference() {
        let mut answers = invoice_answers();
        answers.remove("port_of_loading");
        let mut state = collecting(&[DocumentType::PackingList]);
        while state.current_field().map(|d| d.field_type) != Some(FieldType::Packing) {
            let def = state.current_field().unwrap();
            state = match def.field_type {
                FieldType::Products => {
                    let s = step(&state, ChatEvent::AddProduct { product: widget() });
                    step(&s, ChatEvent::FinishProducts)
                }
                _ => match answers.get(def.field) {
                    Some(v) => step(&state, ChatEvent::Answer { value: v.to_string() }),
                    None if !def.required => step(&state, ChatEvent::Skip),
                    None => step(&state, ChatEvent::Answer { value: "Somewhere".into() }),
                },
            };
        }

        let bad = PackingDraft {
            product_index: 2,
            number_of_packages: 1,
            ..Default::default()
        };
        assert!(apply(&state, ChatEvent::AddPacking { packing: bad }, &env()).is_err());
    }

    #[test]
    fn test_generation_failure_leaves_no_documents() {
        let mut state = collecting(&[DocumentType::CommercialInvoice]);
        state.user_inputs = invoice_answers()
            .into_iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        state.products = vec![Product::new(
            "product-1",
            ProductDraft {
                description: "Broken".into(),
                quantity: f64::INFINITY,
                unit_price: 1.0,
                ..Default::default()
            },
        )];
        let questions = state.questions();
        state.current_question = questions.iter().position(|d| d.field == "signature").unwrap();

        let failed = step(&state, ChatEvent::Skip);
        assert_eq!(failed.current_step, ChatStep::Error);
        assert!(failed.generated_documents.is_empty());

        // Error absorbs everything but restart.
        assert!(apply(&failed, ChatEvent::FollowUp { message: "hi".into() }, &env()).is_err());
        let restarted = step(&failed, ChatEvent::Restart);
        assert_eq!(restarted.current_step, ChatStep::TemplateSelection);
        assert!(restarted.user_inputs.is_empty());
    }

    #[test]
    fn test_follow_up_gets_static_reply() {
        let state = completed_invoice();
        let next = step(&state, ChatEvent::FollowUp { message: "Thanks!".into() });
        assert_eq!(next.messages.len(), state.messages.len() + 2);
        assert_eq!(next.messages.last().unwrap().text, FOLLOW_UP_ACK);
        assert!(apply(&state, ChatEvent::FollowUp { message: " ".into() }, &env()).is_err());
    }

    #[test]
    fn test_select_document_bounds() {
        let state = completed_invoice();
        assert_eq!(
            apply(&state, ChatEvent::SelectDocument { index: 1 }, &env()).unwrap_err(),
            ChatError::IndexOutOfRange { index: 1, len: 1 }
        );
        assert_eq!(step(&state, ChatEvent::SelectDocument { index: 0 }).active_doc_index, 0);
    }

    #[test]
    fn test_edit_save_regenerates_with_same_ids() {
        let state = completed_invoice();
        let editing = step(&state, ChatEvent::StartEdit);
        assert!(matches!(
            apply(&editing, ChatEvent::StartEdit, &env()),
            Err(ChatError::EditInProgress)
        ));
        assert!(matches!(
            apply(&editing, ChatEvent::Restart, &env()),
            Err(ChatError::EditInProgress)
        ));

        let edited = step(
            &editing,
            ChatEvent::EditProduct {
                index: 0,
                field: ProductField::Quantity,
                value: "4".into(),
            },
        );
        // Committed data is untouched until save.
        assert_eq!(edited.products[0].total_amount(), 50.0);
        assert_eq!(edited.edit_session.as_ref().unwrap().products[0].total_amount(), 20.0);

        let mut env = env();
        env.doc_ids = DocumentIds::from_parts(env.today(), || 7);
        let saved = apply(&edited, ChatEvent::SaveEdit, &env).unwrap().state;
        assert!(saved.edit_session.is_none());
        assert_eq!(saved.products[0].total_amount(), 20.0);
        assert_eq!(saved.generated_documents[0].props.inputs.total_amount, 20.0);
        assert_eq!(saved.generated_documents[0].props.doc_ids.invoice, "INV/202403/4207");
    }

    #[test]
    fn test_edit_save_refreshes_image_previews() {
        let state = completed_invoice();
        assert_eq!(state.logo_preview, None);

        let logo = "data:image/png;base64,AA==";
        let signature = "data:image/jpeg;base64,BB==";
        let mut editing = step(&state, ChatEvent::StartEdit);
        for (field, value) in [("company_logo", logo), ("signature", signature)] {
            editing = step(
                &editing,
                ChatEvent::EditAnswer {
                    field: field.into(),
                    value: value.into(),
                },
            );
        }
        // Previews follow committed data only.
        assert_eq!(editing.logo_preview, None);

        let saved = step(&editing, ChatEvent::SaveEdit);
        assert_eq!(saved.logo_preview.as_deref(), Some(logo));
        assert_eq!(saved.signature_preview.as_deref(), Some(signature));

        let mut editing = step(&saved, ChatEvent::StartEdit);
        editing = step(
            &editing,
            ChatEvent::EditAnswer {
                field: "company_logo".into(),
                value: String::new(),
            },
        );
        let cleared = step(&editing, ChatEvent::SaveEdit);
        assert_eq!(cleared.logo_preview, None);
        assert_eq!(cleared.signature_preview.as_deref(), Some(signature));
    }

    #[test]
    fn test_edit_cancel_discards_changes() {
        let state = completed_invoice();
        let editing = step(&state, ChatEvent::StartEdit);
        let edited = step(
            &editing,
            ChatEvent::EditAnswer {
                field: "buyer_name".into(),
                value: "Initech".into(),
            },
        );
        let cancelled = step(&edited, ChatEvent::CancelEdit);
        assert_eq!(cancelled.user_inputs, state.user_inputs);
        assert_eq!(cancelled.generated_documents, state.generated_documents);
        assert!(matches!(
            apply(&cancelled, ChatEvent::CancelEdit, &env()),
            Err(ChatError::NoEditSession)
        ));
    }

    #[test]
    fn test_edit_answer_validates_against_selected_questions() {
        let editing = step(&completed_invoice(), ChatEvent::StartEdit);
        assert!(apply(
            &editing,
            ChatEvent::EditAnswer {
                field: "bl_number".into(),
                value: "X".into()
            },
            &env()
        )
        .is_err());
        assert!(apply(
            &editing,
            ChatEvent::EditAnswer {
                field: "buyer_name".into(),
                value: "".into()
            },
            &env()
        )
        .is_err());
        let skipped = step(
            &editing,
            ChatEvent::EditAnswer {
                field: "invoice_number".into(),
                value: "".into(),
            },
        );
        assert_eq!(
            skipped.edit_session.unwrap().answers.get("invoice_number").map(String::as_str),
            Some(SKIPPED)
        );
    }

    #[test]
    fn test_edit_save_rejects_empty_required_section() {
        let editing = step(&completed_invoice(), ChatEvent::StartEdit);
        let emptied = step(&editing, ChatEvent::RemoveEditProduct { index: 0 });
        assert!(matches!(
            apply(&emptied, ChatEvent::SaveEdit, &env()),
            Err(ChatError::Validation(_))
        ));
    }

    #[test]
    fn test_removing_product_reindexes_packing() {
        let mut answers = invoice_answers();
        answers.insert("invoice_number", "EXP-1");
        let state = complete(collecting(&[DocumentType::PackingList]), &answers);
        assert_eq!(state.current_step, ChatStep::Completed);

        let mut editing = step(&state, ChatEvent::StartEdit);
        editing = step(&editing, ChatEvent::AddEditProduct { product: widget() });
        editing = step(
            &editing,
            ChatEvent::AddEditPacking {
                packing: PackingDraft {
                    product_index: 2,
                    number_of_packages: 5,
                    ..Default::default()
                },
            },
        );
        editing = step(&editing, ChatEvent::RemoveEditProduct { index: 0 });

        let session = editing.edit_session.as_ref().unwrap();
        assert_eq!(session.products.len(), 1);
        assert_eq!(session.packing_info.len(), 1);
        assert_eq!(session.packing_info[0].product_index, 1);
        assert_eq!(session.packing_info[0].number_of_packages, 5);

        let edited = step(
            &editing,
            ChatEvent::EditPacking {
                index: 0,
                field: PackingField::NumberOfPackages,
                value: "6".into(),
            },
        );
        assert_eq!(edited.edit_session.unwrap().packing_info[0].number_of_packages, 6);
    }

    #[test]
    fn test_edit_regenerate_failure_keeps_previous_documents() {
        let state = completed_invoice();
        let mut editing = step(&state, ChatEvent::StartEdit);
        editing.edit_session.as_mut().unwrap().products[0] = Product::new(
            "product-9",
            ProductDraft {
                description: "Broken".into(),
                quantity: f64::NAN,
                unit_price: 1.0,
                ..Default::default()
            },
        );

        let failed = step(&editing, ChatEvent::SaveEdit);
        assert_eq!(failed.current_step, ChatStep::Error);
        assert!(failed.edit_session.is_none());
        assert_eq!(failed.generated_documents, state.generated_documents);
        assert_eq!(failed.products, state.products);
    }

    #[test]
    fn test_identity_edits_emit_effects_on_save() {
        let editing = step(&completed_invoice(), ChatEvent::StartEdit);
        let edited = step(
            &editing,
            ChatEvent::EditAnswer {
                field: "exporter_address".into(),
                value: "99 New Rd".into(),
            },
        );
        let saved = apply(&edited, ChatEvent::SaveEdit, &env()).unwrap();
        assert!(saved.effects.contains(&Effect::SaveAutofill(AutofillData {
            exporter_address: Some("99 New Rd".into()),
            ..Default::default()
        })));
        assert_eq!(saved.state.company_data.comp_reg_address, "99 New Rd");
    }

    #[test]
    fn test_rejected_event_leaves_state_untouched() {
        let state = collecting(&[DocumentType::CommercialInvoice]);
        let before = state.clone();
        let _ = apply(&state, ChatEvent::Answer { value: String::new() }, &env());
        assert_eq!(state, before);
    }
}
