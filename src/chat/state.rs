//! Conversation snapshot. This is exactly what gets persisted per user.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::autofill::CompanyData;
use crate::catalog::{FieldDefinition, SelectedTemplate};
use crate::record::{assemble, AnswerMap, DocumentRecord, PackingEntry, Product};
use crate::sequencer::get_questions;
use crate::templates::GeneratedDocument;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ChatStep {
    #[default]
    Loading,
    NeedDocuments,
    TemplateSelection,
    DataCollection,
    Generating,
    Completed,
    Error,
}

impl ChatStep {
    pub fn as_str(self) -> &'static str {
        match self {
            ChatStep::Loading => "loading",
            ChatStep::NeedDocuments => "need_documents",
            ChatStep::TemplateSelection => "template_selection",
            ChatStep::DataCollection => "data_collection",
            ChatStep::Generating => "generating",
            ChatStep::Completed => "completed",
            ChatStep::Error => "error",
        }
    }
}

impl fmt::Display for ChatStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    Bot,
    User,
}

/// One transcript entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ChatMessage {
    pub id: usize,
    pub sender: Sender,
    pub text: String,
    /// Question key the message belongs to, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    pub timestamp: DateTime<Utc>,
}

/// Cached value offered for the question currently awaiting input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct AutofillSuggestion {
    pub field: String,
    pub value: String,
}

/// Editable copy of the committed answers, products and packing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditSession {
    pub answers: AnswerMap,
    pub products: Vec<Product>,
    pub packing_info: Vec<PackingEntry>,
}

impl EditSession {
    pub fn record(&self) -> DocumentRecord {
        assemble(&self.answers, &self.products, &self.packing_info)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatState {
    #[serde(default)]
    pub messages: Vec<ChatMessage>,
    #[serde(default)]
    pub current_step: ChatStep,
    #[serde(default)]
    pub initialized: bool,
    #[serde(default)]
    pub selected_templates: Vec<SelectedTemplate>,
    #[serde(default)]
    pub company_data: CompanyData,
    #[serde(default)]
    pub user_inputs: AnswerMap,
    /// Progress index into the merged question list.
    #[serde(default)]
    pub current_question: usize,
    #[serde(default)]
    pub awaiting_input: bool,
    #[serde(default)]
    pub generated_documents: Vec<GeneratedDocument>,
    #[serde(default)]
    pub active_doc_index: usize,
    #[serde(default)]
    pub show_continue_button: bool,
    #[serde(default)]
    pub products: Vec<Product>,
    #[serde(default)]
    pub packing_info: Vec<PackingEntry>,
    #[serde(default)]
    pub logo_preview: Option<String>,
    #[serde(default)]
    pub signature_preview: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pending_autofill: Option<AutofillSuggestion>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub edit_session: Option<EditSession>,
    /// Source of product and packing IDs; never reused within a session.
    #[serde(default)]
    pub next_item_id: u64,
}

impl ChatState {
    pub fn questions(&self) -> Vec<&'static FieldDefinition> {
        get_questions(&self.selected_templates)
    }

    /// Question at the progress index while one is awaiting input.
    pub fn current_field(&self) -> Option<&'static FieldDefinition> {
        if !self.awaiting_input || self.current_step != ChatStep::DataCollection {
            return None;
        }
        self.questions().get(self.current_question).copied()
    }

    /// Document-data record of the committed state, rebuilt on every call.
    pub fn record(&self) -> DocumentRecord {
        assemble(&self.user_inputs, &self.products, &self.packing_info)
    }

    pub fn is_editing(&self) -> bool {
        self.edit_session.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_uses_camel_case_keys() {
        let json = serde_json::to_value(ChatState::default()).unwrap();
        for key in [
            "messages",
            "currentStep",
            "initialized",
            "selectedTemplates",
            "companyData",
            "userInputs",
            "currentQuestion",
            "awaitingInput",
            "generatedDocuments",
            "activeDocIndex",
            "showContinueButton",
            "products",
            "packingInfo",
            "logoPreview",
            "signaturePreview",
        ] {
            assert!(json.get(key).is_some(), "missing {}", key);
        }
        assert_eq!(json["currentStep"], "loading");
    }

    #[test]
    fn test_partial_snapshot_fills_defaults() {
        let state: ChatState = serde_json::from_str(r#"{"currentStep":"template_selection"}"#).unwrap();
        assert_eq!(state.current_step, ChatStep::TemplateSelection);
        assert!(state.messages.is_empty());
        assert!(state.edit_session.is_none());
    }
}
