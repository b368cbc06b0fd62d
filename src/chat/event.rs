use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::catalog::DocumentType;
use crate::record::{PackingDraft, PackingField, ProductDraft, ProductField};

/// User action applied to a conversation.
///
/// Indices of products and packing entries inside an edit session are 0-based;
/// `PackingDraft::product_index` stays 1-based like the rest of the record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ChatEvent {
    Start {
        #[serde(default = "default_true")]
        documents_uploaded: bool,
    },
    ToggleTemplate {
        template: DocumentType,
    },
    ConfirmTemplates,
    Answer {
        value: String,
    },
    Skip,
    ConfirmAutofill,
    AddProduct {
        product: ProductDraft,
    },
    FinishProducts,
    AddPacking {
        packing: PackingDraft,
    },
    FinishPacking,
    UploadFile {
        data_uri: String,
    },
    FollowUp {
        message: String,
    },
    Restart,
    SelectDocument {
        index: usize,
    },
    StartEdit,
    EditAnswer {
        field: String,
        value: String,
    },
    EditProduct {
        index: usize,
        field: ProductField,
        value: String,
    },
    AddEditProduct {
        product: ProductDraft,
    },
    RemoveEditProduct {
        index: usize,
    },
    EditPacking {
        index: usize,
        field: PackingField,
        value: String,
    },
    AddEditPacking {
        packing: PackingDraft,
    },
    RemoveEditPacking {
        index: usize,
    },
    SaveEdit,
    CancelEdit,
}

fn default_true() -> bool {
    true
}

impl ChatEvent {
    /// Event name used in logs and conflict messages.
    pub fn name(&self) -> &'static str {
        match self {
            ChatEvent::Start { .. } => "start",
            ChatEvent::ToggleTemplate { .. } => "toggle_template",
            ChatEvent::ConfirmTemplates => "confirm_templates",
            ChatEvent::Answer { .. } => "answer",
            ChatEvent::Skip => "skip",
            ChatEvent::ConfirmAutofill => "confirm_autofill",
            ChatEvent::AddProduct { .. } => "add_product",
            ChatEvent::FinishProducts => "finish_products",
            ChatEvent::AddPacking { .. } => "add_packing",
            ChatEvent::FinishPacking => "finish_packing",
            ChatEvent::UploadFile { .. } => "upload_file",
            ChatEvent::FollowUp { .. } => "follow_up",
            ChatEvent::Restart => "restart",
            ChatEvent::SelectDocument { .. } => "select_document",
            ChatEvent::StartEdit => "start_edit",
            ChatEvent::EditAnswer { .. } => "edit_answer",
            ChatEvent::EditProduct { .. } => "edit_product",
            ChatEvent::AddEditProduct { .. } => "add_edit_product",
            ChatEvent::RemoveEditProduct { .. } => "remove_edit_product",
            ChatEvent::EditPacking { .. } => "edit_packing",
            ChatEvent::AddEditPacking { .. } => "add_edit_packing",
            ChatEvent::RemoveEditPacking { .. } => "remove_edit_packing",
            ChatEvent::SaveEdit => "save_edit",
            ChatEvent::CancelEdit => "cancel_edit",
        }
    }
}
