//! Conversation state machine for the document wizard.
//!
//! [`machine::apply`] is a pure `(state, event, env) -> state` step. The impure parts
//! (loading, persisting, autofill writes) live in [`session::ChatSessionService`].

pub mod event;
pub mod machine;
pub mod routes;
pub mod session;
pub mod state;
pub mod validation;

pub use event::ChatEvent;
pub use machine::{apply, Effect, Env, Transition};
pub use session::ChatSessionService;
pub use state::{ChatMessage, ChatState, ChatStep, EditSession, Sender};

use thiserror::Error;

use crate::validation::{ValidationError, ValidationErrors};

#[derive(Debug, Error, PartialEq)]
pub enum ChatError {
    #[error("{0}")]
    Validation(ValidationErrors),
    #[error("'{event}' is not allowed in the '{step}' step")]
    WrongStep { event: &'static str, step: ChatStep },
    #[error("an edit session is already open; save or cancel it first")]
    EditInProgress,
    #[error("no edit session is open")]
    NoEditSession,
    #[error("index {index} is out of range for {len} item(s)")]
    IndexOutOfRange { index: usize, len: usize },
}

impl From<ValidationError> for ChatError {
    fn from(error: ValidationError) -> Self {
        ChatError::Validation(error.into())
    }
}

impl From<ValidationErrors> for ChatError {
    fn from(errors: ValidationErrors) -> Self {
        ChatError::Validation(errors)
    }
}
