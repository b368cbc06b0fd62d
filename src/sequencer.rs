//! Question sequencer.
//!
//! Turns a template selection into one flat, de-duplicated question list and walks it,
//! bypassing questions whose visibility condition does not hold.

use std::collections::HashSet;

use crate::catalog::{FieldDefinition, SelectedTemplate, COMMON_FIELDS};
use crate::record::AnswerMap;

/// Merge the catalog for the selected templates.
///
/// Common fields come first, then each template's own fields in selection order.
/// A key already seen is skipped, so the first occurrence wins. An empty selection
/// yields an empty list.
pub fn get_questions(selected: &[SelectedTemplate]) -> Vec<&'static FieldDefinition> {
    if selected.is_empty() {
        return Vec::new();
    }

    let mut seen = HashSet::new();
    let mut questions = Vec::new();

    let type_fields = selected.iter().flat_map(|template| template.id.fields().iter());
    for def in COMMON_FIELDS.iter().chain(type_fields) {
        if seen.insert(def.field) {
            questions.push(def);
        }
    }

    questions
}

/// Whether `def` should be asked given the answers collected so far.
pub fn is_condition_met(def: &FieldDefinition, answers: &AnswerMap) -> bool {
    match def.condition {
        None => true,
        Some(cond) => answers.get(cond.field).map(String::as_str) == Some(cond.value),
    }
}

/// Index of the first askable question at or after `from`, or `questions.len()` when
/// nothing is left to ask.
pub fn get_next_valid_index(
    questions: &[&'static FieldDefinition],
    answers: &AnswerMap,
    from: usize,
) -> usize {
    (from..questions.len())
        .find(|&index| is_condition_met(questions[index], answers))
        .unwrap_or(questions.len())
}
