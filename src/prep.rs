//! Interview-preparation question lookup.

use crate::store::{PrepQuestion, RecordStore};

/// Returns prep questions, optionally narrowed to one category. The category
/// comparison is case-insensitive; an unknown category simply yields nothing.
pub fn prep_questions(store: &RecordStore, category: Option<&str>) -> Vec<PrepQuestion> {
    let questions = store.prep_questions();
    match category {
        Some(category) => questions
            .into_iter()
            .filter(|question| question.category.eq_ignore_ascii_case(category.trim()))
            .collect(),
        None => questions,
    }
}
