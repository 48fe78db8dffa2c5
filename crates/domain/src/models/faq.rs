//! FAQ entry domain model.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::services::ordered_list::ListRecord;

/// A question and answer pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct FaqItem {
    #[serde(default)]
    pub id: String,

    #[validate(custom(function = "shared::validation::validate_not_blank"))]
    pub question: String,

    #[validate(custom(function = "shared::validation::validate_not_blank"))]
    pub answer: String,

    #[serde(default)]
    pub order: i32,
}

/// Single-field change to an FAQ entry.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "field", content = "value", rename_all = "camelCase")]
pub enum FaqItemField {
    Question(String),
    Answer(String),
}

impl ListRecord for FaqItem {
    type Field = FaqItemField;

    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }

    fn set_order(&mut self, order: i32) {
        self.order = order;
    }

    fn apply(&mut self, field: FaqItemField) {
        match field {
            FaqItemField::Question(question) => self.question = question,
            FaqItemField::Answer(answer) => self.answer = answer,
        }
    }

    // Both fields start blank and must be filled before a commit validates.
    fn template() -> Self {
        Self {
            id: String::new(),
            question: String::new(),
            answer: String::new(),
            order: 0,
        }
    }
}
