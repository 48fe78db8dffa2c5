//! Staff member domain model.

use serde::{Deserialize, Serialize};
use validator::Validate;

use super::PLACEHOLDER_IMAGE;
use crate::services::ordered_list::ListRecord;

/// A stylist or other staff member shown on the site.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct StaffMember {
    #[serde(default)]
    pub id: String,

    #[validate(custom(function = "shared::validation::validate_not_blank"))]
    pub name: String,

    #[validate(custom(function = "shared::validation::validate_not_blank"))]
    pub role: String,

    /// Role label in Japanese, shown under the English role.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role_ja: Option<String>,

    #[validate(custom(function = "shared::validation::validate_not_blank"))]
    pub image: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    #[serde(default)]
    pub order: i32,
}

/// Single-field change to a staff member.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "field", content = "value", rename_all = "camelCase")]
pub enum StaffField {
    Name(String),
    Role(String),
    RoleJa(Option<String>),
    Image(String),
    Message(Option<String>),
}

impl ListRecord for StaffMember {
    type Field = StaffField;

    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }

    fn set_order(&mut self, order: i32) {
        self.order = order;
    }

    fn apply(&mut self, field: StaffField) {
        match field {
            StaffField::Name(name) => self.name = name,
            StaffField::Role(role) => self.role = role,
            StaffField::RoleJa(role_ja) => self.role_ja = role_ja,
            StaffField::Image(image) => self.image = image,
            StaffField::Message(message) => self.message = message,
        }
    }

    fn image_urls(&self) -> Vec<&str> {
        vec![self.image.as_str()]
    }

    fn template() -> Self {
        Self {
            id: String::new(),
            name: "New Staff".to_string(),
            role: "Stylist".to_string(),
            role_ja: None,
            image: PLACEHOLDER_IMAGE.to_string(),
            message: None,
            order: 0,
        }
    }
}
