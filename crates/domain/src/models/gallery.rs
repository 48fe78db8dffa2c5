//! Gallery item domain model.

use serde::{Deserialize, Serialize};
use validator::Validate;

use super::PLACEHOLDER_IMAGE;
use crate::services::ordered_list::{move_item, ListRecord};

/// A styled look in the gallery. The first entry of `images` is the main
/// picture.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct GalleryItem {
    #[serde(default)]
    pub id: String,

    #[validate(custom(function = "shared::validation::validate_not_blank"))]
    pub title: String,

    #[serde(default)]
    pub description: String,

    #[serde(default)]
    pub images: Vec<String>,

    /// Single-image field from before galleries held several pictures.
    /// Only read; `images` is authoritative.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,

    #[serde(default)]
    pub order: i32,
}

impl GalleryItem {
    /// Lifts the legacy single image into `images` when the list is empty.
    pub fn adopt_legacy_image(&mut self) {
        if self.images.is_empty() {
            if let Some(legacy) = self.image.as_deref().filter(|url| !url.is_empty()) {
                self.images.push(legacy.to_string());
            }
        }
    }

    /// The main picture, if any.
    pub fn main_image(&self) -> Option<&str> {
        self.images.first().map(String::as_str)
    }

    /// Moves one picture within `images`. Returns false for out-of-range or
    /// identical indices.
    pub fn move_image(&mut self, from: usize, to: usize) -> bool {
        move_item(&mut self.images, from, to)
    }

    /// Removes and returns the picture at `index`.
    pub fn remove_image(&mut self, index: usize) -> Option<String> {
        (index < self.images.len()).then(|| self.images.remove(index))
    }
}

/// Single-field change to a gallery item.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "field", content = "value", rename_all = "camelCase")]
pub enum GalleryItemField {
    Title(String),
    Description(String),
    Category(Option<String>),
}

impl ListRecord for GalleryItem {
    type Field = GalleryItemField;

    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }

    fn set_order(&mut self, order: i32) {
        self.order = order;
    }

    fn apply(&mut self, field: GalleryItemField) {
        match field {
            GalleryItemField::Title(title) => self.title = title,
            GalleryItemField::Description(description) => self.description = description,
            GalleryItemField::Category(category) => self.category = category,
        }
    }

    fn image_urls(&self) -> Vec<&str> {
        let mut urls: Vec<&str> = self.images.iter().map(String::as_str).collect();
        if let Some(legacy) = self.image.as_deref() {
            if !urls.contains(&legacy) {
                urls.push(legacy);
            }
        }
        urls
    }

    fn template() -> Self {
        Self {
            id: String::new(),
            title: "New Style".to_string(),
            description: String::new(),
            images: vec![PLACEHOLDER_IMAGE.to_string()],
            image: None,
            category: None,
            order: 0,
        }
    }
}
