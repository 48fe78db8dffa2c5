//! Menu item domain model.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::services::ordered_list::ListRecord;

/// Menu category. The six preset categories are known; anything else the
/// admin types is kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum MenuCategory {
    #[default]
    Cut,
    Color,
    Perm,
    Treatment,
    Spa,
    Other,
    Custom(String),
}

impl MenuCategory {
    /// Preset categories in display order.
    pub const PRESETS: [MenuCategory; 6] = [
        MenuCategory::Cut,
        MenuCategory::Color,
        MenuCategory::Perm,
        MenuCategory::Treatment,
        MenuCategory::Spa,
        MenuCategory::Other,
    ];

    /// Converts to database string representation.
    pub fn as_str(&self) -> &str {
        match self {
            MenuCategory::Cut => "Cut",
            MenuCategory::Color => "Color",
            MenuCategory::Perm => "Perm",
            MenuCategory::Treatment => "Treatment",
            MenuCategory::Spa => "Spa",
            MenuCategory::Other => "Other",
            MenuCategory::Custom(value) => value,
        }
    }

    /// Returns true for one of the preset categories.
    pub fn is_preset(&self) -> bool {
        !matches!(self, MenuCategory::Custom(_))
    }
}

impl From<String> for MenuCategory {
    fn from(value: String) -> Self {
        match value.as_str() {
            "Cut" => MenuCategory::Cut,
            "Color" => MenuCategory::Color,
            "Perm" => MenuCategory::Perm,
            "Treatment" => MenuCategory::Treatment,
            "Spa" => MenuCategory::Spa,
            "Other" => MenuCategory::Other,
            _ => MenuCategory::Custom(value),
        }
    }
}

impl From<MenuCategory> for String {
    fn from(category: MenuCategory) -> Self {
        match category {
            MenuCategory::Custom(value) => value,
            preset => preset.as_str().to_string(),
        }
    }
}

impl std::fmt::Display for MenuCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A priced service on the salon menu.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct MenuItem {
    #[serde(default)]
    pub id: String,

    pub category: MenuCategory,

    #[validate(custom(function = "shared::validation::validate_not_blank"))]
    pub name: String,

    /// Price in the smallest currency unit.
    #[validate(range(min = 0, message = "Price must be non-negative"))]
    pub price: i32,

    #[serde(default)]
    pub description: String,

    #[serde(default)]
    pub order: i32,
}

/// Single-field change to a menu item.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "field", content = "value", rename_all = "camelCase")]
pub enum MenuItemField {
    Category(MenuCategory),
    Name(String),
    Price(i32),
    Description(String),
}

impl ListRecord for MenuItem {
    type Field = MenuItemField;

    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }

    fn set_order(&mut self, order: i32) {
        self.order = order;
    }

    fn apply(&mut self, field: MenuItemField) {
        match field {
            MenuItemField::Category(category) => self.category = category,
            MenuItemField::Name(name) => self.name = name,
            MenuItemField::Price(price) => self.price = price,
            MenuItemField::Description(description) => self.description = description,
        }
    }

    fn template() -> Self {
        Self {
            id: String::new(),
            category: MenuCategory::Cut,
            name: "New Menu".to_string(),
            price: 0,
            description: String::new(),
            order: 0,
        }
    }
}
