//! Menu item entity (database row mapping).

use sqlx::FromRow;

use domain::models::{MenuCategory, MenuItem};

/// Database row mapping for the menu_items table.
#[derive(Debug, Clone, FromRow)]
pub struct MenuItemEntity {
    pub id: i64,
    pub item_key: String,
    pub category: String,
    pub name: String,
    pub price: i32,
    pub description: Option<String>,
    pub order: i32,
}

impl From<MenuItemEntity> for MenuItem {
    fn from(entity: MenuItemEntity) -> Self {
        Self {
            id: entity.item_key,
            category: MenuCategory::from(entity.category),
            name: entity.name,
            price: entity.price,
            description: entity.description.unwrap_or_default(),
            order: entity.order,
        }
    }
}
