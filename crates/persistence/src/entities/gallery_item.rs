//! Gallery item entity (database row mapping).

use sqlx::types::Json;
use sqlx::FromRow;

use domain::models::GalleryItem;

/// Database row mapping for the gallery_items table.
#[derive(Debug, Clone, FromRow)]
pub struct GalleryItemEntity {
    pub id: i64,
    pub item_key: String,
    pub title: String,
    pub description: Option<String>,
    pub images: Json<Vec<String>>,
    pub image: Option<String>,
    pub category: Option<String>,
    pub order: i32,
}

impl From<GalleryItemEntity> for GalleryItem {
    fn from(entity: GalleryItemEntity) -> Self {
        let images = entity.images.0;
        // The single-image column only matters for rows written before
        // `images` existed.
        let legacy = if images.is_empty() { entity.image } else { None };

        let mut item = Self {
            id: entity.item_key,
            title: entity.title,
            description: entity.description.unwrap_or_default(),
            images,
            image: legacy,
            category: entity.category,
            order: entity.order,
        };
        item.adopt_legacy_image();
        item
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entity(images: Vec<&str>, image: Option<&str>) -> GalleryItemEntity {
        GalleryItemEntity {
            id: 1,
            item_key: "g".to_string(),
            title: "Short Bob".to_string(),
            description: None,
            images: Json(images.into_iter().map(String::from).collect()),
            image: image.map(String::from),
            category: None,
            order: 0,
        }
    }

    #[test]
    fn test_legacy_row_gets_images() {
        let item: GalleryItem = entity(vec![], Some("https://cdn.example.com/old.jpg")).into();
        assert_eq!(item.images, vec!["https://cdn.example.com/old.jpg"]);
    }

    #[test]
    fn test_current_row_hides_main_image_column() {
        let item: GalleryItem = entity(
            vec!["https://cdn.example.com/a.jpg", "https://cdn.example.com/b.jpg"],
            Some("https://cdn.example.com/a.jpg"),
        )
        .into();
        assert_eq!(item.images.len(), 2);
        assert!(item.image.is_none());
        assert_eq!(item.description, "");
    }

    #[test]
    fn test_row_without_any_image() {
        let item: GalleryItem = entity(vec![], None).into();
        assert!(item.images.is_empty());
        assert!(item.image.is_none());
    }
}
