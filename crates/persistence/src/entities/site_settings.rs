//! Site settings entity (database row mapping).

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use sqlx::FromRow;
use tracing::warn;

use domain::models::SiteInfo;

/// Database row mapping for the site_settings table.
#[derive(Debug, Clone, FromRow)]
pub struct SiteSettingsEntity {
    pub id: i64,
    pub singleton_key: String,
    pub hero_images: Option<serde_json::Value>,
    pub concept: Option<serde_json::Value>,
    pub access: Option<serde_json::Value>,
    pub salon_space: Option<serde_json::Value>,
    pub metadata: Option<serde_json::Value>,
    pub updated_at: DateTime<Utc>,
}

/// Decodes one JSON block, keeping `fallback` when the column is NULL or
/// does not match the expected shape.
fn block<T: DeserializeOwned>(column: &str, value: Option<serde_json::Value>, fallback: T) -> T {
    match value {
        None | Some(serde_json::Value::Null) => fallback,
        Some(raw) => serde_json::from_value(raw).unwrap_or_else(|e| {
            warn!(column = column, error = %e, "Malformed site settings block, using default");
            fallback
        }),
    }
}

impl From<SiteSettingsEntity> for SiteInfo {
    fn from(entity: SiteSettingsEntity) -> Self {
        let defaults = SiteInfo::default();
        let mut info = SiteInfo {
            hero_images: block("hero_images", entity.hero_images, defaults.hero_images),
            concept: block("concept", entity.concept, defaults.concept),
            access: block("access", entity.access, defaults.access),
            salon_space: block("salon_space", entity.salon_space, defaults.salon_space),
            metadata: block("metadata", entity.metadata, defaults.metadata),
        };
        info.normalize();
        info
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain::models::site_info::DEFAULT_SALON_NAME;
    use serde_json::json;

    fn entity() -> SiteSettingsEntity {
        SiteSettingsEntity {
            id: 1,
            singleton_key: "default".to_string(),
            hero_images: None,
            concept: None,
            access: None,
            salon_space: None,
            metadata: None,
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_null_columns_fall_back_per_block() {
        let mut row = entity();
        row.concept = Some(json!({
            "title": "Beauty",
            "subtitle": "for you",
            "description": "A quiet salon."
        }));

        let info: SiteInfo = row.into();
        assert_eq!(info.concept.title, "Beauty");
        assert_eq!(info.access.salon_name, DEFAULT_SALON_NAME);
        assert_eq!(info.salon_space.images.len(), 3);
    }

    #[test]
    fn test_malformed_block_falls_back() {
        let mut row = entity();
        row.access = Some(json!("not an object"));
        row.hero_images = Some(json!([{ "id": "h1", "url": "https://cdn.example.com/h.jpg" }]));

        let info: SiteInfo = row.into();
        assert_eq!(info.access.salon_name, DEFAULT_SALON_NAME);
        assert_eq!(info.hero_images.len(), 1);
    }

    #[test]
    fn test_salon_space_is_padded_on_read() {
        let mut row = entity();
        row.salon_space = Some(json!({
            "title": "Inside",
            "description": "",
            "images": [{ "src": "https://cdn.example.com/1.jpg", "alt": "Chair" }]
        }));

        let info: SiteInfo = row.into();
        assert_eq!(info.salon_space.title, "Inside");
        assert_eq!(info.salon_space.images.len(), 3);
        assert_eq!(info.salon_space.images[0].alt, "Chair");
    }
}
