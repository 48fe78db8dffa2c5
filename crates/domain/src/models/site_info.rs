//! Site-wide settings: hero carousel, concept copy, access details and the
//! salon space showcase.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::services::ordered_list::{ListRecord, OrderedList};

/// Number of picture slots in the salon space showcase.
pub const SALON_SPACE_SLOTS: usize = 3;

/// Salon name shown until the admin saves settings for the first time.
pub const DEFAULT_SALON_NAME: &str = "Hairmake Lucias";

/// Section heading of the salon space showcase until the admin changes it.
pub const DEFAULT_SALON_SPACE_TITLE: &str = "Salon Space";

/// One picture in the hero carousel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeroImage {
    #[serde(default)]
    pub id: String,
    pub url: String,
}

/// Single-field change to a hero image.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "field", content = "value", rename_all = "camelCase")]
pub enum HeroImageField {
    Url(String),
}

impl ListRecord for HeroImage {
    type Field = HeroImageField;

    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }

    fn apply(&mut self, field: HeroImageField) {
        match field {
            HeroImageField::Url(url) => self.url = url,
        }
    }

    fn image_urls(&self) -> Vec<&str> {
        vec![self.url.as_str()]
    }

    fn template() -> Self {
        Self {
            id: String::new(),
            url: String::new(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Concept {
    pub title: String,
    pub subtitle: String,
    pub description: String,
}

/// Opening hours as free text, e.g. "10:00 - 20:00".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenHours {
    pub weekday: String,
    pub weekend: String,
    pub close: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_entry: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct Access {
    #[validate(custom(function = "shared::validation::validate_not_blank"))]
    pub salon_name: String,
    pub postal_code: String,
    pub address: String,
    pub tel: String,
    pub open: OpenHours,
    pub reservation_url: String,
    /// Category names offered in the menu editor's picker.
    pub menu_categories: Vec<String>,
}

impl Default for Access {
    fn default() -> Self {
        Self {
            salon_name: DEFAULT_SALON_NAME.to_string(),
            postal_code: String::new(),
            address: String::new(),
            tel: String::new(),
            open: OpenHours::default(),
            reservation_url: String::new(),
            menu_categories: ["Cut", "Color", "Perm", "Treatment", "Spa", "Other"]
                .iter()
                .map(|c| c.to_string())
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpaceImage {
    pub src: String,
    pub alt: String,
}

/// The salon space showcase. Always holds exactly [`SALON_SPACE_SLOTS`]
/// picture slots once normalized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SalonSpace {
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub images: Vec<SpaceImage>,
}

impl SalonSpace {
    /// Pads with empty slots or drops extras so exactly three remain.
    pub fn normalize_slots(&mut self) {
        self.images.resize_with(SALON_SPACE_SLOTS, SpaceImage::default);
    }
}

impl Default for SalonSpace {
    fn default() -> Self {
        let mut space = Self {
            title: DEFAULT_SALON_SPACE_TITLE.to_string(),
            description: String::new(),
            images: Vec::new(),
        };
        space.normalize_slots();
        space
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteMetadata {
    pub description: String,
}

/// Singleton site settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteInfo {
    #[serde(default)]
    pub hero_images: OrderedList<HeroImage>,
    #[serde(default)]
    pub concept: Concept,
    #[serde(default)]
    pub access: Access,
    #[serde(default)]
    pub salon_space: SalonSpace,
    #[serde(default)]
    pub metadata: SiteMetadata,
}

impl SiteInfo {
    /// Brings the settings into canonical shape after a read or replace.
    pub fn normalize(&mut self) {
        self.salon_space.normalize_slots();
    }
}
