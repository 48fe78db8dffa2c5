//! Content models for the salon site.

/// Bundled picture used by freshly added staff members and gallery items.
pub const PLACEHOLDER_IMAGE: &str = "/images/hero.png";

pub mod faq;
pub mod gallery;
pub mod menu;
pub mod site_info;
pub mod snapshot;
pub mod staff;

pub use faq::{FaqItem, FaqItemField};
pub use gallery::{GalleryItem, GalleryItemField};
pub use menu::{MenuCategory, MenuItem, MenuItemField};
pub use site_info::{
    Access, Concept, HeroImage, HeroImageField, OpenHours, SalonSpace, SiteInfo, SiteMetadata,
    SpaceImage, SALON_SPACE_SLOTS,
};
pub use snapshot::{ContentSnapshot, Section, SectionValue};
pub use staff::{StaffField, StaffMember};
