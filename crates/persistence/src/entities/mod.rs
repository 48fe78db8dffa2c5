//! Database entity definitions.
//!
//! Entities are direct mappings to database rows.

pub mod faq_item;
pub mod gallery_item;
pub mod menu_item;
pub mod site_settings;
pub mod staff;

pub use faq_item::FaqItemEntity;
pub use gallery_item::GalleryItemEntity;
pub use menu_item::MenuItemEntity;
pub use site_settings::SiteSettingsEntity;
pub use staff::StaffEntity;
