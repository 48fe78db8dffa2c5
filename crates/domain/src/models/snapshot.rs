//! Whole-site content snapshot.
//!
//! A `ContentSnapshot` is what the gateway reads, what an admin draft edits
//! and what a commit writes back in one transaction.

use serde::{Deserialize, Serialize};
use validator::Validate;

use super::{FaqItem, GalleryItem, MenuItem, SiteInfo, StaffMember};
use crate::services::gateway::ContentError;
use crate::services::ordered_list::{ListRecord, OrderedList};

/// The five independently stored content sections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Section {
    Menu,
    Staff,
    Gallery,
    Faq,
    SiteInfo,
}

impl Section {
    pub const ALL: [Section; 5] = [
        Section::Menu,
        Section::Staff,
        Section::Gallery,
        Section::Faq,
        Section::SiteInfo,
    ];

    /// Label used in logs and metric labels.
    pub fn as_str(&self) -> &'static str {
        match self {
            Section::Menu => "menu",
            Section::Staff => "staff",
            Section::Gallery => "gallery",
            Section::Faq => "faq",
            Section::SiteInfo => "siteInfo",
        }
    }
}

impl std::fmt::Display for Section {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Replacement value for exactly one section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "section", content = "value", rename_all = "camelCase")]
pub enum SectionValue {
    Menu(OrderedList<MenuItem>),
    Staff(OrderedList<StaffMember>),
    Gallery(OrderedList<GalleryItem>),
    Faq(OrderedList<FaqItem>),
    SiteInfo(SiteInfo),
}

impl SectionValue {
    pub fn section(&self) -> Section {
        match self {
            SectionValue::Menu(_) => Section::Menu,
            SectionValue::Staff(_) => Section::Staff,
            SectionValue::Gallery(_) => Section::Gallery,
            SectionValue::Faq(_) => Section::Faq,
            SectionValue::SiteInfo(_) => Section::SiteInfo,
        }
    }
}

/// All site content at one point in time.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentSnapshot {
    #[serde(default)]
    pub menu: OrderedList<MenuItem>,
    #[serde(default)]
    pub staff: OrderedList<StaffMember>,
    #[serde(default)]
    pub gallery: OrderedList<GalleryItem>,
    #[serde(default)]
    pub faq: OrderedList<FaqItem>,
    #[serde(default)]
    pub site_info: SiteInfo,
}

impl ContentSnapshot {
    /// Swaps one section for a new value.
    pub fn replace(&mut self, value: SectionValue) {
        match value {
            SectionValue::Menu(menu) => self.menu = menu,
            SectionValue::Staff(staff) => self.staff = staff,
            SectionValue::Gallery(gallery) => self.gallery = gallery,
            SectionValue::Faq(faq) => self.faq = faq,
            SectionValue::SiteInfo(mut info) => {
                info.normalize();
                self.site_info = info;
            }
        }
    }

    /// Clones one section out of the snapshot.
    pub fn section(&self, section: Section) -> SectionValue {
        match section {
            Section::Menu => SectionValue::Menu(self.menu.clone()),
            Section::Staff => SectionValue::Staff(self.staff.clone()),
            Section::Gallery => SectionValue::Gallery(self.gallery.clone()),
            Section::Faq => SectionValue::Faq(self.faq.clone()),
            Section::SiteInfo => SectionValue::SiteInfo(self.site_info.clone()),
        }
    }

    /// Checks required fields across every section before a write.
    pub fn validate_required(&self) -> Result<(), ContentError> {
        check_records(Section::Menu, &self.menu)?;
        check_records(Section::Staff, &self.staff)?;
        check_records(Section::Gallery, &self.gallery)?;
        check_records(Section::Faq, &self.faq)?;

        self.site_info
            .access
            .validate()
            .map_err(|e| ContentError::Invalid {
                section: Section::SiteInfo,
                message: e.to_string(),
            })
    }
}

fn check_records<T>(section: Section, list: &OrderedList<T>) -> Result<(), ContentError>
where
    T: ListRecord + Validate,
{
    for (index, record) in list.iter().enumerate() {
        record.validate().map_err(|e| ContentError::Invalid {
            section,
            message: format!("item {} ({}): {}", index, record.id(), e),
        })?;
    }
    Ok(())
}
