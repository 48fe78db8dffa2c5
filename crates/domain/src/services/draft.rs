//! Admin content draft.
//!
//! One `ContentDraft` exists per admin session. It holds a working copy of
//! the whole site, collects edits across sections, tracks whether anything
//! is unsaved and commits everything through the gateway in one write. A
//! failed commit keeps every edit so the admin can retry.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use super::gateway::{ContentError, ContentGateway};
use super::image_attachment::{ImageDetacher, ImageTarget};
use super::ordered_list::{ListEditor, ListRecord, OrderedList};
use crate::models::{
    ContentSnapshot, FaqItem, FaqItemField, GalleryItem, GalleryItemField, HeroImage,
    HeroImageField, MenuItem, MenuItemField, SectionValue, StaffField, StaffMember,
};

/// Lifecycle state of a draft.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DraftState {
    Ready,
    Saving,
    SaveFailed,
}

/// What the admin UI needs to render the save bar.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DraftStatus {
    pub dirty: bool,
    pub revision: u64,
    pub state: DraftState,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_saved_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_error: Option<String>,
}

/// One operation on an id-addressed list.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum ListOp<R, F> {
    Append {
        record: Option<R>,
    },
    Update {
        id: String,
        change: F,
    },
    Remove {
        id: String,
    },
    Reorder {
        #[serde(rename = "fromId")]
        from_id: String,
        #[serde(rename = "toId")]
        to_id: Option<String>,
    },
}

/// Reordering or removing pictures inside one gallery item.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum GalleryImageOp {
    Reorder {
        #[serde(rename = "itemId")]
        item_id: String,
        from: usize,
        to: usize,
    },
    Remove {
        #[serde(rename = "itemId")]
        item_id: String,
        index: usize,
    },
}

/// A list edit addressed to one of the draft's lists.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "list", content = "op", rename_all = "camelCase")]
pub enum ListEdit {
    Menu(ListOp<MenuItem, MenuItemField>),
    Staff(ListOp<StaffMember, StaffField>),
    Gallery(ListOp<GalleryItem, GalleryItemField>),
    Faq(ListOp<FaqItem, FaqItemField>),
    HeroImages(ListOp<HeroImage, HeroImageField>),
    GalleryImages(GalleryImageOp),
}

/// Result of applying a [`ListEdit`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "result", rename_all = "camelCase")]
pub enum EditOutcome {
    Appended { id: String },
    Updated,
    Removed,
    Reordered,
    Unchanged,
}

impl EditOutcome {
    pub fn changed(&self) -> bool {
        !matches!(self, EditOutcome::Unchanged)
    }
}

/// Session-scoped working copy of all site content.
#[derive(Debug, Clone)]
pub struct ContentDraft {
    snapshot: ContentSnapshot,
    dirty: bool,
    revision: u64,
    state: DraftState,
    last_saved_at: Option<DateTime<Utc>>,
    last_error: Option<String>,
}

impl ContentDraft {
    /// Starts a clean draft from freshly fetched content.
    pub fn initialize(mut snapshot: ContentSnapshot) -> Self {
        snapshot.site_info.normalize();
        Self {
            snapshot,
            dirty: false,
            revision: 0,
            state: DraftState::Ready,
            last_saved_at: None,
            last_error: None,
        }
    }

    pub fn snapshot(&self) -> &ContentSnapshot {
        &self.snapshot
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn status(&self) -> DraftStatus {
        DraftStatus {
            dirty: self.dirty,
            revision: self.revision,
            state: self.state,
            last_saved_at: self.last_saved_at,
            last_error: self.last_error.clone(),
        }
    }

    fn touch(&mut self) {
        self.dirty = true;
        self.revision += 1;
        if self.state == DraftState::SaveFailed {
            self.state = DraftState::Ready;
        }
    }

    /// Swaps exactly one section and marks the draft dirty.
    pub fn replace_section(&mut self, value: SectionValue) {
        self.snapshot.replace(value);
        self.touch();
    }

    /// Applies a list edit. Pictures owned by removed records are released
    /// through `detacher`.
    pub fn apply(&mut self, edit: ListEdit, detacher: &ImageDetacher) -> EditOutcome {
        let outcome = match edit {
            ListEdit::Menu(op) => run_list_op(&mut self.snapshot.menu, op, detacher),
            ListEdit::Staff(op) => run_list_op(&mut self.snapshot.staff, op, detacher),
            ListEdit::Gallery(op) => run_list_op(&mut self.snapshot.gallery, op, detacher),
            ListEdit::Faq(op) => run_list_op(&mut self.snapshot.faq, op, detacher),
            ListEdit::HeroImages(op) => {
                run_list_op(&mut self.snapshot.site_info.hero_images, op, detacher)
            }
            ListEdit::GalleryImages(op) => self.edit_gallery_images(op, detacher),
        };

        if outcome.changed() {
            self.touch();
        }
        outcome
    }

    fn edit_gallery_images(&mut self, op: GalleryImageOp, detacher: &ImageDetacher) -> EditOutcome {
        match op {
            GalleryImageOp::Reorder { item_id, from, to } => {
                let moved = self
                    .snapshot
                    .gallery
                    .get_mut(&item_id)
                    .map(|item| item.move_image(from, to));
                match moved {
                    Some(true) => EditOutcome::Reordered,
                    _ => EditOutcome::Unchanged,
                }
            }
            GalleryImageOp::Remove { item_id, index } => {
                let removed = self
                    .snapshot
                    .gallery
                    .get_mut(&item_id)
                    .and_then(|item| item.remove_image(index));
                match removed {
                    Some(url) => {
                        detacher.detach(&url);
                        EditOutcome::Removed
                    }
                    None => EditOutcome::Unchanged,
                }
            }
        }
    }

    /// Whether `target` currently exists in the draft.
    pub fn has_image_target(&self, target: &ImageTarget) -> bool {
        match target {
            ImageTarget::Staff { id } => self.snapshot.staff.contains(id),
            ImageTarget::Gallery { id } => self.snapshot.gallery.contains(id),
            ImageTarget::Hero { id: Some(id) } => self.snapshot.site_info.hero_images.contains(id),
            ImageTarget::Hero { id: None } => true,
            ImageTarget::SalonSpace { slot } => {
                *slot < self.snapshot.site_info.salon_space.images.len()
            }
        }
    }

    /// Points `target` at an uploaded picture. Returns false when the target
    /// does not exist.
    pub fn assign_image(&mut self, target: &ImageTarget, url: String) -> bool {
        let info = &mut self.snapshot.site_info;
        let assigned = match target {
            ImageTarget::Staff { id } => match self.snapshot.staff.get_mut(id) {
                Some(member) => {
                    member.apply(StaffField::Image(url));
                    true
                }
                None => false,
            },
            ImageTarget::Gallery { id } => match self.snapshot.gallery.get_mut(id) {
                Some(item) => {
                    item.images.push(url);
                    true
                }
                None => false,
            },
            ImageTarget::Hero { id: Some(id) } => match info.hero_images.get_mut(id) {
                Some(hero) => {
                    hero.apply(HeroImageField::Url(url));
                    true
                }
                None => false,
            },
            ImageTarget::Hero { id: None } => {
                info.hero_images.push(HeroImage {
                    id: Uuid::new_v4().to_string(),
                    url,
                });
                true
            }
            ImageTarget::SalonSpace { slot } => {
                info.salon_space.normalize_slots();
                match info.salon_space.images.get_mut(*slot) {
                    Some(image) => {
                        image.src = url;
                        true
                    }
                    None => false,
                }
            }
        };

        if assigned {
            self.touch();
        }
        assigned
    }

    /// Writes the whole draft through `gateway`.
    ///
    /// On success the draft is clean. On failure nothing in the working copy
    /// changes; the error is recorded in the status and returned.
    pub async fn commit(&mut self, gateway: &dyn ContentGateway) -> Result<(), ContentError> {
        self.state = DraftState::Saving;
        let revision = self.revision;

        let result = match self.snapshot.validate_required() {
            Ok(()) => gateway.save_all(&self.snapshot).await,
            Err(e) => Err(e),
        };

        match result {
            Ok(()) => {
                self.dirty = false;
                self.state = DraftState::Ready;
                self.last_saved_at = Some(Utc::now());
                self.last_error = None;
                info!(revision = revision, "Content draft committed");
                Ok(())
            }
            Err(e) => {
                self.state = DraftState::SaveFailed;
                self.last_error = Some(e.to_string());
                warn!(revision = revision, error = %e, "Content draft commit failed");
                Err(e)
            }
        }
    }
}

fn run_list_op<T: ListRecord>(
    list: &mut OrderedList<T>,
    op: ListOp<T, T::Field>,
    detacher: &ImageDetacher,
) -> EditOutcome {
    let mut editor = ListEditor::new(list, detacher);
    match op {
        ListOp::Append { record } => EditOutcome::Appended {
            id: editor.append(record),
        },
        ListOp::Update { id, change } => {
            if editor.update(&id, change) {
                EditOutcome::Updated
            } else {
                EditOutcome::Unchanged
            }
        }
        ListOp::Remove { id } => match editor.remove(&id) {
            Some(_) => EditOutcome::Removed,
            None => EditOutcome::Unchanged,
        },
        ListOp::Reorder { from_id, to_id } => {
            if editor.reorder(&from_id, to_id.as_deref()) {
                EditOutcome::Reordered
            } else {
                EditOutcome::Unchanged
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{MenuCategory, Section, SiteInfo};
    use crate::services::gateway::MockContentGateway;
    use crate::services::image_attachment::RecordingCleanup;
    use std::sync::Arc;

    fn menu_item(id: &str, name: &str) -> MenuItem {
        MenuItem {
            id: id.to_string(),
            category: MenuCategory::Cut,
            name: name.to_string(),
            price: 4400,
            description: String::new(),
            order: 0,
        }
    }

    fn seeded() -> ContentSnapshot {
        let mut snapshot = ContentSnapshot::default();
        snapshot.menu.push(menu_item("m1", "Cut"));
        snapshot.menu.push(menu_item("m2", "Color"));
        let mut gallery = GalleryItem::template();
        gallery.set_id("g1".into());
        gallery.images = vec![
            "https://cdn.example.com/1.jpg".into(),
            "https://cdn.example.com/2.jpg".into(),
        ];
        snapshot.gallery.push(gallery);
        snapshot
    }

    fn detacher() -> (Arc<RecordingCleanup>, ImageDetacher) {
        let sink = Arc::new(RecordingCleanup::default());
        (sink.clone(), ImageDetacher::new(sink, "/images/"))
    }

    fn edit(json: &str) -> ListEdit {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_initialize_is_clean() {
        let draft = ContentDraft::initialize(seeded());
        let status = draft.status();
        assert!(!status.dirty);
        assert_eq!(status.revision, 0);
        assert_eq!(status.state, DraftState::Ready);
        assert!(status.last_saved_at.is_none());
    }

    #[test]
    fn test_replace_section_marks_dirty_and_touches_one_section() {
        let mut draft = ContentDraft::initialize(seeded());
        let gallery_before = draft.snapshot().gallery.clone();

        draft.replace_section(SectionValue::Menu(OrderedList::default()));

        assert!(draft.is_dirty());
        assert_eq!(draft.status().revision, 1);
        assert!(draft.snapshot().menu.is_empty());
        assert_eq!(draft.snapshot().gallery, gallery_before);
    }

    #[test]
    fn test_apply_wire_format_edits() {
        let (_, detacher) = detacher();
        let mut draft = ContentDraft::initialize(seeded());

        let outcome = draft.apply(
            edit(r#"{"list":"menu","op":{"kind":"update","id":"m2","change":{"field":"price","value":6600}}}"#),
            &detacher,
        );
        assert_eq!(outcome, EditOutcome::Updated);
        assert_eq!(draft.snapshot().menu.get("m2").unwrap().price, 6600);

        let outcome = draft.apply(
            edit(r#"{"list":"menu","op":{"kind":"reorder","fromId":"m2","toId":"m1"}}"#),
            &detacher,
        );
        assert_eq!(outcome, EditOutcome::Reordered);
        let ids: Vec<&str> = draft.snapshot().menu.iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, vec!["m2", "m1"]);

        let outcome = draft.apply(edit(r#"{"list":"faq","op":{"kind":"append"}}"#), &detacher);
        assert!(matches!(outcome, EditOutcome::Appended { .. }));
        assert_eq!(draft.snapshot().faq.len(), 1);
        assert_eq!(draft.status().revision, 3);
    }

    #[test]
    fn test_noop_edit_keeps_draft_clean() {
        let (_, detacher) = detacher();
        let mut draft = ContentDraft::initialize(seeded());

        let outcome = draft.apply(
            edit(r#"{"list":"menu","op":{"kind":"reorder","fromId":"m1","toId":null}}"#),
            &detacher,
        );
        assert_eq!(outcome, EditOutcome::Unchanged);
        let outcome = draft.apply(
            edit(r#"{"list":"staff","op":{"kind":"remove","id":"ghost"}}"#),
            &detacher,
        );
        assert_eq!(outcome, EditOutcome::Unchanged);
        assert!(!draft.is_dirty());
    }

    #[test]
    fn test_gallery_image_edits() {
        let (sink, detacher) = detacher();
        let mut draft = ContentDraft::initialize(seeded());

        let outcome = draft.apply(
            edit(r#"{"list":"galleryImages","op":{"kind":"reorder","itemId":"g1","from":1,"to":0}}"#),
            &detacher,
        );
        assert_eq!(outcome, EditOutcome::Reordered);
        assert_eq!(
            draft.snapshot().gallery.get("g1").unwrap().main_image(),
            Some("https://cdn.example.com/2.jpg")
        );

        let outcome = draft.apply(
            edit(r#"{"list":"galleryImages","op":{"kind":"remove","itemId":"g1","index":1}}"#),
            &detacher,
        );
        assert_eq!(outcome, EditOutcome::Removed);
        assert_eq!(sink.urls(), vec!["https://cdn.example.com/1.jpg"]);
    }

    #[test]
    fn test_gallery_image_reorder_noops() {
        let (_, detacher) = detacher();
        let mut draft = ContentDraft::initialize(seeded());

        for op in [
            r#"{"list":"galleryImages","op":{"kind":"reorder","itemId":"missing","from":1,"to":0}}"#,
            r#"{"list":"galleryImages","op":{"kind":"reorder","itemId":"g1","from":5,"to":0}}"#,
            r#"{"list":"galleryImages","op":{"kind":"reorder","itemId":"g1","from":1,"to":1}}"#,
        ] {
            assert_eq!(draft.apply(edit(op), &detacher), EditOutcome::Unchanged);
        }
        assert!(!draft.is_dirty());
        assert_eq!(
            draft.snapshot().gallery.get("g1").unwrap().main_image(),
            Some("https://cdn.example.com/1.jpg")
        );
    }

    #[test]
    fn test_assign_image_unknown_target() {
        let mut draft = ContentDraft::initialize(seeded());
        let target = ImageTarget::Staff { id: "ghost".into() };

        assert!(!draft.has_image_target(&target));
        assert!(!draft.assign_image(&target, "https://cdn.example.com/x.jpg".into()));
        assert!(!draft.is_dirty());
    }

    #[tokio::test]
    async fn test_commit_success_clears_dirty() {
        let gateway = MockContentGateway::new();
        let mut draft = ContentDraft::initialize(seeded());
        draft.replace_section(SectionValue::SiteInfo(SiteInfo::default()));

        draft.commit(&gateway).await.unwrap();

        let status = draft.status();
        assert!(!status.dirty);
        assert_eq!(status.state, DraftState::Ready);
        assert!(status.last_saved_at.is_some());

        let stored: Vec<String> = gateway.stored().menu.iter().map(|m| m.id.clone()).collect();
        let drafted: Vec<String> = draft.snapshot().menu.iter().map(|m| m.id.clone()).collect();
        assert_eq!(stored, drafted);
    }

    #[tokio::test]
    async fn test_commit_leaves_working_copy_as_sent() {
        let gateway = MockContentGateway::new();
        let mut draft = ContentDraft::initialize(seeded());
        draft.replace_section(SectionValue::SiteInfo(SiteInfo::default()));
        let sent = draft.snapshot().clone();

        draft.commit(&gateway).await.unwrap();

        // Order numbers are assigned on the write path, not in the draft
        assert_eq!(*draft.snapshot(), sent);
        let orders: Vec<i32> = gateway.stored().menu.iter().map(|m| m.order).collect();
        assert_eq!(orders, vec![0, 1]);
    }

    #[tokio::test]
    async fn test_commit_failure_preserves_edits() {
        let gateway = MockContentGateway::failing();
        let (_, detacher) = detacher();
        let mut draft = ContentDraft::initialize(seeded());
        draft.apply(edit(r#"{"list":"menu","op":{"kind":"remove","id":"m1"}}"#), &detacher);
        let edited = draft.snapshot().clone();

        let result = draft.commit(&gateway).await;

        assert!(matches!(result, Err(ContentError::Write(_))));
        assert_eq!(draft.snapshot(), &edited);
        let status = draft.status();
        assert!(status.dirty);
        assert_eq!(status.state, DraftState::SaveFailed);
        assert!(status.last_error.is_some());
    }

    #[tokio::test]
    async fn test_commit_rejects_blank_required_fields() {
        let gateway = MockContentGateway::new();
        let (_, detacher) = detacher();
        let mut draft = ContentDraft::initialize(ContentSnapshot::default());
        draft.apply(edit(r#"{"list":"faq","op":{"kind":"append"}}"#), &detacher);

        let result = draft.commit(&gateway).await;

        assert!(matches!(
            result,
            Err(ContentError::Invalid { section: Section::Faq, .. })
        ));
        assert_eq!(gateway.save_count(), 0);
        assert!(draft.is_dirty());
    }

    #[tokio::test]
    async fn test_edit_after_failed_commit_returns_to_ready() {
        let gateway = MockContentGateway::failing();
        let mut draft = ContentDraft::initialize(seeded());
        draft.replace_section(SectionValue::Faq(OrderedList::default()));
        let _ = draft.commit(&gateway).await;

        draft.replace_section(SectionValue::Staff(OrderedList::default()));
        assert_eq!(draft.status().state, DraftState::Ready);
    }
}
