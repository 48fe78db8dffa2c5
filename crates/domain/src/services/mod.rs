//! Domain services for admin content editing.

pub mod draft;
pub mod gateway;
pub mod image_attachment;
pub mod ordered_list;

pub use draft::{
    ContentDraft, DraftState, DraftStatus, EditOutcome, GalleryImageOp, ListEdit, ListOp,
};
pub use gateway::{ContentError, ContentGateway, MockContentGateway};
pub use image_attachment::{
    ImageAttachment, ImageCleanup, ImageDetacher, ImageTarget, ImageUpload, MockObjectStorage,
    ObjectStorage, RecordingCleanup, StorageError, UploadError,
};
pub use ordered_list::{move_item, ListEditor, ListRecord, OrderedList};
