//! Common validation utilities.

use lazy_static::lazy_static;
use regex::Regex;
use validator::ValidationError;

/// Image content types accepted by the upload endpoint.
pub const ALLOWED_IMAGE_CONTENT_TYPES: [&str; 4] =
    ["image/jpeg", "image/png", "image/gif", "image/webp"];

/// Maximum length of the stem kept from an uploaded file name.
const MAX_STEM_LEN: usize = 48;

lazy_static! {
    static ref UNSAFE_STEM_CHARS: Regex = Regex::new(r"[^a-z0-9_-]+").unwrap();
    static ref REPEATED_DASHES: Regex = Regex::new(r"-{2,}").unwrap();
}

/// Normalizes a `Content-Type` header value (drops parameters, lowercases).
pub fn normalize_content_type(raw: &str) -> String {
    raw.split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase()
}

/// Returns true if the content type is on the image allow-list.
pub fn is_allowed_image_type(content_type: &str) -> bool {
    let normalized = normalize_content_type(content_type);
    ALLOWED_IMAGE_CONTENT_TYPES.contains(&normalized.as_str())
}

/// File extension used when storing an image of the given content type.
pub fn image_extension(content_type: &str) -> Option<&'static str> {
    match normalize_content_type(content_type).as_str() {
        "image/jpeg" => Some("jpg"),
        "image/png" => Some("png"),
        "image/gif" => Some("gif"),
        "image/webp" => Some("webp"),
        _ => None,
    }
}

/// Validates an upload content type against the allow-list.
pub fn validate_image_content_type(content_type: &str) -> Result<(), ValidationError> {
    if is_allowed_image_type(content_type) {
        Ok(())
    } else {
        let mut err = ValidationError::new("content_type");
        err.message = Some("Only JPEG, PNG, GIF and WebP images are accepted".into());
        Err(err)
    }
}

/// Reduces an uploaded file name to a safe storage key stem.
///
/// The extension is dropped (it is derived from the content type instead);
/// everything outside `[a-z0-9_-]` collapses to a single dash. Names that
/// sanitize to nothing become `image`.
pub fn sanitize_file_stem(file_name: &str) -> String {
    let base = file_name.rsplit(['/', '\\']).next().unwrap_or_default();
    let stem = match base.rfind('.') {
        Some(idx) if idx > 0 => &base[..idx],
        _ => base,
    };

    let lowered = stem.to_lowercase();
    let replaced = UNSAFE_STEM_CHARS.replace_all(&lowered, "-");
    let collapsed = REPEATED_DASHES.replace_all(&replaced, "-");
    let trimmed: String = collapsed
        .trim_matches('-')
        .chars()
        .take(MAX_STEM_LEN)
        .collect();

    if trimmed.is_empty() {
        "image".to_string()
    } else {
        trimmed
    }
}

/// Validates that a required text field is not blank.
pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut err = ValidationError::new("required");
        err.message = Some("Field must not be blank".into());
        Err(err)
    } else {
        Ok(())
    }
}
