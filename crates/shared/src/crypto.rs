//! Random-suffix helpers for object storage keys.

use rand::{distributions::Alphanumeric, Rng};

/// Length of the random suffix appended to uploaded object names.
pub const OBJECT_SUFFIX_LEN: usize = 12;

/// Generates a random alphanumeric suffix of the given length.
pub fn random_suffix(len: usize) -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(len)
        .map(char::from)
        .collect::<String>()
        .to_lowercase()
}

/// Builds a storage key of the form `<stem>-<suffix>.<ext>`.
///
/// The stem is already sanitized by the caller. Two uploads with the same file
/// name never collide because the suffix is random.
pub fn object_key(stem: &str, extension: &str) -> String {
    format!("{}-{}.{}", stem, random_suffix(OBJECT_SUFFIX_LEN), extension)
}
