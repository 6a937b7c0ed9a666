//! Shared key generation for storage backends.

use chrono::Utc;
use iris_core::constants::IMAGE_KEY_PREFIX;

const FALLBACK_FILENAME: &str = "upload";

/// Generate the storage key for a new upload: `images/{epoch_ms}-{filename}`.
///
/// Two uploads of the same filename within one millisecond share a key; the
/// later write wins.
pub fn generate_image_key(filename: &str) -> String {
    generate_image_key_at(Utc::now().timestamp_millis(), filename)
}

pub(crate) fn generate_image_key_at(epoch_ms: i64, filename: &str) -> String {
    format!("{}/{}-{}", IMAGE_KEY_PREFIX, epoch_ms, base_name(filename))
}

/// Final path component of a client-supplied filename.
fn base_name(filename: &str) -> &str {
    let name = filename
        .rsplit(&['/', '\\'][..])
        .next()
        .unwrap_or(filename)
        .trim();
    if name.is_empty() || name == "." || name == ".." {
        FALLBACK_FILENAME
    } else {
        name
    }
}
