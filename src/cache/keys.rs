//! Cache key derivation.
//!
//! All keys are plain strings built from the logical identity of the cached
//! data. Prefix helpers end with the separator so that `home` never matches
//! keys belonging to `homepage`.

use sha2::{Digest, Sha256};

const TEXT_NAMESPACE: &str = "texts";
const IMAGE_NAMESPACE: &str = "images";

/// Key for the texts of one page in one language.
pub fn text_key(page: &str, lang: &str) -> String {
    format!("{TEXT_NAMESPACE}:{page}:{lang}")
}

/// Prefix shared by every language of one page.
pub fn text_page_prefix(page: &str) -> String {
    format!("{TEXT_NAMESPACE}:{page}:")
}

/// Key for the image list of one image type.
pub fn image_key(image_type: &str) -> String {
    format!("{IMAGE_NAMESPACE}:{image_type}")
}

/// Prefix shared by every image type.
pub fn image_prefix() -> String {
    format!("{IMAGE_NAMESPACE}:")
}

/// File stem for a rendered page: hex SHA-256 of `path:lang`.
pub fn page_file_stem(path: &str, lang: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(path.as_bytes());
    hasher.update(b":");
    hasher.update(lang.as_bytes());
    hex::encode(hasher.finalize())
}
