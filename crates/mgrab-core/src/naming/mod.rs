//! Display-name derivation for a transfer.
//!
//! Locators may carry a trailing JSON metadata segment naming the file and
//! its MIME type; that name wins when present. Otherwise the name stem is
//! the transfer identity. The extension always follows the transfer's
//! current mime extension, which can be refined mid-transfer from the
//! server's content type.

mod metadata;
mod sanitize;

pub use metadata::{parse_locator_metadata, LocatorMetadata};
pub use sanitize::sanitize_file_name;

use crate::identity::TransferIdentity;

/// Stem (file name without extension) for a transfer's display name.
///
/// Prefers the metadata-embedded file name, sanitized and stripped of its
/// own extension; falls back to the identity hash. Malformed or absent
/// metadata is not an error.
pub fn display_stem(locator: &str, identity: &TransferIdentity) -> String {
    let from_metadata = parse_locator_metadata(locator)
        .and_then(|m| m.file_name)
        .map(|name| sanitize_file_name(strip_extension(&name)))
        .filter(|s| !s.is_empty());

    from_metadata.unwrap_or_else(|| identity.as_str().to_string())
}

/// Joins a stem and extension into a display name.
pub fn display_name(stem: &str, extension: &str) -> String {
    format!("{}.{}", stem, extension)
}

/// Drops a trailing `.ext` when it looks like a real extension (1–5
/// alphanumeric chars). "video.2024" keeps nothing it shouldn't.
fn strip_extension(name: &str) -> &str {
    match name.rsplit_once('.') {
        Some((stem, ext))
            if !stem.is_empty()
                && (1..=5).contains(&ext.len())
                && ext.chars().all(|c| c.is_ascii_alphanumeric()) =>
        {
            stem
        }
        _ => name,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(locator: &str) -> TransferIdentity {
        TransferIdentity::of(locator)
    }

    #[test]
    fn stem_from_metadata_file_name() {
        let locator = "https://example.com/stream/%7B%22fileName%22%3A%22holiday.mp4%22%7D";
        assert_eq!(display_stem(locator, &id(locator)), "holiday");
    }

    #[test]
    fn stem_falls_back_to_identity() {
        let locator = "https://example.com/media/42";
        assert_eq!(display_stem(locator, &id(locator)), id(locator).as_str());
    }

    #[test]
    fn malformed_metadata_falls_back() {
        let locator = "https://example.com/stream/%7Bnot-json";
        assert_eq!(display_stem(locator, &id(locator)), id(locator).as_str());
    }

    #[test]
    fn hostile_metadata_name_sanitized() {
        let locator =
            "https://example.com/stream/%7B%22fileName%22%3A%22..%2F..%2Fetc%2Fpasswd%22%7D";
        let stem = display_stem(locator, &id(locator));
        assert!(!stem.contains('/'));
        assert!(!stem.starts_with('.'));
    }

    #[test]
    fn display_name_joins() {
        assert_eq!(display_name("holiday", "mp4"), "holiday.mp4");
    }

    #[test]
    fn strip_extension_cases() {
        assert_eq!(strip_extension("movie.mp4"), "movie");
        assert_eq!(strip_extension("archive.tar"), "archive");
        assert_eq!(strip_extension("no_extension"), "no_extension");
        assert_eq!(strip_extension(".hidden"), ".hidden");
        assert_eq!(strip_extension("weird.longextension"), "weird.longextension");
    }
}
