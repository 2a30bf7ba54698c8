//! Locator-embedded metadata (trailing JSON path segment).
//!
//! Stream locators commonly end in a percent-encoded JSON object such as
//! `{"fileName":"clip.mp4","mimeType":"video/mp4","size":2048}`. Anything
//! that does not parse is silently ignored; the caller falls back to
//! hash-derived defaults.

use serde::Deserialize;

/// Metadata extracted from a locator's trailing JSON segment.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct LocatorMetadata {
    #[serde(default, alias = "file_name", alias = "filename")]
    pub file_name: Option<String>,
    #[serde(default, alias = "mime_type")]
    pub mime_type: Option<String>,
    #[serde(default)]
    pub size: Option<u64>,
}

/// Parses metadata from the last path segment of `locator`, if that
/// segment percent-decodes to a JSON object. Returns `None` for unparsable
/// URLs, empty paths, or segments that are not JSON.
pub fn parse_locator_metadata(locator: &str) -> Option<LocatorMetadata> {
    let parsed = url::Url::parse(locator).ok()?;
    let segment = parsed
        .path()
        .split('/')
        .filter(|s| !s.is_empty())
        .last()?;
    let decoded = percent_decode(segment);
    let trimmed = decoded.trim();
    if !trimmed.starts_with('{') {
        return None;
    }
    serde_json::from_str(trimmed).ok()
}

/// Percent-decode a path segment. Invalid escapes pass through verbatim;
/// non-UTF-8 byte sequences decode lossily.
fn percent_decode(input: &str) -> String {
    let mut out = Vec::with_capacity(input.len());
    let mut bytes = input.bytes();
    while let Some(b) = bytes.next() {
        if b != b'%' {
            out.push(b);
            continue;
        }
        let hi = bytes.next();
        let lo = bytes.next();
        match (hi.and_then(hex_digit), lo.and_then(hex_digit)) {
            (Some(h), Some(l)) => out.push(h << 4 | l),
            _ => {
                out.push(b'%');
                out.extend(hi);
                out.extend(lo);
            }
        }
    }
    String::from_utf8_lossy(&out).into_owned()
}

fn hex_digit(b: u8) -> Option<u8> {
    match b {
        b'0'..=b'9' => Some(b - b'0'),
        b'a'..=b'f' => Some(b - b'a' + 10),
        b'A'..=b'F' => Some(b - b'A' + 10),
        _ => None,
    }
}
