//! Media kind declared by the caller, and extension refinement from
//! response content types.

use serde::{Deserialize, Serialize};

/// Kind of media the caller believes the locator points at. Picks the
/// default file extension used until the server reveals a content type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Image,
    Video,
}

impl MediaKind {
    /// Extension used before any response has been seen.
    pub fn default_extension(self) -> &'static str {
        match self {
            MediaKind::Image => "jpg",
            MediaKind::Video => "mp4",
        }
    }

    /// Primary content-type family this kind expects ("image" / "video").
    pub fn family(self) -> &'static str {
        match self {
            MediaKind::Image => "image",
            MediaKind::Video => "video",
        }
    }
}

/// Derives a file extension from a `Content-Type` header value, but only
/// when its primary type matches the family expected for `kind`. A server
/// may only reveal the true subtype once streaming begins; a mismatched
/// family (e.g. `text/html` on an expected video) is ignored rather than
/// trusted.
pub fn extension_for_content_type(kind: MediaKind, content_type: &str) -> Option<String> {
    // Strip parameters: "video/mp4; charset=binary" -> "video/mp4".
    let essence = content_type.split(';').next().unwrap_or("").trim();
    let (primary, subtype) = essence.split_once('/')?;
    if !primary.trim().eq_ignore_ascii_case(kind.family()) {
        return None;
    }
    let subtype = subtype.trim();
    let ext = match subtype.to_ascii_lowercase().as_str() {
        "jpeg" => "jpg".to_string(),
        "quicktime" => "mov".to_string(),
        "x-matroska" => "mkv".to_string(),
        "svg+xml" => "svg".to_string(),
        s if !s.is_empty() && s.chars().all(|c| c.is_ascii_alphanumeric()) => s.to_string(),
        _ => return None,
    };
    Some(ext)
}
