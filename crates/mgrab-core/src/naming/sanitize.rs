//! Linux-safe file name sanitization.

/// Linux NAME_MAX.
const NAME_MAX: usize = 255;

/// Sanitizes a candidate file name for safe use on Linux.
///
/// - Replaces NUL, `/`, `\`, whitespace, and control characters with `_`
/// - Collapses runs of `_`
/// - Trims leading/trailing dots and underscores
/// - Caps the result at 255 bytes on a char boundary
///
/// May return an empty string (e.g. for "..", which must never survive as
/// a file name); callers fall back to the identity stem in that case.
pub fn sanitize_file_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len().min(NAME_MAX));
    for c in name.chars() {
        let mapped = match c {
            '\0' | '/' | '\\' => '_',
            c if c.is_control() || c.is_whitespace() => '_',
            c => c,
        };
        if mapped == '_' && out.ends_with('_') {
            continue;
        }
        out.push(mapped);
    }

    let trimmed = out.trim_matches(|c| c == '.' || c == '_');
    if trimmed.len() <= NAME_MAX {
        return trimmed.to_string();
    }
    let mut end = NAME_MAX;
    while end > 0 && !trimmed.is_char_boundary(end) {
        end -= 1;
    }
    trimmed[..end].to_string()
}
