//! Parse raw HTTP response header lines into the fields the engine needs.

use super::content_range::{parse_content_range, ContentRange};

/// Headers relevant to a range transfer, from the final response block.
#[derive(Debug, Clone, Default)]
pub struct ResponseHeaders {
    pub content_type: Option<String>,
    pub content_range: Option<ContentRange>,
}

/// Parse collected header lines into [`ResponseHeaders`].
///
/// Redirect chains deliver several header blocks; a status line
/// (`HTTP/...`) resets the accumulated fields so only the final response's
/// headers survive.
pub fn parse_response_headers(lines: &[String]) -> ResponseHeaders {
    let mut out = ResponseHeaders::default();
    for line in lines {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if line.get(..5).map_or(false, |p| p.eq_ignore_ascii_case("http/")) {
            out = ResponseHeaders::default();
            continue;
        }
        if let Some((name, value)) = line.split_once(':') {
            let name = name.trim();
            let value = value.trim();
            if name.eq_ignore_ascii_case("content-type") {
                out.content_type = Some(value.to_string());
            }
            if name.eq_ignore_ascii_case("content-range") {
                out.content_range = parse_content_range(value);
            }
        }
    }
    out
}
