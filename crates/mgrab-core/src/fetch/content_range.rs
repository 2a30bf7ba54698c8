//! `Content-Range` header parsing.

/// A server-confirmed byte range: `bytes <start>-<end>/<total>`.
/// `end` is inclusive, per the header's wire format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContentRange {
    pub start: u64,
    pub end: u64,
    pub total: u64,
}

impl ContentRange {
    /// Number of bytes the range covers (start <= end is enforced at parse
    /// time, so this is never zero).
    pub fn len(&self) -> u64 {
        self.end - self.start + 1
    }
}

/// Parses a `Content-Range` value of the form `bytes <start>-<end>/<total>`.
///
/// Returns `None` for anything else: the unsatisfied form (`bytes */N`),
/// unknown totals (`bytes 0-99/*`), inverted ranges (`end < start`), and
/// totals that do not cover the range. A header we cannot trust is treated
/// as absent rather than guessed at.
pub fn parse_content_range(value: &str) -> Option<ContentRange> {
    let value = value.trim();
    let rest = strip_unit_prefix(value)?;
    let (range, total) = rest.split_once('/')?;
    let total: u64 = total.trim().parse().ok()?;
    let (start, end) = range.trim().split_once('-')?;
    let start: u64 = start.trim().parse().ok()?;
    let end: u64 = end.trim().parse().ok()?;
    if end < start || end >= total {
        return None;
    }
    Some(ContentRange { start, end, total })
}

fn strip_unit_prefix(value: &str) -> Option<&str> {
    value
        .get(..5)
        .filter(|unit| unit.eq_ignore_ascii_case("bytes"))?;
    Some(value[5..].trim_start())
}
