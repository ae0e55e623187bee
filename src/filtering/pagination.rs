//! Lenient pagination parsing and total-count header interpretation.

const DEFAULT_PAGE_SIZE: u64 = 50;

/// Sanity ceiling on the page number; there is no meaningful data that deep
/// and the offset must stay well inside u64.
const MAX_PAGE: u64 = 1_000_000;

/// Parse a 1-based page number. Non-numeric input falls back to 1.
pub fn parse_page(raw: Option<&str>) -> u64 {
    raw.and_then(|value| value.trim().parse::<u64>().ok())
        .map_or(1, |page| page.clamp(1, MAX_PAGE))
}

/// Parse the page size. Non-numeric input falls back to the default;
/// numeric input is clamped to `[1, max]`.
pub fn parse_page_size(raw: Option<&str>, max: u64) -> u64 {
    raw.and_then(|value| value.trim().parse::<u64>().ok())
        .map_or_else(|| DEFAULT_PAGE_SIZE.min(max), |size| size.clamp(1, max))
}

#[must_use]
pub const fn has_next(offset: u64, page_size: u64, total: u64) -> bool {
    offset + page_size < total
}

#[must_use]
pub const fn has_prev(page: u64) -> bool {
    page > 1
}

/// Parse the total row count from a `Content-Range`-style header value of
/// the form `<range>/<total>`.
///
/// Count unavailability must never abort a successful render: a missing
/// header, a missing slash or a non-numeric suffix all yield 0.
pub fn parse_total(header: Option<&str>) -> u64 {
    let Some(header) = header else { return 0 };
    if !header.contains('/') {
        return 0;
    }
    header
        .rsplit('/')
        .next()
        .and_then(|total| total.trim().parse().ok())
        .unwrap_or(0)
}
