//! Date-range input parsing.
//!
//! Two literal formats are accepted, tried in order: `YYYY-MM-DD`, then
//! `YYYY-MM-DDTHH:MM:SS`. Unparseable input is treated as absent, never as
//! a hard error.

use chrono::{NaiveDate, NaiveDateTime};

const DATE_FMT: &str = "%Y-%m-%d";
const DATETIME_FMT: &str = "%Y-%m-%dT%H:%M:%S";

/// First successful parse wins; the bool marks a bare (day-granularity)
/// date.
fn parse(raw: &str) -> Option<(NaiveDateTime, bool)> {
    let raw = raw.trim();
    if let Ok(date) = NaiveDate::parse_from_str(raw, DATE_FMT) {
        return date.and_hms_opt(0, 0, 0).map(|dt| (dt, true));
    }
    NaiveDateTime::parse_from_str(raw, DATETIME_FMT)
        .ok()
        .map(|dt| (dt, false))
}

fn to_iso(dt: NaiveDateTime) -> String {
    dt.format(DATETIME_FMT).to_string()
}

/// Parse an inclusive lower bound.
pub fn parse_range_start(raw: Option<&str>) -> Option<String> {
    parse(raw?).map(|(dt, _)| to_iso(dt))
}

/// Parse an exclusive upper bound.
///
/// A bare date is an inclusive day: it converts to the start of the *next*
/// calendar day so the `lt` comparison covers the whole requested day.
pub fn parse_range_end(raw: Option<&str>) -> Option<String> {
    let (dt, bare) = parse(raw?)?;
    if bare {
        let next = dt.date().succ_opt()?;
        return next.and_hms_opt(0, 0, 0).map(to_iso);
    }
    Some(to_iso(dt))
}
