//! Staged date parsing and total priority parsing.
//!
//! Try the strict form first, then RFC 2822 (the form RSS `<pubDate>` uses), then fall back to
//! progressively looser forms, and never let a malformed date propagate as an error — a page
//! record with a bad `lastmod` is still a usable page record.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

/// Parse a sitemap date string, trying strict ISO 8601 first and then a handful of permissive
/// fallback forms. Returns `None` rather than erroring on any failure.
#[must_use]
pub fn parse_date(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }

    if let Ok(dt) = DateTime::parse_from_rfc2822(s) {
        return Some(dt.with_timezone(&Utc));
    }

    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0).map(|ndt| ndt.and_utc());
    }

    for fmt in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(ndt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(ndt.and_utc());
        }
    }

    tracing::debug!(value = %s, "could not parse sitemap date, leaving absent");
    None
}

/// Default priority used when a `<priority>` element is absent or unparseable.
pub const DEFAULT_PRIORITY: f32 = 0.5;

/// Parse a sitemap `<priority>` value: a value that fails to parse, or that parses but lies
/// outside `[0, 1]`, falls back to [`DEFAULT_PRIORITY`].
#[must_use]
pub fn parse_priority(s: &str) -> f32 {
    s.trim().parse::<f32>().ok().filter(|p| (0.0..=1.0).contains(p)).unwrap_or(DEFAULT_PRIORITY)
}
