//! HTTP validators and conditional-request matching.
//!
//! `Last-Modified` is the cache file's mtime as an HTTP date. The entity tag
//! is the digest of the cached text; it is sent quoted and compared with
//! quotes, a weak prefix and surrounding whitespace stripped.

use std::time::SystemTime;

use ccgate_common::Digest;
use chrono::{DateTime, NaiveDateTime, Utc};

/// Format of HTTP dates, always in GMT.
const HTTP_DATE_FORMAT: &str = "%a, %d %b %Y %H:%M:%S GMT";

/// The conditional headers of a client request, plus its referer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InboundRequest {
    /// Raw `If-Modified-Since` header value.
    pub if_modified_since: Option<String>,
    /// Raw `If-None-Match` header value.
    pub if_none_match: Option<String>,
    /// `Referer` forwarded to the compiler on a cache miss.
    pub referer: Option<String>,
}

impl InboundRequest {
    /// Returns `true` if either validator matches the cached entry.
    ///
    /// `If-Modified-Since` matches only when it names exactly the entry's
    /// modification second. `If-None-Match` matches when any listed tag, or
    /// `*`, equals the entry's tag.
    pub fn matches(&self, mtime: SystemTime, etag: &Digest) -> bool {
        let by_date = self
            .if_modified_since
            .as_deref()
            .and_then(parse_http_date)
            .is_some_and(|since| since == unix_seconds(mtime));
        let by_tag = self
            .if_none_match
            .as_deref()
            .is_some_and(|header| etag_matches(header, etag));
        by_date || by_tag
    }
}

/// Formats a timestamp as an HTTP date, e.g. `Sun, 06 Nov 1994 08:49:37 GMT`.
pub fn format_http_date(time: SystemTime) -> String {
    DateTime::<Utc>::from(time).format(HTTP_DATE_FORMAT).to_string()
}

/// Parses an HTTP date into Unix seconds.
///
/// Accepts the IMF-fixdate form and anything else RFC 2822 allows. Returns
/// `None` for values that are not dates at all.
pub fn parse_http_date(value: &str) -> Option<i64> {
    let value = value.trim();
    DateTime::parse_from_rfc2822(value)
        .map(|date| date.timestamp())
        .or_else(|_| {
            NaiveDateTime::parse_from_str(value, HTTP_DATE_FORMAT)
                .map(|date| date.and_utc().timestamp())
        })
        .ok()
}

/// Formats a digest as a quoted entity tag.
pub fn format_etag(digest: &Digest) -> String {
    format!("\"{digest}\"")
}

fn etag_matches(header: &str, etag: &Digest) -> bool {
    let expected = etag.to_string();
    header.split(',').any(|tag| {
        let tag = tag.trim();
        let tag = tag.strip_prefix("W/").unwrap_or(tag);
        tag == "*" || tag.trim_matches('"') == expected
    })
}

fn unix_seconds(time: SystemTime) -> i64 {
    DateTime::<Utc>::from(time).timestamp()
}
