//! Predicates behind the built-in string formats.
//!
//! Each predicate sees only string values; non-string values never reach
//! them (see [`FormatCheck::check`](super::FormatCheck::check)).

use std::net::{Ipv4Addr, Ipv6Addr};

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use ipnetwork::IpNetwork;
use regex::Regex;
use url::Url;

/// A non-empty string that compiles as a regular expression. The empty
/// pattern is syntactically valid but matches everything, so it is refused.
pub fn is_regex(value: &str) -> bool {
    !value.is_empty() && Regex::new(value).is_ok()
}

const NAIVE_DATE_TIME_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y%m%dT%H%M%S%.f",
];

/// ISO-8601 timestamps: RFC 3339, offset or naive date-times, or a bare date.
pub fn is_date_time(value: &str) -> bool {
    if DateTime::parse_from_rfc3339(value).is_ok()
        || DateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f%z").is_ok()
    {
        return true;
    }
    if NAIVE_DATE_TIME_FORMATS
        .iter()
        .any(|fmt| NaiveDateTime::parse_from_str(value, fmt).is_ok())
    {
        return true;
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d").is_ok()
}

/// Standard padded base64. Embedded line breaks and other ASCII whitespace
/// are ignored.
pub fn is_base64(value: &str) -> bool {
    let compact: String = value
        .chars()
        .filter(|c| !c.is_ascii_whitespace())
        .collect();
    STANDARD.decode(compact.as_bytes()).is_ok()
}

/// An IP network written with an explicit `/prefix` (or, for IPv4, a dotted
/// netmask). Host bits may be set.
pub fn is_cidr(value: &str) -> bool {
    if value.chars().any(char::is_whitespace) || !value.contains('/') {
        return false;
    }
    value.parse::<IpNetwork>().is_ok()
}

/// Anything that reduces to 32 hex digits once `urn:`/`uuid:` prefixes,
/// braces and hyphens are removed. The version nibble is not inspected.
pub fn is_uuid_like(value: &str) -> bool {
    let lowered = value.to_ascii_lowercase();
    let stripped = lowered.replace("urn:", "").replace("uuid:", "");
    let simple: String = stripped
        .trim_matches(|c: char| c == '{' || c == '}')
        .chars()
        .filter(|c| *c != '-')
        .collect();
    simple.len() == 32 && uuid::Uuid::parse_str(&simple).is_ok()
}

pub fn is_ipv4(value: &str) -> bool {
    value.parse::<Ipv4Addr>().is_ok()
}

pub fn is_ipv6(value: &str) -> bool {
    value.parse::<Ipv6Addr>().is_ok()
}

/// An absolute URI with a scheme and a host.
pub fn is_uri(value: &str) -> bool {
    if value.chars().any(char::is_whitespace) {
        return false;
    }
    match Url::parse(value) {
        Ok(url) => !url.scheme().is_empty() && url.host_str().is_some(),
        Err(_) => false,
    }
}
