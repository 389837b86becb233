//! Display helpers for wallet addresses and timestamps.

use chrono::{DateTime, TimeZone, Utc};

/// `0x` followed by exactly 40 hex digits.
pub fn is_valid_address(address: &str) -> bool {
    match address.strip_prefix("0x") {
        Some(hex) => hex.len() == 40 && hex.chars().all(|c| c.is_ascii_hexdigit()),
        None => false,
    }
}

/// Shorten an address for display: the first `chars` characters
/// (counting the `0x`), an ellipsis, then the last four.
///
/// Returns `None` for anything that is not a valid address.
pub fn shorten_address(address: &str, chars: usize) -> Option<String> {
    if !is_valid_address(address) {
        return None;
    }
    if address.len() < chars * 2 + 2 {
        return Some(address.to_string());
    }
    Some(format!(
        "{}...{}",
        &address[..chars],
        &address[address.len() - 4..]
    ))
}

/// Convert a JWT numeric date (seconds since the epoch).
pub fn from_unix(secs: i64) -> Option<DateTime<Utc>> {
    Utc.timestamp_opt(secs, 0).single()
}

/// e.g. `Jan 01, 2025`
pub fn format_date(date: &DateTime<Utc>) -> String {
    date.format("%b %d, %Y").to_string()
}

/// e.g. `02:30 PM`, or `14:30` with `use_24_hour`.
pub fn format_time(date: &DateTime<Utc>, use_24_hour: bool) -> String {
    if use_24_hour {
        date.format("%H:%M").to_string()
    } else {
        date.format("%I:%M %p").to_string()
    }
}

pub fn format_date_time(date: &DateTime<Utc>) -> String {
    format!("{} {}", format_date(date), format_time(date, false))
}
