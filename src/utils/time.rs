//! Time utilities: parsing HH:MM[:SS], 12-hour labels, clock overrides.

use chrono::{NaiveDateTime, NaiveTime};

/// Storage format of times in the `logs` table.
pub const DB_TIME_FMT: &str = "%H:%M:%S";

pub fn parse_time(t: &str) -> Option<NaiveTime> {
    let t = t.trim();
    NaiveTime::parse_from_str(t, DB_TIME_FMT)
        .or_else(|_| NaiveTime::parse_from_str(t, "%H:%M"))
        .ok()
}

pub fn to_db(t: &NaiveTime) -> String {
    t.format(DB_TIME_FMT).to_string()
}

/// 0 → "12 AM", 9 → "9 AM", 12 → "12 PM", 15 → "3 PM".
pub fn hour_label(hour: u32) -> String {
    match hour % 24 {
        0 => "12 AM".to_string(),
        h if h < 12 => format!("{h} AM"),
        12 => "12 PM".to_string(),
        h => format!("{} PM", h - 12),
    }
}

/// Parse the value of the global `--now` flag.
pub fn parse_datetime(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    [
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%d %H:%M",
        "%Y-%m-%dT%H:%M",
    ]
    .iter()
    .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
}
