use chrono::{DateTime, NaiveDate};

// Parse a week start given as "YYYY-MM-DD" or RFC3339 into a calendar date.
// Returns None if unparseable.
pub fn parse_week_start(s: &str) -> Option<NaiveDate> {
    // "YYYY-MM-DD"
    if let Ok(nd) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Some(nd);
    }
    // RFC3339, keep the date as written
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.date_naive());
    }
    None
}
