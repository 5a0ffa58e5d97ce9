//! Date parsing and small numeric helpers shared by the engine modules.

use chrono::NaiveDate;

/// Parse an entry date into a calendar date.
///
/// Accepts:
/// - YYYY-MM-DD
/// - RFC3339 datetime (the local date part is kept)
/// - Naive datetime YYYY-MM-DDTHH:MM:SS
pub fn parse_entry_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Some(d);
    }
    if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_local().date());
    }
    if let Ok(ndt) = chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S") {
        return Some(ndt.date());
    }
    None
}

/// Arithmetic mean; `None` for an empty slice.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Round to one decimal place.
pub fn round1(v: f64) -> f64 {
    (v * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_entry_date_accepts_date_only() {
        let d = parse_entry_date("2025-12-15").unwrap();
        assert_eq!(d.to_string(), "2025-12-15");
    }

    #[test]
    fn parse_entry_date_keeps_local_date_of_rfc3339() {
        let d = parse_entry_date("2025-12-15T23:30:00-05:00").unwrap();
        assert_eq!(d.to_string(), "2025-12-15");
    }

    #[test]
    fn parse_entry_date_accepts_naive_datetime() {
        let d = parse_entry_date("2025-12-15T10:30:00").unwrap();
        assert_eq!(d.to_string(), "2025-12-15");
    }

    #[test]
    fn parse_entry_date_rejects_invalid() {
        assert!(parse_entry_date("not-a-date").is_none());
    }

    #[test]
    fn mean_of_empty_is_none() {
        assert_eq!(mean(&[]), None);
        assert_eq!(mean(&[2.0, 4.0]), Some(3.0));
    }
}
