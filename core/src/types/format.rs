//! Display helpers for DICOM identifiers, dates and times

/// Wraps a non-empty identifier in parentheses
pub fn format_id(id: &str) -> String {
    if id.is_empty() {
        String::new()
    } else {
        format!("({})", id)
    }
}

/// Formats a DICOM DA value (`YYYYMMDD`) as `DD/MM/YYYY`
///
/// Values that are too short, or not plain ASCII, are returned unchanged.
pub fn format_date(date: &str) -> String {
    if date.len() < 8 || !date.is_ascii() {
        return date.to_string();
    }
    format!("{}/{}/{}", &date[6..8], &date[4..6], &date[0..4])
}

/// Formats a DICOM TM value (`HHMMSS.frac`) as `HH:MM:SS`
///
/// Fractional seconds are dropped. Values that are too short, or not
/// plain ASCII, are returned unchanged.
pub fn format_time(time: &str) -> String {
    if time.len() < 6 || !time.is_ascii() {
        return time.to_string();
    }
    format!("{}:{}:{}", &time[0..2], &time[2..4], &time[4..6])
}
