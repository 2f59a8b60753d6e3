use crate::types::Credits;
use chrono::DateTime;

// Format credits with two decimals
pub fn format_credits(credits: Credits) -> String {
    credits.to_formatted_string()
}

// Format timestamp as dd-mm-yyyy HH:MM, keeping the original offset
pub fn format_timestamp(timestamp: &str) -> String {
    match DateTime::parse_from_rfc3339(timestamp) {
        Ok(ts) => ts.format("%d-%m-%Y %H:%M").to_string(),
        Err(_) => timestamp.to_string(),
    }
}

// Report name, or a dash when the cost was scored
pub fn format_report_name(report_name: Option<&str>) -> &str {
    report_name.unwrap_or("-")
}

// Pad or truncate to a fixed display width
pub fn fit_width(s: &str, width: usize) -> String {
    let count = s.chars().count();
    if count <= width {
        format!("{s:<width$}")
    } else {
        let truncated: String = s.chars().take(width.saturating_sub(1)).collect();
        format!("{truncated}…")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_credits() {
        assert_eq!(format_credits(Credits::tenths(73)), "7.30");
        assert_eq!(format_credits(Credits::ZERO), "0.00");
    }

    #[test]
    fn test_format_timestamp() {
        assert_eq!(format_timestamp("2024-04-29T02:08:29.375Z"), "29-04-2024 02:08");
        assert_eq!(format_timestamp("2024-04-29T23:30:00-05:00"), "29-04-2024 23:30");
        assert_eq!(format_timestamp("yesterday"), "yesterday");
    }

    #[test]
    fn test_format_report_name() {
        assert_eq!(format_report_name(Some("Lease Report")), "Lease Report");
        assert_eq!(format_report_name(None), "-");
    }

    #[test]
    fn test_fit_width() {
        assert_eq!(fit_width("abc", 5), "abc  ");
        assert_eq!(fit_width("abcdefg", 5), "abcd…");
    }
}
