use chrono::NaiveDateTime;

/// Truncate a string to a maximum length, adding ellipsis if needed
pub fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else if max_len <= 3 {
        s.chars().take(max_len).collect()
    } else {
        let truncated: String = s.chars().take(max_len - 3).collect();
        format!("{}...", truncated)
    }
}

/// Format an optional string, returning a default if None
pub fn format_optional(value: Option<&str>, default: &str) -> String {
    value.unwrap_or(default).to_string()
}

/// Format a timestamp for display, e.g. "Mar 01, 2024"
pub fn format_date(date: &NaiveDateTime) -> String {
    date.format("%b %d, %Y").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_string() {
        assert_eq!(truncate_string("Hello", 10), "Hello");
        assert_eq!(truncate_string("Hello World", 8), "Hello...");
        assert_eq!(truncate_string("Hi", 2), "Hi");
        assert_eq!(truncate_string("Hello", 2), "He");
        // Counts characters, not bytes
        assert_eq!(truncate_string("नमस्ते", 6), "नमस्ते");
    }

    #[test]
    fn test_format_optional() {
        assert_eq!(format_optional(Some("x"), "-"), "x");
        assert_eq!(format_optional(None, "-"), "-");
    }

    #[test]
    fn test_format_date() {
        let dt = NaiveDateTime::parse_from_str("2024-03-01T10:15:00", "%Y-%m-%dT%H:%M:%S").unwrap();
        assert_eq!(format_date(&dt), "Mar 01, 2024");
    }
}
