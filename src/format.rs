/// Groups digits by thousands with a space, e.g. `45000` becomes `45 000`.
pub fn format_thousands(value: i64) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);

    if value < 0 {
        grouped.push('-');
    }
    for (i, digit) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(' ');
        }
        grouped.push(digit);
    }

    grouped
}

/// Keeps at most `max_chars` characters of `text`, appending `...` when
/// something was cut off.
pub fn truncate_with_ellipsis(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => format!("{}...", &text[..byte_idx]),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_thousands() {
        assert_eq!(format_thousands(0), "0");
        assert_eq!(format_thousands(999), "999");
        assert_eq!(format_thousands(1000), "1 000");
        assert_eq!(format_thousands(45000), "45 000");
        assert_eq!(format_thousands(1234567), "1 234 567");
    }

    #[test]
    fn test_format_thousands_negative() {
        assert_eq!(format_thousands(-1500), "-1 500");
        assert_eq!(format_thousands(i64::MIN), "-9 223 372 036 854 775 808");
    }

    #[test]
    fn test_truncate_short_text() {
        assert_eq!(truncate_with_ellipsis("short", 300), "short");
    }

    #[test]
    fn test_truncate_exact_length() {
        let text = "a".repeat(300);
        assert_eq!(truncate_with_ellipsis(&text, 300), text);
    }

    #[test]
    fn test_truncate_one_over() {
        let text = "a".repeat(301);
        assert_eq!(truncate_with_ellipsis(&text, 300), format!("{}...", "a".repeat(300)));
    }

    #[test]
    fn test_truncate_counts_characters_not_bytes() {
        let text = "ж".repeat(301);
        let truncated = truncate_with_ellipsis(&text, 300);
        assert_eq!(truncated.chars().count(), 303);
        assert!(truncated.starts_with(&"ж".repeat(300)));
    }
}
