/// Format an integer count with thousands separators.
///
/// # Examples
///
/// ```
/// use summary_core::formatting::format_count;
///
/// assert_eq!(format_count(0), "0");
/// assert_eq!(format_count(1234), "1,234");
/// assert_eq!(format_count(1234567), "1,234,567");
/// ```
pub fn format_count(value: u64) -> String {
    group_thousands(&value.to_string())
}

/// Calculate `(part / whole) * 100`, rounded to `decimal_places`.
///
/// Returns `0.0` if `whole` is zero to avoid division by zero.
///
/// # Examples
///
/// ```
/// use summary_core::formatting::percentage;
///
/// assert!((percentage(50, 200, 1) - 25.0).abs() < 1e-9);
/// assert_eq!(percentage(0, 0, 2), 0.0);
/// ```
pub fn percentage(part: u64, whole: u64, decimal_places: u32) -> f64 {
    if whole == 0 {
        return 0.0;
    }
    let raw = (part as f64 / whole as f64) * 100.0;
    let factor = 10_f64.powi(decimal_places as i32);
    (raw * factor).round() / factor
}

// ── Internal helpers ──────────────────────────────────────────────────────────

/// Insert commas every three digits from the right of an integer string.
fn group_thousands(s: &str) -> String {
    if s.len() <= 3 {
        return s.to_string();
    }
    let chars: Vec<char> = s.chars().collect();
    let mut result = String::with_capacity(s.len() + s.len() / 3);
    let remainder = chars.len() % 3;
    for (i, &c) in chars.iter().enumerate() {
        if i != 0 && (i % 3 == remainder) {
            result.push(',');
        }
        result.push(c);
    }
    result
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    // ── format_count ─────────────────────────────────────────────────────────

    #[test]
    fn test_format_count_small() {
        assert_eq!(format_count(5), "5");
        assert_eq!(format_count(999), "999");
    }

    #[test]
    fn test_format_count_exact_thousands() {
        assert_eq!(format_count(1_000), "1,000");
    }

    #[test]
    fn test_format_count_millions() {
        assert_eq!(format_count(12_345_678), "12,345,678");
    }

    // ── percentage ───────────────────────────────────────────────────────────

    #[test]
    fn test_percentage_basic() {
        let p = percentage(50, 200, 1);
        assert!((p - 25.0).abs() < 1e-9, "percentage = {p}");
    }

    #[test]
    fn test_percentage_zero_whole() {
        assert_eq!(percentage(10, 0, 2), 0.0);
    }

    #[test]
    fn test_percentage_rounding() {
        let p = percentage(1, 3, 2);
        assert!((p - 33.33).abs() < 1e-2, "percentage = {p}");
    }
}
