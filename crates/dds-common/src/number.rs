//! Numeric-literal parsing for spreadsheet exports.
//!
//! Spreadsheet tools write numbers with locale-specific grouping and decimal
//! separators (`70.000`, `90,000`, `1 200`, `3,14`). [`parse_number`] is the
//! one rule used everywhere a text cell has to be read as a number: column
//! type detection, aggregation and expression coercion.

/// Parses a locale-formatted number.
///
/// The transformation is applied in a fixed order:
///
/// 1. strip all whitespace,
/// 2. remove `.` characters followed by exactly three digits,
/// 3. remove `,` characters followed by exactly three digits,
/// 4. replace any remaining `,` with `.`,
///
/// and the result is parsed as `f64`. Only finite results are accepted.
///
/// # Examples
///
/// ```
/// use dds_common::parse_number;
///
/// assert_eq!(parse_number("70.000"), Some(70000.0));
/// assert_eq!(parse_number("90,000"), Some(90000.0));
/// assert_eq!(parse_number("1 200"), Some(1200.0));
/// assert_eq!(parse_number("3,14"), Some(3.14));
/// assert_eq!(parse_number("abc"), None);
/// ```
pub fn parse_number(value: &str) -> Option<f64> {
    let compact: Vec<char> = value.chars().filter(|ch| !ch.is_whitespace()).collect();
    if compact.is_empty() {
        return None;
    }
    let without_dots = remove_group_separators(&compact, '.');
    let without_commas = remove_group_separators(&without_dots, ',');
    let normalized: String = without_commas
        .into_iter()
        .map(|ch| if ch == ',' { '.' } else { ch })
        .collect();
    normalized.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Returns the value if it is finite.
pub fn finite(value: f64) -> Option<f64> {
    value.is_finite().then_some(value)
}

/// Formats a number without trailing zeros (`3.0` becomes `"3"`).
///
/// ```
/// use dds_common::format_number;
///
/// assert_eq!(format_number(3.0), "3");
/// assert_eq!(format_number(1.50), "1.5");
/// assert_eq!(format_number(-0.0), "0");
/// ```
pub fn format_number(value: f64) -> String {
    if value == 0.0 {
        return "0".to_string();
    }
    // f64 Display never emits an exponent or trailing zeros.
    format!("{value}")
}

fn remove_group_separators(chars: &[char], separator: char) -> Vec<char> {
    let mut out = Vec::with_capacity(chars.len());
    for (idx, &ch) in chars.iter().enumerate() {
        if ch == separator && followed_by_three_digits(chars, idx) {
            continue;
        }
        out.push(ch);
    }
    out
}

fn followed_by_three_digits(chars: &[char], idx: usize) -> bool {
    let digits = chars
        .iter()
        .skip(idx + 1)
        .take_while(|ch| ch.is_ascii_digit())
        .count();
    digits == 3
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_thousands_with_dot() {
        assert_eq!(parse_number("70.000"), Some(70000.0));
        assert_eq!(parse_number("1.000.000"), Some(1_000_000.0));
    }

    #[test]
    fn test_thousands_with_comma() {
        assert_eq!(parse_number("90,000"), Some(90000.0));
        assert_eq!(parse_number("1,234"), Some(1234.0));
    }

    #[test]
    fn test_whitespace_grouping() {
        assert_eq!(parse_number("1 200"), Some(1200.0));
        assert_eq!(parse_number("  12\t"), Some(12.0));
        assert_eq!(parse_number("1\u{a0}500"), Some(1500.0));
    }

    #[test]
    fn test_decimal_comma() {
        assert_eq!(parse_number("3,14"), Some(3.14));
        assert_eq!(parse_number("1,2345"), Some(1.2345));
    }

    #[test]
    fn test_mixed_separators() {
        assert_eq!(parse_number("1.234,56"), Some(1234.56));
        assert_eq!(parse_number("1,234.56"), Some(1234.56));
        // The dot pass runs first, so the comma then sees six digits.
        assert_eq!(parse_number("1,234.567"), Some(1.234567));
    }

    #[test]
    fn test_plain_numbers() {
        assert_eq!(parse_number("42"), Some(42.0));
        assert_eq!(parse_number("-7.5"), Some(-7.5));
        assert_eq!(parse_number("1e3"), Some(1000.0));
        assert_eq!(parse_number("0.5"), Some(0.5));
    }

    #[test]
    fn test_rejects_non_numbers() {
        assert_eq!(parse_number(""), None);
        assert_eq!(parse_number("   "), None);
        assert_eq!(parse_number("x"), None);
        assert_eq!(parse_number("12abc"), None);
        assert_eq!(parse_number("2024-01-05"), None);
    }

    #[test]
    fn test_rejects_non_finite() {
        assert_eq!(parse_number("inf"), None);
        assert_eq!(parse_number("NaN"), None);
        assert_eq!(parse_number("1e400"), None);
    }

    #[test]
    fn test_finite() {
        assert_eq!(finite(42.0), Some(42.0));
        assert_eq!(finite(f64::NAN), None);
        assert_eq!(finite(f64::INFINITY), None);
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(1.0), "1");
        assert_eq!(format_number(1.5), "1.5");
        assert_eq!(format_number(100.0), "100");
        assert_eq!(format_number(0.0), "0");
        assert_eq!(format_number(-2.25), "-2.25");
    }
}
