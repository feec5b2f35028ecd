// Utility helpers for parsing and display formatting.
//
// This module centralizes the "dirty" CSV cell handling so the rest of the
// code can assume clean, typed values.
use num_format::{Locale, ToFormattedString};

/// Parse a year cell into `i32` while being forgiving about whitespace.
///
/// The registry export uses `XXXX` for an unknown birth year; that, like any
/// other non-numeric value, yields `None` and the caller drops the row.
pub fn parse_year(s: &str) -> Option<i32> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    s.parse::<i32>().ok()
}

/// Parse an occurrence-count cell into `u64`.
///
/// Negative or non-numeric values yield `None`; a count of zero is valid.
pub fn parse_count(s: &str) -> Option<u64> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    s.parse::<u64>().ok()
}

/// Normalize a department code to the fixed-width form used by the lookup.
///
/// - Trims whitespace and uppercases (Corsican codes are `2A`/`2B`).
/// - Zero-pads single-digit numeric codes (`1` -> `01`) so they join
///   against the lookup's two-character codes.
pub fn normalize_department(s: &str) -> String {
    let s = s.trim().to_uppercase();
    if s.len() == 1 && s.chars().all(|c| c.is_ascii_digit()) {
        format!("0{}", s)
    } else {
        s
    }
}

/// Format a floating-point value with a fixed number of decimal places and
/// locale-aware thousands separators (e.g., `1,234,567.89`).
pub fn format_number(n: f64, decimals: usize) -> String {
    let neg = n.is_sign_negative();
    let abs_n = n.abs();
    let s = format!("{:.*}", decimals, abs_n);
    let mut parts = s.split('.');
    let int_part = parts.next().unwrap_or("0");
    let frac_part = parts.next();
    let int_val: i64 = int_part.parse().unwrap_or(0);
    let mut res = int_val.to_formatted_string(&Locale::en);
    if let Some(frac) = frac_part {
        if decimals > 0 {
            res.push('.');
            res.push_str(frac);
        }
    } else if decimals > 0 {
        res.push('.');
        res.push_str(&"0".repeat(decimals));
    }
    if neg {
        format!("-{}", res)
    } else {
        res
    }
}

/// Thin wrapper around `num-format` for integer-like values, used for counts
/// in tables and console diagnostics (e.g., `9,855 rows loaded`).
pub fn format_int<T>(n: T) -> String
where
    T: ToFormattedString,
{
    n.to_formatted_string(&Locale::en)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_year_accepts_plain_integers() {
        assert_eq!(parse_year("2003"), Some(2003));
        assert_eq!(parse_year(" 1999 "), Some(1999));
    }

    #[test]
    fn parse_year_rejects_placeholder_and_garbage() {
        assert_eq!(parse_year("XXXX"), None);
        assert_eq!(parse_year(""), None);
        assert_eq!(parse_year("20O3"), None);
    }

    #[test]
    fn parse_count_rejects_negatives() {
        assert_eq!(parse_count("42"), Some(42));
        assert_eq!(parse_count("0"), Some(0));
        assert_eq!(parse_count("-3"), None);
    }

    #[test]
    fn normalize_department_pads_and_uppercases() {
        assert_eq!(normalize_department("1"), "01");
        assert_eq!(normalize_department("75"), "75");
        assert_eq!(normalize_department("2a"), "2A");
        assert_eq!(normalize_department(" 971 "), "971");
    }

    #[test]
    fn format_int_inserts_separators() {
        assert_eq!(format_int(9855i64), "9,855");
    }

    #[test]
    fn format_number_keeps_decimals() {
        assert_eq!(format_number(1234567.891, 2), "1,234,567.89");
        assert_eq!(format_number(0.0421, 4), "0.0421");
    }
}
