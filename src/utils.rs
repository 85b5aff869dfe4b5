//! Utility functions and helpers
//!
//! Lenient numeric parsing shared by form input handling and provider
//! record decoding.

/// Parse the longest numeric prefix of a string
///
/// Leading whitespace is skipped and anything after the number is ignored,
/// so `"12.5 TH"` parses as `12.5`. Accepts an optional sign, a decimal
/// mantissa with at least one digit, an optional exponent, and the literal
/// `Infinity`. Returns `None` when no number starts the string.
pub fn parse_leading_float(input: &str) -> Option<f64> {
    let s = input.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        end += 1;
    }

    if s[end..].starts_with("Infinity") {
        let negative = bytes.first() == Some(&b'-');
        return Some(if negative { f64::NEG_INFINITY } else { f64::INFINITY });
    }

    let int_digits = count_digits(&bytes[end..]);
    end += int_digits;

    let mut frac_digits = 0;
    if bytes.get(end) == Some(&b'.') {
        frac_digits = count_digits(&bytes[end + 1..]);
        if int_digits > 0 || frac_digits > 0 {
            end += 1 + frac_digits;
        }
    }

    if int_digits == 0 && frac_digits == 0 {
        return None;
    }

    // Exponent only counts when at least one digit follows it
    if matches!(bytes.get(end), Some(b'e') | Some(b'E')) {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'+') | Some(b'-')) {
            exp_end += 1;
        }
        let exp_digits = count_digits(&bytes[exp_end.min(bytes.len())..]);
        if exp_digits > 0 {
            end = exp_end + exp_digits;
        }
    }

    s[..end].parse().ok()
}

/// Parse a numeric prefix and keep it only when finite
pub fn parse_finite(input: &str) -> Option<f64> {
    parse_leading_float(input).filter(|value| value.is_finite())
}

fn count_digits(bytes: &[u8]) -> usize {
    bytes.iter().take_while(|b| b.is_ascii_digit()).count()
}

/// Clamp a value between min and max
pub fn clamp<T: PartialOrd>(value: T, min: T, max: T) -> T {
    if value < min {
        min
    } else if value > max {
        max
    } else {
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain_numbers() {
        assert_eq!(parse_leading_float("100"), Some(100.0));
        assert_eq!(parse_leading_float("  2.5"), Some(2.5));
        assert_eq!(parse_leading_float("-3"), Some(-3.0));
        assert_eq!(parse_leading_float("+7.25"), Some(7.25));
        assert_eq!(parse_leading_float(".5"), Some(0.5));
        assert_eq!(parse_leading_float("5."), Some(5.0));
        assert_eq!(parse_leading_float("1e3"), Some(1000.0));
        assert_eq!(parse_leading_float("6.25E-2"), Some(0.0625));
    }

    #[test]
    fn test_parse_trailing_garbage() {
        assert_eq!(parse_leading_float("12.5 TH/s"), Some(12.5));
        assert_eq!(parse_leading_float("1e"), Some(1.0));
        assert_eq!(parse_leading_float("1e+"), Some(1.0));
        assert_eq!(parse_leading_float("0x10"), Some(0.0));
        assert_eq!(parse_leading_float("3.4.5"), Some(3.4));
    }

    #[test]
    fn test_parse_rejects_non_numbers() {
        assert_eq!(parse_leading_float(""), None);
        assert_eq!(parse_leading_float("abc"), None);
        assert_eq!(parse_leading_float("."), None);
        assert_eq!(parse_leading_float("-"), None);
        assert_eq!(parse_leading_float("NaN"), None);
    }

    #[test]
    fn test_parse_infinity() {
        assert_eq!(parse_leading_float("Infinity"), Some(f64::INFINITY));
        assert_eq!(parse_leading_float("-Infinity"), Some(f64::NEG_INFINITY));
        assert_eq!(parse_finite("Infinity"), None);
        assert_eq!(parse_finite("42"), Some(42.0));
    }

    #[test]
    fn test_clamp() {
        assert_eq!(clamp(5, 0, 10), 5);
        assert_eq!(clamp(-1, 0, 10), 0);
        assert_eq!(clamp(15, 0, 10), 10);
        assert_eq!(clamp(5.5, 0.0, 100.0), 5.5);
    }
}
