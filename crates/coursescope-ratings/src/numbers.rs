//! Number scanning for rating widgets and free text.
//!
//! Widgets render values like `"4.5"`, `"68%"`, `"1,204 ratings"` or
//! `"N/A"`. The helpers here pull the first plausible number out of such
//! strings without caring about surrounding markup.

use serde_json::Value;

/// A number found in text plus how many fractional digits it had.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Scanned {
    pub(crate) value: f64,
    pub(crate) decimals: usize,
}

/// All numbers in `s`, left to right. A `-` directly before a digit makes
/// the number negative; thousands separators (`1,204`) are folded.
pub(crate) fn scan_numbers(s: &str) -> Vec<Scanned> {
    let bytes = s.as_bytes();
    let len = bytes.len();
    let mut found = Vec::new();
    let mut i = 0usize;

    while i < len {
        let starts_number = bytes[i].is_ascii_digit()
            || (bytes[i] == b'.' && i + 1 < len && bytes[i + 1].is_ascii_digit());
        if !starts_number {
            i += 1;
            continue;
        }

        let negative = i > 0 && bytes[i - 1] == b'-';
        let mut digits = String::new();
        let mut decimals = 0usize;
        let mut has_dot = false;

        while i < len {
            let b = bytes[i];
            if b.is_ascii_digit() {
                digits.push(char::from(b));
                if has_dot {
                    decimals += 1;
                }
            } else if b == b'.' && !has_dot && i + 1 < len && bytes[i + 1].is_ascii_digit() {
                has_dot = true;
                digits.push('.');
            } else if b == b','
                && !has_dot
                && i + 3 < len
                && bytes[i + 1..=i + 3].iter().all(u8::is_ascii_digit)
                && !bytes.get(i + 4).is_some_and(u8::is_ascii_digit)
            {
                // thousands separator
            } else {
                break;
            }
            i += 1;
        }

        if let Ok(value) = digits.parse::<f64>() {
            found.push(Scanned {
                value: if negative { -value } else { value },
                decimals,
            });
        }
    }

    found
}

/// First number on the 0–5 rating scale with at most one decimal.
pub(crate) fn first_rating(s: &str) -> Option<f64> {
    scan_numbers(s)
        .into_iter()
        .find(|n| n.decimals <= 1 && (0.0..=5.0).contains(&n.value))
        .map(|n| n.value)
}

/// First number in 0–100, read from a percentage string.
pub(crate) fn first_percent(s: &str) -> Option<f64> {
    scan_numbers(s)
        .into_iter()
        .find(|n| (0.0..=100.0).contains(&n.value))
        .map(|n| n.value)
}

/// First non-negative whole number, e.g. a rating count.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub(crate) fn first_count(s: &str) -> Option<u32> {
    scan_numbers(s)
        .into_iter()
        .find(|n| n.decimals == 0 && (0.0..=f64::from(u32::MAX)).contains(&n.value))
        .map(|n| n.value as u32)
}

/// A JSON number, or a string holding one.
pub(crate) fn json_f64(value: &Value) -> Option<f64> {
    value
        .as_f64()
        .or_else(|| value.as_str().and_then(|s| s.trim().parse::<f64>().ok()))
}

/// A JSON count, or a string holding one.
pub(crate) fn json_u32(value: &Value) -> Option<u32> {
    if let Some(n) = value.as_u64() {
        return u32::try_from(n).ok();
    }
    value.as_str().and_then(first_count)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scans_decimals_and_negatives() {
        let found = scan_numbers("quality 4.5 / 5, take again -1%");
        let values: Vec<f64> = found.iter().map(|n| n.value).collect();
        assert_eq!(values, vec![4.5, 5.0, -1.0]);
        assert_eq!(found[0].decimals, 1);
    }

    #[test]
    fn folds_thousands_separators() {
        assert_eq!(first_count("1,204 ratings"), Some(1_204));
        assert_eq!(first_count("12, 3 ratings"), Some(12));
    }

    #[test]
    fn rating_skips_out_of_range_values() {
        assert_eq!(first_rating("Rated 12 times, 3.8 overall"), Some(3.8));
        assert_eq!(first_rating("4.25"), None);
        assert_eq!(first_rating("N/A"), None);
    }

    #[test]
    fn percent_reads_first_value_in_range() {
        assert_eq!(first_percent("68%would take again"), Some(68.0));
        assert_eq!(first_percent("250 then 40%"), Some(40.0));
    }

    #[test]
    fn json_numbers_accept_strings() {
        assert_eq!(json_f64(&serde_json::json!("3.4")), Some(3.4));
        assert_eq!(json_f64(&serde_json::json!(2)), Some(2.0));
        assert_eq!(json_u32(&serde_json::json!(37)), Some(37));
        assert_eq!(json_u32(&serde_json::json!("37 ratings")), Some(37));
        assert_eq!(json_u32(&serde_json::json!(null)), None);
    }
}
