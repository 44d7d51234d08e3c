//! Display formatting for wallet data.

/// Largest `decimals` value treated as meaningful. Anything above it is
/// malformed upstream data.
pub const MAX_DECIMALS: u32 = 255;

/// Divide a raw integer amount by `10^decimals` without going through floats.
///
/// Trailing fractional zeros are stripped and the fraction is omitted when it
/// is zero. Returns `None` when `raw` is not a decimal integer or `decimals`
/// exceeds [`MAX_DECIMALS`], in which case callers show the raw string.
pub fn format_token_amount(raw: &str, decimals: u32) -> Option<String> {
    if decimals > MAX_DECIMALS {
        return None;
    }
    let raw = raw.trim();
    let (negative, digits) = match raw.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, raw),
    };
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    let digits = digits.trim_start_matches('0');
    let decimals = decimals as usize;

    // Left-pad so there is always at least one integer digit.
    let padded = if digits.len() <= decimals {
        format!("{}{digits}", "0".repeat(decimals + 1 - digits.len()))
    } else {
        digits.to_string()
    };

    let split = padded.len() - decimals;
    let (int_part, frac_part) = padded.split_at(split);
    let frac_part = frac_part.trim_end_matches('0');

    let mut out = String::with_capacity(padded.len() + 2);
    if negative && (int_part != "0" || !frac_part.is_empty()) {
        out.push('-');
    }
    out.push_str(int_part);
    if !frac_part.is_empty() {
        out.push('.');
        out.push_str(frac_part);
    }
    Some(out)
}

/// `$1,234.57`: two decimals, thousands separators, leading `-` for
/// negatives. Non-finite input renders as `$0.00`.
pub fn format_usd(value: f64) -> String {
    if !value.is_finite() {
        return "$0.00".to_string();
    }

    let cents = (value.abs() * 100.0).round() as u128;
    let whole = group_thousands(&(cents / 100).to_string());
    let sign = if value < 0.0 && cents > 0 { "-" } else { "" };
    format!("{sign}${whole}.{:02}", cents % 100)
}

fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// `0x1234...abcd` for anything longer than ten characters.
pub fn short_address(address: &str) -> String {
    let chars: Vec<char> = address.chars().collect();
    if chars.len() <= 10 {
        return address.to_string();
    }
    let head: String = chars[..6].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{head}...{tail}")
}

pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Render an RFC 3339 timestamp as `Jan 2, 2025 14:05 UTC`. Unparseable input
/// is returned unchanged.
pub fn format_timestamp(raw: &str) -> String {
    match chrono::DateTime::parse_from_rfc3339(raw) {
        Ok(ts) => ts.to_utc().format("%b %-d, %Y %H:%M UTC").to_string(),
        Err(_) => raw.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_amount_divides_exactly() {
        assert_eq!(
            format_token_amount("1500000000000000000", 18).as_deref(),
            Some("1.5")
        );
        assert_eq!(format_token_amount("123456789", 6).as_deref(), Some("123.456789"));
        assert_eq!(format_token_amount("1000000", 6).as_deref(), Some("1"));
    }

    #[test]
    fn token_amount_pads_small_values() {
        assert_eq!(format_token_amount("5", 18).as_deref(), Some("0.000000000000000005"));
        assert_eq!(format_token_amount("0", 18).as_deref(), Some("0"));
        assert_eq!(format_token_amount("000120", 2).as_deref(), Some("1.2"));
    }

    #[test]
    fn token_amount_with_zero_decimals_is_the_integer() {
        assert_eq!(format_token_amount("42", 0).as_deref(), Some("42"));
        assert_eq!(format_token_amount("-42", 0).as_deref(), Some("-42"));
    }

    #[test]
    fn token_amount_keeps_precision_beyond_f64() {
        assert_eq!(
            format_token_amount("123456789012345678901234567890", 18).as_deref(),
            Some("123456789012.34567890123456789")
        );
    }

    #[test]
    fn token_amount_rejects_non_numeric() {
        assert!(format_token_amount("", 18).is_none());
        assert!(format_token_amount("-", 18).is_none());
        assert!(format_token_amount("1.5", 18).is_none());
        assert!(format_token_amount("0xff", 18).is_none());
    }

    #[test]
    fn token_amount_rejects_absurd_decimals() {
        assert_eq!(
            format_token_amount("1", MAX_DECIMALS).map(|s| s.len()),
            Some(MAX_DECIMALS as usize + 2)
        );
        assert!(format_token_amount("1", MAX_DECIMALS + 1).is_none());
        assert!(format_token_amount("1", 400_000_000).is_none());
        assert!(format_token_amount("1", u32::MAX).is_none());
    }

    #[test]
    fn usd_formatting() {
        assert_eq!(format_usd(0.0), "$0.00");
        assert_eq!(format_usd(1234.567), "$1,234.57");
        assert_eq!(format_usd(999.999), "$1,000.00");
        assert_eq!(format_usd(1_234_567.1), "$1,234,567.10");
        assert_eq!(format_usd(-42.5), "-$42.50");
        assert_eq!(format_usd(-0.001), "$0.00");
        assert_eq!(format_usd(f64::NAN), "$0.00");
    }

    #[test]
    fn short_address_truncates_long_values() {
        assert_eq!(
            short_address("0xd8da6bf26964af9d7eed9e03e53415d37aa96045"),
            "0xd8da...6045"
        );
        assert_eq!(short_address("0xabc"), "0xabc");
        assert_eq!(short_address("0123456789"), "0123456789");
    }

    #[test]
    fn capitalize_first_letter() {
        assert_eq!(capitalize("receive"), "Receive");
        assert_eq!(capitalize(""), "");
    }

    #[test]
    fn timestamps() {
        assert_eq!(
            format_timestamp("2025-01-02T14:05:09+00:00"),
            "Jan 2, 2025 14:05 UTC"
        );
        assert_eq!(
            format_timestamp("2025-01-02T16:05:09+02:00"),
            "Jan 2, 2025 14:05 UTC"
        );
        assert_eq!(format_timestamp("yesterday"), "yesterday");
    }
}
