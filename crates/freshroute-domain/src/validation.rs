//! Input validation and display formatting helpers

use chrono::{DateTime, Local, NaiveDate};

use freshroute_types::{Error, Result};

fn digits(text: &str) -> String {
    text.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// At least ten digits once punctuation is stripped
pub fn validate_phone(phone: &str) -> bool {
    digits(phone).len() >= 10
}

pub fn validate_package_id(package_id: &str) -> bool {
    !package_id.is_empty() && !package_id.chars().any(char::is_whitespace)
}

pub fn validate_weight(weight: f64) -> Result<f64> {
    if weight.is_finite() && weight > 0.0 {
        Ok(weight)
    } else {
        Err(Error::Validation(format!(
            "weight must be a positive number, got {}",
            weight
        )))
    }
}

/// Parse a `YYYY-MM-DD` calendar date
pub fn parse_date(text: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(text.trim(), "%Y-%m-%d")
        .map_err(|_| Error::Validation(format!("expected YYYY-MM-DD, got {:?}", text.trim())))
}

/// `(XXX) XXX-XXXX` when there are at least ten digits, otherwise unchanged
pub fn format_phone(phone: &str) -> String {
    let d = digits(phone);
    if d.len() >= 10 {
        format!("({}) {}-{}", &d[..3], &d[3..6], &d[6..10])
    } else {
        phone.to_string()
    }
}

pub fn format_weight(weight: f64) -> String {
    format!("{:.2} kg", weight)
}

pub fn format_timestamp(at: Option<&DateTime<Local>>) -> String {
    match at {
        Some(at) => at.format("%B %d, %Y %H:%M").to_string(),
        None => "N/A".to_string(),
    }
}

/// Cut to `max_len` characters, ending in "..." when shortened
pub fn truncate(text: &str, max_len: usize) -> String {
    if text.chars().count() <= max_len {
        return text.to_string();
    }
    if max_len <= 3 {
        return text.chars().take(max_len).collect();
    }
    let kept: String = text.chars().take(max_len - 3).collect();
    format!("{}...", kept)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_validate_phone() {
        assert!(validate_phone("0912-123-1212"));
        assert!(validate_phone("(555) 123-4567"));
        assert!(!validate_phone("555-1234"));
    }

    #[test]
    fn test_validate_package_id() {
        assert!(validate_package_id("PKG0001"));
        assert!(!validate_package_id(""));
        assert!(!validate_package_id("PKG 01"));
    }

    #[test]
    fn test_validate_weight() {
        assert!(validate_weight(5.5).is_ok());
        assert!(validate_weight(0.0).is_err());
        assert!(validate_weight(-1.0).is_err());
        assert!(validate_weight(f64::NAN).is_err());
    }

    #[test]
    fn test_parse_date() {
        assert_eq!(
            parse_date(" 2025-12-15 ").unwrap(),
            NaiveDate::from_ymd_opt(2025, 12, 15).unwrap()
        );
        assert!(parse_date("15/12/2025").is_err());
        assert!(parse_date("2025-02-30").is_err());
    }

    #[test]
    fn test_format_phone() {
        assert_eq!(format_phone("555.123.4567"), "(555) 123-4567");
        assert_eq!(format_phone("12345"), "12345");
    }

    #[test]
    fn test_format_weight_and_timestamp() {
        assert_eq!(format_weight(5.5), "5.50 kg");
        assert_eq!(format_timestamp(None), "N/A");
        let at = Local.with_ymd_and_hms(2025, 12, 15, 9, 30, 0).unwrap();
        assert_eq!(format_timestamp(Some(&at)), "December 15, 2025 09:30");
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("a long recipient name", 10), "a long ...");
        assert_eq!(truncate("Ñandú Express", 8), "Ñandú...");
        assert_eq!(truncate("abcdef", 2), "ab");
    }
}
