use alloy::primitives::utils::{format_ether, parse_ether};
use alloy::primitives::U256;
use chrono::{DateTime, Local, TimeZone, Utc};

/// Gas limit of a plain value transfer (0x5208).
pub const NATIVE_TRANSFER_GAS: u64 = 21_000;

/// Renders wei as ether with trailing zeros trimmed, always keeping one
/// fractional digit: 10^18 becomes "1.0", 5 * 10^17 becomes "0.5".
pub fn format_ether_trimmed(wei: U256) -> String {
    let mut formatted = format_ether(wei);
    if !formatted.contains('.') {
        formatted.push_str(".0");
        return formatted;
    }

    let trimmed_len = formatted.trim_end_matches('0').len();
    formatted.truncate(trimmed_len);
    if formatted.ends_with('.') {
        formatted.push('0');
    }
    formatted
}

/// Parses a decimal ether string ("0.5") into wei.
pub fn parse_ether_amount(amount: &str) -> Result<U256, String> {
    let amount = amount.trim();
    if amount.is_empty() {
        return Err("amount is empty".to_string());
    }
    if amount.starts_with('-') {
        return Err(format!("amount {amount} is negative"));
    }
    parse_ether(amount).map_err(|e| format!("invalid amount {amount}: {e}"))
}

pub fn format_timestamp(unix_seconds: u64) -> String {
    format_timestamp_in(unix_seconds, &Local)
}

/// Locale-style rendering, e.g. "1/2/2024, 3:04:05 PM".
pub fn format_timestamp_in<Tz>(unix_seconds: u64, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    let utc = i64::try_from(unix_seconds)
        .ok()
        .and_then(|secs| DateTime::<Utc>::from_timestamp(secs, 0))
        .unwrap_or(DateTime::<Utc>::UNIX_EPOCH);
    utc.with_timezone(tz)
        .format("%-m/%-d/%Y, %-I:%M:%S %p")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_ether_trimmed() {
        let one_ether = U256::from(1_000_000_000_000_000_000u64);
        assert_eq!(format_ether_trimmed(one_ether), "1.0");
        assert_eq!(
            format_ether_trimmed(U256::from(500_000_000_000_000_000u64)),
            "0.5"
        );
        assert_eq!(
            format_ether_trimmed(U256::from(1_250_000_000_000_000_000u64)),
            "1.25"
        );
        assert_eq!(format_ether_trimmed(U256::ZERO), "0.0");
        assert_eq!(format_ether_trimmed(U256::from(1u64)), "0.000000000000000001");
    }

    #[test]
    fn test_parse_ether_amount() {
        assert_eq!(
            parse_ether_amount("0.5").unwrap(),
            U256::from(500_000_000_000_000_000u64)
        );
        assert_eq!(
            parse_ether_amount(" 2 ").unwrap(),
            U256::from(2_000_000_000_000_000_000u64)
        );
        assert!(parse_ether_amount("").is_err());
        assert!(parse_ether_amount("-1").is_err());
        assert!(parse_ether_amount("abc").is_err());
    }

    #[test]
    fn test_format_timestamp_in_utc() {
        assert_eq!(format_timestamp_in(0, &Utc), "1/1/1970, 12:00:00 AM");
        assert_eq!(
            format_timestamp_in(1_704_207_845, &Utc),
            "1/2/2024, 3:04:05 PM"
        );
    }
}
