use thiserror::Error;

/// Amounts are stored as integer cents so sums stay exact.
/// 1 unit = 100 cents, so 12.50 = 1250 cents.
pub type Cents = i64;

/// Largest amount a single expense or budget may hold (100 billion units).
/// Keeps report totals far from the `i64` range.
pub const MAX_AMOUNT_CENTS: Cents = 10_000_000_000_000;

/// Whether `cents` is an acceptable expense or budget amount.
pub fn is_valid_amount(cents: Cents) -> bool {
    (0..=MAX_AMOUNT_CENTS).contains(&cents)
}

/// Format cents as a plain decimal string.
/// Example: 1250 -> "12.50", -5 -> "-0.05"
pub fn format_cents(cents: Cents) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let abs_cents = cents.unsigned_abs();
    format!("{}{}.{:02}", sign, abs_cents / 100, abs_cents % 100)
}

/// Parse a decimal string into cents.
/// Example: "12.50" -> 1250, "12.5" -> 1250, "7" -> 700
///
/// Digits past the second decimal place are truncated. A leading `-` is
/// accepted here; callers that need non-negative amounts check the sign.
pub fn parse_cents(input: &str) -> Result<Cents, ParseMoneyError> {
    let input = input.trim();
    if input.is_empty() {
        return Err(ParseMoneyError::Empty);
    }

    let (negative, digits) = match input.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, input),
    };

    let (units_str, fraction_str) = match digits.split_once('.') {
        Some((units, fraction)) => (units, fraction),
        None => (digits, ""),
    };

    if units_str.is_empty() && fraction_str.is_empty() {
        return Err(ParseMoneyError::InvalidFormat(input.to_string()));
    }
    let all_digits = |s: &str| s.chars().all(|c| c.is_ascii_digit());
    if !all_digits(units_str) || !all_digits(fraction_str) {
        return Err(ParseMoneyError::InvalidFormat(input.to_string()));
    }

    let units: i64 = if units_str.is_empty() {
        0
    } else {
        units_str
            .parse()
            .map_err(|_| ParseMoneyError::InvalidFormat(input.to_string()))?
    };

    let fraction: i64 = match fraction_str.len() {
        0 => 0,
        1 => fraction_str.parse::<i64>().unwrap_or(0) * 10,
        _ => fraction_str[..2].parse().unwrap_or(0),
    };

    let cents = units
        .checked_mul(100)
        .and_then(|c| c.checked_add(fraction))
        .ok_or_else(|| ParseMoneyError::InvalidFormat(input.to_string()))?;

    Ok(if negative { -cents } else { cents })
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseMoneyError {
    #[error("amount is empty")]
    Empty,

    #[error("invalid amount '{0}', expected a decimal like 12.50")]
    InvalidFormat(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_cents() {
        assert_eq!(format_cents(1250), "12.50");
        assert_eq!(format_cents(100), "1.00");
        assert_eq!(format_cents(7), "0.07");
        assert_eq!(format_cents(0), "0.00");
        assert_eq!(format_cents(-5), "-0.05");
    }

    #[test]
    fn test_parse_cents() {
        assert_eq!(parse_cents("12.50"), Ok(1250));
        assert_eq!(parse_cents("12.5"), Ok(1250));
        assert_eq!(parse_cents("7"), Ok(700));
        assert_eq!(parse_cents(".25"), Ok(25));
        assert_eq!(parse_cents("3."), Ok(300));
        assert_eq!(parse_cents(" 0.01 "), Ok(1));
        assert_eq!(parse_cents("10.999"), Ok(1099));
        assert_eq!(parse_cents("-4.20"), Ok(-420));
    }

    #[test]
    fn test_amount_bounds() {
        assert!(is_valid_amount(0));
        assert!(is_valid_amount(MAX_AMOUNT_CENTS));
        assert!(!is_valid_amount(MAX_AMOUNT_CENTS + 1));
        assert!(!is_valid_amount(-1));
    }

    #[test]
    fn test_parse_cents_invalid() {
        assert_eq!(parse_cents(""), Err(ParseMoneyError::Empty));
        assert!(parse_cents("abc").is_err());
        assert!(parse_cents("1.2.3").is_err());
        assert!(parse_cents(".").is_err());
        assert!(parse_cents("1e5").is_err());
    }
}
