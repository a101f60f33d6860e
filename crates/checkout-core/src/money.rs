//! # Money Helpers
//!
//! Amounts are always held and transmitted in minor units (paise, cents).
//! Conversion to major units happens only for display and for parsing
//! what the user types.

/// Minor units per major unit for every currency this form accepts
pub const MINOR_PER_MAJOR: i64 = 100;

/// Display symbol for an ISO 4217 code
pub fn currency_symbol(currency: &str) -> String {
    match currency.to_ascii_uppercase().as_str() {
        "INR" => "₹".to_string(),
        "USD" => "$".to_string(),
        "EUR" => "€".to_string(),
        "GBP" => "£".to_string(),
        other => format!("{} ", other),
    }
}

/// Format a minor-unit amount in major units (e.g. `100050` INR -> "₹1000.50")
///
/// Whole amounts drop the fractional part, matching what the form shows
/// while the user is typing.
pub fn format_major(amount_minor: i64, currency: &str) -> String {
    let symbol = currency_symbol(currency);
    let sign = if amount_minor < 0 { "-" } else { "" };
    let abs = amount_minor.unsigned_abs();
    let major = abs / MINOR_PER_MAJOR as u64;
    let minor = abs % MINOR_PER_MAJOR as u64;
    if minor == 0 {
        format!("{}{}{}", sign, symbol, major)
    } else {
        format!("{}{}{}.{:02}", sign, symbol, major, minor)
    }
}

/// Parse what the user typed into the amount field as minor units.
///
/// Reads the leading integer (so "12.5" is 12 major units), multiplies by
/// 100, and yields 0 for anything unparsable. Negative entries clamp to 0.
pub fn parse_major_input(input: &str) -> i64 {
    let trimmed = input.trim();
    let (negative, digits) = match trimmed.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, trimmed.strip_prefix('+').unwrap_or(trimmed)),
    };

    let leading: String = digits.chars().take_while(|c| c.is_ascii_digit()).collect();
    if negative || leading.is_empty() {
        return 0;
    }

    leading
        .parse::<i64>()
        .ok()
        .and_then(|major| major.checked_mul(MINOR_PER_MAJOR))
        .unwrap_or(0)
}
