//! Utility functions and helpers

use alloy_primitives::U256;

/// Format a fixed-point amount with its decimals, trailing zeros trimmed.
pub fn format_units(amount: U256, decimals: u8) -> String {
    let digits = amount.to_string();
    let decimals = decimals as usize;
    if decimals == 0 {
        return digits;
    }

    let padded = format!("{:0>width$}", digits, width = decimals + 1);
    let (int_part, frac_part) = padded.split_at(padded.len() - decimals);
    let frac_part = frac_part.trim_end_matches('0');
    if frac_part.is_empty() {
        int_part.to_string()
    } else {
        format!("{}.{}", int_part, frac_part)
    }
}

/// Parse a human-readable decimal ("50", "0.25") into a fixed-point amount.
pub fn parse_units(value: &str, decimals: u8) -> Result<U256, String> {
    let value = value.trim();
    let (int_part, frac_part) = match value.split_once('.') {
        Some((i, f)) => (i, f),
        None => (value, ""),
    };

    if int_part.is_empty() && frac_part.is_empty() {
        return Err(format!("empty amount: {:?}", value));
    }
    if !int_part.chars().chain(frac_part.chars()).all(|c| c.is_ascii_digit()) {
        return Err(format!("not a decimal amount: {:?}", value));
    }
    if frac_part.len() > decimals as usize {
        return Err(format!(
            "{:?} has more than {} fractional digits",
            value, decimals
        ));
    }

    let digits = format!(
        "{}{:0<width$}",
        int_part,
        frac_part,
        width = decimals as usize
    );
    let digits = digits.trim_start_matches('0');
    if digits.is_empty() {
        return Ok(U256::ZERO);
    }

    U256::from_str_radix(digits, 10).map_err(|e| format!("amount {:?} out of range: {}", value, e))
}

/// Generate unique ID
pub fn generate_id() -> String {
    uuid::Uuid::new_v4().to_string()
}
