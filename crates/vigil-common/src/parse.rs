//! Parsing of storefront-rendered values.

/// Extract a price from text such as `"$1,045.00"`.
///
/// Everything except digits and the decimal point is dropped. Text that still
/// does not parse yields `0.0`, the documented fallback for prices.
pub fn parse_price(text: &str) -> f64 {
    let cleaned: String = text
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    cleaned.parse::<f64>().unwrap_or(0.0)
}

/// Parse an integer counter (cart badge, quantity input). Empty or
/// non-numeric text yields `None`.
pub fn parse_count(text: &str) -> Option<u32> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<u32>().ok()
}

/// Compare two money amounts within an absolute tolerance.
pub fn within_tolerance(actual: f64, expected: f64, tolerance: f64) -> bool {
    (actual - expected).abs() <= tolerance + 1e-9
}
