/// Normalizes a display amount to its integer value by keeping only ASCII
/// digits: "₹1,80,000" becomes 180000. Empty or digit-free input maps to 0.
pub fn normalize_amount(raw: &str) -> i64 {
    let digits: String = raw.chars().filter(|c| c.is_ascii_digit()).collect();
    digits.parse().unwrap_or(0)
}
