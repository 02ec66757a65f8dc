//! Display formatting for money cells and bound inputs.

/// Placeholder for a figure the provider did not supply.
pub const MISSING: &str = "—";

/// Insert `,` every three digits of a plain digit string.
pub fn group_digits(digits: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// US-dollar rendering with up to two fraction digits, trailing zeros
/// dropped: `$1,234`, `$1,234.5`, `-$0.07`.
pub fn usd(value: f64) -> String {
    if !value.is_finite() {
        return MISSING.to_string();
    }
    let cents = (value.abs() * 100.0).round() as u128;
    let whole = (cents / 100).to_string();
    let frac = cents % 100;

    let sign = if value < 0.0 && cents != 0 { "-" } else { "" };
    let mut out = format!("{sign}${}", group_digits(&whole));
    if frac != 0 {
        let frac = format!("{frac:02}");
        out.push('.');
        out.push_str(frac.trim_end_matches('0'));
    }
    out
}

pub fn usd_or_missing(value: Option<f64>) -> String {
    value.map_or_else(|| MISSING.to_string(), usd)
}
