/// Insert thousands separators into a whole number
fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut result = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            result.push(',');
        }
        result.push(c);
    }
    result
}

/// Format a currency value
pub fn format_currency(value: f64) -> String {
    let cents_total = (value.abs() * 100.0).round() as u64;
    let dollars = group_thousands(cents_total / 100);
    let cents = cents_total % 100;

    if value < 0.0 && cents_total > 0 {
        format!("-${dollars}.{cents:02}")
    } else {
        format!("${dollars}.{cents:02}")
    }
}

/// Format a currency value without cents (shorter format for tight columns)
pub fn format_currency_short(value: f64) -> String {
    let dollars = value.abs().round() as u64;
    if value < 0.0 && dollars > 0 {
        format!("-${}", group_thousands(dollars))
    } else {
        format!("${}", group_thousands(dollars))
    }
}

/// Format a fractional rate as a percentage (0.358 → "35.80%")
pub fn format_percentage(value: f64) -> String {
    format!("{:.2}%", value * 100.0)
}

/// Format a share count with thousands separators
pub fn format_shares(shares: u64) -> String {
    group_thousands(shares)
}
