//! Number formatting for reports

/// Group the integer part with `,` every three digits.
fn group_thousands(whole: u64) -> String {
    let digits = whole.to_string();
    let mut result = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.push(',');
        }
        result.push(c);
    }
    result.chars().rev().collect()
}

fn sign(value: f64) -> &'static str {
    if value < 0.0 { "-" } else { "" }
}

/// Format a currency value, e.g. `$1,234.56`
pub fn format_currency(value: f64) -> String {
    let cents_total = (value.abs() * 100.0).round() as u64;
    let dollars = cents_total / 100;
    let cents = cents_total % 100;
    format!("{}${}.{:02}", sign(value), group_thousands(dollars), cents)
}

/// Format a currency value rounded to whole dollars, e.g. `$1,235`
pub fn format_currency_short(value: f64) -> String {
    let dollars = value.abs().round() as u64;
    format!("{}${}", sign(value), group_thousands(dollars))
}

/// Format a fraction as a percentage, e.g. `0.1234` -> `12.34%`
pub fn format_percentage(value: f64) -> String {
    format!("{:.2}%", value * 100.0)
}

/// Format a value that is already in percent, e.g. `12.3456` -> `12.35%`
pub fn format_percent_points(value: f64) -> String {
    format!("{value:.2}%")
}

/// Format a currency value in compact form (e.g., $2.1M, $450K, $50)
pub fn format_compact_currency(value: f64) -> String {
    let abs_value = value.abs();
    let sign = sign(value);

    if abs_value >= 1_000_000.0 {
        format!("{}${:.1}M", sign, abs_value / 1_000_000.0)
    } else if abs_value >= 1_000.0 {
        format!("{}${:.0}K", sign, abs_value / 1_000.0)
    } else {
        format!("{}${:.0}", sign, abs_value)
    }
}
