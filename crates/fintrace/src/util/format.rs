/// Insert thousands separators into a whole-dollar amount
fn group_thousands(dollars: u64) -> String {
    let digits = dollars.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    grouped
}

/// Format a currency value, e.g. `-$1,234.50`
pub fn format_currency(value: f64) -> String {
    let cents = (value.abs() * 100.0).round() as u64;
    let sign = if value < 0.0 && cents > 0 { "-" } else { "" };
    format!("{sign}${}.{:02}", group_thousands(cents / 100), cents % 100)
}

/// Format a currency value without cents
pub fn format_currency_short(value: f64) -> String {
    let dollars = value.abs().round() as u64;
    let sign = if value < 0.0 && dollars > 0 { "-" } else { "" };
    format!("{sign}${}", group_thousands(dollars))
}

/// Format a month count as a share of the total, e.g. `23/24 (95.8%)`
pub fn format_share(count: usize, total: usize) -> String {
    if total == 0 {
        return "0/0".to_string();
    }
    format!("{count}/{total} ({:.1}%)", count as f64 / total as f64 * 100.0)
}
