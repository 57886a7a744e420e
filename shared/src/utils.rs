// Display formatting shared across the toolkit: Zambian kwacha amounts and long-form dates.

pub mod zambian_format {
    use anyhow::{anyhow, Result};
    use chrono::{DateTime, NaiveDate};

    /// Currency symbol used for kwacha amounts
    pub const CURRENCY_SYMBOL: &str = "K";

    // Formats an amount as whole kwacha: 1234.5 -> "K1,235", -50 -> "-K50".
    // Rounds half away from zero. Non-finite amounts render as K0.
    pub fn format_currency(amount: f64) -> String {
        let rounded = if amount.is_finite() { amount.round() } else { 0.0 };
        let digits = format!("{:.0}", rounded.abs());
        let sign = if rounded < 0.0 { "-" } else { "" };
        format!("{}{}{}", sign, CURRENCY_SYMBOL, group_thousands(&digits))
    }

    fn group_thousands(digits: &str) -> String {
        let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
        for (i, ch) in digits.chars().enumerate() {
            if i > 0 && (digits.len() - i) % 3 == 0 {
                grouped.push(',');
            }
            grouped.push(ch);
        }
        grouped
    }

    // Parses "YYYY-MM-DD" or an RFC 3339 timestamp and renders "15 March 2026".
    pub fn format_date(value: &str) -> Result<String> {
        parse_date(value).map(format_long_date)
    }

    pub fn parse_date(value: &str) -> Result<NaiveDate> {
        let trimmed = value.trim();
        if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
            return Ok(date);
        }
        DateTime::parse_from_rfc3339(trimmed)
            .map(|dt| dt.date_naive())
            .map_err(|e| anyhow!("Failed to parse date '{}': {}", value, e))
    }

    pub fn format_long_date(date: NaiveDate) -> String {
        date.format("%-d %B %Y").to_string()
    }

}
