/// Render a price with comma thousands separators and two decimals,
/// e.g. `6000000.0` → `6,000,000.00`.
pub fn format_price(value: f64) -> String {
    if value.is_nan() {
        return "nan".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "inf" } else { "-inf" }.to_string();
    }
    let fixed = format!("{:.2}", value.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    // the sign survives rounding to zero: -0.001 prints as -0.00
    let sign = if value.is_sign_negative() { "-" } else { "" };
    format!("{}{}.{}", sign, grouped, frac_part)
}

/// Success line shown under the form.
pub fn prediction_text(value: f64) -> String {
    format!("Predicted House Price: ₹{}", format_price(value))
}
