use rust_decimal::{Decimal, RoundingStrategy};

/// Formatea un importe: `1 450.00 €`
pub fn format_money(amount: Decimal) -> String {
    let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let formatted = format!("{:.2}", rounded.abs());
    let (integer, decimals) = formatted
        .split_once('.')
        .unwrap_or((formatted.as_str(), "00"));

    let mut grouped = String::new();
    for (i, c) in integer.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            grouped.push(' ');
        }
        grouped.push(c);
    }
    let integer: String = grouped.chars().rev().collect();

    let sign = if rounded.is_sign_negative() && !rounded.is_zero() { "-" } else { "" };
    format!("{}{}.{} €", sign, integer, decimals)
}

/// Formatea un porcentaje sin ceros sobrantes: `20 %`, `5.5 %`
pub fn format_rate(rate: Decimal) -> String {
    format!("{} %", rate.normalize())
}

/// Literal de cadena Typst (`"..."`) con comillas, barras y saltos escapados.
/// En modo markup se usa como `#{{ valor | typst_str }}`.
pub fn typst_str(value: String) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => {}
            '\t' => out.push_str("\\t"),
            other => out.push(other),
        }
    }
    out.push('"');
    out
}
