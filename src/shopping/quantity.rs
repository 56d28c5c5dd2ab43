//! Lenient quantity arithmetic.
//!
//! Quantities are free text ("200", "1.5", "une pincée"). Parsing takes the
//! longest leading numeric prefix, so "200g" reads as 200 and "1,5" as 1.

use std::sync::OnceLock;

use regex::Regex;

use super::types::DEFAULT_QUANTITY;

fn numeric_prefix() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^[+-]?(?:Infinity|(?:\d+\.?\d*|\.\d+)(?:[eE][+-]?\d+)?)")
            .expect("numeric prefix regex")
    })
}

/// Leading-prefix float parse; `None` when no number starts the string.
pub fn parse_leading(raw: &str) -> Option<f64> {
    let s = raw.trim_start();
    let m = numeric_prefix().find(s)?;
    let text = m.as_str();
    match text.trim_start_matches(['+', '-']) {
        "Infinity" => Some(if text.starts_with('-') { f64::NEG_INFINITY } else { f64::INFINITY }),
        _ => text.parse::<f64>().ok(),
    }
}

/// Unparseable quantities count as zero.
pub fn parse_or_zero(raw: &str) -> f64 {
    match parse_leading(raw) {
        Some(v) if v != 0.0 && !v.is_nan() => v,
        _ => 0.0,
    }
}

/// Absent or empty quantities count as one item.
pub fn or_default(raw: Option<&str>) -> &str {
    match raw {
        Some(q) if !q.is_empty() => q,
        _ => DEFAULT_QUANTITY,
    }
}

/// Shortest decimal form: 350.0 -> "350", 0.75 -> "0.75".
pub fn format(value: f64) -> String {
    if value.is_nan() {
        "NaN".to_string()
    } else if value.is_infinite() {
        if value > 0.0 { "Infinity".to_string() } else { "-Infinity".to_string() }
    } else if value == 0.0 {
        "0".to_string()
    } else {
        format!("{}", value)
    }
}

/// Sum an existing item's quantity with an incoming row's quantity.
///
/// An absent incoming quantity adds one; a present but non-numeric one
/// ("une pincée") adds nothing.
pub fn combine(existing: &str, incoming: Option<&str>) -> String {
    let current = parse_or_zero(existing);
    let added = parse_or_zero(or_default(incoming));
    format(current + added)
}
