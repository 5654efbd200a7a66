use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::models::quote::Quote;

pub const DEFAULT_TAX_RATE: f64 = 0.12;

/// Coerces a listing's price field to a unit price.
///
/// Numbers pass through, strings are parsed the way a form field would be
/// (surrounding whitespace ignored). Anything else, including negative or
/// non-finite results, becomes 0.
pub fn parse_unit_price(value: &Value) -> f64 {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };

    match parsed {
        Some(amount) if amount.is_finite() && amount >= 0.0 => amount,
        _ => 0.0,
    }
}

/// Serde hook for price fields that may arrive as numbers or strings.
pub fn deserialize_unit_price<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(parse_unit_price(&value))
}

/// Computes subtotal, tax and total. The quantity is taken as given: clamping
/// to the listing's participant bounds happens before this is called.
pub fn compute_quote(unit_price: f64, quantity: u32, tax_rate: f64) -> Quote {
    let subtotal = unit_price * quantity as f64;
    let tax = subtotal * tax_rate;

    Quote {
        subtotal,
        tax,
        total: subtotal + tax,
    }
}

pub fn compute_quote_default(unit_price: f64, quantity: u32) -> Quote {
    compute_quote(unit_price, quantity, DEFAULT_TAX_RATE)
}

pub fn round_cents(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}
