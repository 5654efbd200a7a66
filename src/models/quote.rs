use serde::{Deserialize, Serialize};

use crate::utils::price::{DEFAULT_TAX_RATE, compute_quote, deserialize_unit_price, round_cents};

#[derive(Debug, Serialize, Deserialize, Clone, Copy, Default, PartialEq)]
pub struct Quote {
    pub subtotal: f64,
    pub tax: f64,
    pub total: f64,
}

impl Quote {
    pub fn display_total(&self) -> f64 {
        round_cents(self.total)
    }

    pub fn display_total_string(&self) -> String {
        format!("{:.2}", self.display_total())
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct QuoteRequest {
    #[serde(deserialize_with = "deserialize_unit_price")]
    pub unit_price: f64,
    pub quantity: u32,
    #[serde(default = "default_tax_rate")]
    pub tax_rate: f64,
}

fn default_tax_rate() -> f64 {
    DEFAULT_TAX_RATE
}

impl QuoteRequest {
    pub fn quote(&self) -> Quote {
        compute_quote(self.unit_price, self.quantity, self.tax_rate)
    }
}
