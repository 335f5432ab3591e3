//! Type-safe price representation in currency minor units.
//!
//! The backend quotes every amount as an integer in minor units (paise,
//! cents) exactly as the payment gateway consumes it, so prices stay
//! integers end to end. No floating point, no decimal arithmetic.

use core::fmt;
use core::ops::Mul;

use serde::{Deserialize, Serialize};

/// A price in currency minor units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Price {
    /// Amount in the smallest currency unit (e.g. paise for INR).
    pub amount_minor: i64,
    /// ISO 4217 currency code.
    pub currency: Currency,
}

impl Price {
    /// Create a new price from minor units.
    #[must_use]
    pub const fn new(amount_minor: i64, currency: Currency) -> Self {
        Self {
            amount_minor,
            currency,
        }
    }

    /// Whether this price is zero (free event).
    #[must_use]
    pub const fn is_zero(&self) -> bool {
        self.amount_minor == 0
    }
}

impl Mul<u32> for Price {
    type Output = Self;

    /// Multiply by a ticket quantity. Saturates rather than wrapping;
    /// real totals are nowhere near `i64::MAX` minor units.
    fn mul(self, quantity: u32) -> Self {
        Self {
            amount_minor: self.amount_minor.saturating_mul(i64::from(quantity)),
            currency: self.currency,
        }
    }
}

impl fmt::Display for Price {
    /// Format for display (e.g. "₹500.00").
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let whole = self.amount_minor / 100;
        let minor = (self.amount_minor % 100).abs();
        write!(f, "{}{whole}.{minor:02}", self.currency.symbol())
    }
}

/// ISO 4217 currency codes accepted by the booking backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    #[default]
    Inr,
    Usd,
    Eur,
}

impl Currency {
    /// Display symbol for the currency.
    #[must_use]
    pub const fn symbol(&self) -> &'static str {
        match self {
            Self::Inr => "₹",
            Self::Usd => "$",
            Self::Eur => "€",
        }
    }

    /// ISO 4217 code as passed to the checkout gateway.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Inr => "INR",
            Self::Usd => "USD",
            Self::Eur => "EUR",
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_quantity_multiplication() {
        let unit = Price::new(50_000, Currency::Inr);
        let total = unit * 2;
        assert_eq!(total.amount_minor, 100_000);
        assert_eq!(total.currency, Currency::Inr);
    }

    #[test]
    fn test_display_formats_minor_units() {
        assert_eq!(Price::new(50_000, Currency::Inr).to_string(), "₹500.00");
        assert_eq!(Price::new(199, Currency::Usd).to_string(), "$1.99");
        assert_eq!(Price::new(5, Currency::Eur).to_string(), "€0.05");
    }

    #[test]
    fn test_currency_wire_format() {
        let json = serde_json::to_string(&Currency::Inr).unwrap();
        assert_eq!(json, "\"INR\"");
        let parsed: Currency = serde_json::from_str("\"USD\"").unwrap();
        assert_eq!(parsed, Currency::Usd);
    }

    #[test]
    fn test_is_zero() {
        assert!(Price::new(0, Currency::Inr).is_zero());
        assert!(!Price::new(1, Currency::Inr).is_zero());
    }
}
