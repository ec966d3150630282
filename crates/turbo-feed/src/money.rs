//! Product prices.
//!
//! The backend reports prices as decimals with a currency code. They are
//! held here as integer minor units so display and equality are exact.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Currencies affiliate products are listed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Currency {
    #[default]
    USD,
    EUR,
    GBP,
    JPY,
    CAD,
    AUD,
    INR,
}

/// Code, symbol and minor-unit exponent per currency.
const CURRENCIES: [(Currency, &str, &str, u32); 7] = [
    (Currency::USD, "USD", "$", 2),
    (Currency::EUR, "EUR", "€", 2),
    (Currency::GBP, "GBP", "£", 2),
    (Currency::JPY, "JPY", "¥", 0),
    (Currency::CAD, "CAD", "CA$", 2),
    (Currency::AUD, "AUD", "A$", 2),
    (Currency::INR, "INR", "₹", 2),
];

impl Currency {
    fn entry(&self) -> &'static (Currency, &'static str, &'static str, u32) {
        // Every variant has a row.
        &CURRENCIES[*self as usize]
    }

    /// ISO 4217 code.
    pub fn code(&self) -> &'static str {
        self.entry().1
    }

    pub fn symbol(&self) -> &'static str {
        self.entry().2
    }

    /// Digits after the decimal point.
    pub fn exponent(&self) -> u32 {
        self.entry().3
    }

    /// Look up a currency by code, ignoring case.
    pub fn from_code(code: &str) -> Option<Self> {
        CURRENCIES
            .iter()
            .find(|(_, c, _, _)| c.eq_ignore_ascii_case(code.trim()))
            .map(|(currency, _, _, _)| *currency)
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// A price in minor units (cents, pence; whole yen).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct Money {
    pub minor_units: i64,
    pub currency: Currency,
}

impl Money {
    pub fn new(minor_units: i64, currency: Currency) -> Self {
        Self {
            minor_units,
            currency,
        }
    }

    /// Convert a backend decimal price, rounding to the nearest minor unit.
    ///
    /// ```
    /// use turbo_feed::money::{Currency, Money};
    /// let price = Money::from_decimal(12.5, Currency::EUR);
    /// assert_eq!(price.minor_units, 1250);
    /// ```
    pub fn from_decimal(amount: f64, currency: Currency) -> Self {
        let scale = 10_f64.powi(currency.exponent() as i32);
        Self::new((amount * scale).round() as i64, currency)
    }

    pub fn as_decimal(&self) -> f64 {
        self.minor_units as f64 / 10_f64.powi(self.currency.exponent() as i32)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let places = self.currency.exponent() as usize;
        write!(f, "{}{:.places$}", self.currency.symbol(), self.as_decimal())
    }
}
