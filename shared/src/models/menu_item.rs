//! Menu Item Model

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Upper bound accepted for a single item price
pub const MAX_PRICE: Decimal = Decimal::from_parts(1_000_000, 0, 0, false, 0);

/// Menu item entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct MenuItem {
    pub id: i64,
    pub name: String,
    /// May be empty
    pub description: String,
    /// Non-negative, serialized as a JSON number
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    /// Owning section. Items pointing at a missing section are orphans.
    pub section_id: i64,
    /// Empty, or a public URL returned by the blob store
    #[serde(default)]
    pub image_url: String,
    pub created_at: i64,
}

impl MenuItem {
    pub fn has_image(&self) -> bool {
        !self.image_url.is_empty()
    }
}

/// Create menu item payload (already validated)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MenuItemCreate {
    pub name: String,
    pub description: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    pub section_id: i64,
    #[serde(default)]
    pub image_url: String,
}

/// Why a price string was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum PriceError {
    #[error("price is empty")]
    Empty,
    #[error("price is not a number")]
    NotANumber,
    #[error("price must not be negative")]
    Negative,
    #[error("price exceeds the maximum of 1000000")]
    TooLarge,
    #[error("price has more than 2 decimal places")]
    TooPrecise,
}

/// Parse a price typed into a text field.
///
/// Accepts plain decimal notation ("150", "4.50", " 3.2 "). The decimal is
/// kept exactly as typed, so "4.50" stays 4.50 and never goes through f64.
pub fn parse_price(input: &str) -> Result<Decimal, PriceError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(PriceError::Empty);
    }
    let price = Decimal::from_str(trimmed).map_err(|_| PriceError::NotANumber)?;
    if price.is_sign_negative() && !price.is_zero() {
        return Err(PriceError::Negative);
    }
    if price > MAX_PRICE {
        return Err(PriceError::TooLarge);
    }
    // Stored as NUMERIC(12,2); finer values would be rounded by the database only
    if price.normalize().scale() > 2 {
        return Err(PriceError::TooPrecise);
    }
    // "-0" parses as a negative zero; store it as plain zero
    Ok(if price.is_zero() { Decimal::ZERO } else { price })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_typical_currency_values_exactly() {
        assert_eq!(parse_price("150").unwrap(), Decimal::new(150, 0));
        assert_eq!(parse_price("4.50").unwrap().to_string(), "4.50");
        assert_eq!(parse_price(" 0.1 ").unwrap(), Decimal::new(1, 1));
        assert_eq!(parse_price("19.99").unwrap().to_string(), "19.99");
    }

    #[test]
    fn zero_is_allowed() {
        assert_eq!(parse_price("0").unwrap(), Decimal::ZERO);
        assert_eq!(parse_price("-0").unwrap(), Decimal::ZERO);
    }

    #[test]
    fn rejects_bad_input() {
        assert_eq!(parse_price(""), Err(PriceError::Empty));
        assert_eq!(parse_price("   "), Err(PriceError::Empty));
        assert_eq!(parse_price("abc"), Err(PriceError::NotANumber));
        assert_eq!(parse_price("1,50"), Err(PriceError::NotANumber));
        assert_eq!(parse_price("NaN"), Err(PriceError::NotANumber));
        assert_eq!(parse_price("-1"), Err(PriceError::Negative));
        assert_eq!(parse_price("1000000.01"), Err(PriceError::TooLarge));
    }

    #[test]
    fn at_most_cents() {
        assert_eq!(parse_price("3.999"), Err(PriceError::TooPrecise));
        assert_eq!(parse_price("0.001"), Err(PriceError::TooPrecise));
        // Trailing zeros do not add precision
        assert_eq!(parse_price("4.500").unwrap(), Decimal::new(45, 1));
    }

    #[test]
    fn price_serializes_as_json_number() {
        let item = MenuItem {
            id: 10,
            name: "Latte".into(),
            description: String::new(),
            price: parse_price("150").unwrap(),
            section_id: 1,
            image_url: String::new(),
            created_at: 0,
        };
        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["price"], serde_json::json!(150.0));
        assert!(!item.has_image());
    }
}
