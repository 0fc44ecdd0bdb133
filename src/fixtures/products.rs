//! Catalog Fixtures

use decimal_percentage::Percentage;
use rust_decimal::Decimal;
use rusty_money::iso::{Currency, EUR, GBP, USD};
use serde::Deserialize;

use crate::{
    fixtures::FixtureError,
    products::{Pricing, Product, ProductId},
};

/// Wrapper for the catalog YAML
#[derive(Debug, Deserialize)]
pub struct CatalogFixture {
    /// Store currency code
    pub currency: String,

    /// Category names shown in the shop filter
    pub categories: Vec<String>,

    /// Products in display order
    pub products: Vec<ProductFixture>,
}

/// Product Fixture
#[derive(Debug, Deserialize)]
pub struct ProductFixture {
    /// Product id
    pub id: u32,

    /// Product name
    pub name: String,

    /// Category
    pub category: String,

    /// Product price (e.g., "120 USD")
    pub price: String,

    /// Sale discount (e.g., "20%"); absent when not on sale
    #[serde(default)]
    pub sale: Option<String>,

    /// New arrival
    #[serde(default)]
    pub new: bool,

    /// Image URL
    #[serde(default)]
    pub image: Option<String>,

    /// Short description
    #[serde(default)]
    pub description: Option<String>,
}

impl ProductFixture {
    /// Build the product, checking its price is in `currency`.
    ///
    /// # Errors
    ///
    /// Returns an error if the price or discount cannot be parsed, or the
    /// price is in another currency.
    pub fn into_product(self, currency: &'static Currency) -> Result<Product, FixtureError> {
        let (price, price_currency) = parse_price(&self.price)?;

        if price_currency != currency {
            return Err(FixtureError::CurrencyMismatch(
                currency.iso_alpha_code.to_string(),
                price_currency.iso_alpha_code.to_string(),
            ));
        }

        let pricing = match &self.sale {
            Some(discount) => Pricing::discounted(price, parse_discount(discount)?),
            None => Pricing::regular(price),
        }
        .map_err(|err| FixtureError::InvalidProduct(self.id, err))?;

        Ok(Product {
            id: ProductId::new(self.id),
            name: self.name,
            category: self.category,
            pricing,
            is_new: self.new,
            image: self.image,
            description: self.description,
        })
    }
}

/// Parse price string (e.g., "2.99 USD") into an amount and currency
///
/// # Errors
///
/// Returns an error if the string is not in the format "AMOUNT CURRENCY",
/// if the amount is not a decimal number, or if the currency code is not
/// recognized.
pub fn parse_price(s: &str) -> Result<(Decimal, &'static Currency), FixtureError> {
    let parts: Vec<&str> = s.split_whitespace().collect();

    let [amount, currency_code] = parts.as_slice() else {
        return Err(FixtureError::InvalidPrice(format!(
            "Expected format 'AMOUNT CURRENCY', got: {s}"
        )));
    };

    let amount = amount
        .parse::<Decimal>()
        .map_err(|_err| FixtureError::InvalidPrice(s.to_string()))?;

    Ok((amount, parse_currency(currency_code)?))
}

/// Look up a supported ISO currency code
///
/// # Errors
///
/// Returns [`FixtureError::UnknownCurrency`] for anything but GBP, USD or EUR.
pub fn parse_currency(code: &str) -> Result<&'static Currency, FixtureError> {
    match code.trim().to_uppercase().as_str() {
        "GBP" => Ok(GBP),
        "USD" => Ok(USD),
        "EUR" => Ok(EUR),
        other => Err(FixtureError::UnknownCurrency(other.to_string())),
    }
}

/// Parse a product discount ("20%" or "20") into percentage points
///
/// # Errors
///
/// Returns [`FixtureError::InvalidPercentage`] if the number cannot be parsed.
pub fn parse_discount(s: &str) -> Result<Decimal, FixtureError> {
    let trimmed = s.trim();
    let number = trimmed.strip_suffix('%').unwrap_or(trimmed).trim();

    number
        .parse::<Decimal>()
        .map_err(|_err| FixtureError::InvalidPercentage(s.to_string()))
}

/// Parse percentage string (e.g., "20%" or "0.2") into a `Percentage`
///
/// Accepts two formats:
/// - Percentage format: "20%" for 20%
/// - Decimal format: "0.2" for 20%
///
/// # Errors
///
/// Returns [`FixtureError::InvalidPercentage`] if the string is not a decimal
/// number or falls outside 0% to 100%.
pub fn parse_percentage(s: &str) -> Result<Percentage, FixtureError> {
    let invalid = || FixtureError::InvalidPercentage(s.to_string());
    let trimmed = s.trim();

    let fraction = match trimmed.strip_suffix('%') {
        Some(points) => {
            points
                .trim()
                .parse::<Decimal>()
                .map_err(|_err| invalid())?
                / Decimal::ONE_HUNDRED
        }
        None => trimmed.parse::<Decimal>().map_err(|_err| invalid())?,
    };

    if !(Decimal::ZERO..=Decimal::ONE).contains(&fraction) {
        return Err(invalid());
    }

    Ok(Percentage::from(fraction))
}

/// Parse a non-negative money amount such as a shipping fee
///
/// # Errors
///
/// Returns [`FixtureError::InvalidPrice`] if the string is not a decimal
/// number or is negative.
pub fn parse_amount(s: &str) -> Result<Decimal, FixtureError> {
    let amount = s
        .trim()
        .parse::<Decimal>()
        .map_err(|_err| FixtureError::InvalidPrice(s.to_string()))?;

    if amount.is_sign_negative() {
        return Err(FixtureError::InvalidPrice(s.to_string()));
    }

    Ok(amount)
}
