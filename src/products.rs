//! Products

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while constructing product pricing.
#[derive(Debug, Error, PartialEq)]
pub enum ProductError {
    /// Base prices must be strictly positive.
    #[error("price must be positive, got {0}")]
    NonPositivePrice(Decimal),

    /// Discount percentages live in `0..=100`.
    #[error("discount percentage must be between 0 and 100, got {0}")]
    InvalidDiscount(Decimal),
}

/// Product identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(u32);

impl ProductId {
    /// Wrap a raw identifier.
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Raw identifier value.
    pub const fn get(self) -> u32 {
        self.0
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// A discount percentage in `0..=100` (e.g. `20` for "20% off").
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DiscountPercent(Decimal);

impl DiscountPercent {
    /// Create a discount percentage.
    ///
    /// # Errors
    ///
    /// Returns [`ProductError::InvalidDiscount`] when the value is outside `0..=100`.
    pub fn new(value: Decimal) -> Result<Self, ProductError> {
        if value < Decimal::ZERO || value > Decimal::ONE_HUNDRED {
            return Err(ProductError::InvalidDiscount(value));
        }

        Ok(Self(value))
    }

    /// The percentage points, e.g. `20`.
    pub fn value(self) -> Decimal {
        self.0
    }

    /// Whether this discount leaves prices untouched.
    pub fn is_zero(self) -> bool {
        self.0.is_zero()
    }

    /// Apply the discount to a price at full precision.
    pub fn apply(self, price: Decimal) -> Decimal {
        if self.is_zero() {
            return price;
        }

        price * (Decimal::ONE - self.0 / Decimal::ONE_HUNDRED)
    }
}

impl TryFrom<Decimal> for DiscountPercent {
    type Error = ProductError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl fmt::Display for DiscountPercent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0.normalize())
    }
}

/// How a product is priced.
///
/// A product is "on sale" exactly when it is [`Pricing::Discounted`], so a
/// discount can never exist without the sale flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pricing {
    /// Sold at its base price.
    Regular {
        /// Base price
        price: Decimal,
    },

    /// On sale with a percentage taken off the base price.
    Discounted {
        /// Base price
        price: Decimal,

        /// Percentage taken off
        percentage: DiscountPercent,
    },
}

impl Pricing {
    /// Regular pricing.
    ///
    /// # Errors
    ///
    /// Returns [`ProductError::NonPositivePrice`] unless `price > 0`.
    pub fn regular(price: Decimal) -> Result<Self, ProductError> {
        ensure_positive(price)?;

        Ok(Self::Regular { price })
    }

    /// Sale pricing.
    ///
    /// # Errors
    ///
    /// Returns [`ProductError::NonPositivePrice`] unless `price > 0`, or
    /// [`ProductError::InvalidDiscount`] for a percentage outside `0..=100`.
    pub fn discounted(price: Decimal, percentage: Decimal) -> Result<Self, ProductError> {
        ensure_positive(price)?;

        Ok(Self::Discounted {
            price,
            percentage: DiscountPercent::new(percentage)?,
        })
    }

    /// Price before any discount.
    pub fn base_price(&self) -> Decimal {
        match self {
            Self::Regular { price } | Self::Discounted { price, .. } => *price,
        }
    }

    /// The active sale discount, if any.
    pub fn discount(&self) -> Option<DiscountPercent> {
        match self {
            Self::Regular { .. } => None,
            Self::Discounted { percentage, .. } => Some(*percentage),
        }
    }

    /// Whether the product is on sale.
    pub fn is_sale(&self) -> bool {
        matches!(self, Self::Discounted { .. })
    }

    /// Unit price after applying any active discount.
    pub fn effective_price(&self) -> Decimal {
        match self {
            Self::Regular { price } => *price,
            Self::Discounted { price, percentage } => percentage.apply(*price),
        }
    }
}

fn ensure_positive(price: Decimal) -> Result<(), ProductError> {
    if price > Decimal::ZERO {
        Ok(())
    } else {
        Err(ProductError::NonPositivePrice(price))
    }
}

/// Product
#[derive(Debug, Clone, PartialEq)]
pub struct Product {
    /// Unique identifier
    pub id: ProductId,

    /// Display name
    pub name: String,

    /// Category name, e.g. "Jackets"
    pub category: String,

    /// Base price and optional sale discount
    pub pricing: Pricing,

    /// Flagged as a new arrival
    pub is_new: bool,

    /// Image URL
    pub image: Option<String>,

    /// Short description shown on product cards
    pub description: Option<String>,
}

impl Product {
    /// Price before any discount.
    pub fn base_price(&self) -> Decimal {
        self.pricing.base_price()
    }

    /// Unit price after applying any active discount.
    pub fn effective_price(&self) -> Decimal {
        self.pricing.effective_price()
    }

    /// The active sale discount, if any.
    pub fn discount(&self) -> Option<DiscountPercent> {
        self.pricing.discount()
    }

    /// Whether the product is on sale.
    pub fn is_sale(&self) -> bool {
        self.pricing.is_sale()
    }
}
