//! Pricing
//!
//! Order totals are derived from cart lines on every call and never cached.
//! All arithmetic runs on [`Decimal`] at full precision; values are rounded to
//! the currency's minor units only when converted to [`Money`] for display.

use decimal_percentage::Percentage;
use rust_decimal::{Decimal, RoundingStrategy};
use rusty_money::{
    Money,
    iso::{self, Currency},
};

use crate::cart::CartLine;

/// Flat-fee shipping with a free-shipping threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShippingPolicy {
    /// Subtotals strictly above this ship free.
    pub free_over: Decimal,

    /// Fee charged otherwise.
    pub flat_fee: Decimal,
}

impl ShippingPolicy {
    /// Shipping charged for a subtotal.
    pub fn shipping_for(&self, subtotal: Decimal) -> Decimal {
        if subtotal > self.free_over {
            Decimal::ZERO
        } else {
            self.flat_fee
        }
    }
}

impl Default for ShippingPolicy {
    fn default() -> Self {
        Self {
            free_over: Decimal::ONE_HUNDRED,
            flat_fee: Decimal::TEN,
        }
    }
}

/// Pricing constants for the store.
#[derive(Debug, Clone, Copy)]
pub struct PricingConfig {
    /// Store currency
    pub currency: &'static Currency,

    /// Fraction of the subtotal taken off by an applied promo code
    pub promo_rate: Percentage,

    /// Shipping rules
    pub shipping: ShippingPolicy,
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            currency: iso::USD,
            promo_rate: Percentage::from(Decimal::new(2, 1)),
            shipping: ShippingPolicy::default(),
        }
    }
}

/// Derived order totals.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrderTotals {
    subtotal: Decimal,
    discount: Decimal,
    shipping: Decimal,
    total: Decimal,
    currency: &'static Currency,
}

impl OrderTotals {
    /// Sum of effective unit price times quantity.
    pub fn subtotal(&self) -> Decimal {
        self.subtotal
    }

    /// Promo discount taken off the subtotal.
    pub fn discount(&self) -> Decimal {
        self.discount
    }

    /// Shipping charge.
    pub fn shipping(&self) -> Decimal {
        self.shipping
    }

    /// Amount due, never negative.
    pub fn total(&self) -> Decimal {
        self.total
    }

    /// Currency of every amount.
    pub fn currency(&self) -> &'static Currency {
        self.currency
    }

    /// Whether shipping is waived.
    pub fn is_free_shipping(&self) -> bool {
        self.shipping.is_zero()
    }

    /// Whether a promo discount was taken.
    pub fn has_discount(&self) -> bool {
        !self.discount.is_zero()
    }

    /// Subtotal rounded for display.
    pub fn subtotal_money(&self) -> Money<'static, Currency> {
        display_money(self.subtotal, self.currency)
    }

    /// Discount rounded for display.
    pub fn discount_money(&self) -> Money<'static, Currency> {
        display_money(self.discount, self.currency)
    }

    /// Shipping rounded for display.
    pub fn shipping_money(&self) -> Money<'static, Currency> {
        display_money(self.shipping, self.currency)
    }

    /// Total rounded for display.
    pub fn total_money(&self) -> Money<'static, Currency> {
        display_money(self.total, self.currency)
    }
}

/// Round an amount to the currency's minor units for display.
pub fn display_money(amount: Decimal, currency: &'static Currency) -> Money<'static, Currency> {
    let rounded =
        amount.round_dp_with_strategy(currency.exponent, RoundingStrategy::MidpointAwayFromZero);

    Money::from_decimal(rounded, currency)
}

/// Calculates order totals for a list of cart lines.
///
/// - `subtotal` = Σ effective unit price × quantity
/// - `discount` = `subtotal × promo_rate` when a promo is applied
/// - `shipping` = 0 when `subtotal > free_over`, else the flat fee
/// - `total` = `max(0, subtotal − discount + shipping)`
///
/// Total for any input, including an empty line list.
pub fn compute_totals(
    lines: &[CartLine],
    promo_applied: bool,
    config: &PricingConfig,
) -> OrderTotals {
    let subtotal: Decimal = lines.iter().map(CartLine::line_total).sum();

    let discount = if promo_applied {
        config.promo_rate * subtotal
    } else {
        Decimal::ZERO
    };

    let shipping = config.shipping.shipping_for(subtotal);
    let total = (subtotal - discount + shipping).max(Decimal::ZERO);

    debug_assert!(total >= Decimal::ZERO, "order total must never be negative");

    OrderTotals {
        subtotal,
        discount,
        shipping,
        total,
        currency: config.currency,
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;
    use testresult::TestResult;

    use crate::{
        cart::{CartLine, Quantity, Variant},
        products::{DiscountPercent, ProductId},
    };

    use super::*;

    fn line(id: u32, price: Decimal, quantity: u32, discount: Option<Decimal>) -> TestResult<CartLine> {
        Ok(CartLine::new(
            ProductId::new(id),
            format!("Product {id}"),
            price,
            Quantity::new(quantity).ok_or("quantity must be positive")?,
            Variant::new("M", "Black"),
            discount.map(DiscountPercent::new).transpose()?,
        ))
    }

    #[test]
    fn worked_example_with_promo() -> TestResult {
        let lines = [
            line(1, dec!(120), 1, None)?,
            line(4, dec!(90), 1, Some(dec!(20)))?,
        ];

        let totals = compute_totals(&lines, true, &PricingConfig::default());

        assert_eq!(totals.subtotal(), dec!(192));
        assert_eq!(totals.discount_money(), Money::from_minor(3840, iso::USD));
        assert_eq!(totals.shipping(), dec!(0));
        assert_eq!(totals.total_money(), Money::from_minor(15360, iso::USD));
        assert!(totals.is_free_shipping());
        assert!(totals.has_discount());

        Ok(())
    }

    #[test]
    fn empty_lines_charge_flat_shipping() {
        let totals = compute_totals(&[], true, &PricingConfig::default());

        assert_eq!(totals.subtotal(), dec!(0));
        assert_eq!(totals.discount(), dec!(0));
        assert_eq!(totals.shipping(), dec!(10));
        assert_eq!(totals.total(), dec!(10));
    }

    #[test]
    fn exact_threshold_is_not_free() -> TestResult {
        let at = compute_totals(
            &[line(1, dec!(50), 2, None)?],
            false,
            &PricingConfig::default(),
        );
        let above = compute_totals(
            &[line(1, dec!(100.01), 1, None)?],
            false,
            &PricingConfig::default(),
        );

        assert_eq!(at.shipping(), dec!(10));
        assert_eq!(at.total(), dec!(110));
        assert_eq!(above.shipping(), dec!(0));

        Ok(())
    }

    #[test]
    fn threshold_compares_pre_discount_subtotal() -> TestResult {
        // 110 ships free even though the promo brings it to 88.
        let totals = compute_totals(
            &[line(1, dec!(110), 1, None)?],
            true,
            &PricingConfig::default(),
        );

        assert_eq!(totals.shipping(), dec!(0));
        assert_eq!(totals.total_money(), Money::from_minor(8800, iso::USD));

        Ok(())
    }

    #[test]
    fn quantity_multiplies_effective_price() -> TestResult {
        let totals = compute_totals(
            &[line(8, dec!(95), 3, Some(dec!(15)))?],
            false,
            &PricingConfig::default(),
        );

        assert_eq!(totals.subtotal(), dec!(242.25));

        Ok(())
    }

    #[test]
    fn configured_constants_are_used() -> TestResult {
        let config = PricingConfig {
            currency: iso::EUR,
            promo_rate: Percentage::from(0.5),
            shipping: ShippingPolicy {
                free_over: dec!(500),
                flat_fee: dec!(4.99),
            },
        };

        let totals = compute_totals(&[line(1, dec!(120), 1, None)?], true, &config);

        assert_eq!(totals.discount(), dec!(60));
        assert_eq!(totals.shipping(), dec!(4.99));
        assert_eq!(totals.total(), dec!(64.99));
        assert_eq!(totals.currency(), iso::EUR);

        Ok(())
    }

    #[test]
    fn total_is_clamped_at_zero() -> TestResult {
        let config = PricingConfig {
            promo_rate: Percentage::from(2.0),
            shipping: ShippingPolicy {
                free_over: dec!(0),
                flat_fee: dec!(0),
            },
            ..PricingConfig::default()
        };

        let totals = compute_totals(&[line(1, dec!(10), 1, None)?], true, &config);

        assert_eq!(totals.total(), dec!(0));

        Ok(())
    }

    #[test]
    fn rounding_happens_only_for_display() -> TestResult {
        // 3 × 33.335 keeps its third decimal internally.
        let totals = compute_totals(
            &[line(1, dec!(33.335), 3, None)?],
            false,
            &PricingConfig::default(),
        );

        assert_eq!(totals.subtotal(), dec!(100.005));
        assert_eq!(totals.shipping(), dec!(0));
        assert_eq!(totals.subtotal_money(), Money::from_minor(10001, iso::USD));

        Ok(())
    }

    #[test]
    fn display_money_rounds_half_away_from_zero() {
        assert_eq!(
            display_money(dec!(0.125), iso::USD),
            Money::from_minor(13, iso::USD)
        );
        assert_eq!(
            display_money(dec!(153.6), iso::USD),
            Money::from_minor(15360, iso::USD)
        );
    }
}
