//! Cart

use std::fmt;

use rust_decimal::Decimal;
use thiserror::Error;
use uuid::Uuid;

use crate::{
    notifications::{Notification, NotificationSink},
    pricing::{OrderTotals, PricingConfig, compute_totals},
    products::{DiscountPercent, Product, ProductId},
    promo::{AcceptedPromo, PromoError, PromoValidator},
};

mod quantity;

pub use quantity::{Quantity, set_quantity};

/// Cart operation errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CartError {
    /// No line with this id is in the cart.
    #[error("cart line {0} not found")]
    LineNotFound(LineId),
}

/// Cart line identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LineId(Uuid);

impl LineId {
    fn generate() -> Self {
        Self(Uuid::now_v7())
    }
}

impl fmt::Display for LineId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// Selected size and color.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Variant {
    /// Size label, e.g. "M"
    pub size: String,

    /// Color name, e.g. "Black"
    pub color: String,
}

impl Variant {
    /// Create a variant.
    pub fn new(size: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            size: size.into(),
            color: color.into(),
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Size: {}, Color: {}", self.size, self.color)
    }
}

/// One product/variant entry in the cart.
///
/// The discount is captured when the line is created and is not refreshed if
/// the product's sale status changes afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartLine {
    id: LineId,
    product_id: ProductId,
    name: String,
    unit_price: Decimal,
    quantity: Quantity,
    variant: Variant,
    discount: Option<DiscountPercent>,
}

impl CartLine {
    /// Create a line with an explicit (frozen) discount.
    pub fn new(
        product_id: ProductId,
        name: impl Into<String>,
        unit_price: Decimal,
        quantity: Quantity,
        variant: Variant,
        discount: Option<DiscountPercent>,
    ) -> Self {
        Self {
            id: LineId::generate(),
            product_id,
            name: name.into(),
            unit_price,
            quantity,
            variant,
            discount,
        }
    }

    /// Create a line from a product, freezing its current sale discount.
    pub fn from_product(product: &Product, variant: Variant, quantity: Quantity) -> Self {
        Self::new(
            product.id,
            product.name.clone(),
            product.base_price(),
            quantity,
            variant,
            product.discount(),
        )
    }

    /// Line identifier.
    pub fn id(&self) -> LineId {
        self.id
    }

    /// Referenced product.
    pub fn product_id(&self) -> ProductId {
        self.product_id
    }

    /// Product name at add time.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Base unit price at add time.
    pub fn unit_price(&self) -> Decimal {
        self.unit_price
    }

    /// Quantity.
    pub fn quantity(&self) -> Quantity {
        self.quantity
    }

    /// Selected size and color.
    pub fn variant(&self) -> &Variant {
        &self.variant
    }

    /// Discount frozen at add time.
    pub fn discount(&self) -> Option<DiscountPercent> {
        self.discount
    }

    /// Unit price after the frozen discount.
    pub fn effective_unit_price(&self) -> Decimal {
        self.discount
            .map_or(self.unit_price, |discount| discount.apply(self.unit_price))
    }

    /// Effective unit price times quantity.
    pub fn line_total(&self) -> Decimal {
        self.effective_unit_price() * Decimal::from(self.quantity.get())
    }

    fn matches(&self, product_id: ProductId, variant: &Variant) -> bool {
        self.product_id == product_id && self.variant == *variant
    }
}

/// Shopping cart for a single session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cart {
    lines: Vec<CartLine>,
    promo: Option<AcceptedPromo>,
}

impl Cart {
    /// An empty cart.
    pub fn new() -> Self {
        Self::default()
    }

    /// A cart seeded with lines.
    pub fn with_lines(lines: impl Into<Vec<CartLine>>) -> Self {
        Self {
            lines: lines.into(),
            promo: None,
        }
    }

    /// Lines in insertion order.
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// Look up a line.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::LineNotFound`] for an unknown id.
    pub fn line(&self, id: LineId) -> Result<&CartLine, CartError> {
        self.lines
            .iter()
            .find(|line| line.id == id)
            .ok_or(CartError::LineNotFound(id))
    }

    /// Number of lines.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Whether the cart has no lines.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Total units across all lines.
    pub fn item_count(&self) -> u64 {
        self.lines
            .iter()
            .map(|line| u64::from(line.quantity.get()))
            .sum()
    }

    /// The active promo, if any.
    pub fn promo(&self) -> Option<&AcceptedPromo> {
        self.promo.as_ref()
    }

    /// Whether a promo is applied.
    pub fn is_promo_applied(&self) -> bool {
        self.promo.is_some()
    }

    /// Add a product to the cart.
    ///
    /// A line for the same product, size and color absorbs the quantity;
    /// otherwise a new line is appended with the product's current discount.
    pub fn add(
        &mut self,
        product: &Product,
        variant: Variant,
        quantity: Quantity,
        sink: &dyn NotificationSink,
    ) -> LineId {
        let id = if let Some(line) = self
            .lines
            .iter_mut()
            .find(|line| line.matches(product.id, &variant))
        {
            line.quantity = line.quantity.saturating_add(quantity);
            line.id
        } else {
            let line = CartLine::from_product(product, variant, quantity);
            let id = line.id;
            self.lines.push(line);
            id
        };

        tracing::debug!(product = %product.id, %quantity, line = %id, "added to cart");

        sink.notify(Notification::success(format!(
            "Added {quantity} {} to your cart!",
            product.name
        )));

        id
    }

    /// Set a line's quantity. Values below one are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::LineNotFound`] for an unknown id.
    pub fn update_quantity(&mut self, id: LineId, quantity: u32) -> Result<(), CartError> {
        let line = self.line_mut(id)?;

        if let Some(quantity) = Quantity::new(quantity) {
            line.quantity = quantity;
        }

        Ok(())
    }

    /// Step a line's quantity by `delta`, never below one.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::LineNotFound`] for an unknown id.
    pub fn step_quantity(&mut self, id: LineId, delta: i64) -> Result<Quantity, CartError> {
        let line = self.line_mut(id)?;

        line.quantity = line.quantity.step(delta);

        Ok(line.quantity)
    }

    /// Remove a line.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::LineNotFound`] for an unknown id; the cart is unchanged.
    pub fn remove(
        &mut self,
        id: LineId,
        sink: &dyn NotificationSink,
    ) -> Result<CartLine, CartError> {
        let index = self
            .lines
            .iter()
            .position(|line| line.id == id)
            .ok_or(CartError::LineNotFound(id))?;

        let removed = self.lines.remove(index);

        tracing::debug!(line = %id, product = %removed.product_id, "removed from cart");
        sink.notify(Notification::success("Item removed from cart"));

        Ok(removed)
    }

    /// Apply a promo code, replacing any previously applied one.
    ///
    /// # Errors
    ///
    /// Returns the validator's [`PromoError`]; the cart is unchanged.
    pub fn apply_promo(
        &mut self,
        code: &str,
        validator: &dyn PromoValidator,
        sink: &dyn NotificationSink,
    ) -> Result<(), PromoError> {
        match validator.validate(code) {
            Ok(accepted) => {
                tracing::info!(code = accepted.code(), "promo applied");
                sink.notify(Notification::success(accepted.message()));
                self.promo = Some(accepted);

                Ok(())
            }
            Err(err) => {
                tracing::info!(%err, "promo rejected");
                sink.notify(Notification::error("Invalid promo code"));

                Err(err)
            }
        }
    }

    /// Drop the applied promo.
    pub fn clear_promo(&mut self) {
        self.promo = None;
    }

    /// Current totals. Recomputed on every call.
    pub fn totals(&self, config: &PricingConfig) -> OrderTotals {
        compute_totals(&self.lines, self.is_promo_applied(), config)
    }

    fn line_mut(&mut self, id: LineId) -> Result<&mut CartLine, CartError> {
        self.lines
            .iter_mut()
            .find(|line| line.id == id)
            .ok_or(CartError::LineNotFound(id))
    }
}
