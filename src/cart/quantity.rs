//! Quantities

use std::{fmt, num::NonZeroU32};

/// A line quantity, never below one.
///
/// There is no upper bound beyond `u32::MAX`; the catalog carries no stock
/// levels to cap against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Quantity(NonZeroU32);

impl Quantity {
    /// A single unit.
    pub const ONE: Self = Self(NonZeroU32::MIN);

    /// Wrap a raw quantity, `None` for zero.
    pub fn new(quantity: u32) -> Option<Self> {
        NonZeroU32::new(quantity).map(Self)
    }

    /// Raw quantity.
    pub fn get(self) -> u32 {
        self.0.get()
    }

    /// Add two quantities, saturating at `u32::MAX`.
    #[must_use]
    pub fn saturating_add(self, other: Self) -> Self {
        Self(self.0.saturating_add(other.get()))
    }

    /// Step by `delta` with the floor at one.
    #[must_use]
    pub fn step(self, delta: i64) -> Self {
        Self::new(set_quantity(self.get(), delta)).unwrap_or(Self::ONE)
    }
}

impl Default for Quantity {
    fn default() -> Self {
        Self::ONE
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// Quantity stepper: `current + delta`, clamped to a minimum of one.
pub fn set_quantity(current: u32, delta: i64) -> u32 {
    let next = i64::from(current)
        .saturating_add(delta)
        .clamp(1, i64::from(u32::MAX));

    u32::try_from(next).unwrap_or(u32::MAX)
}
