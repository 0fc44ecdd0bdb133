//! Cart Fixtures

use serde::Deserialize;

/// Wrapper for the seed cart YAML
#[derive(Debug, Deserialize)]
pub struct CartFixture {
    /// Lines in display order
    pub lines: Vec<CartLineFixture>,
}

/// Seed cart line
#[derive(Debug, Clone, Deserialize)]
pub struct CartLineFixture {
    /// Product id
    pub product: u32,

    /// Size
    pub size: String,

    /// Color
    pub color: String,

    /// Quantity, at least one
    pub quantity: u32,
}
