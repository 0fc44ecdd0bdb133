//! Product details
//!
//! Sizes, colors and copy for the product detail page, plus the size/color
//! checks that must pass before a product can be added to the cart.

use rustc_hash::FxHashMap;
use serde::Deserialize;
use thiserror::Error;

use crate::{cart::Variant, products::ProductId};

/// Size/color selection errors. The message is shown to the shopper as-is.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SelectionError {
    /// No size chosen.
    #[error("Please select a size")]
    MissingSize,

    /// No color chosen.
    #[error("Please select a color")]
    MissingColor,

    /// The size is not offered for this product.
    #[error("Size {0} is not available")]
    UnknownSize(String),

    /// The color is not offered for this product.
    #[error("Color {0} is not available")]
    UnknownColor(String),
}

/// Extended copy and variant options for one product.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ProductDetails {
    /// Long description
    pub description: String,

    /// Offered sizes, in display order
    pub sizes: Vec<String>,

    /// Offered colors, in display order
    pub colors: Vec<String>,

    /// Materials
    pub materials: String,

    /// Care instructions
    pub care: String,

    /// Shipping blurb
    pub shipping: String,

    /// Returns blurb
    pub returns: String,

    /// Additional images beyond the product's main image
    #[serde(default)]
    pub images: Vec<String>,
}

impl ProductDetails {
    /// Gallery images: the main image first, then extra images without duplicates.
    pub fn gallery(&self, main_image: Option<&str>) -> Vec<String> {
        let mut images: Vec<String> = Vec::with_capacity(self.images.len() + 1);

        for image in main_image.into_iter().chain(self.images.iter().map(String::as_str)) {
            if !image.is_empty() && !images.iter().any(|existing| existing == image) {
                images.push(image.to_string());
            }
        }

        images
    }
}

/// Details for every product, with a fallback for products without their own.
#[derive(Debug, Clone)]
pub struct DetailsCatalog {
    known: FxHashMap<ProductId, ProductDetails>,
    fallback: ProductDetails,
}

impl DetailsCatalog {
    /// Create a catalog from per-product details and a fallback.
    pub fn new(known: FxHashMap<ProductId, ProductDetails>, fallback: ProductDetails) -> Self {
        Self { known, fallback }
    }

    /// Details for a product, falling back to the defaults.
    pub fn for_product(&self, id: ProductId) -> &ProductDetails {
        self.known.get(&id).unwrap_or(&self.fallback)
    }
}

/// The shopper's size/color choice on the detail page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VariantSelection {
    /// Chosen size
    pub size: Option<String>,

    /// Chosen color
    pub color: Option<String>,
}

impl VariantSelection {
    /// Pre-select the first offered size and color.
    pub fn defaults(details: &ProductDetails) -> Self {
        Self {
            size: details.sizes.first().cloned(),
            color: details.colors.first().cloned(),
        }
    }

    /// Check the selection against the offered options. Size is checked first.
    ///
    /// # Errors
    ///
    /// Returns a [`SelectionError`] describing the first problem found.
    pub fn validate(&self, details: &ProductDetails) -> Result<Variant, SelectionError> {
        let size = non_empty(self.size.as_deref()).ok_or(SelectionError::MissingSize)?;

        if !details.sizes.iter().any(|offered| offered == size) {
            return Err(SelectionError::UnknownSize(size.to_string()));
        }

        let color = non_empty(self.color.as_deref()).ok_or(SelectionError::MissingColor)?;

        if !details.colors.iter().any(|offered| offered == color) {
            return Err(SelectionError::UnknownColor(color.to_string()));
        }

        Ok(Variant::new(size, color))
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|value| !value.trim().is_empty())
}
