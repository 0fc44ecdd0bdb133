//! Fixtures
//!
//! Seed catalog, product details and the demo cart, stored as YAML under
//! `fixtures/` and embedded in the binary.

use std::{fs, path::Path};

use rustc_hash::{FxHashMap, FxHashSet};
use rusty_money::iso::Currency;
use serde::Deserialize;
use thiserror::Error;

use crate::{
    cart::{Cart, CartLine, Quantity, Variant},
    details::{DetailsCatalog, ProductDetails},
    fixtures::{cart::CartFixture, products::CatalogFixture},
    products::{Product, ProductError, ProductId},
    store::ProductStore,
};

pub mod cart;
pub mod products;

const CATALOG_YAML: &str = include_str!("../../fixtures/catalog.yml");
const DETAILS_YAML: &str = include_str!("../../fixtures/details.yml");
const CART_YAML: &str = include_str!("../../fixtures/cart.yml");

/// Fixture Parsing Errors
#[derive(Debug, Error)]
pub enum FixtureError {
    /// IO error reading fixture files
    #[error("Failed to read fixture file: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_norway::Error),

    /// Invalid price format
    #[error("Invalid price format: {0}")]
    InvalidPrice(String),

    /// Invalid percentage format
    #[error("Invalid percentage format: {0}")]
    InvalidPercentage(String),

    /// Unknown currency code
    #[error("Unknown currency code: {0}")]
    UnknownCurrency(String),

    /// Currency mismatch between catalog and product
    #[error("Currency mismatch: expected {0}, found {1}")]
    CurrencyMismatch(String, String),

    /// Product pricing is invalid
    #[error("Invalid product {0}: {1}")]
    InvalidProduct(u32, ProductError),

    /// Two products share an id
    #[error("Duplicate product id: {0}")]
    DuplicateProduct(u32),

    /// Seed cart refers to a missing product
    #[error("Product not found: {0}")]
    ProductNotFound(u32),

    /// Seed cart line with quantity zero
    #[error("Invalid quantity for product {0}")]
    InvalidQuantity(u32),
}

#[derive(Debug, Deserialize)]
struct DetailsFixture {
    default: ProductDetails,

    #[serde(default)]
    products: FxHashMap<ProductId, ProductDetails>,
}

/// Fixture
#[derive(Debug, Clone)]
pub struct Fixture {
    currency: &'static Currency,
    categories: Vec<String>,
    products: Vec<Product>,
    details: DetailsCatalog,
    cart: Vec<cart::CartLineFixture>,
}

impl Fixture {
    /// Load the fixtures compiled into the binary
    ///
    /// # Errors
    ///
    /// Returns an error if the embedded YAML is invalid.
    pub fn embedded() -> Result<Self, FixtureError> {
        Self::from_yaml(CATALOG_YAML, DETAILS_YAML, CART_YAML)
    }

    /// Load `catalog.yml`, `details.yml` and `cart.yml` from a directory
    ///
    /// # Errors
    ///
    /// Returns an error if a file cannot be read or parsed.
    pub fn load_dir(dir: impl AsRef<Path>) -> Result<Self, FixtureError> {
        let dir = dir.as_ref();

        let catalog = fs::read_to_string(dir.join("catalog.yml"))?;
        let details = fs::read_to_string(dir.join("details.yml"))?;
        let cart = fs::read_to_string(dir.join("cart.yml"))?;

        tracing::debug!(dir = %dir.display(), "loaded fixtures from disk");

        Self::from_yaml(&catalog, &details, &cart)
    }

    /// Parse fixtures from YAML text
    ///
    /// # Errors
    ///
    /// Returns an error if the YAML is invalid, prices are malformed or in a
    /// different currency from the catalog, or product ids repeat.
    pub fn from_yaml(catalog: &str, details: &str, cart: &str) -> Result<Self, FixtureError> {
        let catalog: CatalogFixture = serde_norway::from_str(catalog)?;
        let details: DetailsFixture = serde_norway::from_str(details)?;
        let cart: CartFixture = serde_norway::from_str(cart)?;

        let currency = products::parse_currency(&catalog.currency)?;

        let mut seen = FxHashSet::default();
        let mut parsed = Vec::with_capacity(catalog.products.len());

        for product in catalog.products {
            if !seen.insert(product.id) {
                return Err(FixtureError::DuplicateProduct(product.id));
            }

            parsed.push(product.into_product(currency)?);
        }

        Ok(Self {
            currency,
            categories: catalog.categories,
            products: parsed,
            details: DetailsCatalog::new(details.products, details.default),
            cart: cart.lines,
        })
    }

    /// Store currency
    pub fn currency(&self) -> &'static Currency {
        self.currency
    }

    /// Shop filter categories, including "All"
    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    /// Seed products
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    /// Product store seeded with the catalog
    pub fn store(&self) -> ProductStore {
        ProductStore::new(self.products.clone())
    }

    /// Product details
    pub fn details(&self) -> &DetailsCatalog {
        &self.details
    }

    /// Demo cart, with each line's discount frozen from the seed catalog
    ///
    /// # Errors
    ///
    /// Returns an error if a line refers to an unknown product or has a zero
    /// quantity.
    pub fn seed_cart(&self) -> Result<Cart, FixtureError> {
        let lines = self
            .cart
            .iter()
            .map(|line| {
                let product = self
                    .products
                    .iter()
                    .find(|product| product.id.get() == line.product)
                    .ok_or(FixtureError::ProductNotFound(line.product))?;

                let quantity =
                    Quantity::new(line.quantity).ok_or(FixtureError::InvalidQuantity(line.product))?;

                Ok(CartLine::from_product(
                    product,
                    Variant::new(&line.size, &line.color),
                    quantity,
                ))
            })
            .collect::<Result<Vec<_>, FixtureError>>()?;

        Ok(Cart::with_lines(lines))
    }
}
