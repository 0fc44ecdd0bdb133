//! Product store
//!
//! The in-memory product list behind the admin table. Every mutation swaps in
//! a fresh immutable snapshot and reports what changed.

use std::{fmt, sync::Arc};

use rust_decimal::Decimal;
use smallvec::SmallVec;
use thiserror::Error;

use crate::{
    notifications::Notification,
    products::{DiscountPercent, Pricing, Product, ProductError, ProductId},
};

/// Product store errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    /// No product with this id.
    #[error("product {0} not found")]
    NotFound(ProductId),

    /// The draft failed validation.
    #[error("invalid product: {}", join_violations(.0))]
    Invalid(SmallVec<[DraftViolation; 4]>),
}

fn join_violations(violations: &[DraftViolation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// A single product form rule violation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DraftViolation {
    /// Name shorter than two characters.
    NameTooShort,

    /// Empty category.
    MissingCategory,

    /// Price zero or negative.
    NonPositivePrice,

    /// Image is not an http(s) URL.
    InvalidImageUrl,

    /// Discount outside `0..=100`.
    DiscountOutOfRange,
}

impl fmt::Display for DraftViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::NameTooShort => "Name must be at least 2 characters long",
            Self::MissingCategory => "Category is required",
            Self::NonPositivePrice => "Price must be a positive number",
            Self::InvalidImageUrl => "Please enter a valid URL",
            Self::DiscountOutOfRange => "Discount must be between 0 and 100",
        })
    }
}

/// Product form contents, as entered in the admin dialog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductDraft {
    /// Product name
    pub name: String,

    /// Category
    pub category: String,

    /// Base price
    pub price: Decimal,

    /// Image URL
    pub image: String,

    /// New arrival flag
    pub is_new: bool,

    /// On-sale flag
    pub is_sale: bool,

    /// Discount percentage, only used when `is_sale` is set
    pub discount_percentage: Option<Decimal>,

    /// Description
    pub description: Option<String>,
}

impl ProductDraft {
    /// Check every admin form rule.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Invalid`] listing every violated rule.
    pub fn validate(&self) -> Result<(), StoreError> {
        let mut violations: SmallVec<[DraftViolation; 4]> = SmallVec::new();

        if self.name.trim().chars().count() < 2 {
            violations.push(DraftViolation::NameTooShort);
        }

        if self.category.trim().is_empty() {
            violations.push(DraftViolation::MissingCategory);
        }

        if self.price <= Decimal::ZERO {
            violations.push(DraftViolation::NonPositivePrice);
        }

        if !is_http_url(&self.image) {
            violations.push(DraftViolation::InvalidImageUrl);
        }

        if self.is_sale
            && let Some(discount) = self.discount_percentage
            && !(Decimal::ZERO..=Decimal::ONE_HUNDRED).contains(&discount)
        {
            violations.push(DraftViolation::DiscountOutOfRange);
        }

        if violations.is_empty() {
            Ok(())
        } else {
            Err(StoreError::Invalid(violations))
        }
    }

    /// Validate the draft into a product with the given id.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Invalid`] when [`ProductDraft::validate`] fails.
    pub fn into_product(self, id: ProductId) -> Result<Product, StoreError> {
        self.validate()?;

        let discount = self.discount_percentage.unwrap_or_default();

        let pricing = if self.is_sale {
            Pricing::discounted(self.price, discount)
        } else {
            Pricing::regular(self.price)
        }
        .map_err(|error| {
            let violation = match error {
                ProductError::NonPositivePrice(_) => DraftViolation::NonPositivePrice,
                ProductError::InvalidDiscount(_) => DraftViolation::DiscountOutOfRange,
            };

            StoreError::Invalid(SmallVec::from_elem(violation, 1))
        })?;

        Ok(Product {
            id,
            name: self.name.trim().to_string(),
            category: self.category.trim().to_string(),
            pricing,
            is_new: self.is_new,
            image: Some(self.image),
            description: self.description.filter(|text| !text.trim().is_empty()),
        })
    }
}

impl From<&Product> for ProductDraft {
    fn from(product: &Product) -> Self {
        Self {
            name: product.name.clone(),
            category: product.category.clone(),
            price: product.base_price(),
            image: product.image.clone().unwrap_or_default(),
            is_new: product.is_new,
            is_sale: product.is_sale(),
            discount_percentage: product.discount().map(DiscountPercent::value),
            description: product.description.clone(),
        }
    }
}

fn is_http_url(value: &str) -> bool {
    let value = value.trim();

    ["https://", "http://"].iter().any(|scheme| {
        value
            .strip_prefix(scheme)
            .and_then(|rest| rest.split('/').next())
            .is_some_and(|host| !host.is_empty() && !host.contains(char::is_whitespace))
    })
}

/// What a store mutation did.
#[derive(Debug, Clone, PartialEq)]
pub enum ProductChange {
    /// A product was created.
    Added(Product),

    /// A product was replaced.
    Updated(Product),

    /// A product was removed.
    Deleted(Product),
}

impl ProductChange {
    /// Admin notification for this change.
    pub fn notification(&self) -> Notification {
        match self {
            Self::Added(product) => Notification::success(format!(
                "Product Added: {} has been added successfully.",
                product.name
            )),
            Self::Updated(product) => Notification::success(format!(
                "Product Updated: {} has been updated successfully.",
                product.name
            )),
            Self::Deleted(_) => {
                Notification::success("Product Deleted: Product has been deleted successfully.")
            }
        }
    }

    /// The affected product.
    pub fn product(&self) -> &Product {
        match self {
            Self::Added(product) | Self::Updated(product) | Self::Deleted(product) => product,
        }
    }
}

/// In-memory product repository.
#[derive(Debug, Clone)]
pub struct ProductStore {
    products: Arc<[Product]>,
}

impl ProductStore {
    /// Create a store from an initial product list.
    pub fn new(products: impl Into<Vec<Product>>) -> Self {
        Self {
            products: products.into().into(),
        }
    }

    /// Current immutable snapshot.
    pub fn snapshot(&self) -> Arc<[Product]> {
        Arc::clone(&self.products)
    }

    /// Products in display order.
    pub fn list(&self) -> &[Product] {
        &self.products
    }

    /// Fetch one product.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] for an unknown id.
    pub fn get(&self, id: ProductId) -> Result<&Product, StoreError> {
        self.products
            .iter()
            .find(|product| product.id == id)
            .ok_or(StoreError::NotFound(id))
    }

    /// The id the next created product receives.
    pub fn next_id(&self) -> ProductId {
        self.products
            .iter()
            .map(|product| product.id.get())
            .max()
            .map_or(ProductId::new(1), |max| ProductId::new(max.saturating_add(1)))
    }

    /// Validate and append a new product.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Invalid`] when the draft fails validation.
    pub fn create(&mut self, draft: ProductDraft) -> Result<ProductChange, StoreError> {
        let product = draft.into_product(self.next_id())?;

        let mut products = self.products.to_vec();
        products.push(product.clone());
        self.products = products.into();

        tracing::info!(product = %product.id, name = %product.name, "product added");

        Ok(ProductChange::Added(product))
    }

    /// Validate and replace an existing product, keeping its id and position.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] for an unknown id or
    /// [`StoreError::Invalid`] when the draft fails validation.
    pub fn update(
        &mut self,
        id: ProductId,
        draft: ProductDraft,
    ) -> Result<ProductChange, StoreError> {
        let index = self.index_of(id)?;
        let product = draft.into_product(id)?;

        let mut products = self.products.to_vec();

        if let Some(slot) = products.get_mut(index) {
            slot.clone_from(&product);
        }

        self.products = products.into();

        tracing::info!(product = %id, name = %product.name, "product updated");

        Ok(ProductChange::Updated(product))
    }

    /// Remove a product.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] for an unknown id.
    pub fn delete(&mut self, id: ProductId) -> Result<ProductChange, StoreError> {
        let index = self.index_of(id)?;

        let mut products = self.products.to_vec();
        let removed = products.remove(index);
        self.products = products.into();

        tracing::info!(product = %id, "product deleted");

        Ok(ProductChange::Deleted(removed))
    }

    fn index_of(&self, id: ProductId) -> Result<usize, StoreError> {
        self.products
            .iter()
            .position(|product| product.id == id)
            .ok_or(StoreError::NotFound(id))
    }
}
