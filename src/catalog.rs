//! Catalog filtering and sorting
//!
//! Produces the product list shown on the shop page from a fixed product list
//! and the shopper's filter criteria. The source list is never mutated.

use std::{convert::Infallible, fmt, str::FromStr};

use clap::ValueEnum;
use rust_decimal::Decimal;
use thiserror::Error;

use crate::products::Product;

/// Sentinel category name meaning "no category filter".
pub const ALL_CATEGORIES: &str = "All";

/// Errors raised while building catalog criteria.
#[derive(Debug, Error, PartialEq)]
pub enum CatalogError {
    /// The lower price bound is above the upper bound.
    #[error("price range minimum {min} is above maximum {max}")]
    InvertedRange {
        /// Lower bound
        min: Decimal,
        /// Upper bound
        max: Decimal,
    },

    /// Negative lower bound.
    #[error("price range minimum must not be negative, got {0}")]
    NegativeMinimum(Decimal),
}

/// Category filter
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CategoryFilter {
    /// Keep every category.
    #[default]
    All,

    /// Keep products whose category equals this name exactly.
    Only(String),
}

impl CategoryFilter {
    fn matches(&self, product: &Product) -> bool {
        match self {
            Self::All => true,
            Self::Only(category) => product.category == *category,
        }
    }
}

impl From<&str> for CategoryFilter {
    fn from(value: &str) -> Self {
        if value == ALL_CATEGORIES {
            Self::All
        } else {
            Self::Only(value.to_string())
        }
    }
}

impl FromStr for CategoryFilter {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from(s))
    }
}

impl fmt::Display for CategoryFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str(ALL_CATEGORIES),
            Self::Only(category) => f.write_str(category),
        }
    }
}

/// Inclusive effective-price range. A missing maximum is unbounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PriceRange {
    min: Decimal,
    max: Option<Decimal>,
}

impl PriceRange {
    /// Range covering `[min, max]`.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::NegativeMinimum`] for a negative `min` and
    /// [`CatalogError::InvertedRange`] when `min > max`.
    pub fn new(min: Decimal, max: Option<Decimal>) -> Result<Self, CatalogError> {
        if min < Decimal::ZERO {
            return Err(CatalogError::NegativeMinimum(min));
        }

        if let Some(max) = max
            && min > max
        {
            return Err(CatalogError::InvertedRange { min, max });
        }

        Ok(Self { min, max })
    }

    /// `[0, +inf)`
    pub fn unbounded() -> Self {
        Self {
            min: Decimal::ZERO,
            max: None,
        }
    }

    /// `[0, max]`, the shop slider's initial position.
    pub fn up_to(max: Decimal) -> Self {
        Self {
            min: Decimal::ZERO,
            max: Some(max.max(Decimal::ZERO)),
        }
    }

    /// Lower bound.
    pub fn min(&self) -> Decimal {
        self.min
    }

    /// Upper bound, `None` when unbounded.
    pub fn max(&self) -> Option<Decimal> {
        self.max
    }

    /// Whether `price` falls within the range, bounds included.
    pub fn contains(&self, price: Decimal) -> bool {
        price >= self.min && self.max.is_none_or(|max| price <= max)
    }
}

impl Default for PriceRange {
    fn default() -> Self {
        Self::unbounded()
    }
}

/// Result ordering
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum SortKey {
    /// Input order.
    #[default]
    Featured,

    /// Base price, ascending.
    PriceLowHigh,

    /// Base price, descending.
    PriceHighLow,

    /// New arrivals first, otherwise input order.
    Newest,
}

/// Filter and sort criteria for the shop page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogCriteria {
    /// Category filter
    pub category: CategoryFilter,

    /// Effective-price range
    pub price_range: PriceRange,

    /// Only new arrivals
    pub new_only: bool,

    /// Only products on sale
    pub sale_only: bool,

    /// Result ordering
    pub sort: SortKey,
}

impl CatalogCriteria {
    /// Whether these criteria leave the catalog unfiltered, so an empty view
    /// can be told apart from "nothing matched".
    pub fn is_unfiltered(&self) -> bool {
        self.category == CategoryFilter::All
            && self.price_range == PriceRange::unbounded()
            && !self.new_only
            && !self.sale_only
    }

    fn keeps(&self, product: &Product) -> bool {
        self.category.matches(product)
            && self.price_range.contains(product.effective_price())
            && (!self.new_only || product.is_new)
            && (!self.sale_only || product.is_sale())
    }
}

/// Filter and sort a product list.
///
/// Filtering applies the category, effective-price range and flag filters.
/// Price sorts compare **base** prices; every sort is stable, so ties keep
/// their input ("featured") order.
pub fn filter_and_sort(products: &[Product], criteria: &CatalogCriteria) -> Vec<Product> {
    let mut filtered: Vec<Product> = products
        .iter()
        .filter(|product| criteria.keeps(product))
        .cloned()
        .collect();

    match criteria.sort {
        SortKey::Featured => {}
        SortKey::PriceLowHigh => filtered.sort_by_key(Product::base_price),
        SortKey::PriceHighLow => {
            filtered.sort_by(|a, b| b.base_price().cmp(&a.base_price()));
        }
        SortKey::Newest => filtered.sort_by_key(|product| !product.is_new),
    }

    filtered
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;
    use testresult::TestResult;

    use crate::products::{Pricing, ProductId};

    use super::*;

    fn product(id: u32, category: &str, pricing: Pricing, is_new: bool) -> Product {
        Product {
            id: ProductId::new(id),
            name: format!("Product {id}"),
            category: category.to_string(),
            pricing,
            is_new,
            image: None,
            description: None,
        }
    }

    fn test_products() -> TestResult<Vec<Product>> {
        Ok(vec![
            product(1, "Jackets", Pricing::regular(dec!(120))?, true),
            product(2, "Sweaters", Pricing::regular(dec!(85))?, false),
            product(3, "Coats", Pricing::regular(dec!(245))?, false),
            product(4, "Jeans", Pricing::discounted(dec!(90), dec!(20))?, false),
            product(5, "Jackets", Pricing::regular(dec!(350))?, true),
        ])
    }

    fn ids(products: &[Product]) -> Vec<u32> {
        products.iter().map(|product| product.id.get()).collect()
    }

    #[test]
    fn default_criteria_is_identity() -> TestResult {
        let products = test_products()?;
        let criteria = CatalogCriteria::default();

        assert!(criteria.is_unfiltered());
        assert_eq!(filter_and_sort(&products, &criteria), products);

        Ok(())
    }

    #[test]
    fn filters_by_category() -> TestResult {
        let products = test_products()?;
        let criteria = CatalogCriteria {
            category: CategoryFilter::from("Jackets"),
            ..CatalogCriteria::default()
        };

        assert_eq!(ids(&filter_and_sort(&products, &criteria)), [1, 5]);

        Ok(())
    }

    #[test]
    fn all_sentinel_disables_category_filter() {
        assert_eq!(CategoryFilter::from("All"), CategoryFilter::All);
        assert_eq!(
            CategoryFilter::from("all"),
            CategoryFilter::Only("all".to_string())
        );
    }

    #[test]
    fn price_filter_uses_effective_price_inclusive() -> TestResult {
        let products = test_products()?;

        // Jeans are 90 base but 72 effective.
        let criteria = CatalogCriteria {
            price_range: PriceRange::new(dec!(72), Some(dec!(85)))?,
            ..CatalogCriteria::default()
        };

        assert_eq!(ids(&filter_and_sort(&products, &criteria)), [2, 4]);

        Ok(())
    }

    #[test]
    fn flag_filters_intersect() -> TestResult {
        let products = test_products()?;

        let new_only = CatalogCriteria {
            new_only: true,
            ..CatalogCriteria::default()
        };
        let sale_only = CatalogCriteria {
            sale_only: true,
            ..CatalogCriteria::default()
        };
        let both = CatalogCriteria {
            new_only: true,
            sale_only: true,
            ..CatalogCriteria::default()
        };

        assert_eq!(ids(&filter_and_sort(&products, &new_only)), [1, 5]);
        assert_eq!(ids(&filter_and_sort(&products, &sale_only)), [4]);
        assert!(filter_and_sort(&products, &both).is_empty());
        assert!(!both.is_unfiltered());

        Ok(())
    }

    #[test]
    fn price_sorts_use_base_price() -> TestResult {
        let products = test_products()?;

        let low_high = CatalogCriteria {
            sort: SortKey::PriceLowHigh,
            ..CatalogCriteria::default()
        };
        let high_low = CatalogCriteria {
            sort: SortKey::PriceHighLow,
            ..CatalogCriteria::default()
        };

        // Jeans sort at 90 (base), not 72 (effective).
        assert_eq!(ids(&filter_and_sort(&products, &low_high)), [2, 4, 1, 3, 5]);
        assert_eq!(ids(&filter_and_sort(&products, &high_low)), [5, 3, 1, 4, 2]);

        Ok(())
    }

    #[test]
    fn newest_sort_is_stable() -> TestResult {
        let products = vec![
            product(1, "A", Pricing::regular(dec!(10))?, true),
            product(2, "B", Pricing::regular(dec!(10))?, false),
            product(3, "C", Pricing::regular(dec!(10))?, true),
        ];
        let criteria = CatalogCriteria {
            sort: SortKey::Newest,
            ..CatalogCriteria::default()
        };

        assert_eq!(ids(&filter_and_sort(&products, &criteria)), [1, 3, 2]);

        Ok(())
    }

    #[test]
    fn source_list_is_untouched() -> TestResult {
        let products = test_products()?;
        let before = products.clone();
        let criteria = CatalogCriteria {
            sort: SortKey::PriceHighLow,
            ..CatalogCriteria::default()
        };

        let _sorted = filter_and_sort(&products, &criteria);

        assert_eq!(products, before);

        Ok(())
    }

    #[test]
    fn price_range_rejects_invalid_bounds() {
        assert_eq!(
            PriceRange::new(dec!(10), Some(dec!(5))),
            Err(CatalogError::InvertedRange {
                min: dec!(10),
                max: dec!(5)
            })
        );
        assert_eq!(
            PriceRange::new(dec!(-1), None),
            Err(CatalogError::NegativeMinimum(dec!(-1)))
        );
    }

    #[test]
    fn unbounded_range_contains_large_prices() {
        assert!(PriceRange::unbounded().contains(dec!(1000000)));
        assert!(!PriceRange::up_to(dec!(350)).contains(dec!(350.01)));
        assert!(PriceRange::up_to(dec!(350)).contains(dec!(350)));
    }
}
