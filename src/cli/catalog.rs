use std::io::{self, Write as _};

use clap::Args;
use rust_decimal::Decimal;
use storefront::{
    catalog::{ALL_CATEGORIES, CatalogCriteria, CategoryFilter, PriceRange, SortKey, filter_and_sort},
    config::StoreConfig,
    fixtures::Fixture,
    render,
};

#[derive(Debug, Args)]
pub(crate) struct CatalogArgs {
    /// Category name, or "All"
    #[arg(long, default_value = ALL_CATEGORIES)]
    category: CategoryFilter,

    /// Lowest effective price
    #[arg(long, default_value = "0")]
    min_price: Decimal,

    /// Highest effective price; unbounded when omitted
    #[arg(long)]
    max_price: Option<Decimal>,

    /// Only new arrivals
    #[arg(long)]
    new_only: bool,

    /// Only products on sale
    #[arg(long)]
    sale_only: bool,

    /// Result ordering
    #[arg(long, value_enum, default_value_t = SortKey::Featured)]
    sort: SortKey,

    /// List the categories instead of products
    #[arg(long)]
    categories: bool,
}

pub(crate) fn run(config: &StoreConfig, fixture: &Fixture, args: CatalogArgs) -> anyhow::Result<()> {
    let mut out = io::stdout().lock();

    if args.categories {
        for category in fixture.categories() {
            writeln!(out, "{category}")?;
        }

        return Ok(());
    }

    let criteria = CatalogCriteria {
        category: args.category,
        price_range: PriceRange::new(args.min_price, args.max_price)?,
        new_only: args.new_only,
        sale_only: args.sale_only,
        sort: args.sort,
    };

    let products = filter_and_sort(fixture.products(), &criteria);

    tracing::debug!(?criteria, matched = products.len(), "catalog filtered");

    render::write_catalog(&mut out, &products, &criteria, config.currency)?;

    Ok(())
}
