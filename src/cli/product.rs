use std::io::{self, Write as _};

use anyhow::Context as _;
use clap::Args;
use storefront::{
    cart::Quantity,
    config::StoreConfig,
    details::VariantSelection,
    fixtures::Fixture,
    notifications::TracingSink,
    products::ProductId,
    render,
};

#[derive(Debug, Args)]
pub(crate) struct ProductArgs {
    /// Product id
    id: u32,

    /// Size; the first offered size when omitted
    #[arg(long)]
    size: Option<String>,

    /// Color; the first offered color when omitted
    #[arg(long)]
    color: Option<String>,

    /// Units to add
    #[arg(long, default_value_t = 1)]
    quantity: u32,

    /// Add the selection to the seed cart and show the cart
    #[arg(long)]
    add: bool,
}

pub(crate) fn run(config: &StoreConfig, fixture: &Fixture, args: ProductArgs) -> anyhow::Result<()> {
    let id = ProductId::new(args.id);
    let store = fixture.store();
    let product = store.get(id)?;
    let details = fixture.details().for_product(id);

    let mut out = io::stdout().lock();

    render::write_product(&mut out, product, details, config.currency)?;

    if !args.add {
        return Ok(());
    }

    let defaults = VariantSelection::defaults(details);
    let selection = VariantSelection {
        size: args.size.or(defaults.size),
        color: args.color.or(defaults.color),
    };

    let variant = selection.validate(details)?;
    let quantity = Quantity::new(args.quantity).context("quantity must be at least 1")?;

    let mut cart = fixture.seed_cart()?;
    cart.add(product, variant, quantity, &TracingSink);

    writeln!(out)?;
    render::write_cart(&mut out, &cart, &cart.totals(&config.pricing()))?;

    Ok(())
}
