use anyhow::Context as _;
use clap::{Parser, Subcommand};
use storefront::{config::StoreConfig, observability};

mod admin;
mod cart;
mod catalog;
mod checkout;
mod product;

#[derive(Debug, Parser)]
#[command(name = "storefront", about = "Storefront CLI", long_about = None)]
pub(crate) struct Cli {
    #[command(flatten)]
    config: StoreConfig,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Browse the shop with filters and sorting
    Catalog(catalog::CatalogArgs),

    /// Show a product page and optionally add it to the cart
    Product(product::ProductArgs),

    /// Show the cart, edit lines and apply a promo code
    Cart(cart::CartArgs),

    /// Check out the cart with the simulated payment gateway
    Checkout(checkout::CheckoutArgs),

    /// Manage products
    Admin(admin::AdminCommand),
}

impl Cli {
    pub(crate) async fn run(self) -> anyhow::Result<()> {
        observability::init(&self.config.logging)?;

        let fixture = self
            .config
            .fixture()
            .context("failed to load store fixtures")?;

        match self.command {
            Commands::Catalog(args) => catalog::run(&self.config, &fixture, args),
            Commands::Product(args) => product::run(&self.config, &fixture, args),
            Commands::Cart(args) => cart::run(&self.config, &fixture, args),
            Commands::Checkout(args) => checkout::run(&self.config, &fixture, args).await,
            Commands::Admin(command) => admin::run(&self.config, &fixture, command),
        }
    }
}
