//! Storefront CLI

use clap::Parser as _;

mod cli;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    _ = dotenvy::dotenv();

    let cli = cli::Cli::try_parse().unwrap_or_else(|error| error.exit());

    cli.run().await
}
