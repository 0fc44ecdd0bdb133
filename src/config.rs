//! Storefront configuration
//!
//! Every setting can come from a flag, a `STOREFRONT_*` environment variable
//! or a `.env` file.

use std::{path::PathBuf, time::Duration};

use clap::Args;
use decimal_percentage::Percentage;
use rust_decimal::Decimal;
use rusty_money::iso::Currency;

use crate::{
    fixtures::{
        Fixture, FixtureError,
        products::{parse_amount, parse_currency, parse_percentage},
    },
    pricing::{PricingConfig, ShippingPolicy},
    promo::StaticPromoCode,
};

/// Log output format.
#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum LogFormat {
    /// Compact, human-readable logs.
    Compact,

    /// Structured JSON logs.
    Json,
}

/// Logging settings.
#[derive(Debug, Clone, Args)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "STOREFRONT_LOG_LEVEL", default_value = "info", global = true)]
    pub log_level: String,

    /// Log format (compact, json)
    #[arg(
        long,
        env = "STOREFRONT_LOG_FORMAT",
        value_enum,
        default_value_t = LogFormat::Compact,
        global = true
    )]
    pub log_format: LogFormat,
}

/// Store settings.
#[derive(Debug, Clone, Args)]
pub struct StoreConfig {
    /// Store currency (GBP, USD, EUR)
    #[arg(
        long,
        env = "STOREFRONT_CURRENCY",
        default_value = "USD",
        value_parser = parse_currency,
        global = true
    )]
    pub currency: &'static Currency,

    /// Accepted promo code
    #[arg(long, env = "STOREFRONT_PROMO_CODE", default_value = "GLAM20", global = true)]
    pub promo_code: String,

    /// Promo discount rate ("20%" or "0.2")
    #[arg(
        long,
        env = "STOREFRONT_PROMO_RATE",
        default_value = "0.2",
        value_parser = parse_percentage,
        global = true
    )]
    pub promo_rate: Percentage,

    /// Subtotals strictly above this ship free
    #[arg(
        long,
        env = "STOREFRONT_FREE_SHIPPING_OVER",
        default_value = "100",
        value_parser = parse_amount,
        global = true
    )]
    pub free_shipping_over: Decimal,

    /// Shipping fee below the free-shipping threshold
    #[arg(
        long,
        env = "STOREFRONT_SHIPPING_FEE",
        default_value = "10",
        value_parser = parse_amount,
        global = true
    )]
    pub shipping_fee: Decimal,

    /// Cart to checkout transition delay in milliseconds
    #[arg(long, env = "STOREFRONT_CHECKOUT_DELAY_MS", default_value_t = 1000u64, global = true)]
    pub checkout_delay_ms: u64,

    /// Simulated payment processing time in milliseconds
    #[arg(long, env = "STOREFRONT_PAYMENT_DELAY_MS", default_value_t = 2000u64, global = true)]
    pub payment_delay_ms: u64,

    /// Directory with catalog.yml, details.yml and cart.yml; embedded data when omitted
    #[arg(long, env = "STOREFRONT_FIXTURES_DIR", global = true)]
    pub fixtures_dir: Option<PathBuf>,

    /// Logging output settings.
    #[command(flatten)]
    pub logging: LoggingConfig,
}

impl StoreConfig {
    /// Pricing constants.
    pub fn pricing(&self) -> PricingConfig {
        PricingConfig {
            currency: self.currency,
            promo_rate: self.promo_rate,
            shipping: ShippingPolicy {
                free_over: self.free_shipping_over,
                flat_fee: self.shipping_fee,
            },
        }
    }

    /// Validator for the configured promo code.
    pub fn promo_validator(&self) -> StaticPromoCode {
        StaticPromoCode::new(&self.promo_code, self.promo_rate)
    }

    /// Cart to checkout transition delay.
    pub fn checkout_delay(&self) -> Duration {
        Duration::from_millis(self.checkout_delay_ms)
    }

    /// Simulated payment time.
    pub fn payment_delay(&self) -> Duration {
        Duration::from_millis(self.payment_delay_ms)
    }

    /// Load fixtures from the configured directory or the embedded set.
    ///
    /// # Errors
    ///
    /// Returns a [`FixtureError`] if loading fails or the catalog is priced in
    /// a different currency from the store.
    pub fn fixture(&self) -> Result<Fixture, FixtureError> {
        let fixture = match &self.fixtures_dir {
            Some(dir) => Fixture::load_dir(dir)?,
            None => Fixture::embedded()?,
        };

        if fixture.currency() != self.currency {
            return Err(FixtureError::CurrencyMismatch(
                self.currency.iso_alpha_code.to_string(),
                fixture.currency().iso_alpha_code.to_string(),
            ));
        }

        Ok(fixture)
    }
}
