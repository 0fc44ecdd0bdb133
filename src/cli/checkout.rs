use std::{io, sync::Arc};

use clap::{Args, ValueEnum};
use storefront::{
    checkout::{
        CheckoutForm, CheckoutSession,
        payment::{GatewayBehaviour, SimulatedGateway},
    },
    config::StoreConfig,
    fixtures::Fixture,
    notifications::TracingSink,
    render,
    routes::TracingNavigator,
};

#[derive(Clone, Copy, Debug, ValueEnum)]
enum PaymentResult {
    /// Approve the payment
    Approve,

    /// Close the payment widget
    Cancel,

    /// Decline the payment
    Fail,
}

#[derive(Debug, Args)]
pub(crate) struct CheckoutArgs {
    /// Contact email
    #[arg(long)]
    email: String,

    /// First name
    #[arg(long)]
    first_name: String,

    /// Last name
    #[arg(long)]
    last_name: String,

    /// Street address
    #[arg(long)]
    address: String,

    /// Apartment, suite, etc.
    #[arg(long)]
    apartment: Option<String>,

    /// City
    #[arg(long)]
    city: String,

    /// State
    #[arg(long)]
    state: String,

    /// ZIP code
    #[arg(long)]
    zip_code: String,

    /// Phone
    #[arg(long)]
    phone: String,

    /// Save details for next time
    #[arg(long)]
    save_info: bool,

    /// Promo code to apply before paying
    #[arg(long)]
    promo: Option<String>,

    /// How the simulated gateway answers
    #[arg(long, value_enum, default_value_t = PaymentResult::Approve)]
    payment: PaymentResult,
}

impl CheckoutArgs {
    fn into_form(self) -> CheckoutForm {
        CheckoutForm {
            email: self.email,
            first_name: self.first_name,
            last_name: self.last_name,
            address: self.address,
            apartment: self.apartment,
            city: self.city,
            state: self.state,
            zip_code: self.zip_code,
            phone: self.phone,
            save_info: self.save_info,
        }
    }

    fn behaviour(&self) -> GatewayBehaviour {
        match self.payment {
            PaymentResult::Approve => GatewayBehaviour::Approve,
            PaymentResult::Cancel => GatewayBehaviour::Cancel,
            PaymentResult::Fail => GatewayBehaviour::Fail("Payment declined by bank".to_string()),
        }
    }
}

pub(crate) async fn run(
    config: &StoreConfig,
    fixture: &Fixture,
    mut args: CheckoutArgs,
) -> anyhow::Result<()> {
    let pricing = config.pricing();
    let mut cart = fixture.seed_cart()?;

    if let Some(code) = args.promo.take() {
        cart.apply_promo(&code, &config.promo_validator(), &TracingSink)?;
    }

    let gateway = SimulatedGateway::new(config.payment_delay(), args.behaviour());
    let session = CheckoutSession::new(
        Arc::new(gateway),
        Arc::new(TracingSink),
        Arc::new(TracingNavigator),
    )
    .with_transition_delay(config.checkout_delay());

    session.begin(&cart).await?;

    let order = session.submit(&cart, &args.into_form(), &pricing).await?;

    render::write_order(&mut io::stdout().lock(), &order)?;

    Ok(())
}
