//! Checkout
//!
//! Form validation and the checkout session: the short cart-to-checkout
//! transition, then a single in-flight payment attempt at a time.

use std::{
    fmt,
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
    time::Duration,
};

use jiff::{Timestamp, tz::TimeZone};
use smallvec::SmallVec;
use thiserror::Error;
use uuid::Uuid;

use crate::{
    cart::Cart,
    notifications::{Notification, NotificationSink},
    orders::{OrderConfirmation, OrderError, OrderLine, OrderNumber, OrderStatus},
    pricing::PricingConfig,
    routes::{Navigator, Route},
};

pub mod payment;

use payment::{PaymentGateway, PaymentOutcome, PaymentRequest, Prefill};

/// Checkout errors.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// Required fields are empty.
    #[error("Please fill out all required fields")]
    MissingFields(SmallVec<[CheckoutField; 8]>),

    /// The email address is malformed.
    #[error("Please enter a valid email address")]
    InvalidEmail,

    /// Nothing to pay for.
    #[error("Your cart is empty")]
    EmptyCart,

    /// A payment attempt is already running.
    #[error("Payment is already being processed")]
    AlreadyProcessing,

    /// The shopper closed the payment widget.
    #[error("Payment cancelled")]
    PaymentCancelled,

    /// The gateway declined or errored.
    #[error("Payment failed: {0}")]
    PaymentFailed(String),

    /// The order could not be assembled.
    #[error(transparent)]
    Order(#[from] OrderError),
}

/// Checkout form fields that can be required.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckoutField {
    /// Email
    Email,
    /// First name
    FirstName,
    /// Last name
    LastName,
    /// Street address
    Address,
    /// City
    City,
    /// State
    State,
    /// ZIP code
    ZipCode,
    /// Phone
    Phone,
}

impl fmt::Display for CheckoutField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Email => "Email",
            Self::FirstName => "First name",
            Self::LastName => "Last name",
            Self::Address => "Address",
            Self::City => "City",
            Self::State => "State",
            Self::ZipCode => "ZIP code",
            Self::Phone => "Phone",
        })
    }
}

/// Contact and shipping details entered at checkout.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CheckoutForm {
    /// Email
    pub email: String,

    /// First name
    pub first_name: String,

    /// Last name
    pub last_name: String,

    /// Street address
    pub address: String,

    /// Apartment, suite, etc.
    pub apartment: Option<String>,

    /// City
    pub city: String,

    /// State
    pub state: String,

    /// ZIP code
    pub zip_code: String,

    /// Phone
    pub phone: String,

    /// Remember details for next time
    pub save_info: bool,
}

impl CheckoutForm {
    /// Check required fields, then the email shape.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::MissingFields`] listing every empty required
    /// field, or [`CheckoutError::InvalidEmail`].
    pub fn validate(&self) -> Result<(), CheckoutError> {
        let required = [
            (CheckoutField::Email, &self.email),
            (CheckoutField::FirstName, &self.first_name),
            (CheckoutField::LastName, &self.last_name),
            (CheckoutField::Address, &self.address),
            (CheckoutField::City, &self.city),
            (CheckoutField::State, &self.state),
            (CheckoutField::ZipCode, &self.zip_code),
            (CheckoutField::Phone, &self.phone),
        ];

        let missing: SmallVec<[CheckoutField; 8]> = required
            .into_iter()
            .filter(|(_, value)| value.trim().is_empty())
            .map(|(field, _)| field)
            .collect();

        if !missing.is_empty() {
            return Err(CheckoutError::MissingFields(missing));
        }

        if !is_email(self.email.trim()) {
            return Err(CheckoutError::InvalidEmail);
        }

        Ok(())
    }

    /// `First Last`.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name.trim(), self.last_name.trim())
    }

    /// Single-line shipping address.
    pub fn shipping_address(&self) -> String {
        let street = match self.apartment.as_deref().map(str::trim) {
            Some(apartment) if !apartment.is_empty() => {
                format!("{}, {apartment}", self.address.trim())
            }
            _ => self.address.trim().to_string(),
        };

        format!(
            "{street}, {}, {} {}",
            self.city.trim(),
            self.state.trim(),
            self.zip_code.trim()
        )
    }
}

fn is_email(value: &str) -> bool {
    let mut parts = value.split('@');

    matches!(
        (parts.next(), parts.next(), parts.next()),
        (Some(local), Some(domain), None) if !local.is_empty() && !domain.is_empty()
    )
}

/// Releases the processing flag when dropped.
struct ProcessingGuard<'a>(&'a AtomicBool);

impl<'a> ProcessingGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for ProcessingGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Drives one shopper through checkout.
pub struct CheckoutSession {
    gateway: Arc<dyn PaymentGateway>,
    sink: Arc<dyn NotificationSink>,
    navigator: Arc<dyn Navigator>,
    transition_delay: Duration,
    processing: AtomicBool,
}

impl fmt::Debug for CheckoutSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CheckoutSession")
            .field("transition_delay", &self.transition_delay)
            .field("processing", &self.is_processing())
            .finish_non_exhaustive()
    }
}

impl CheckoutSession {
    /// Create a session with the default one second transition delay.
    pub fn new(
        gateway: Arc<dyn PaymentGateway>,
        sink: Arc<dyn NotificationSink>,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        Self {
            gateway,
            sink,
            navigator,
            transition_delay: Duration::from_millis(1000),
            processing: AtomicBool::new(false),
        }
    }

    /// Override the cart-to-checkout delay.
    #[must_use]
    pub fn with_transition_delay(mut self, delay: Duration) -> Self {
        self.transition_delay = delay;
        self
    }

    /// Whether a payment attempt is in flight (the pay button is disabled).
    pub fn is_processing(&self) -> bool {
        self.processing.load(Ordering::Acquire)
    }

    /// Move from the cart to the checkout page.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::EmptyCart`] when there is nothing to check out.
    pub async fn begin(&self, cart: &Cart) -> Result<(), CheckoutError> {
        if cart.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }

        tracing::debug!(lines = cart.len(), "proceeding to checkout");

        tokio::time::sleep(self.transition_delay).await;
        self.navigator.go_to(Route::Checkout);

        Ok(())
    }

    /// Validate the form and collect payment for the cart.
    ///
    /// The cart is read, never modified.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::AlreadyProcessing`] while another attempt is
    /// running, a validation error for a bad form or empty cart, or the
    /// payment outcome when it was not a success.
    pub async fn submit(
        &self,
        cart: &Cart,
        form: &CheckoutForm,
        pricing: &PricingConfig,
    ) -> Result<OrderConfirmation, CheckoutError> {
        let Some(_guard) = ProcessingGuard::acquire(&self.processing) else {
            tracing::debug!("submit ignored, payment in progress");

            return Err(CheckoutError::AlreadyProcessing);
        };

        let result = self.process(cart, form, pricing).await;

        if let Err(err) = &result {
            tracing::warn!(%err, "checkout failed");
            self.sink.notify(Notification::error(err.to_string()));
        }

        result
    }

    async fn process(
        &self,
        cart: &Cart,
        form: &CheckoutForm,
        pricing: &PricingConfig,
    ) -> Result<OrderConfirmation, CheckoutError> {
        form.validate()?;

        if cart.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }

        let totals = cart.totals(pricing);
        let number = OrderNumber::generate(&mut rand::thread_rng());

        let request = PaymentRequest {
            order_id: format!("order_{}", Uuid::now_v7().simple()),
            amount: totals.total_money().to_minor_units(),
            currency: pricing.currency.iso_alpha_code,
            description: format!("Order {number}"),
            prefill: Prefill {
                name: form.full_name(),
                email: form.email.trim().to_string(),
                contact: form.phone.trim().to_string(),
            },
        };

        tracing::info!(
            order = %number,
            payment_order = %request.order_id,
            amount = request.amount,
            "collecting payment"
        );

        match self.gateway.collect(request).await {
            PaymentOutcome::Success(receipt) => {
                let placed_at = Timestamp::now();

                let confirmation = OrderConfirmation {
                    number,
                    placed_at,
                    email: form.email.trim().to_string(),
                    shipping_address: form.shipping_address(),
                    payment_method: self.gateway.method(),
                    receipt,
                    lines: cart.lines().iter().map(OrderLine::from).collect(),
                    totals,
                    status: OrderStatus::placed(placed_at.to_zoned(TimeZone::UTC).date())?,
                };

                tracing::info!(
                    order = %confirmation.number,
                    payment = confirmation.receipt.payment_id(),
                    "order placed"
                );

                self.sink
                    .notify(Notification::success("Payment successful! Your order has been placed."));
                self.navigator.go_to(Route::OrderConfirmation);

                Ok(confirmation)
            }
            PaymentOutcome::Cancelled => Err(CheckoutError::PaymentCancelled),
            PaymentOutcome::Failed(reason) => Err(CheckoutError::PaymentFailed(reason)),
        }
    }
}

#[cfg(test)]
mod tests {
    use mockall::predicate::eq;
    use rust_decimal_macros::dec;
    use serde_json::json;
    use testresult::TestResult;

    use super::*;
    use crate::{
        cart::{Quantity, Variant},
        checkout::payment::{MockPaymentGateway, PaymentReceipt},
        notifications::{MockNotificationSink, TracingSink},
        products::{Pricing, Product, ProductId},
        routes::{MockNavigator, TracingNavigator},
    };

    fn form() -> CheckoutForm {
        CheckoutForm {
            email: "ada@example.com".to_string(),
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            address: "12 Analytical Row".to_string(),
            apartment: Some("Apt 3".to_string()),
            city: "London".to_string(),
            state: "LN".to_string(),
            zip_code: "10001".to_string(),
            phone: "555-0100".to_string(),
            save_info: false,
        }
    }

    fn cart() -> TestResult<Cart> {
        let product = Product {
            id: ProductId::new(4),
            name: "High Rise Slim Jeans".to_string(),
            category: "Jeans".to_string(),
            pricing: Pricing::discounted(dec!(90), dec!(20))?,
            is_new: false,
            image: None,
            description: None,
        };

        let mut cart = Cart::new();
        cart.add(&product, Variant::new("S", "Blue"), Quantity::ONE, &TracingSink);

        Ok(cart)
    }

    fn approving_gateway() -> MockPaymentGateway {
        let mut gateway = MockPaymentGateway::new();

        gateway
            .expect_method()
            .returning(|| "Razorpay".to_string());
        gateway.expect_collect().returning(|request| {
            let response = json!({
                "payment_id": "pay_1",
                "order_id": request.order_id,
                "signature": "sig",
            });

            match PaymentReceipt::from_response(&response, &request.order_id) {
                Ok(receipt) => PaymentOutcome::Success(receipt),
                Err(error) => PaymentOutcome::Failed(error.to_string()),
            }
        });

        gateway
    }

    fn session(
        gateway: MockPaymentGateway,
        sink: MockNotificationSink,
        navigator: MockNavigator,
    ) -> CheckoutSession {
        CheckoutSession::new(Arc::new(gateway), Arc::new(sink), Arc::new(navigator))
    }

    #[test]
    fn validate_lists_every_missing_field() {
        let form = CheckoutForm {
            email: "  ".to_string(),
            ..form()
        };
        let empty = CheckoutForm::default();

        assert!(matches!(
            form.validate(),
            Err(CheckoutError::MissingFields(fields)) if fields.as_slice() == [CheckoutField::Email]
        ));
        assert!(matches!(
            empty.validate(),
            Err(CheckoutError::MissingFields(fields)) if fields.len() == 8
        ));
    }

    #[test]
    fn validate_checks_email_shape() {
        for bad in ["ada", "@example.com", "ada@", "a@b@c"] {
            let form = CheckoutForm {
                email: bad.to_string(),
                ..form()
            };

            assert!(
                matches!(form.validate(), Err(CheckoutError::InvalidEmail)),
                "{bad} should be rejected"
            );
        }

        assert!(form().validate().is_ok());
    }

    #[test]
    fn formats_name_and_address() {
        let mut form = form();

        assert_eq!(form.full_name(), "Ada Lovelace");
        assert_eq!(
            form.shipping_address(),
            "12 Analytical Row, Apt 3, London, LN 10001"
        );

        form.apartment = Some(" ".to_string());

        assert_eq!(form.shipping_address(), "12 Analytical Row, London, LN 10001");
    }

    #[tokio::test(start_paused = true)]
    async fn begin_waits_then_navigates() -> TestResult {
        let mut navigator = MockNavigator::new();
        navigator
            .expect_go_to()
            .with(eq(Route::Checkout))
            .times(1)
            .return_const(());

        let session = session(MockPaymentGateway::new(), MockNotificationSink::new(), navigator);
        let started = tokio::time::Instant::now();

        session.begin(&cart()?).await?;

        assert!(started.elapsed() >= Duration::from_millis(1000));

        Ok(())
    }

    #[tokio::test]
    async fn begin_rejects_empty_cart() {
        let session = session(
            MockPaymentGateway::new(),
            MockNotificationSink::new(),
            MockNavigator::new(),
        );

        assert!(matches!(
            session.begin(&Cart::new()).await,
            Err(CheckoutError::EmptyCart)
        ));
    }

    #[tokio::test]
    async fn successful_payment_confirms_order() -> TestResult {
        let mut sink = MockNotificationSink::new();
        sink.expect_notify()
            .withf(Notification::is_success)
            .times(1)
            .return_const(());

        let mut navigator = MockNavigator::new();
        navigator
            .expect_go_to()
            .with(eq(Route::OrderConfirmation))
            .times(1)
            .return_const(());

        let session = session(approving_gateway(), sink, navigator);
        let cart = cart()?;
        let before = cart.clone();

        let confirmation = session.submit(&cart, &form(), &PricingConfig::default()).await?;

        assert!(confirmation.number.as_str().starts_with("GL-"));
        assert_eq!(confirmation.payment_method, "Razorpay");
        assert_eq!(confirmation.email, "ada@example.com");
        assert_eq!(confirmation.totals, cart.totals(&PricingConfig::default()));
        assert_eq!(confirmation.lines.len(), 1);
        assert_eq!(cart, before);
        assert!(!session.is_processing());

        Ok(())
    }

    #[tokio::test]
    async fn invalid_form_never_reaches_gateway() -> TestResult {
        let mut sink = MockNotificationSink::new();
        sink.expect_notify()
            .with(eq(Notification::error("Please fill out all required fields")))
            .times(1)
            .return_const(());

        let mut gateway = MockPaymentGateway::new();
        gateway.expect_collect().never();

        let session = session(gateway, sink, MockNavigator::new());

        let result = session
            .submit(&cart()?, &CheckoutForm::default(), &PricingConfig::default())
            .await;

        assert!(matches!(result, Err(CheckoutError::MissingFields(_))));
        assert!(!session.is_processing());

        Ok(())
    }

    #[tokio::test]
    async fn cancelled_payment_re_enables_submit() -> TestResult {
        let mut gateway = MockPaymentGateway::new();
        gateway
            .expect_collect()
            .times(1)
            .returning(|_| PaymentOutcome::Cancelled);

        let mut sink = MockNotificationSink::new();
        sink.expect_notify()
            .with(eq(Notification::error("Payment cancelled")))
            .times(1)
            .return_const(());

        let mut navigator = MockNavigator::new();
        navigator.expect_go_to().never();

        let session = session(gateway, sink, navigator);

        let result = session.submit(&cart()?, &form(), &PricingConfig::default()).await;

        assert!(matches!(result, Err(CheckoutError::PaymentCancelled)));
        assert!(!session.is_processing());

        Ok(())
    }

    #[tokio::test]
    async fn failed_payment_reports_reason() -> TestResult {
        let mut gateway = MockPaymentGateway::new();
        gateway
            .expect_collect()
            .returning(|_| PaymentOutcome::Failed("card declined".to_string()));

        let mut sink = MockNotificationSink::new();
        sink.expect_notify()
            .with(eq(Notification::error("Payment failed: card declined")))
            .times(1)
            .return_const(());

        let session = session(gateway, sink, MockNavigator::new());

        let result = session.submit(&cart()?, &form(), &PricingConfig::default()).await;

        assert!(matches!(result, Err(CheckoutError::PaymentFailed(reason)) if reason == "card declined"));

        Ok(())
    }

    #[tokio::test(start_paused = true)]
    async fn second_submit_while_processing_is_rejected() -> TestResult {
        let gateway = payment::SimulatedGateway::default();
        let session = CheckoutSession::new(
            Arc::new(gateway),
            Arc::new(TracingSink),
            Arc::new(TracingNavigator),
        );
        let cart = cart()?;
        let form = form();
        let pricing = PricingConfig::default();

        let (first, second) = tokio::join!(
            session.submit(&cart, &form, &pricing),
            session.submit(&cart, &form, &pricing),
        );

        assert!(first.is_ok());
        assert!(matches!(second, Err(CheckoutError::AlreadyProcessing)));
        assert!(!session.is_processing());

        Ok(())
    }
}
