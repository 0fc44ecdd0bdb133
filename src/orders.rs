//! Orders
//!
//! What the shopper sees after a successful payment: the order number, a
//! summary of what was bought and an estimated delivery timeline.

use std::{fmt, str::FromStr};

use jiff::{Timestamp, ToSpan, civil::Date, tz::TimeZone};
use rand::Rng;
use rust_decimal::Decimal;
use thiserror::Error;

use crate::{
    cart::{CartLine, Quantity, Variant},
    checkout::payment::PaymentReceipt,
    pricing::OrderTotals,
};

const ORDER_PREFIX: &str = "GL-";
const ORDER_DIGITS: usize = 7;

/// Order errors.
#[derive(Debug, Error)]
pub enum OrderError {
    /// Not a `GL-` number followed by seven digits.
    #[error("invalid order number: {0}")]
    InvalidNumber(String),

    /// Date arithmetic overflowed.
    #[error("could not estimate delivery dates: {0}")]
    Schedule(#[from] jiff::Error),
}

/// Human-facing order number, `GL-` followed by seven digits.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct OrderNumber(String);

impl OrderNumber {
    /// Draw a fresh random order number.
    pub fn generate<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let digits: u32 = rng.gen_range(0..10_000_000);

        Self(format!("{ORDER_PREFIX}{digits:07}"))
    }

    /// The number as text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OrderNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for OrderNumber {
    type Err = OrderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let valid = s.strip_prefix(ORDER_PREFIX).is_some_and(|digits| {
            digits.len() == ORDER_DIGITS && digits.bytes().all(|b| b.is_ascii_digit())
        });

        if valid {
            Ok(Self(s.to_string()))
        } else {
            Err(OrderError::InvalidNumber(s.to_string()))
        }
    }
}

/// One step of the fulfilment timeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum OrderStep {
    /// Payment received.
    Confirmed,

    /// Being packed.
    Processing,

    /// Handed to the carrier.
    Shipped,

    /// At the door.
    Delivered,
}

impl OrderStep {
    /// Every step in timeline order.
    pub const ALL: [Self; 4] = [
        Self::Confirmed,
        Self::Processing,
        Self::Shipped,
        Self::Delivered,
    ];

    /// Estimated window after placement, in whole days.
    fn window(self) -> (i64, i64) {
        match self {
            Self::Confirmed => (0, 0),
            Self::Processing => (1, 1),
            Self::Shipped => (2, 3),
            Self::Delivered => (4, 6),
        }
    }
}

impl fmt::Display for OrderStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Confirmed => "Order Confirmed",
            Self::Processing => "Processing",
            Self::Shipped => "Shipped",
            Self::Delivered => "Delivered",
        })
    }
}

/// Estimated dates for a single step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepEstimate {
    /// The step
    pub step: OrderStep,

    /// Earliest expected date
    pub earliest: Date,

    /// Latest expected date
    pub latest: Date,

    /// Whether the step has been reached
    pub complete: bool,
}

impl StepEstimate {
    /// `May 15, 2025` or `May 16 - May 17, 2025`.
    pub fn label(&self) -> String {
        if self.earliest == self.latest {
            self.earliest.strftime("%B %-d, %Y").to_string()
        } else {
            format!(
                "{} - {}",
                self.earliest.strftime("%B %-d"),
                self.latest.strftime("%B %-d, %Y")
            )
        }
    }
}

/// Step indicator for an order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderStatus {
    current: OrderStep,
    steps: Vec<StepEstimate>,
}

impl OrderStatus {
    /// Timeline for an order placed on `placed_on`, currently at `current`.
    ///
    /// # Errors
    ///
    /// Returns [`OrderError::Schedule`] if an estimate falls outside jiff's
    /// supported date range.
    pub fn new(placed_on: Date, current: OrderStep) -> Result<Self, OrderError> {
        let steps = OrderStep::ALL
            .into_iter()
            .map(|step| {
                let (from, to) = step.window();

                Ok(StepEstimate {
                    step,
                    earliest: placed_on.checked_add(from.days())?,
                    latest: placed_on.checked_add(to.days())?,
                    complete: step <= current,
                })
            })
            .collect::<Result<Vec<_>, jiff::Error>>()?;

        Ok(Self { current, steps })
    }

    /// Timeline for a freshly placed order.
    ///
    /// # Errors
    ///
    /// See [`OrderStatus::new`].
    pub fn placed(placed_on: Date) -> Result<Self, OrderError> {
        Self::new(placed_on, OrderStep::Confirmed)
    }

    /// The step the order is at.
    pub fn current(&self) -> OrderStep {
        self.current
    }

    /// All steps with their estimates.
    pub fn steps(&self) -> &[StepEstimate] {
        &self.steps
    }

    /// Estimated delivery window.
    pub fn delivery(&self) -> Option<&StepEstimate> {
        self.steps.iter().find(|estimate| estimate.step == OrderStep::Delivered)
    }
}

/// A purchased line, frozen at order time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderLine {
    /// Product name
    pub name: String,

    /// Size and color
    pub variant: Variant,

    /// Units bought
    pub quantity: Quantity,

    /// Effective unit price paid
    pub unit_price: Decimal,

    /// `unit_price × quantity`
    pub total: Decimal,
}

impl From<&CartLine> for OrderLine {
    fn from(line: &CartLine) -> Self {
        Self {
            name: line.name().to_string(),
            variant: line.variant().clone(),
            quantity: line.quantity(),
            unit_price: line.effective_unit_price(),
            total: line.line_total(),
        }
    }
}

/// Order confirmation page contents.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderConfirmation {
    /// Order number
    pub number: OrderNumber,

    /// Placement time
    pub placed_at: Timestamp,

    /// Confirmation email address
    pub email: String,

    /// One-line shipping address
    pub shipping_address: String,

    /// Payment method label
    pub payment_method: String,

    /// Gateway receipt
    pub receipt: PaymentReceipt,

    /// Purchased lines
    pub lines: Vec<OrderLine>,

    /// Totals at payment time
    pub totals: OrderTotals,

    /// Fulfilment timeline
    pub status: OrderStatus,
}

impl OrderConfirmation {
    /// Placement date in UTC.
    pub fn placed_on(&self) -> Date {
        self.placed_at.to_zoned(TimeZone::UTC).date()
    }

    /// `May 14, 2025`.
    pub fn date_label(&self) -> String {
        self.placed_on().strftime("%B %-d, %Y").to_string()
    }
}

#[cfg(test)]
mod tests {
    use jiff::civil::date;
    use rand::{SeedableRng, rngs::StdRng};
    use testresult::TestResult;

    use super::*;

    #[test]
    fn generated_numbers_are_well_formed() -> TestResult {
        let mut rng = StdRng::seed_from_u64(7);

        for _ in 0..100 {
            let number = OrderNumber::generate(&mut rng);
            let parsed: OrderNumber = number.as_str().parse()?;

            assert_eq!(parsed, number);
            assert_eq!(number.as_str().len(), 10);
        }

        Ok(())
    }

    #[test]
    fn parse_rejects_malformed_numbers() {
        for bad in ["GL-123456", "GL-12345678", "XX-1234567", "GL-12a4567", ""] {
            assert!(bad.parse::<OrderNumber>().is_err(), "{bad} should be rejected");
        }
    }

    #[test]
    fn placed_status_estimates_each_step() -> TestResult {
        let status = OrderStatus::placed(date(2025, 5, 14))?;

        let expected = [
            (OrderStep::Confirmed, date(2025, 5, 14), date(2025, 5, 14), true),
            (OrderStep::Processing, date(2025, 5, 15), date(2025, 5, 15), false),
            (OrderStep::Shipped, date(2025, 5, 16), date(2025, 5, 17), false),
            (OrderStep::Delivered, date(2025, 5, 18), date(2025, 5, 20), false),
        ];

        for (estimate, (step, earliest, latest, complete)) in status.steps().iter().zip(expected) {
            assert_eq!(estimate.step, step);
            assert_eq!(estimate.earliest, earliest);
            assert_eq!(estimate.latest, latest);
            assert_eq!(estimate.complete, complete);
        }

        Ok(())
    }

    #[test]
    fn steps_up_to_current_are_complete() -> TestResult {
        let status = OrderStatus::new(date(2025, 5, 14), OrderStep::Shipped)?;

        let complete: Vec<_> = status
            .steps()
            .iter()
            .filter(|estimate| estimate.complete)
            .map(|estimate| estimate.step)
            .collect();

        assert_eq!(
            complete,
            [OrderStep::Confirmed, OrderStep::Processing, OrderStep::Shipped]
        );

        Ok(())
    }

    #[test]
    fn labels_cover_single_days_and_windows() -> TestResult {
        let status = OrderStatus::placed(date(2025, 5, 14))?;
        let delivery = status.delivery().ok_or("no delivery step")?;

        assert_eq!(delivery.label(), "May 18 - May 20, 2025");
        assert_eq!(
            status.steps().first().map(StepEstimate::label),
            Some("May 14, 2025".to_string())
        );

        Ok(())
    }

    #[test]
    fn schedule_overflow_is_an_error() {
        assert!(matches!(
            OrderStatus::placed(Date::MAX),
            Err(OrderError::Schedule(_))
        ));
    }
}
