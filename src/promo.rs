//! Promo codes
//!
//! A single configured code, compared case-insensitively. [`PromoValidator`]
//! is the seam where a real coupon service would plug in with the same
//! accept/reject contract.

use decimal_percentage::Percentage;
use mockall::automock;
use rust_decimal::Decimal;
use thiserror::Error;

/// Code accepted when nothing else is configured.
pub const DEFAULT_PROMO_CODE: &str = "GLAM20";

/// Promo validation errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PromoError {
    /// The code does not match any valid promotion.
    #[error("invalid promo code: {0}")]
    Rejected(String),
}

/// An accepted promo code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AcceptedPromo {
    code: String,
    percent_off: Decimal,
}

impl AcceptedPromo {
    /// The canonical (configured) spelling of the code.
    pub fn code(&self) -> &str {
        &self.code
    }

    /// Percentage points taken off the subtotal, e.g. `20`.
    pub fn percent_off(&self) -> Decimal {
        self.percent_off
    }

    /// Shopper-facing confirmation text.
    pub fn message(&self) -> String {
        format!("Promo code applied: {}% discount", self.percent_off.normalize())
    }
}

/// Decides whether a promo code is valid.
#[automock]
pub trait PromoValidator: Send + Sync {
    /// Validate a code as typed by the shopper.
    ///
    /// # Errors
    ///
    /// Returns [`PromoError::Rejected`] when the code is not valid.
    fn validate(&self, code: &str) -> Result<AcceptedPromo, PromoError>;
}

/// Validator backed by one hardcoded code.
#[derive(Debug, Clone)]
pub struct StaticPromoCode {
    code: String,
    rate: Percentage,
}

impl StaticPromoCode {
    /// Accept `code` (any casing) for a `rate` discount.
    pub fn new(code: impl Into<String>, rate: Percentage) -> Self {
        Self {
            code: code.into().to_uppercase(),
            rate,
        }
    }

    /// The configured code.
    pub fn code(&self) -> &str {
        &self.code
    }

    /// The configured discount rate.
    pub fn rate(&self) -> Percentage {
        self.rate
    }
}

impl Default for StaticPromoCode {
    fn default() -> Self {
        Self::new(DEFAULT_PROMO_CODE, Percentage::from(Decimal::new(2, 1)))
    }
}

impl PromoValidator for StaticPromoCode {
    fn validate(&self, code: &str) -> Result<AcceptedPromo, PromoError> {
        if code.to_uppercase() != self.code {
            return Err(PromoError::Rejected(code.to_string()));
        }

        Ok(AcceptedPromo {
            code: self.code.clone(),
            percent_off: (self.rate * Decimal::ONE_HUNDRED).round_dp(2),
        })
    }
}

/// Validate against the default code.
///
/// # Errors
///
/// Returns [`PromoError::Rejected`] unless `code` matches [`DEFAULT_PROMO_CODE`]
/// ignoring case.
pub fn validate_promo(code: &str) -> Result<AcceptedPromo, PromoError> {
    StaticPromoCode::default().validate(code)
}
