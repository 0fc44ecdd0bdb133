//! Routes

use std::fmt;

use mockall::automock;

/// Pages the checkout flow navigates to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// Checkout form
    Checkout,

    /// Post-payment confirmation
    OrderConfirmation,
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Checkout => f.write_str("/checkout"),
            Self::OrderConfirmation => f.write_str("/order-confirmation"),
        }
    }
}

/// Navigation effect ("go to route X").
#[automock]
pub trait Navigator: Send + Sync {
    /// Navigate to `route`.
    fn go_to(&self, route: Route);
}

/// Navigator that only records the transition in the log.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNavigator;

impl Navigator for TracingNavigator {
    fn go_to(&self, route: Route) {
        tracing::info!(%route, "navigate");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn routes_display_as_paths() {
        assert_eq!(Route::Checkout.to_string(), "/checkout");
        assert_eq!(Route::OrderConfirmation.to_string(), "/order-confirmation");
    }

    #[test]
    fn tracing_navigator_accepts_every_route() {
        for route in [Route::Checkout, Route::OrderConfirmation] {
            TracingNavigator.go_to(route);
        }
    }
}
