//! Storefront prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    cart::{Cart, CartError, CartLine, LineId, Quantity, Variant, set_quantity},
    catalog::{CatalogCriteria, CategoryFilter, PriceRange, SortKey, filter_and_sort},
    checkout::{
        CheckoutError, CheckoutForm, CheckoutSession,
        payment::{GatewayBehaviour, PaymentGateway, PaymentOutcome, SimulatedGateway},
    },
    details::{DetailsCatalog, ProductDetails, VariantSelection},
    fixtures::{Fixture, FixtureError},
    notifications::{Notification, NotificationSink, TracingSink},
    orders::{OrderConfirmation, OrderNumber, OrderStatus, OrderStep},
    pricing::{OrderTotals, PricingConfig, ShippingPolicy, compute_totals, display_money},
    products::{DiscountPercent, Pricing, Product, ProductId},
    promo::{AcceptedPromo, PromoValidator, StaticPromoCode, validate_promo},
    routes::{Navigator, Route, TracingNavigator},
    store::{ProductChange, ProductDraft, ProductStore, StoreError},
};
