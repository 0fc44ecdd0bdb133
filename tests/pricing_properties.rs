//! Pricing and catalog properties that must hold for any cart or product list.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use rusty_money::{Money, iso::USD};
use testresult::TestResult;

use storefront::{
    cart::{Cart, CartLine, Quantity, Variant},
    catalog::{CatalogCriteria, SortKey, filter_and_sort},
    fixtures::Fixture,
    notifications::TracingSink,
    pricing::{PricingConfig, compute_totals},
    products::{DiscountPercent, Pricing, Product, ProductId},
    promo::{StaticPromoCode, validate_promo},
};

fn line(id: u32, price: Decimal, quantity: u32, discount: Option<Decimal>) -> TestResult<CartLine> {
    Ok(CartLine::new(
        ProductId::new(id),
        format!("Product {id}"),
        price,
        Quantity::new(quantity).ok_or("zero quantity")?,
        Variant::new("M", "Black"),
        discount.map(DiscountPercent::new).transpose()?,
    ))
}

fn product(id: u32, price: Decimal, is_new: bool) -> TestResult<Product> {
    Ok(Product {
        id: ProductId::new(id),
        name: format!("Product {id}"),
        category: "Jackets".to_string(),
        pricing: Pricing::regular(price)?,
        is_new,
        image: None,
        description: None,
    })
}

#[test]
fn totals_ignore_line_order() -> TestResult {
    let config = PricingConfig::default();
    let mut lines = vec![
        line(1, dec!(120), 1, None)?,
        line(2, dec!(90), 2, Some(dec!(20)))?,
        line(3, dec!(35.50), 3, Some(dec!(15)))?,
    ];

    let forward = compute_totals(&lines, true, &config);
    lines.reverse();
    let backward = compute_totals(&lines, true, &config);

    assert_eq!(forward, backward);
    assert_eq!(forward, compute_totals(&lines, true, &config));

    Ok(())
}

#[test]
fn totals_are_never_negative() -> TestResult {
    let config = PricingConfig::default();

    for lines in [
        vec![],
        vec![line(1, dec!(0.01), 1, Some(dec!(100)))?],
        vec![line(1, dec!(100), 1, Some(dec!(100)))?, line(2, dec!(0.01), 1, None)?],
    ] {
        for promo in [false, true] {
            let totals = compute_totals(&lines, promo, &config);

            assert!(totals.subtotal() >= Decimal::ZERO);
            assert!(totals.total() >= Decimal::ZERO);
        }
    }

    Ok(())
}

#[test]
fn emptied_cart_with_promo_pays_only_shipping() -> TestResult {
    let fixture = Fixture::embedded()?;
    let config = PricingConfig::default();
    let mut cart = fixture.seed_cart()?;

    cart.apply_promo("glam20", &StaticPromoCode::default(), &TracingSink)?;

    let ids: Vec<_> = cart.lines().iter().map(CartLine::id).collect();
    for id in ids {
        cart.remove(id, &TracingSink)?;
    }

    let totals = cart.totals(&config);

    assert!(cart.is_promo_applied());
    assert_eq!(totals.subtotal(), Decimal::ZERO);
    assert_eq!(totals.discount(), Decimal::ZERO);
    assert_eq!(totals.shipping(), dec!(10));
    assert_eq!(totals.total(), dec!(10));

    Ok(())
}

#[test]
fn free_shipping_only_strictly_above_threshold() -> TestResult {
    let config = PricingConfig::default();

    let at = compute_totals(&[line(1, dec!(100.00), 1, None)?], false, &config);
    let above = compute_totals(&[line(1, dec!(100.01), 1, None)?], false, &config);

    assert_eq!(at.shipping(), dec!(10));
    assert!(!at.is_free_shipping());
    assert_eq!(above.shipping(), Decimal::ZERO);
    assert!(above.is_free_shipping());

    Ok(())
}

#[test]
fn unfiltered_catalog_is_identity() -> TestResult {
    let fixture = Fixture::embedded()?;
    let criteria = CatalogCriteria::default();

    assert!(criteria.is_unfiltered());
    assert_eq!(filter_and_sort(fixture.products(), &criteria), fixture.products());

    Ok(())
}

#[test]
fn newest_sort_is_stable() -> TestResult {
    let products = [
        product(1, dec!(10), true)?,
        product(2, dec!(20), false)?,
        product(3, dec!(30), true)?,
    ];

    let criteria = CatalogCriteria {
        sort: SortKey::Newest,
        ..CatalogCriteria::default()
    };

    let ids: Vec<u32> = filter_and_sort(&products, &criteria)
        .iter()
        .map(|product| product.id.get())
        .collect();

    assert_eq!(ids, [1, 3, 2]);

    Ok(())
}

#[test]
fn promo_code_is_case_insensitive_but_exact() {
    assert!(validate_promo("glam20").is_ok());
    assert!(validate_promo("GLAM20").is_ok());
    assert!(validate_promo("GLAM2O").is_err());
}

#[test]
fn seed_cart_with_promo_matches_worked_example() -> TestResult {
    let config = PricingConfig::default();
    let mut cart = Cart::with_lines(vec![
        line(1, dec!(120), 1, None)?,
        line(4, dec!(90), 1, Some(dec!(20)))?,
    ]);

    cart.apply_promo("GLAM20", &StaticPromoCode::default(), &TracingSink)?;
    let totals = cart.totals(&config);

    assert_eq!(totals.subtotal(), dec!(192));
    assert_eq!(totals.discount_money(), Money::from_minor(3840, USD));
    assert_eq!(totals.shipping(), Decimal::ZERO);
    assert_eq!(totals.total_money(), Money::from_minor(15360, USD));

    Ok(())
}
