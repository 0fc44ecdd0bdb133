//! Terminal rendering
//!
//! Tables for the catalog, the cart and the order confirmation.

use std::{io, ops::Range};

use rusty_money::iso::Currency;
use tabled::{
    Table,
    builder::Builder,
    grid::config::HorizontalLine,
    settings::{
        Alignment, Color, Style, Theme,
        object::{Columns, Rows},
    },
};
use thiserror::Error;

use crate::{
    cart::Cart,
    catalog::CatalogCriteria,
    details::ProductDetails,
    orders::OrderConfirmation,
    pricing::{OrderTotals, display_money},
    products::Product,
    promo::AcceptedPromo,
};

/// Errors that can occur while rendering.
#[derive(Debug, Error)]
pub enum RenderError {
    /// Writing to the output failed.
    #[error("failed to write output: {0}")]
    Io(#[from] io::Error),
}

fn styled(builder: Builder, right_aligned: Range<usize>) -> Table {
    let mut table = builder.build();
    let mut theme = Theme::from(Style::modern_rounded());
    let separator = HorizontalLine::new(Some('─'), Some('┼'), Some('├'), Some('┤'));

    theme.remove_horizontal_lines();
    theme.insert_horizontal_line(1, separator);

    table.with(theme);
    table.modify(Rows::first(), Color::BOLD);
    table.modify(Columns::new(right_aligned), Alignment::right());

    table
}

fn badges(product: &Product) -> String {
    let mut badges = Vec::with_capacity(2);

    if product.is_new {
        badges.push("NEW".to_string());
    }

    if let Some(discount) = product.discount() {
        badges.push(format!("-{discount}"));
    }

    badges.join(" ")
}

/// Write the product grid for `products`, the result of applying `criteria`.
///
/// An empty grid reads differently when no filter was applied.
///
/// # Errors
///
/// Returns [`RenderError::Io`] if writing fails.
pub fn write_catalog(
    out: &mut impl io::Write,
    products: &[Product],
    criteria: &CatalogCriteria,
    currency: &'static Currency,
) -> Result<(), RenderError> {
    if products.is_empty() {
        if criteria.is_unfiltered() {
            writeln!(out, "No products available.")?;
        } else {
            writeln!(out, "No products match your filters.")?;
        }

        return Ok(());
    }

    let mut builder = Builder::default();
    builder.push_record(["ID", "Name", "Category", "Price", "Was", ""]);

    for product in products {
        let was = if product.is_sale() {
            display_money(product.base_price(), currency).to_string()
        } else {
            String::new()
        };

        builder.push_record([
            product.id.to_string(),
            product.name.clone(),
            product.category.clone(),
            display_money(product.effective_price(), currency).to_string(),
            was,
            badges(product),
        ]);
    }

    let table = styled(builder, 3..5);

    writeln!(out, "{table}")?;
    writeln!(out, "{} products", products.len())?;

    Ok(())
}

/// Write a product detail page.
///
/// # Errors
///
/// Returns [`RenderError::Io`] if writing fails.
pub fn write_product(
    out: &mut impl io::Write,
    product: &Product,
    details: &ProductDetails,
    currency: &'static Currency,
) -> Result<(), RenderError> {
    writeln!(out, "\x1b[1m{}\x1b[0m  {}", product.name, badges(product))?;
    writeln!(out, "{}", product.category)?;

    if product.is_sale() {
        writeln!(
            out,
            "{}  (was {})",
            display_money(product.effective_price(), currency),
            display_money(product.base_price(), currency)
        )?;
    } else {
        writeln!(out, "{}", display_money(product.effective_price(), currency))?;
    }

    writeln!(out)?;
    writeln!(out, "{}", details.description)?;
    writeln!(out)?;

    let mut builder = Builder::default();
    builder.push_record(["Sizes".to_string(), details.sizes.join(", ")]);
    builder.push_record(["Colors".to_string(), details.colors.join(", ")]);
    builder.push_record(["Materials", details.materials.as_str()]);
    builder.push_record(["Care", details.care.as_str()]);
    builder.push_record(["Shipping", details.shipping.as_str()]);
    builder.push_record(["Returns", details.returns.as_str()]);

    let mut table = builder.build();
    table.with(Style::modern_rounded());

    writeln!(out, "{table}")?;

    let gallery = details.gallery(product.image.as_deref());

    if !gallery.is_empty() {
        writeln!(out, "{} images", gallery.len())?;
    }

    Ok(())
}

fn write_summary_line(
    out: &mut impl io::Write,
    label: &str,
    value: &str,
) -> Result<(), RenderError> {
    writeln!(out, " {label:<24}{value:>12}")?;

    Ok(())
}

/// Write the order summary block shared by the cart and confirmation pages.
///
/// # Errors
///
/// Returns [`RenderError::Io`] if writing fails.
pub fn write_totals(
    out: &mut impl io::Write,
    totals: &OrderTotals,
    promo_code: Option<&str>,
) -> Result<(), RenderError> {
    write_summary_line(out, "Subtotal:", &totals.subtotal_money().to_string())?;

    if totals.has_discount() {
        let label = promo_code.map_or_else(
            || "Discount:".to_string(),
            |code| format!("Discount ({code}):"),
        );

        write_summary_line(out, &label, &format!("-{}", totals.discount_money()))?;
    }

    let shipping = if totals.is_free_shipping() {
        "Free".to_string()
    } else {
        totals.shipping_money().to_string()
    };

    write_summary_line(out, "Shipping:", &shipping)?;
    write_summary_line(out, "\x1b[1mTotal:\x1b[0m", &totals.total_money().to_string())?;

    Ok(())
}

/// Write the cart lines and totals.
///
/// # Errors
///
/// Returns [`RenderError::Io`] if writing fails.
pub fn write_cart(
    out: &mut impl io::Write,
    cart: &Cart,
    totals: &OrderTotals,
) -> Result<(), RenderError> {
    if cart.is_empty() {
        writeln!(out, "Your cart is empty.")?;

        return Ok(());
    }

    let currency = totals.currency();
    let mut builder = Builder::default();
    builder.push_record(["#", "Item", "Variant", "Price", "Qty", "Total"]);

    for (position, line) in cart.lines().iter().enumerate() {
        builder.push_record([
            (position + 1).to_string(),
            line.name().to_string(),
            line.variant().to_string(),
            display_money(line.effective_unit_price(), currency).to_string(),
            line.quantity().to_string(),
            display_money(line.line_total(), currency).to_string(),
        ]);
    }

    let table = styled(builder, 3..6);

    writeln!(out, "{table}")?;
    write_totals(out, totals, cart.promo().map(AcceptedPromo::code))?;

    Ok(())
}

/// Write the order confirmation page.
///
/// # Errors
///
/// Returns [`RenderError::Io`] if writing fails.
pub fn write_order(
    out: &mut impl io::Write,
    order: &OrderConfirmation,
) -> Result<(), RenderError> {
    let currency = order.totals.currency();

    writeln!(out, "\x1b[1mThank you for your order!\x1b[0m")?;
    writeln!(out, "A confirmation email has been sent to {}.", order.email)?;
    writeln!(out)?;
    writeln!(out, "Order number:   {}", order.number)?;
    writeln!(out, "Date:           {}", order.date_label())?;
    writeln!(out, "Payment method: {}", order.payment_method)?;
    writeln!(out, "Ship to:        {}", order.shipping_address)?;
    writeln!(out)?;

    let mut items = Builder::default();
    items.push_record(["Item", "Variant", "Price", "Qty", "Total"]);

    for line in &order.lines {
        items.push_record([
            line.name.clone(),
            line.variant.to_string(),
            display_money(line.unit_price, currency).to_string(),
            line.quantity.to_string(),
            display_money(line.total, currency).to_string(),
        ]);
    }

    writeln!(out, "{}", styled(items, 2..5))?;
    write_totals(out, &order.totals, None)?;
    writeln!(out)?;

    let mut status = Builder::default();
    status.push_record(["", "Status", "Estimated"]);

    for step in order.status.steps() {
        status.push_record([
            if step.complete { "✓" } else { "○" }.to_string(),
            step.step.to_string(),
            step.label(),
        ]);
    }

    writeln!(out, "{}", styled(status, 2..3))?;

    Ok(())
}
