use std::io::{self, Write as _};

use anyhow::Context as _;
use clap::Args;
use storefront::{
    cart::{Cart, CartLine, LineId},
    config::StoreConfig,
    fixtures::Fixture,
    notifications::TracingSink,
    render,
};

#[derive(Debug, Args)]
pub(crate) struct CartArgs {
    /// Promo code to apply
    #[arg(long)]
    promo: Option<String>,

    /// Step a line's quantity, as POSITION:DELTA (e.g. 1:+2 or 2:-1)
    #[arg(long, value_parser = parse_step)]
    step: Vec<(usize, i64)>,

    /// Set a line's quantity, as POSITION:QUANTITY
    #[arg(long = "set", value_parser = parse_set)]
    set: Vec<(usize, u32)>,

    /// Remove the line at this position (1-based)
    #[arg(long)]
    remove: Vec<usize>,

    /// Start from an empty cart instead of the seed cart
    #[arg(long)]
    empty: bool,
}

fn parse_pair(value: &str) -> Result<(usize, &str), String> {
    let (position, rest) = value
        .split_once(':')
        .ok_or_else(|| format!("expected POSITION:VALUE, got {value}"))?;

    let position = position
        .trim()
        .parse::<usize>()
        .map_err(|error| format!("invalid line position {position}: {error}"))?;

    Ok((position, rest.trim()))
}

fn parse_step(value: &str) -> Result<(usize, i64), String> {
    let (position, delta) = parse_pair(value)?;
    let delta = delta
        .parse::<i64>()
        .map_err(|error| format!("invalid delta {delta}: {error}"))?;

    Ok((position, delta))
}

fn parse_set(value: &str) -> Result<(usize, u32), String> {
    let (position, quantity) = parse_pair(value)?;
    let quantity = quantity
        .parse::<u32>()
        .map_err(|error| format!("invalid quantity {quantity}: {error}"))?;

    Ok((position, quantity))
}

fn line_at(cart: &Cart, position: usize) -> anyhow::Result<LineId> {
    position
        .checked_sub(1)
        .and_then(|index| cart.lines().get(index))
        .map(CartLine::id)
        .with_context(|| format!("no cart line at position {position}"))
}

pub(crate) fn run(config: &StoreConfig, fixture: &Fixture, args: CartArgs) -> anyhow::Result<()> {
    let mut cart = if args.empty {
        Cart::new()
    } else {
        fixture.seed_cart()?
    };

    // Positions refer to the cart as loaded.
    let steps = args
        .step
        .into_iter()
        .map(|(position, delta)| Ok((line_at(&cart, position)?, delta)))
        .collect::<anyhow::Result<Vec<_>>>()?;
    let sets = args
        .set
        .into_iter()
        .map(|(position, quantity)| Ok((line_at(&cart, position)?, quantity)))
        .collect::<anyhow::Result<Vec<_>>>()?;
    let removals = args
        .remove
        .into_iter()
        .map(|position| line_at(&cart, position))
        .collect::<anyhow::Result<Vec<_>>>()?;

    for (line, quantity) in sets {
        cart.update_quantity(line, quantity)?;
    }

    for (line, delta) in steps {
        cart.step_quantity(line, delta)?;
    }

    for line in removals {
        cart.remove(line, &TracingSink)?;
    }

    let mut out = io::stdout().lock();

    if let Some(code) = args.promo
        && cart
            .apply_promo(&code, &config.promo_validator(), &TracingSink)
            .is_err()
    {
        writeln!(out, "Invalid promo code: {code}")?;
    }

    render::write_cart(&mut out, &cart, &cart.totals(&config.pricing()))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_signed_steps() {
        assert_eq!(parse_step("1:+2"), Ok((1, 2)));
        assert_eq!(parse_step("2:-1"), Ok((2, -1)));
        assert!(parse_step("2").is_err());
        assert!(parse_step("x:1").is_err());
    }

    #[test]
    fn parses_quantities() {
        assert_eq!(parse_set("1:3"), Ok((1, 3)));
        assert!(parse_set("1:-3").is_err());
    }
}
