use std::io::{self, Write as _};

use clap::{Args, Subcommand};
use rust_decimal::Decimal;
use storefront::{
    catalog::CatalogCriteria,
    config::StoreConfig,
    fixtures::Fixture,
    notifications::{NotificationSink, TracingSink},
    products::ProductId,
    render,
    store::{ProductChange, ProductDraft, ProductStore},
};

#[derive(Debug, Args)]
pub(crate) struct AdminCommand {
    #[command(subcommand)]
    command: AdminSubcommand,
}

#[derive(Debug, Subcommand)]
enum AdminSubcommand {
    /// List every product
    List,

    /// Add a product
    Add(AddProductArgs),

    /// Edit a product; omitted fields keep their value
    Edit(EditProductArgs),

    /// Delete a product
    Delete(DeleteProductArgs),
}

#[derive(Debug, Args)]
struct AddProductArgs {
    /// Product name
    #[arg(long)]
    name: String,

    /// Category
    #[arg(long)]
    category: String,

    /// Base price
    #[arg(long)]
    price: Decimal,

    /// Image URL
    #[arg(long)]
    image: String,

    /// Mark as a new arrival
    #[arg(long)]
    new: bool,

    /// Discount percentage; puts the product on sale
    #[arg(long)]
    discount: Option<Decimal>,

    /// Description
    #[arg(long)]
    description: Option<String>,
}

#[derive(Debug, Args)]
struct EditProductArgs {
    /// Product id
    id: u32,

    /// Product name
    #[arg(long)]
    name: Option<String>,

    /// Category
    #[arg(long)]
    category: Option<String>,

    /// Base price
    #[arg(long)]
    price: Option<Decimal>,

    /// Image URL
    #[arg(long)]
    image: Option<String>,

    /// New arrival flag
    #[arg(long)]
    new: Option<bool>,

    /// Discount percentage; 0 keeps the product on sale at full price
    #[arg(long, conflicts_with = "clear_sale")]
    discount: Option<Decimal>,

    /// Take the product off sale
    #[arg(long)]
    clear_sale: bool,

    /// Description
    #[arg(long)]
    description: Option<String>,
}

#[derive(Debug, Args)]
struct DeleteProductArgs {
    /// Product id
    id: u32,
}

fn edit_draft(mut draft: ProductDraft, args: EditProductArgs) -> ProductDraft {
    if let Some(name) = args.name {
        draft.name = name;
    }

    if let Some(category) = args.category {
        draft.category = category;
    }

    if let Some(price) = args.price {
        draft.price = price;
    }

    if let Some(image) = args.image {
        draft.image = image;
    }

    if let Some(new) = args.new {
        draft.is_new = new;
    }

    if let Some(discount) = args.discount {
        draft.is_sale = true;
        draft.discount_percentage = Some(discount);
    }

    if args.clear_sale {
        draft.is_sale = false;
        draft.discount_percentage = None;
    }

    if let Some(description) = args.description {
        draft.description = Some(description);
    }

    draft
}

fn apply(store: &mut ProductStore, command: AdminSubcommand) -> anyhow::Result<Option<ProductChange>> {
    let change = match command {
        AdminSubcommand::List => return Ok(None),
        AdminSubcommand::Add(args) => store.create(ProductDraft {
            name: args.name,
            category: args.category,
            price: args.price,
            image: args.image,
            is_new: args.new,
            is_sale: args.discount.is_some(),
            discount_percentage: args.discount,
            description: args.description,
        })?,
        AdminSubcommand::Edit(args) => {
            let id = ProductId::new(args.id);
            let draft = ProductDraft::from(store.get(id)?);

            store.update(id, edit_draft(draft, args))?
        }
        AdminSubcommand::Delete(args) => store.delete(ProductId::new(args.id))?,
    };

    Ok(Some(change))
}

pub(crate) fn run(
    config: &StoreConfig,
    fixture: &Fixture,
    command: AdminCommand,
) -> anyhow::Result<()> {
    let mut store = fixture.store();
    let mut out = io::stdout().lock();

    if let Some(change) = apply(&mut store, command.command)? {
        let notification = change.notification();

        writeln!(out, "{notification}")?;
        TracingSink.notify(notification);
    }

    render::write_catalog(
        &mut out,
        &store.snapshot(),
        &CatalogCriteria::default(),
        config.currency,
    )?;

    Ok(())
}
