//! # Product Commands
//!
//! Stock maintenance over `/produtos/`.

use anyhow::Context as _;
use tracing::info;

use vendas_client::{CatalogService, ProductStore};
use vendas_core::{Product, ProductInput, ProductPatch};

use super::{or_dash, Context};
use crate::cli::{ProductArgs, ProductUpdateArgs, ProductsCommand};

pub async fn run(cmd: ProductsCommand, ctx: &Context) -> anyhow::Result<()> {
    match cmd {
        ProductsCommand::List => {
            let products = ctx
                .api
                .list_products()
                .await
                .context("failed to list products")?;
            ctx.emit(&products, |products| print_table(products))
        }
        ProductsCommand::Show { id } => {
            let product = ctx.api.get_product(id).await?;
            ctx.emit(&product, print_detail)
        }
        ProductsCommand::Add(args) => {
            let product = ctx.api.create_product(&input_from(args)).await?;
            info!(product_id = product.id, "Product created");
            ctx.emit(&product, print_detail)
        }
        ProductsCommand::Update { id, fields } => {
            let product = ctx.api.update_product(id, &patch_from(fields)).await?;
            info!(product_id = product.id, "Product updated");
            ctx.emit(&product, print_detail)
        }
        ProductsCommand::Delete { id } => {
            let product = ctx.api.delete_product(id).await?;
            info!(product_id = product.id, "Product deleted");
            ctx.emit(&product, |p| println!("Deleted product {} ({})", p.id, p.name))
        }
    }
}

fn input_from(args: ProductArgs) -> ProductInput {
    ProductInput {
        name: args.name,
        description: args.description,
        unit_price: args.price,
        stock_quantity: args.stock,
    }
}

fn patch_from(args: ProductUpdateArgs) -> ProductPatch {
    ProductPatch {
        name: args.name,
        description: args.description,
        unit_price: args.price,
        stock_quantity: args.stock,
    }
}

fn print_table(products: &[Product]) {
    if products.is_empty() {
        println!("No products registered.");
        return;
    }
    println!("{:>5}  {:<30}  {:>12}  {:>6}", "ID", "NAME", "PRICE", "STOCK");
    for p in products {
        let stock = if p.is_out_of_stock() {
            "out".to_string()
        } else {
            p.stock_quantity.to_string()
        };
        println!(
            "{:>5}  {:<30}  {:>12}  {:>6}",
            p.id,
            p.name,
            p.unit_price.to_string(),
            stock
        );
    }
}

fn print_detail(p: &Product) {
    println!("Product {}", p.id);
    println!("  name:        {}", p.name);
    println!("  description: {}", or_dash(p.description.as_deref()));
    println!("  price:       {}", p.unit_price);
    println!("  stock:       {}", p.stock_quantity);
}
