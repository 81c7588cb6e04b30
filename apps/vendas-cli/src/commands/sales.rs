//! Sales history over `/vendas/`.

use tracing::info;

use vendas_client::SalesService;
use vendas_core::{Sale, SaleLineItem, SaleWithItems};

use super::Context;
use crate::cli::SalesCommand;

pub async fn run(cmd: SalesCommand, ctx: &Context) -> anyhow::Result<()> {
    match cmd {
        SalesCommand::List => {
            let sales = ctx.api.list_sales().await?;
            ctx.emit(&sales, |sales| print_table(sales))
        }
        SalesCommand::Show { id } => {
            let sale = ctx.api.get_sale(id).await?;
            ctx.emit(&sale, print_detail)
        }
        SalesCommand::Items { id } => {
            let items = ctx.api.sale_line_items(id).await?;
            ctx.emit(&items, |items| print_items(items))
        }
        SalesCommand::Delete { id } => {
            let sale = ctx.api.delete_sale(id).await?;
            info!(sale_id = sale.id, "Sale deleted");
            ctx.emit(&sale, |s| println!("Deleted sale {} ({})", s.id, s.total))
        }
    }
}

pub(crate) fn print_table(sales: &[Sale]) {
    if sales.is_empty() {
        println!("No sales registered.");
        return;
    }
    println!("{:>5}  {:<10}  {:>7}  {:>12}", "ID", "DATE", "CLIENT", "TOTAL");
    for s in sales {
        let client = s
            .client_id
            .map(|id| id.to_string())
            .unwrap_or_else(|| "-".to_string());
        println!(
            "{:>5}  {:<10}  {:>7}  {:>12}",
            s.id,
            s.date,
            client,
            s.total.to_string()
        );
    }
}

fn print_detail(detail: &SaleWithItems) {
    let sale = &detail.sale;
    println!("Sale {} on {}", sale.id, sale.date);
    match sale.client_id {
        Some(id) => println!("  client: {id}"),
        None => println!("  client: walk-in"),
    }
    println!("  total:  {}", sale.total);
    print_items(&detail.items);
}

fn print_items(items: &[SaleLineItem]) {
    if items.is_empty() {
        println!("  (no line items)");
        return;
    }
    println!("  {:>8}  {:>5}", "PRODUCT", "QTY");
    for item in items {
        println!("  {:>8}  {:>5}", item.product_id, item.quantity);
    }
}
