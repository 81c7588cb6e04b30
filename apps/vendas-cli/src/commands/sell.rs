//! # Sell Command
//!
//! Drives a [`SaleComposer`] from command-line arguments.
//!
//! ```text
//! load catalog ──► set client ──► add lines ──► review
//!                                                 │
//!                      --dry-run ◄────────────────┤
//!                                                 ▼
//!                                              submit
//!                                                 │
//!            ┌──────────────┬─────────────────────┤
//!            ▼              ▼                     ▼
//!        Completed     SaleRejected            Partial ──► retry (--retries)
//!                      (nothing written)                      │
//!                                                still missing? abandon,
//!                                                exit PARTIAL_SALE
//! ```

use anyhow::Context as _;
use chrono::Local;
use serde::Serialize;
use tracing::{info, warn};

use vendas_client::{load_catalog, retry, submit};
use vendas_core::{
    ClientId, Money, Phase, SaleComposer, SaleWithItems, SelectedLine, SubmissionOutcome,
};

use super::Context;
use crate::cli::SellArgs;
use crate::error::{PartialSaleError, RemoteFailure};

/// The cart as shown before submitting.
#[derive(Debug, Serialize)]
struct Review {
    client_id: Option<ClientId>,
    client_name: Option<String>,
    lines: Vec<SelectedLine>,
    total: Money,
}

pub async fn run(args: SellArgs, ctx: &Context) -> anyhow::Result<()> {
    let mut composer = SaleComposer::new(ctx.config.policy());

    load_catalog(&mut composer, &ctx.api).await?;
    if let Phase::LoadFailed { message } = composer.phase() {
        return Err(RemoteFailure(message.clone()).into());
    }

    composer.set_client(args.client)?;
    for (product_id, quantity) in &args.items {
        composer
            .add_line(*product_id, *quantity)
            .with_context(|| format!("cannot add {quantity} x product {product_id}"))?;
    }
    composer.advance();

    let review = review(&composer);
    if args.dry_run {
        return ctx.emit(&review, print_review);
    }
    if !ctx.json {
        print_review(&review);
    }

    let today = args.date.unwrap_or_else(|| Local::now().date_naive());
    let outcome = submit(&mut composer, &ctx.api, today).await?;

    let (sale, mut items) = match outcome {
        SubmissionOutcome::Completed { sale, items } => (sale, items),
        SubmissionOutcome::SaleRejected { message } => {
            let message = composer.error().map(str::to_string).unwrap_or(message);
            return Err(RemoteFailure(message).into());
        }
        SubmissionOutcome::Partial { sale, batch } => {
            let mut items = batch.succeeded;
            let mut attempt = 0;
            while attempt < args.retries && matches!(composer.phase(), Phase::NeedsReconciliation { .. }) {
                attempt += 1;
                warn!(
                    sale_id = sale.id,
                    missing = composer.cart().len(),
                    attempt,
                    "Retrying failed line items"
                );
                let batch = retry(&mut composer, &ctx.api).await?;
                items.extend(batch.succeeded);
            }

            if matches!(composer.phase(), Phase::NeedsReconciliation { .. }) {
                let missing = composer.cart().len();
                let details = composer.error().unwrap_or_default().to_string();
                let sale = composer.abandon()?;
                return Err(PartialSaleError {
                    sale_id: sale.id,
                    missing,
                    details,
                }
                .into());
            }
            (sale, items)
        }
    };

    items.sort_by_key(|item| item.product_id);
    info!(sale_id = sale.id, items = items.len(), "Sale registered");

    let receipt = SaleWithItems { sale, items };
    ctx.emit(&receipt, |r| {
        println!(
            "Registered sale {} on {} ({} line item(s), total {})",
            r.sale.id,
            r.sale.date,
            r.items.len(),
            r.sale.total
        );
    })
}

fn review(composer: &SaleComposer) -> Review {
    let draft = composer.draft();
    Review {
        client_id: draft.client_id,
        client_name: draft
            .client_id
            .and_then(|id| composer.catalog().client(id))
            .map(|c| c.name.clone()),
        lines: composer.cart().lines().to_vec(),
        total: draft.total,
    }
}

fn print_review(review: &Review) {
    match &review.client_name {
        Some(name) => println!("Client: {name}"),
        None => println!("Client: walk-in"),
    }
    for line in &review.lines {
        println!(
            "  {:>4} x {:<30} {:>12}  {:>12}",
            line.quantity,
            line.name,
            line.unit_price.to_string(),
            line.line_total().to_string()
        );
    }
    println!("Total: {}", review.total);
}

#[cfg(test)]
mod tests {
    use super::*;
    use vendas_core::{Catalog, Client, Product};

    fn composer() -> SaleComposer {
        let catalog = Catalog::new(
            vec![Product {
                id: 2,
                name: "Café 500g".into(),
                description: None,
                unit_price: Money::from_cents(1899),
                stock_quantity: 10,
            }],
            vec![Client {
                id: 7,
                name: "Maria".into(),
                email: None,
                phone: None,
            }],
        );
        let mut composer = SaleComposer::default();
        composer.finish_loading(Ok::<_, String>(catalog)).unwrap();
        composer
    }

    #[test]
    fn test_review_reflects_cart_and_client() {
        let mut composer = composer();
        composer.set_client(Some(7)).unwrap();
        composer.add_line(2, 3).unwrap();
        composer.advance();

        let review = review(&composer);
        assert_eq!(review.client_name.as_deref(), Some("Maria"));
        assert_eq!(review.lines.len(), 1);
        assert_eq!(review.total, Money::from_cents(5697));
    }

    #[test]
    fn test_review_of_walk_in_sale() {
        let mut composer = composer();
        composer.add_line(2, 1).unwrap();

        let review = review(&composer);
        assert_eq!(review.client_id, None);
        assert_eq!(review.client_name, None);
        assert_eq!(review.total, Money::from_cents(1899));
    }
}
