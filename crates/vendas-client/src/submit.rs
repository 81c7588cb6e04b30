//! # Sale Submission
//!
//! Executes the plans produced by the composer: one sale write followed by
//! concurrent line-item writes.
//!
//! ## Submission Sequence
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  composer.begin_submit(today) ──► SubmissionPlan                        │
//! │        │                                                                │
//! │        ▼                                                                │
//! │  POST /vendas/ {cliente_id, data_venda, total}                          │
//! │        │ Err ──────────────────────────► SaleRejected (nothing written) │
//! │        │ Err(Decode) ──────────────────► SaleRejected (unconfirmed)     │
//! │        │ Ok(sale)                                                       │
//! │        ▼                                                                │
//! │  join_all( POST /venda_produto/ × N )   all settle, none cancelled      │
//! │        │                                                                │
//! │        ▼                                                                │
//! │  BatchResult { succeeded, failed }                                      │
//! │        │ failed empty ─────────────────► Completed                      │
//! │        │ otherwise ────────────────────► Partial (NeedsReconciliation)  │
//! │        ▼                                                                │
//! │  composer.finish_submit(outcome)                                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every attempt runs inside a `submit_sale` span carrying a fresh
//! `submission_id`, so the interleaved line-item logs can be grouped.

use chrono::NaiveDate;
use futures_util::future::join_all;
use tracing::{debug, info, info_span, warn, Instrument};
use uuid::Uuid;

use vendas_core::{
    BatchResult, FailedLine, NewLineItem, RetryPlan, SaleComposer, SaleId, SelectedLine,
    SubmissionOutcome, SubmissionPlan,
};

use crate::error::{ClientError, ClientResult};
use crate::service::SalesService;

// =============================================================================
// Plan Execution
// =============================================================================

/// Writes one line item per cart line, concurrently, and waits for all of
/// them.
pub async fn write_line_items<S>(service: &S, sale_id: SaleId, lines: &[SelectedLine]) -> BatchResult
where
    S: SalesService + ?Sized,
{
    let writes = lines.iter().map(|line| async move {
        let item = NewLineItem::for_line(sale_id, line);
        (line, service.create_line_item(&item).await)
    });

    let mut batch = BatchResult::default();
    for (line, result) in join_all(writes).await {
        match result {
            Ok(item) => {
                debug!(
                    product_id = item.product_id,
                    quantity = item.quantity,
                    "Line item created"
                );
                batch.succeeded.push(item);
            }
            Err(e) => {
                warn!(product_id = line.product_id, error = %e, "Line item failed");
                batch.failed.push(FailedLine {
                    line: line.clone(),
                    message: e.to_string(),
                });
            }
        }
    }
    batch
}

/// Creates the sale, then its line items.
pub async fn execute_plan<S>(service: &S, plan: &SubmissionPlan) -> SubmissionOutcome
where
    S: SalesService + ?Sized,
{
    let sale = match service.create_sale(&plan.sale).await {
        Ok(sale) => sale,
        Err(ClientError::Decode(detail)) => {
            // 2xx with an unreadable body: the backend may hold the sale.
            warn!(error = %detail, "Sale possibly created but the response was unreadable");
            return SubmissionOutcome::SaleRejected {
                message: format!(
                    "the sale may have been created but its response could not be read \
                     ({detail}); check the sales list before submitting again"
                ),
            };
        }
        Err(e) => {
            warn!(error = %e, "Sale creation failed");
            return SubmissionOutcome::SaleRejected {
                message: e.to_string(),
            };
        }
    };
    info!(sale_id = sale.id, total = %sale.total, "Sale created");

    let batch = write_line_items(service, sale.id, &plan.lines).await;
    if !batch.is_complete() {
        warn!(
            sale_id = sale.id,
            failed = batch.failed.len(),
            succeeded = batch.succeeded.len(),
            "Sale is missing line items"
        );
    }
    SubmissionOutcome::from_batch(sale, batch)
}

// =============================================================================
// Composer Workflows
// =============================================================================

/// Submits the composer's cart.
///
/// Local rejections (empty cart, stock exceeded, wrong phase) are returned
/// as errors and nothing is sent. Remote failures are reported through the
/// returned outcome and the composer's phase.
pub async fn submit<S>(
    composer: &mut SaleComposer,
    service: &S,
    today: NaiveDate,
) -> ClientResult<SubmissionOutcome>
where
    S: SalesService + ?Sized,
{
    let plan = composer.begin_submit(today)?;

    let span = info_span!(
        "submit_sale",
        submission_id = %Uuid::new_v4(),
        lines = plan.lines.len(),
        total = %plan.sale.total,
    );
    let outcome = execute_plan(service, &plan).instrument(span).await;

    composer.finish_submit(outcome.clone())?;
    Ok(outcome)
}

/// Resubmits the line items still missing from a partial sale.
pub async fn retry<S>(composer: &mut SaleComposer, service: &S) -> ClientResult<BatchResult>
where
    S: SalesService + ?Sized,
{
    let plan: RetryPlan = composer.begin_retry()?;

    let span = info_span!(
        "retry_line_items",
        submission_id = %Uuid::new_v4(),
        sale_id = plan.sale.id,
        lines = plan.lines.len(),
    );
    let batch = write_line_items(service, plan.sale.id, &plan.lines)
        .instrument(span)
        .await;

    composer.finish_retry(batch.clone())?;
    Ok(batch)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::collections::HashSet;
    use std::sync::Mutex;
    use vendas_core::{
        Catalog, Money, NewSale, Phase, Product, ProductId, Sale, SaleLineItem, SaleWithItems,
    };

    /// In-memory sales backend that records every write.
    #[derive(Default)]
    struct FakeSales {
        reject_sale: bool,
        unreadable_sale: bool,
        failing_products: Mutex<HashSet<ProductId>>,
        sales: Mutex<Vec<NewSale>>,
        items: Mutex<Vec<NewLineItem>>,
    }

    impl FakeSales {
        fn failing(products: &[ProductId]) -> Self {
            FakeSales {
                failing_products: Mutex::new(products.iter().copied().collect()),
                ..Default::default()
            }
        }

        fn heal(&self) {
            self.failing_products.lock().unwrap().clear();
        }
    }

    #[async_trait]
    impl SalesService for FakeSales {
        async fn create_sale(&self, sale: &NewSale) -> ClientResult<Sale> {
            if self.reject_sale {
                return Err(ClientError::Status {
                    status: 400,
                    detail: "database is locked".into(),
                });
            }
            let mut sales = self.sales.lock().unwrap();
            sales.push(sale.clone());
            if self.unreadable_sale {
                return Err(ClientError::Decode("expected value at line 1 column 1".into()));
            }
            Ok(Sale {
                id: sales.len() as i64 + 9,
                client_id: sale.client_id,
                date: sale.date,
                total: sale.total,
            })
        }

        async fn create_line_item(&self, item: &NewLineItem) -> ClientResult<SaleLineItem> {
            if self.failing_products.lock().unwrap().contains(&item.product_id) {
                return Err(ClientError::Timeout(10));
            }
            self.items.lock().unwrap().push(item.clone());
            Ok(SaleLineItem {
                sale_id: item.sale_id,
                product_id: item.product_id,
                quantity: item.quantity,
            })
        }

        async fn list_sales(&self) -> ClientResult<Vec<Sale>> {
            Ok(vec![])
        }

        async fn get_sale(&self, id: SaleId) -> ClientResult<SaleWithItems> {
            Err(ClientError::Status {
                status: 404,
                detail: format!("sale {id}"),
            })
        }

        async fn sale_line_items(&self, _id: SaleId) -> ClientResult<Vec<SaleLineItem>> {
            Ok(vec![])
        }

        async fn delete_sale(&self, id: SaleId) -> ClientResult<Sale> {
            Err(ClientError::Status {
                status: 404,
                detail: format!("sale {id}"),
            })
        }
    }

    fn product(id: ProductId, name: &str, price_cents: i64, stock: i64) -> Product {
        Product {
            id,
            name: name.to_string(),
            description: None,
            unit_price: Money::from_cents(price_cents),
            stock_quantity: stock,
        }
    }

    fn composer_with(products: Vec<Product>) -> SaleComposer {
        let mut composer = SaleComposer::default();
        composer
            .finish_loading(Ok::<_, String>(Catalog::new(products, vec![])))
            .unwrap();
        composer
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, 2).unwrap()
    }

    #[tokio::test]
    async fn test_submit_single_line_walk_in() {
        let service = FakeSales::default();
        let mut composer = composer_with(vec![product(2, "B", 550, 10)]);
        composer.add_line(2, 4).unwrap();

        let outcome = submit(&mut composer, &service, today()).await.unwrap();

        assert!(matches!(outcome, SubmissionOutcome::Completed { .. }));
        let sales = service.sales.lock().unwrap();
        assert_eq!(sales.len(), 1);
        assert_eq!(sales[0].total.cents(), 2200);
        assert_eq!(sales[0].client_id, None);
        assert_eq!(sales[0].date, today());

        let items = service.items.lock().unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].product_id, 2);
        assert_eq!(items[0].quantity, 4);
        assert_eq!(items[0].sale_id, 10);

        assert!(composer.cart().is_empty());
        assert_eq!(composer.phase(), &Phase::Selecting);
    }

    #[tokio::test]
    async fn test_sale_rejection_writes_nothing() {
        let service = FakeSales {
            reject_sale: true,
            ..Default::default()
        };
        let mut composer = composer_with(vec![product(2, "B", 550, 10)]);
        composer.add_line(2, 4).unwrap();
        let before = composer.cart().clone();

        let outcome = submit(&mut composer, &service, today()).await.unwrap();

        assert!(matches!(outcome, SubmissionOutcome::SaleRejected { .. }));
        assert!(service.items.lock().unwrap().is_empty());
        assert_eq!(composer.cart(), &before);
        assert_eq!(composer.phase(), &Phase::Selecting);
        assert!(composer.error().unwrap().contains("database is locked"));
    }

    #[tokio::test]
    async fn test_unreadable_sale_response_is_flagged_as_unconfirmed() {
        let service = FakeSales {
            unreadable_sale: true,
            ..Default::default()
        };
        let mut composer = composer_with(vec![product(2, "B", 550, 10)]);
        composer.add_line(2, 4).unwrap();

        let outcome = submit(&mut composer, &service, today()).await.unwrap();

        let SubmissionOutcome::SaleRejected { message } = outcome else {
            panic!("expected SaleRejected");
        };
        assert!(message.contains("may have been created"));
        assert!(message.contains("check the sales list"));
        assert_eq!(service.sales.lock().unwrap().len(), 1);
        assert!(service.items.lock().unwrap().is_empty());
        assert!(composer.error().unwrap().contains("may have been created"));
    }

    #[tokio::test]
    async fn test_empty_cart_sends_nothing() {
        let service = FakeSales::default();
        let mut composer = composer_with(vec![product(2, "B", 550, 10)]);

        assert!(submit(&mut composer, &service, today()).await.is_err());
        assert!(service.sales.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_partial_failure_then_retry_same_sale() {
        let service = FakeSales::failing(&[3]);
        let mut composer = composer_with(vec![
            product(1, "A", 1000, 5),
            product(2, "B", 550, 10),
            product(3, "C", 200, 10),
        ]);
        composer.add_line(1, 1).unwrap();
        composer.add_line(2, 4).unwrap();
        composer.add_line(3, 2).unwrap();

        let outcome = submit(&mut composer, &service, today()).await.unwrap();
        let SubmissionOutcome::Partial { sale, batch } = outcome else {
            panic!("expected a partial outcome");
        };
        assert_eq!(batch.succeeded.len(), 2);
        assert_eq!(batch.failed.len(), 1);
        assert!(matches!(composer.phase(), Phase::NeedsReconciliation { .. }));
        let pending: Vec<_> = composer.cart().lines().iter().map(|l| l.product_id).collect();
        assert_eq!(pending, vec![3]);

        service.heal();
        let batch = retry(&mut composer, &service).await.unwrap();
        assert!(batch.is_complete());

        let items = service.items.lock().unwrap();
        assert_eq!(items.len(), 3);
        assert!(items.iter().all(|i| i.sale_id == sale.id));
        assert_eq!(service.sales.lock().unwrap().len(), 1);
        assert_eq!(composer.phase(), &Phase::Selecting);
    }

    #[tokio::test]
    async fn test_failed_retry_stays_in_reconciliation() {
        let service = FakeSales::failing(&[2]);
        let mut composer = composer_with(vec![product(2, "B", 550, 10)]);
        composer.add_line(2, 4).unwrap();
        submit(&mut composer, &service, today()).await.unwrap();

        let batch = retry(&mut composer, &service).await.unwrap();
        assert!(!batch.is_complete());
        assert!(matches!(composer.phase(), Phase::NeedsReconciliation { .. }));
        assert_eq!(composer.cart().len(), 1);
    }

    #[tokio::test]
    async fn test_write_line_items_settles_all() {
        let service = FakeSales::failing(&[1]);
        let lines = vec![
            SelectedLine::from_product(&product(1, "A", 100, 9), 1),
            SelectedLine::from_product(&product(2, "B", 100, 9), 2),
        ];
        let batch = write_line_items(&service, 42, &lines).await;
        assert_eq!(batch.failed.len(), 1);
        assert_eq!(batch.failed[0].line.product_id, 1);
        assert_eq!(batch.succeeded.len(), 1);
        assert_eq!(batch.succeeded[0].sale_id, 42);
    }
}
