//! Fetch-then-aggregate helpers for the report and dashboard screens.

use tracing::debug;

use vendas_core::{DashboardMetrics, DateRange, SalesReport};

use crate::error::ClientResult;
use crate::service::{CatalogService, SalesService};

/// Fetches all sales and builds the report for `range`.
pub async fn sales_report<S>(service: &S, range: DateRange) -> ClientResult<SalesReport>
where
    S: SalesService + ?Sized,
{
    let sales = service.list_sales().await?;
    let report = SalesReport::build(&sales, range);
    debug!(
        fetched = sales.len(),
        included = report.count,
        filter_active = report.filter_active(),
        "Sales report built"
    );
    Ok(report)
}

/// Fetches sales and products concurrently for the dashboard.
pub async fn dashboard<S>(service: &S) -> ClientResult<DashboardMetrics>
where
    S: SalesService + CatalogService + ?Sized,
{
    let (sales, products) = tokio::try_join!(service.list_sales(), service.list_products())?;
    Ok(DashboardMetrics::compute(&sales, &products))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ClientError;
    use async_trait::async_trait;
    use chrono::NaiveDate;
    use vendas_core::{
        Client, Money, NewLineItem, NewSale, Product, Sale, SaleId, SaleLineItem, SaleWithItems,
    };

    struct FakeBackend;

    fn sale(id: i64, date: &str, cents: i64) -> Sale {
        Sale {
            id,
            client_id: None,
            date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
            total: Money::from_cents(cents),
        }
    }

    fn not_found() -> ClientError {
        ClientError::Status {
            status: 404,
            detail: "not found".into(),
        }
    }

    #[async_trait]
    impl SalesService for FakeBackend {
        async fn create_sale(&self, _sale: &NewSale) -> ClientResult<Sale> {
            Err(not_found())
        }
        async fn create_line_item(&self, _item: &NewLineItem) -> ClientResult<SaleLineItem> {
            Err(not_found())
        }
        async fn list_sales(&self) -> ClientResult<Vec<Sale>> {
            Ok(vec![
                sale(1, "2024-03-01", 1500),
                sale(2, "2024-03-15", 500),
                sale(3, "2024-04-01", 1000),
            ])
        }
        async fn get_sale(&self, _id: SaleId) -> ClientResult<SaleWithItems> {
            Err(not_found())
        }
        async fn sale_line_items(&self, _id: SaleId) -> ClientResult<Vec<SaleLineItem>> {
            Ok(vec![])
        }
        async fn delete_sale(&self, _id: SaleId) -> ClientResult<Sale> {
            Err(not_found())
        }
    }

    #[async_trait]
    impl CatalogService for FakeBackend {
        async fn list_products(&self) -> ClientResult<Vec<Product>> {
            Ok(vec![Product {
                id: 1,
                name: "A".to_string(),
                description: None,
                unit_price: Money::from_cents(100),
                stock_quantity: 0,
            }])
        }
        async fn list_clients(&self) -> ClientResult<Vec<Client>> {
            Ok(vec![])
        }
    }

    #[tokio::test]
    async fn test_sales_report_filters_by_month() {
        let range = DateRange::new(
            NaiveDate::from_ymd_opt(2024, 3, 1),
            NaiveDate::from_ymd_opt(2024, 3, 31),
        )
        .unwrap();
        let report = sales_report(&FakeBackend, range).await.unwrap();
        assert_eq!(report.count, 2);
        assert_eq!(report.revenue.cents(), 2000);
        assert_eq!(report.average_ticket.cents(), 1000);
    }

    #[tokio::test]
    async fn test_dashboard() {
        let metrics = dashboard(&FakeBackend).await.unwrap();
        assert_eq!(metrics.sales_count, 3);
        assert_eq!(metrics.product_count, 1);
        assert_eq!(metrics.revenue.cents(), 3000);
        assert_eq!(metrics.out_of_stock, 1);
    }
}
