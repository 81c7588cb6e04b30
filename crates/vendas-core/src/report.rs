//! # Sales Report & Dashboard
//!
//! Aggregations over fetched sales. Everything here works on snapshots
//! handed in by the caller.
//!
//! ## Report Pipeline
//! ```text
//! Vec<Sale> ──► DateRange::contains (inclusive) ──► filtered sales
//!                                                     │
//!                                                     ├── count
//!                                                     ├── revenue   (Σ total)
//!                                                     ├── average   (revenue / count, rounded)
//!                                                     └── last_sale (max date)
//! ```

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::money::Money;
use crate::types::{Product, Sale};
use crate::validation::{validate_date_range, ValidationResult};

// =============================================================================
// Date Range
// =============================================================================

/// Optional inclusive date bounds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

impl DateRange {
    /// Builds a range, rejecting `from > to`.
    pub fn new(from: Option<NaiveDate>, to: Option<NaiveDate>) -> ValidationResult<Self> {
        validate_date_range(from, to)?;
        Ok(DateRange { from, to })
    }

    /// No bounds at all.
    pub fn unbounded() -> Self {
        DateRange::default()
    }

    pub fn is_active(&self) -> bool {
        self.from.is_some() || self.to.is_some()
    }

    /// Both ends inclusive: a sale dated exactly `to` is included.
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.from.map_or(true, |from| date >= from) && self.to.map_or(true, |to| date <= to)
    }
}

// =============================================================================
// Sales Report
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalesReport {
    pub range: DateRange,

    /// Sales inside the range, in the order received.
    pub sales: Vec<Sale>,

    pub count: usize,

    /// Sum of totals, clamped at the money range.
    pub revenue: Money,

    /// Revenue / count, zero for an empty report.
    pub average_ticket: Money,

    /// Most recent sale date inside the range.
    pub last_sale: Option<NaiveDate>,
}

impl SalesReport {
    pub fn build(sales: &[Sale], range: DateRange) -> Self {
        let sales: Vec<Sale> = sales
            .iter()
            .filter(|s| range.contains(s.date))
            .cloned()
            .collect();

        let count = sales.len();
        let revenue: Money = sales.iter().map(|s| s.total).sum();
        let average_ticket = revenue.divide_rounded(count as u64);
        let last_sale = sales.iter().map(|s| s.date).max();

        SalesReport {
            range,
            sales,
            count,
            revenue,
            average_ticket,
            last_sale,
        }
    }

    /// True when the report was narrowed by a date bound.
    pub fn filter_active(&self) -> bool {
        self.range.is_active()
    }
}

// =============================================================================
// Dashboard
// =============================================================================

/// Headline numbers for the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardMetrics {
    pub sales_count: usize,
    pub product_count: usize,
    pub revenue: Money,
    pub out_of_stock: usize,
}

impl DashboardMetrics {
    pub fn compute(sales: &[Sale], products: &[Product]) -> Self {
        DashboardMetrics {
            sales_count: sales.len(),
            product_count: products.len(),
            revenue: sales.iter().map(|s| s.total).sum(),
            out_of_stock: products.iter().filter(|p| p.is_out_of_stock()).count(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn sale(id: i64, date: &str, total_cents: i64) -> Sale {
        Sale {
            id,
            client_id: None,
            date: d(date),
            total: Money::from_cents(total_cents),
        }
    }

    fn sales() -> Vec<Sale> {
        vec![
            sale(1, "2024-01-10", 1000),
            sale(2, "2024-01-31", 2500),
            sale(3, "2024-02-01", 700),
            sale(4, "2023-12-31", 300),
        ]
    }

    #[test]
    fn test_range_is_inclusive_on_both_ends() {
        let range = DateRange::new(Some(d("2024-01-10")), Some(d("2024-01-31"))).unwrap();
        assert!(range.contains(d("2024-01-10")));
        assert!(range.contains(d("2024-01-31")));
        assert!(!range.contains(d("2024-02-01")));
        assert!(!range.contains(d("2024-01-09")));
    }

    #[test]
    fn test_range_rejects_reversed_bounds() {
        assert!(DateRange::new(Some(d("2024-02-01")), Some(d("2024-01-01"))).is_err());
    }

    #[test]
    fn test_unfiltered_report() {
        let report = SalesReport::build(&sales(), DateRange::unbounded());
        assert!(!report.filter_active());
        assert_eq!(report.count, 4);
        assert_eq!(report.revenue.cents(), 4500);
        assert_eq!(report.average_ticket.cents(), 1125);
        // max date, not the first element
        assert_eq!(report.last_sale, Some(d("2024-02-01")));
    }

    #[test]
    fn test_filtered_report() {
        let range = DateRange::new(Some(d("2024-01-01")), Some(d("2024-01-31"))).unwrap();
        let report = SalesReport::build(&sales(), range);
        assert!(report.filter_active());
        let ids: Vec<_> = report.sales.iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![1, 2]);
        assert_eq!(report.revenue.cents(), 3500);
        assert_eq!(report.average_ticket.cents(), 1750);
        assert_eq!(report.last_sale, Some(d("2024-01-31")));
    }

    #[test]
    fn test_open_ended_range() {
        let range = DateRange::new(Some(d("2024-01-31")), None).unwrap();
        let report = SalesReport::build(&sales(), range);
        assert_eq!(report.count, 2);
    }

    #[test]
    fn test_empty_report_has_zero_average() {
        let range = DateRange::new(Some(d("2030-01-01")), None).unwrap();
        let report = SalesReport::build(&sales(), range);
        assert_eq!(report.count, 0);
        assert!(report.average_ticket.is_zero());
        assert_eq!(report.last_sale, None);
    }

    #[test]
    fn test_huge_backend_totals_saturate() {
        let huge = Money::from_decimal(9e16).unwrap();
        let sales = vec![
            Sale {
                total: huge,
                ..sale(1, "2024-01-01", 0)
            },
            Sale {
                total: huge,
                ..sale(2, "2024-01-02", 0)
            },
        ];

        let report = SalesReport::build(&sales, DateRange::unbounded());
        assert_eq!(report.count, 2);
        assert_eq!(report.revenue.cents(), i64::MAX);
        assert_eq!(report.average_ticket.cents(), i64::MAX / 2 + 1);

        let metrics = DashboardMetrics::compute(&sales, &[]);
        assert_eq!(metrics.revenue.cents(), i64::MAX);
    }

    #[test]
    fn test_average_rounds_half_away_from_zero() {
        let report = SalesReport::build(
            &[sale(1, "2024-01-01", 1000), sale(2, "2024-01-01", 1001)],
            DateRange::unbounded(),
        );
        // 2001 / 2 = 1000.5
        assert_eq!(report.average_ticket.cents(), 1001);
    }

    #[test]
    fn test_dashboard_metrics() {
        let products = vec![
            Product {
                id: 1,
                name: "A".to_string(),
                description: None,
                unit_price: Money::from_cents(100),
                stock_quantity: 0,
            },
            Product {
                id: 2,
                name: "B".to_string(),
                description: None,
                unit_price: Money::from_cents(100),
                stock_quantity: 3,
            },
        ];
        let metrics = DashboardMetrics::compute(&sales(), &products);
        assert_eq!(metrics.sales_count, 4);
        assert_eq!(metrics.product_count, 2);
        assert_eq!(metrics.revenue.cents(), 4500);
        assert_eq!(metrics.out_of_stock, 1);
    }
}
