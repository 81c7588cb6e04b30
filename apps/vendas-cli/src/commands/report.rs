//! Sales report and dashboard.

use chrono::NaiveDate;

use vendas_client::{dashboard as fetch_dashboard, sales_report};
use vendas_core::{DashboardMetrics, DateRange, SalesReport};

use super::{sales::print_table, Context};

pub async fn report(from: Option<NaiveDate>, to: Option<NaiveDate>, ctx: &Context) -> anyhow::Result<()> {
    let range = DateRange::new(from, to)?;
    let report = sales_report(&ctx.api, range).await?;
    ctx.emit(&report, print_report)
}

pub async fn dashboard(ctx: &Context) -> anyhow::Result<()> {
    let metrics = fetch_dashboard(&ctx.api).await?;
    ctx.emit(&metrics, print_dashboard)
}

fn print_report(report: &SalesReport) {
    if report.filter_active() {
        let bound = |d: Option<NaiveDate>| d.map(|d| d.to_string()).unwrap_or_else(|| "...".into());
        println!(
            "Sales from {} to {}",
            bound(report.range.from),
            bound(report.range.to)
        );
    } else {
        println!("All sales");
    }
    print_table(&report.sales);
    println!();
    println!("  sales:          {}", report.count);
    println!("  revenue:        {}", report.revenue);
    println!("  average ticket: {}", report.average_ticket);
    match report.last_sale {
        Some(date) => println!("  last sale:      {date}"),
        None => println!("  last sale:      -"),
    }
}

fn print_dashboard(metrics: &DashboardMetrics) {
    println!("  sales:        {}", metrics.sales_count);
    println!("  products:     {}", metrics.product_count);
    println!("  revenue:      {}", metrics.revenue);
    println!("  out of stock: {}", metrics.out_of_stock);
}
