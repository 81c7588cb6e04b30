//! # Command-Line Interface
//!
//! ```text
//! vendas [--config FILE] [--api-url URL] [--json] <COMMAND>
//!
//!   products  list | show ID | add | update ID | delete ID
//!   clients   list | show ID | add
//!   sales     list | show ID | items ID | delete ID
//!   report    [--from DATE] [--to DATE]
//!   dashboard
//!   sell      [--client ID] --item PRODUCT_ID:QTY ... [--date DATE] [--dry-run] [--retries N]
//!   config    show | init [--force]
//! ```

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};

use vendas_core::{ClientId, Money, ProductId, SaleId};

#[derive(Debug, Parser)]
#[command(name = "vendas", version, about = "Sales, stock and clients from the terminal")]
pub struct Cli {
    /// Config file (default: platform config dir, vendas.toml)
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Sales backend base URL; overrides config and VENDAS_API_URL
    #[arg(long, global = true, value_name = "URL")]
    pub api_url: Option<String>,

    /// Print results as JSON (money in centavos)
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Stock maintenance
    #[command(subcommand)]
    Products(ProductsCommand),

    #[command(subcommand)]
    Clients(ClientsCommand),

    /// Sales history
    #[command(subcommand)]
    Sales(SalesCommand),

    /// Sales report, optionally limited to a date range (inclusive)
    Report {
        #[arg(long, value_name = "YYYY-MM-DD")]
        from: Option<NaiveDate>,
        #[arg(long, value_name = "YYYY-MM-DD")]
        to: Option<NaiveDate>,
    },

    /// Headline numbers: sales, products, revenue
    Dashboard,

    /// Compose and submit a sale
    Sell(SellArgs),

    /// Show or create the config file
    #[command(subcommand)]
    Config(ConfigCommand),
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Effective settings after file and environment overrides
    Show,
    /// Write a config file with default settings
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

#[derive(Debug, Subcommand)]
pub enum ProductsCommand {
    List,
    Show {
        id: ProductId,
    },
    Add(ProductArgs),
    Update {
        id: ProductId,
        #[command(flatten)]
        fields: ProductUpdateArgs,
    },
    Delete {
        id: ProductId,
    },
}

#[derive(Debug, Args)]
pub struct ProductArgs {
    #[arg(long)]
    pub name: String,
    #[arg(long)]
    pub description: Option<String>,
    /// Unit price, e.g. 10.99 or 10,99
    #[arg(long, value_parser = parse_money)]
    pub price: Money,
    #[arg(long, default_value_t = 0)]
    pub stock: i64,
}

#[derive(Debug, Args)]
pub struct ProductUpdateArgs {
    #[arg(long)]
    pub name: Option<String>,
    #[arg(long)]
    pub description: Option<String>,
    #[arg(long, value_parser = parse_money)]
    pub price: Option<Money>,
    #[arg(long)]
    pub stock: Option<i64>,
}

#[derive(Debug, Subcommand)]
pub enum ClientsCommand {
    List,
    Show {
        id: ClientId,
    },
    Add {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        phone: Option<String>,
    },
}

#[derive(Debug, Subcommand)]
pub enum SalesCommand {
    List,
    Show { id: SaleId },
    /// Line items of a sale
    Items { id: SaleId },
    Delete { id: SaleId },
}

#[derive(Debug, Args)]
pub struct SellArgs {
    /// Client id; omit for a walk-in sale
    #[arg(long)]
    pub client: Option<ClientId>,

    /// Line as PRODUCT_ID:QTY; repeat for more lines
    #[arg(long = "item", value_name = "PRODUCT_ID:QTY", value_parser = parse_item, required = true)]
    pub items: Vec<(ProductId, i64)>,

    /// Sale date (default: today)
    #[arg(long, value_name = "YYYY-MM-DD")]
    pub date: Option<NaiveDate>,

    /// Validate and show the review without submitting
    #[arg(long)]
    pub dry_run: bool,

    /// Extra attempts for line items that failed after the sale was created
    #[arg(long, default_value_t = 1)]
    pub retries: u32,
}

// =============================================================================
// Value Parsers
// =============================================================================

/// Parses `PRODUCT_ID:QTY`.
fn parse_item(s: &str) -> Result<(ProductId, i64), String> {
    let (id, qty) = s
        .split_once(':')
        .ok_or_else(|| format!("expected PRODUCT_ID:QTY, got '{s}'"))?;
    let id = id
        .trim()
        .parse::<ProductId>()
        .map_err(|e| format!("invalid product id '{id}': {e}"))?;
    let qty = qty
        .trim()
        .parse::<i64>()
        .map_err(|e| format!("invalid quantity '{qty}': {e}"))?;
    Ok((id, qty))
}

/// Parses a decimal amount, accepting `,` as the decimal separator.
fn parse_money(s: &str) -> Result<Money, String> {
    let value = s
        .trim()
        .replace(',', ".")
        .parse::<f64>()
        .map_err(|e| format!("invalid amount '{s}': {e}"))?;
    Money::from_decimal(value).ok_or_else(|| format!("amount out of range: '{s}'"))
}
