//! # Commands Module
//!
//! One module per top-level command.
//!
//! ```text
//! commands/
//! ├── mod.rs       ◄─── You are here (dispatch, shared output helpers)
//! ├── products.rs  ◄─── Stock CRUD
//! ├── clients.rs   ◄─── Client list / registration
//! ├── sales.rs     ◄─── Sales history
//! ├── report.rs    ◄─── Sales report and dashboard
//! ├── sell.rs      ◄─── Sale composer workflow
//! └── config.rs    ◄─── Config file (no API client needed)
//! ```
//!
//! Every other command receives the shared [`Context`] and only uses the
//! services it needs.

pub mod clients;
pub mod config;
pub mod products;
pub mod report;
pub mod sales;
pub mod sell;

use serde::Serialize;

use vendas_client::{ApiClient, ClientConfig};

use crate::cli::Command;

/// What every command gets.
pub struct Context {
    pub api: ApiClient,
    pub config: ClientConfig,
    pub json: bool,
}

impl Context {
    /// Prints `value` as JSON when `--json` is set, otherwise runs `human`.
    pub fn emit<T: Serialize>(&self, value: &T, human: impl FnOnce(&T)) -> anyhow::Result<()> {
        if self.json {
            println!("{}", serde_json::to_string_pretty(value)?);
        } else {
            human(value);
        }
        Ok(())
    }
}

pub async fn run(command: Command, ctx: &Context) -> anyhow::Result<()> {
    match command {
        Command::Products(cmd) => products::run(cmd, ctx).await,
        Command::Clients(cmd) => clients::run(cmd, ctx).await,
        Command::Sales(cmd) => sales::run(cmd, ctx).await,
        Command::Report { from, to } => report::report(from, to, ctx).await,
        Command::Dashboard => report::dashboard(ctx).await,
        Command::Sell(args) => sell::run(args, ctx).await,
        Command::Config(_) => anyhow::bail!("config commands run without an API client"),
    }
}

/// `-` for absent optional text.
pub(crate) fn or_dash(value: Option<&str>) -> &str {
    value.filter(|v| !v.is_empty()).unwrap_or("-")
}
