//! # Vendas CLI
//!
//! Terminal front end for the sales backend.
//!
//! ## Startup Sequence
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Startup Sequence                                 │
//! │                                                                         │
//! │  1. Parse arguments (clap)                                             │
//! │  2. Initialize tracing (RUST_LOG, stderr)                              │
//! │  3. Load config: defaults → vendas.toml → VENDAS_* env → --api-url     │
//! │  4. Build the ApiClient                                                │
//! │  5. Run the command                                                    │
//! │  6. On failure: "error[CODE]: message" on stderr, exit status by code  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod cli;
mod commands;
mod error;

use std::process::ExitCode;

use anyhow::Context as _;
use clap::Parser;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use vendas_client::{ApiClient, ClientConfig};

use crate::cli::{Cli, Command};
use crate::commands::Context;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            let code = error::classify(&err);
            eprintln!("error[{}]: {err:#}", code.as_str());
            code.exit_code()
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    if let Command::Config(cmd) = cli.command {
        return commands::config::run(cmd, cli.config, cli.json);
    }

    let mut config = ClientConfig::load(cli.config.clone()).context("failed to load config")?;
    if let Some(url) = cli.api_url {
        config.api.base_url = url;
        config.validate()?;
    }

    let api = ApiClient::new(&config)?;
    debug!(base_url = %api.base_url(), "API client ready");

    let ctx = Context {
        api,
        config,
        json: cli.json,
    };
    commands::run(cli.command, &ctx).await
}

/// Filter used when `RUST_LOG` is unset.
const DEFAULT_LOG_FILTER: &str = "info,vendas=debug";

/// Logs go to stderr so `--json` output on stdout stays parseable.
fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
