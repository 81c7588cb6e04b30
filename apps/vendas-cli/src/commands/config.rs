//! # Config Commands
//!
//! Runs before the API client is built, so `config init` works when no
//! file exists yet.

use std::path::PathBuf;

use anyhow::{bail, Context as _};
use tracing::info;

use vendas_client::{ClientConfig, ConfigError};

use crate::cli::ConfigCommand;

pub fn run(cmd: ConfigCommand, path: Option<PathBuf>, json: bool) -> anyhow::Result<()> {
    match cmd {
        ConfigCommand::Show => {
            let config = ClientConfig::load(path)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&config)?);
            } else {
                print_config(&config);
            }
            Ok(())
        }
        ConfigCommand::Init { force } => {
            let path = path
                .or_else(ClientConfig::default_config_path)
                .context("no config directory on this platform; pass --config")?;
            if path.exists() && !force {
                bail!(ConfigError::Invalid(format!(
                    "{} already exists (use --force to overwrite)",
                    path.display()
                )));
            }
            ClientConfig::default().save(Some(path.clone()))?;
            info!(path = %path.display(), "Config file written");
            println!("Wrote {}", path.display());
            Ok(())
        }
    }
}

fn print_config(config: &ClientConfig) {
    match ClientConfig::default_config_path() {
        Some(path) => println!("default file:     {}", path.display()),
        None => println!("default file:     -"),
    }
    println!("api.base_url:     {}", config.api.base_url);
    println!("api.timeout_secs: {}", config.api.timeout_secs);
    println!(
        "composer.revalidate_stock: {}",
        config.composer.revalidate_stock
    );
}
