//! # vendas-client: Sales Backend Client for Vendas
//!
//! Every network call the sales client makes, plus the workflows that feed
//! remote results into the pure [`vendas_core::SaleComposer`].
//!
//! ## Architecture Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Client Architecture                              │
//! │                                                                         │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │                ApiClient (reqwest, one per process)              │  │
//! │  │   implements CatalogService + SalesService + ProductStore +      │  │
//! │  │   ClientDirectory                                                │  │
//! │  └────────────────────────────┬─────────────────────────────────────┘  │
//! │                               │                                         │
//! │         ┌─────────────────────┼─────────────────────┐                  │
//! │         ▼                     ▼                     ▼                   │
//! │  ┌────────────────┐  ┌────────────────┐  ┌────────────────────────┐    │
//! │  │ loader         │  │ submit         │  │ reports                │    │
//! │  │                │  │                │  │                        │    │
//! │  │ products and   │  │ sale, then N   │  │ sales report with      │    │
//! │  │ clients in     │  │ line items in  │  │ date filter, dashboard │    │
//! │  │ parallel       │  │ parallel       │  │ metrics                │    │
//! │  └────────────────┘  └────────────────┘  └────────────────────────┘    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//! - [`api`] - `ApiClient`, the HTTP implementation of the services
//! - [`config`] - Base URL, timeout and composer policy (TOML + env)
//! - [`dto`] - Backend JSON shapes and conversions
//! - [`error`] - `ClientError` and `ConfigError`
//! - [`loader`] - Catalog loading into the composer
//! - [`reports`] - Report and dashboard fetches
//! - [`service`] - Service traits
//! - [`submit`] - Sale submission and line-item retry
//!
//! ## Usage
//!
//! ```rust,no_run
//! use chrono::Local;
//! use vendas_client::{load_catalog, submit, ApiClient, ClientConfig};
//! use vendas_core::SaleComposer;
//!
//! # async fn run() -> vendas_client::ClientResult<()> {
//! let config = ClientConfig::load(None)?;
//! let api = ApiClient::new(&config)?;
//!
//! let mut composer = SaleComposer::new(config.policy());
//! load_catalog(&mut composer, &api).await?;
//!
//! composer.add_line(2, 4)?;
//! let outcome = submit(&mut composer, &api, Local::now().date_naive()).await?;
//! println!("{outcome:?}");
//! # Ok(())
//! # }
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod api;
pub mod config;
pub mod dto;
pub mod error;
pub mod loader;
pub mod reports;
pub mod service;
pub mod submit;

// =============================================================================
// Re-exports
// =============================================================================

pub use api::ApiClient;
pub use config::{ApiSettings, ClientConfig, ComposerSettings};
pub use error::{ClientError, ClientResult, ConfigError, ConfigResult};
pub use loader::{fetch_catalog, load_catalog};
pub use reports::{dashboard, sales_report};
pub use service::{CatalogService, ClientDirectory, ProductStore, SalesService};
pub use submit::{execute_plan, retry, submit, write_line_items};
