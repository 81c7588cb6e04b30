//! # vendas-core: Pure Business Logic for Vendas
//!
//! Everything the sales client decides without talking to the network:
//! money math, validation, the cart, the sale composer state machine and
//! report aggregation.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Vendas Architecture                              │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    vendas-cli (binary)                          │   │
//! │  │    products ─ clients ─ sales ─ report ─ dashboard ─ sell      │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    vendas-client (I/O)                          │   │
//! │  │    ApiClient (reqwest) ─ load_catalog ─ submit ─ config        │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ plans / outcomes                       │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ vendas-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │   ┌─────────┐ ┌─────────┐ ┌─────────┐ ┌──────────┐ ┌────────┐  │   │
//! │  │   │  types  │ │  money  │ │  cart   │ │ composer │ │ report │  │   │
//! │  │   └─────────┘ └─────────┘ └─────────┘ └──────────┘ └────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO NETWORK • NO CLOCK • PURE FUNCTIONS              │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Product, Client, Sale, Catalog)
//! - [`money`] - Integer centavos with decimal conversion at the wire
//! - [`error`] - Domain error types
//! - [`validation`] - Quantity, stock and input rules
//! - [`cart`] - Selected lines with frozen name/price
//! - [`composer`] - The sale composer state machine
//! - [`submission`] - Plans and outcomes exchanged with the I/O layer
//! - [`report`] - Sales report and dashboard metrics
//!
//! ## Example Usage
//!
//! ```rust
//! use vendas_core::{Catalog, Money, Product, SaleComposer};
//!
//! let mut composer = SaleComposer::default();
//! let product = Product {
//!     id: 2,
//!     name: "B".into(),
//!     description: None,
//!     unit_price: Money::from_cents(550),
//!     stock_quantity: 10,
//! };
//! composer
//!     .finish_loading(Ok::<_, String>(Catalog::new(vec![product], vec![])))
//!     .unwrap();
//!
//! composer.add_line(2, 4).unwrap();
//! assert_eq!(composer.total().to_string(), "R$ 22,00");
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cart;
pub mod composer;
pub mod error;
pub mod money;
pub mod report;
pub mod submission;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use cart::{Cart, CartTotals, SelectedLine};
pub use composer::{ComposerPolicy, Phase, SaleComposer};
pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use report::{DashboardMetrics, DateRange, SalesReport};
pub use submission::{BatchResult, FailedLine, NewLineItem, RetryPlan, SubmissionOutcome, SubmissionPlan};
pub use types::*;
