//! # Domain Types
//!
//! Core domain types used throughout Vendas.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Product      │   │     Client      │   │      Sale       │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id             │   │  id             │   │  id             │       │
//! │  │  name           │   │  name           │   │  client_id?     │       │
//! │  │  unit_price     │   │  email?         │   │  date           │       │
//! │  │  stock_quantity │   │  phone?         │   │  total          │       │
//! │  └─────────────────┘   └─────────────────┘   └────────┬────────┘       │
//! │                                                        │ 1..N           │
//! │                                               ┌────────▼────────┐       │
//! │                                               │  SaleLineItem   │       │
//! │                                               │  sale_id        │       │
//! │                                               │  product_id     │       │
//! │                                               │  quantity       │       │
//! │                                               └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Identity
//! The backend assigns integer ids. Products, clients and sales are owned by
//! the backend; this crate only holds snapshots of them.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::money::Money;

/// Backend id of a product.
pub type ProductId = i64;

/// Backend id of a client.
pub type ClientId = i64;

/// Backend id of a sale.
pub type SaleId = i64;

// =============================================================================
// Product
// =============================================================================

/// A product available for sale, as fetched from the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,

    /// Display name shown in the composer and reports.
    pub name: String,

    pub description: Option<String>,

    /// Price in centavos.
    pub unit_price: Money,

    /// Units in stock at the time the catalog was fetched.
    pub stock_quantity: i64,
}

impl Product {
    /// Checks if `quantity` units can be sold from the snapshot stock.
    pub fn can_sell(&self, quantity: i64) -> bool {
        quantity <= self.stock_quantity
    }

    pub fn is_out_of_stock(&self) -> bool {
        self.stock_quantity <= 0
    }
}

/// Fields for creating a product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductInput {
    pub name: String,
    pub description: Option<String>,
    pub unit_price: Money,
    pub stock_quantity: i64,
}

/// Partial product update. Only the `Some` fields are sent; the backend
/// leaves the others untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub unit_price: Option<Money>,
    pub stock_quantity: Option<i64>,
}

impl ProductPatch {
    /// True when no field would be changed.
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.unit_price.is_none()
            && self.stock_quantity.is_none()
    }
}

// =============================================================================
// Client
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Client {
    pub id: ClientId,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
}

/// Fields for registering a client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientInput {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
}

// =============================================================================
// Sale
// =============================================================================

/// A sale recorded by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sale {
    pub id: SaleId,
    /// Walk-in sales have no client.
    pub client_id: Option<ClientId>,
    pub date: NaiveDate,
    pub total: Money,
}

/// One product-quantity pairing within a sale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaleLineItem {
    pub sale_id: SaleId,
    pub product_id: ProductId,
    pub quantity: i64,
}

/// A sale together with its line items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaleWithItems {
    pub sale: Sale,
    pub items: Vec<SaleLineItem>,
}

/// Request body for creating a sale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewSale {
    pub client_id: Option<ClientId>,
    pub date: NaiveDate,
    pub total: Money,
}

// =============================================================================
// Catalog
// =============================================================================

/// Read-only snapshot of products and clients fetched when the composer
/// starts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalog {
    pub products: Vec<Product>,
    pub clients: Vec<Client>,
}

impl Catalog {
    pub fn new(products: Vec<Product>, clients: Vec<Client>) -> Self {
        Catalog { products, clients }
    }

    pub fn product(&self, id: ProductId) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }

    pub fn client(&self, id: ClientId) -> Option<&Client> {
        self.clients.iter().find(|c| c.id == id)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
