//! # Service Traits
//!
//! The seams between the workflows and the backend. [`crate::api::ApiClient`]
//! implements all of them over HTTP; tests substitute in-memory fakes.
//!
//! ```text
//! ┌──────────────────┐   ┌──────────────────┐   ┌──────────────────┐
//! │ CatalogService   │   │ SalesService     │   │ ProductStore     │
//! │ list_products    │   │ create_sale      │   │ get / create     │
//! │ list_clients     │   │ create_line_item │   │ update / delete  │
//! └────────┬─────────┘   │ list / get /     │   └──────────────────┘
//!          │             │ delete sales     │   ┌──────────────────┐
//!          ▼             └────────┬─────────┘   │ ClientDirectory  │
//!     load_catalog                ▼             │ get / create     │
//!                           submit / retry      └──────────────────┘
//! ```

use async_trait::async_trait;

use vendas_core::{
    Client, ClientId, ClientInput, NewLineItem, NewSale, Product, ProductId, ProductInput,
    ProductPatch, Sale, SaleId, SaleLineItem, SaleWithItems,
};

use crate::error::ClientResult;

/// Read-only product and client lists.
#[async_trait]
pub trait CatalogService: Send + Sync {
    async fn list_products(&self) -> ClientResult<Vec<Product>>;
    async fn list_clients(&self) -> ClientResult<Vec<Client>>;
}

/// Sale and line-item records.
#[async_trait]
pub trait SalesService: Send + Sync {
    async fn create_sale(&self, sale: &NewSale) -> ClientResult<Sale>;
    async fn create_line_item(&self, item: &NewLineItem) -> ClientResult<SaleLineItem>;

    async fn list_sales(&self) -> ClientResult<Vec<Sale>>;
    async fn get_sale(&self, id: SaleId) -> ClientResult<SaleWithItems>;
    async fn sale_line_items(&self, id: SaleId) -> ClientResult<Vec<SaleLineItem>>;

    /// Returns the deleted sale.
    async fn delete_sale(&self, id: SaleId) -> ClientResult<Sale>;
}

/// Product maintenance (the stock screen).
#[async_trait]
pub trait ProductStore: Send + Sync {
    async fn get_product(&self, id: ProductId) -> ClientResult<Product>;
    async fn create_product(&self, input: &ProductInput) -> ClientResult<Product>;
    async fn update_product(&self, id: ProductId, patch: &ProductPatch) -> ClientResult<Product>;

    /// Returns the deleted product.
    async fn delete_product(&self, id: ProductId) -> ClientResult<Product>;
}

#[async_trait]
pub trait ClientDirectory: Send + Sync {
    async fn get_client(&self, id: ClientId) -> ClientResult<Client>;
    async fn create_client(&self, input: &ClientInput) -> ClientResult<Client>;
}
