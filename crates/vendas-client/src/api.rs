//! # HTTP API Client
//!
//! `reqwest` implementation of every service trait against the sales
//! backend.
//!
//! ## Request Flow
//! ```text
//! ApiClient::list_products()
//!      │
//!      ▼
//! GET {base_url}/produtos/ ──► 2xx ──► JSON ──► Vec<ProdutoDto> ──► Vec<Product>
//!                          │
//!                          └─► 4xx/5xx ──► {"detail": ...} ──► ClientError::Status
//! ```
//!
//! Inputs are validated locally before a request is sent; a rejected input
//! never reaches the network.

use async_trait::async_trait;
use reqwest::{Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};
use url::Url;

use vendas_core::validation::{
    validate_client_input, validate_product_input, validate_product_patch,
};
use vendas_core::{
    Client, ClientId, ClientInput, NewLineItem, NewSale, Product, ProductId, ProductInput,
    ProductPatch, Sale, SaleId, SaleLineItem, SaleWithItems,
};

use crate::config::ClientConfig;
use crate::dto::{
    error_detail, ClienteCreateDto, ClienteDto, ProdutoCreateDto, ProdutoDto, ProdutoUpdateDto,
    VendaComProdutosDto, VendaCreateDto, VendaDto, VendaProdutoDto,
};
use crate::error::{ClientError, ClientResult, ConfigError};
use crate::service::{CatalogService, ClientDirectory, ProductStore, SalesService};

// =============================================================================
// API Client
// =============================================================================

/// Sales backend client. Cheap to clone; clones share the connection pool.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base: Url,
    timeout_secs: u64,
}

impl ApiClient {
    /// Builds a client from validated configuration.
    pub fn new(config: &ClientConfig) -> ClientResult<Self> {
        config.validate()?;
        let base = config.base_url()?;

        let http = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| ConfigError::Invalid(format!("failed to build HTTP client: {e}")))?;

        Ok(ApiClient {
            http,
            base,
            timeout_secs: config.api.timeout_secs,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    // =========================================================================
    // Request Helpers
    // =========================================================================

    fn request(&self, method: Method, path: &str) -> ClientResult<RequestBuilder> {
        let url = self
            .base
            .join(path)
            .map_err(|e| ConfigError::InvalidUrl(format!("{path}: {e}")))?;
        debug!(%method, %url, "API request");
        Ok(self.http.request(method, url))
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> ClientResult<T> {
        let response = request.send().await.map_err(|e| self.transport(e))?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let detail = error_detail(&body).unwrap_or_else(|| {
                if body.trim().is_empty() {
                    status.canonical_reason().unwrap_or("request failed").to_string()
                } else {
                    body
                }
            });
            warn!(status = status.as_u16(), %detail, "API request failed");
            return Err(ClientError::Status {
                status: status.as_u16(),
                detail,
            });
        }

        let bytes = response.bytes().await.map_err(|e| self.transport(e))?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        self.send(self.request(Method::GET, path)?).await
    }

    async fn delete<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        self.send(self.request(Method::DELETE, path)?).await
    }

    async fn post<B, T>(&self, path: &str, body: &B) -> ClientResult<T>
    where
        B: Serialize + ?Sized + Sync,
        T: DeserializeOwned,
    {
        self.send(self.request(Method::POST, path)?.json(body)).await
    }

    async fn put<B, T>(&self, path: &str, body: &B) -> ClientResult<T>
    where
        B: Serialize + ?Sized + Sync,
        T: DeserializeOwned,
    {
        self.send(self.request(Method::PUT, path)?.json(body)).await
    }

    fn transport(&self, err: reqwest::Error) -> ClientError {
        if err.is_timeout() {
            ClientError::Timeout(self.timeout_secs)
        } else {
            err.into()
        }
    }
}

/// Sales history rows. A stored sale without `data_venda` is skipped so the
/// rest of the list (and the reports built on it) still load.
fn sales_from(dtos: Vec<VendaDto>) -> Vec<Sale> {
    dtos.into_iter()
        .filter_map(|dto| {
            let id = dto.id;
            match Sale::try_from(dto) {
                Ok(sale) => Some(sale),
                Err(e) => {
                    warn!(sale_id = id, error = %e, "Skipping sale without data_venda");
                    None
                }
            }
        })
        .collect()
}

// =============================================================================
// Service Implementations
// =============================================================================

#[async_trait]
impl CatalogService for ApiClient {
    async fn list_products(&self) -> ClientResult<Vec<Product>> {
        let dtos: Vec<ProdutoDto> = self.get("produtos/").await?;
        Ok(dtos.into_iter().map(Into::into).collect())
    }

    async fn list_clients(&self) -> ClientResult<Vec<Client>> {
        let dtos: Vec<ClienteDto> = self.get("clientes/").await?;
        Ok(dtos.into_iter().map(Into::into).collect())
    }
}

#[async_trait]
impl SalesService for ApiClient {
    async fn create_sale(&self, sale: &NewSale) -> ClientResult<Sale> {
        let dto: VendaDto = self.post("vendas/", &VendaCreateDto::from(sale)).await?;
        dto.try_into()
    }

    async fn create_line_item(&self, item: &NewLineItem) -> ClientResult<SaleLineItem> {
        let dto: VendaProdutoDto = self
            .post("venda_produto/", &VendaProdutoDto::from(item))
            .await?;
        Ok(dto.into())
    }

    async fn list_sales(&self) -> ClientResult<Vec<Sale>> {
        Ok(sales_from(self.get("vendas/").await?))
    }

    async fn get_sale(&self, id: SaleId) -> ClientResult<SaleWithItems> {
        let dto: VendaComProdutosDto = self.get(&format!("vendas/{id}")).await?;
        dto.try_into()
    }

    async fn sale_line_items(&self, id: SaleId) -> ClientResult<Vec<SaleLineItem>> {
        let dtos: Vec<VendaProdutoDto> = self.get(&format!("vendas/{id}/produtos/")).await?;
        Ok(dtos.into_iter().map(Into::into).collect())
    }

    async fn delete_sale(&self, id: SaleId) -> ClientResult<Sale> {
        let dto: VendaDto = self.delete(&format!("vendas/{id}")).await?;
        dto.try_into()
    }
}

#[async_trait]
impl ProductStore for ApiClient {
    async fn get_product(&self, id: ProductId) -> ClientResult<Product> {
        let dto: ProdutoDto = self.get(&format!("produtos/{id}")).await?;
        Ok(dto.into())
    }

    async fn create_product(&self, input: &ProductInput) -> ClientResult<Product> {
        validate_product_input(input)?;
        let dto: ProdutoDto = self
            .post("produtos/", &ProdutoCreateDto::from(input))
            .await?;
        Ok(dto.into())
    }

    async fn update_product(&self, id: ProductId, patch: &ProductPatch) -> ClientResult<Product> {
        validate_product_patch(patch)?;
        let dto: ProdutoDto = self
            .put(&format!("produtos/{id}"), &ProdutoUpdateDto::from(patch))
            .await?;
        Ok(dto.into())
    }

    async fn delete_product(&self, id: ProductId) -> ClientResult<Product> {
        let dto: ProdutoDto = self.delete(&format!("produtos/{id}")).await?;
        Ok(dto.into())
    }
}

#[async_trait]
impl ClientDirectory for ApiClient {
    async fn get_client(&self, id: ClientId) -> ClientResult<Client> {
        let dto: ClienteDto = self.get(&format!("clientes/{id}")).await?;
        Ok(dto.into())
    }

    async fn create_client(&self, input: &ClientInput) -> ClientResult<Client> {
        validate_client_input(input)?;
        let dto: ClienteDto = self
            .post("clientes/", &ClienteCreateDto::from(input))
            .await?;
        Ok(dto.into())
    }
}
