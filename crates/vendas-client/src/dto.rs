//! # Wire Format
//!
//! JSON shapes of the sales backend and their conversion to core types.
//!
//! ```text
//! ┌────────────────────────────┐          ┌────────────────────────────┐
//! │ Backend JSON (Portuguese)  │          │ vendas-core                │
//! │                            │          │                            │
//! │ nome                       │ ───────► │ name                       │
//! │ preco: 5.5                 │ ───────► │ unit_price: Money(550)     │
//! │ quantidade_em_estoque      │ ───────► │ stock_quantity             │
//! │ cliente_id / data_venda    │ ───────► │ client_id / date           │
//! │ venda_id / produto_id      │ ───────► │ sale_id / product_id       │
//! └────────────────────────────┘          └────────────────────────────┘
//! ```
//!
//! Money crosses the wire as a JSON number and is converted to centavos
//! here, nowhere else.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use vendas_core::money::{self, Money};
use vendas_core::{
    Client, ClientInput, NewLineItem, NewSale, Product, ProductInput, ProductPatch, Sale,
    SaleLineItem, SaleWithItems,
};

use crate::error::ClientError;

// =============================================================================
// Products
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProdutoDto {
    pub id: i64,
    pub nome: String,
    #[serde(default)]
    pub descricao: Option<String>,
    #[serde(with = "money::decimal")]
    pub preco: Money,
    #[serde(default)]
    pub quantidade_em_estoque: i64,
}

impl From<ProdutoDto> for Product {
    fn from(dto: ProdutoDto) -> Self {
        Product {
            id: dto.id,
            name: dto.nome,
            description: dto.descricao,
            unit_price: dto.preco,
            stock_quantity: dto.quantidade_em_estoque,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ProdutoCreateDto<'a> {
    pub nome: &'a str,
    pub descricao: Option<&'a str>,
    #[serde(with = "money::decimal")]
    pub preco: Money,
    pub quantidade_em_estoque: i64,
}

impl<'a> From<&'a ProductInput> for ProdutoCreateDto<'a> {
    fn from(input: &'a ProductInput) -> Self {
        ProdutoCreateDto {
            nome: input.name.trim(),
            descricao: input.description.as_deref(),
            preco: input.unit_price,
            quantidade_em_estoque: input.stock_quantity,
        }
    }
}

/// Partial update; absent fields are omitted so the backend keeps them.
#[derive(Debug, Clone, Serialize)]
pub struct ProdutoUpdateDto<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nome: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub descricao: Option<&'a str>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        with = "money::decimal::option"
    )]
    pub preco: Option<Money>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantidade_em_estoque: Option<i64>,
}

impl<'a> From<&'a ProductPatch> for ProdutoUpdateDto<'a> {
    fn from(patch: &'a ProductPatch) -> Self {
        ProdutoUpdateDto {
            nome: patch.name.as_deref().map(str::trim),
            descricao: patch.description.as_deref(),
            preco: patch.unit_price,
            quantidade_em_estoque: patch.stock_quantity,
        }
    }
}

// =============================================================================
// Clients
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClienteDto {
    pub id: i64,
    pub nome: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub telefone: Option<String>,
}

impl From<ClienteDto> for Client {
    fn from(dto: ClienteDto) -> Self {
        Client {
            id: dto.id,
            name: dto.nome,
            email: dto.email,
            phone: dto.telefone,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ClienteCreateDto<'a> {
    pub nome: &'a str,
    pub email: &'a str,
    pub telefone: Option<&'a str>,
}

impl<'a> From<&'a ClientInput> for ClienteCreateDto<'a> {
    fn from(input: &'a ClientInput) -> Self {
        ClienteCreateDto {
            nome: input.name.trim(),
            email: input.email.trim(),
            telefone: input.phone.as_deref(),
        }
    }
}

// =============================================================================
// Sales
// =============================================================================

/// The backend allows a null date and total on stored sales.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VendaDto {
    pub id: i64,
    #[serde(default)]
    pub cliente_id: Option<i64>,
    #[serde(default)]
    pub data_venda: Option<NaiveDate>,
    #[serde(default, with = "money::decimal::option")]
    pub total: Option<Money>,
}

impl TryFrom<VendaDto> for Sale {
    type Error = ClientError;

    fn try_from(dto: VendaDto) -> Result<Self, Self::Error> {
        let date = dto
            .data_venda
            .ok_or_else(|| ClientError::Decode(format!("sale {} has no data_venda", dto.id)))?;
        Ok(Sale {
            id: dto.id,
            client_id: dto.cliente_id,
            date,
            total: dto.total.unwrap_or_default(),
        })
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct VendaCreateDto {
    pub cliente_id: Option<i64>,
    pub data_venda: NaiveDate,
    #[serde(with = "money::decimal")]
    pub total: Money,
}

impl From<&NewSale> for VendaCreateDto {
    fn from(sale: &NewSale) -> Self {
        VendaCreateDto {
            cliente_id: sale.client_id,
            data_venda: sale.date,
            total: sale.total,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VendaProdutoDto {
    pub venda_id: i64,
    pub produto_id: i64,
    #[serde(default = "default_quantity")]
    pub quantidade: i64,
}

fn default_quantity() -> i64 {
    1
}

impl From<VendaProdutoDto> for SaleLineItem {
    fn from(dto: VendaProdutoDto) -> Self {
        SaleLineItem {
            sale_id: dto.venda_id,
            product_id: dto.produto_id,
            quantity: dto.quantidade,
        }
    }
}

impl From<&NewLineItem> for VendaProdutoDto {
    fn from(item: &NewLineItem) -> Self {
        VendaProdutoDto {
            venda_id: item.sale_id,
            produto_id: item.product_id,
            quantidade: item.quantity,
        }
    }
}

/// `GET /vendas/{id}`: the sale plus its line items.
#[derive(Debug, Clone, Deserialize)]
pub struct VendaComProdutosDto {
    #[serde(flatten)]
    pub venda: VendaDto,
    #[serde(default)]
    pub produtos: Vec<VendaProdutoDto>,
}

impl TryFrom<VendaComProdutosDto> for SaleWithItems {
    type Error = ClientError;

    fn try_from(dto: VendaComProdutosDto) -> Result<Self, Self::Error> {
        Ok(SaleWithItems {
            sale: dto.venda.try_into()?,
            items: dto.produtos.into_iter().map(Into::into).collect(),
        })
    }
}

// =============================================================================
// Errors
// =============================================================================

/// Error body of the backend: `{"detail": "..."}`, or a list of field
/// errors for rejected payloads.
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorBody {
    pub detail: serde_json::Value,
}

/// Best human-readable message from an error response body.
pub fn error_detail(body: &str) -> Option<String> {
    let parsed: ErrorBody = serde_json::from_str(body).ok()?;
    match parsed.detail {
        serde_json::Value::String(s) => Some(s),
        serde_json::Value::Array(items) => {
            let messages: Vec<String> = items
                .iter()
                .filter_map(|item| item.get("msg").and_then(|m| m.as_str()).map(String::from))
                .collect();
            if messages.is_empty() {
                Some(serde_json::Value::Array(items).to_string())
            } else {
                Some(messages.join("; "))
            }
        }
        serde_json::Value::Null => None,
        other => Some(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_product_from_wire() {
        let dto: ProdutoDto = serde_json::from_value(json!({
            "id": 1,
            "nome": "Café",
            "descricao": null,
            "preco": 10.99,
            "quantidade_em_estoque": 5
        }))
        .unwrap();
        let product: Product = dto.into();
        assert_eq!(product.name, "Café");
        assert_eq!(product.unit_price.cents(), 1099);
        assert_eq!(product.stock_quantity, 5);
    }

    #[test]
    fn test_patch_omits_absent_fields() {
        let patch = ProductPatch {
            unit_price: Some(Money::from_cents(550)),
            ..Default::default()
        };
        let body = serde_json::to_value(ProdutoUpdateDto::from(&patch)).unwrap();
        assert_eq!(body, json!({ "preco": 5.5 }));
    }

    #[test]
    fn test_new_sale_body() {
        let sale = NewSale {
            client_id: None,
            date: NaiveDate::from_ymd_opt(2024, 5, 2).unwrap(),
            total: Money::from_cents(2200),
        };
        let body = serde_json::to_value(VendaCreateDto::from(&sale)).unwrap();
        assert_eq!(
            body,
            json!({ "cliente_id": null, "data_venda": "2024-05-02", "total": 22.0 })
        );
    }

    #[test]
    fn test_sale_with_items_from_wire() {
        let dto: VendaComProdutosDto = serde_json::from_value(json!({
            "id": 10,
            "cliente_id": 7,
            "data_venda": "2024-05-02",
            "total": 22.0,
            "produtos": [{ "venda_id": 10, "produto_id": 2, "quantidade": 4 }]
        }))
        .unwrap();
        let sale: SaleWithItems = dto.try_into().unwrap();
        assert_eq!(sale.sale.client_id, Some(7));
        assert_eq!(sale.sale.total.cents(), 2200);
        assert_eq!(sale.items.len(), 1);
        assert_eq!(sale.items[0].quantity, 4);
    }

    #[test]
    fn test_sale_without_date_is_rejected() {
        let dto: VendaDto = serde_json::from_value(json!({ "id": 3, "total": null })).unwrap();
        assert!(Sale::try_from(dto).is_err());
    }

    #[test]
    fn test_error_detail() {
        assert_eq!(
            error_detail(r#"{"detail":"Venda não encontrada"}"#).as_deref(),
            Some("Venda não encontrada")
        );
        assert_eq!(
            error_detail(r#"{"detail":[{"loc":["body","preco"],"msg":"field required"}]}"#)
                .as_deref(),
            Some("field required")
        );
        assert_eq!(error_detail("Internal Server Error"), None);
    }
}
