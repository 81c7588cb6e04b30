//! # Catalog Loading
//!
//! Fetches products and clients concurrently and drives the composer out
//! of `Loading`.
//!
//! ```text
//! begin_loading ──► try_join!(list_products, list_clients)
//!                        │                    │
//!                        └──── both Ok ───────┴──► finish_loading(Ok(catalog)) ──► Selecting
//!                        └──── either Err ───────► finish_loading(Err(e))     ──► LoadFailed
//! ```

use tracing::{info, warn};

use vendas_core::{Catalog, SaleComposer};

use crate::error::ClientResult;
use crate::service::CatalogService;

/// Fetches both lists; fails with the first error.
pub async fn fetch_catalog<S>(service: &S) -> ClientResult<Catalog>
where
    S: CatalogService + ?Sized,
{
    let (products, clients) = tokio::try_join!(service.list_products(), service.list_clients())?;
    info!(
        products = products.len(),
        clients = clients.len(),
        "Catalog loaded"
    );
    Ok(Catalog::new(products, clients))
}

/// Loads the catalog into the composer.
///
/// A remote failure is not returned as an error: it moves the composer to
/// `LoadFailed`, which the caller inspects. Only an invalid phase is an
/// error.
pub async fn load_catalog<S>(composer: &mut SaleComposer, service: &S) -> ClientResult<()>
where
    S: CatalogService + ?Sized,
{
    composer.begin_loading()?;

    let result = fetch_catalog(service).await;
    if let Err(e) = &result {
        warn!(error = %e, "Catalog load failed");
    }

    composer.finish_loading(result)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ClientError;
    use async_trait::async_trait;
    use vendas_core::{Client, Money, Phase, Product};

    struct FakeCatalog {
        fail_clients: bool,
    }

    #[async_trait]
    impl CatalogService for FakeCatalog {
        async fn list_products(&self) -> ClientResult<Vec<Product>> {
            Ok(vec![Product {
                id: 1,
                name: "A".to_string(),
                description: None,
                unit_price: Money::from_cents(1000),
                stock_quantity: 5,
            }])
        }

        async fn list_clients(&self) -> ClientResult<Vec<Client>> {
            if self.fail_clients {
                return Err(ClientError::Connection("connection refused".into()));
            }
            Ok(vec![Client {
                id: 7,
                name: "Maria".to_string(),
                email: None,
                phone: None,
            }])
        }
    }

    #[tokio::test]
    async fn test_load_success_enters_selecting() {
        let mut composer = SaleComposer::default();
        load_catalog(&mut composer, &FakeCatalog { fail_clients: false })
            .await
            .unwrap();

        assert_eq!(composer.phase(), &Phase::Selecting);
        assert_eq!(composer.catalog().products.len(), 1);
        assert_eq!(composer.catalog().clients.len(), 1);
    }

    #[tokio::test]
    async fn test_either_failure_fails_the_load() {
        let mut composer = SaleComposer::default();
        load_catalog(&mut composer, &FakeCatalog { fail_clients: true })
            .await
            .unwrap();

        assert!(matches!(composer.phase(), Phase::LoadFailed { .. }));
        assert!(composer.error().unwrap().contains("connection refused"));
        assert!(composer.catalog().products.is_empty());
    }

    #[tokio::test]
    async fn test_reload_after_failure() {
        let mut composer = SaleComposer::default();
        load_catalog(&mut composer, &FakeCatalog { fail_clients: true })
            .await
            .unwrap();
        load_catalog(&mut composer, &FakeCatalog { fail_clients: false })
            .await
            .unwrap();
        assert_eq!(composer.phase(), &Phase::Selecting);
    }

    #[tokio::test]
    async fn test_cannot_reload_mid_sale() {
        let mut composer = SaleComposer::default();
        let service = FakeCatalog { fail_clients: false };
        load_catalog(&mut composer, &service).await.unwrap();
        assert!(load_catalog(&mut composer, &service).await.is_err());
    }
}
