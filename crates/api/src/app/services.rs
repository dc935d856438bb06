use std::sync::Arc;

use siteledger_infra::{InMemoryMaterialStore, MaterialStore, PostgresMaterialStore};
use siteledger_inventory::NewMaterial;

/// Shared application services handed to every handler.
///
/// The store is constructed once at process start and passed in as an
/// explicit handle; handlers never reach for a global.
pub struct AppServices {
    store: Arc<dyn MaterialStore>,
}

impl AppServices {
    pub fn new(store: Arc<dyn MaterialStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &Arc<dyn MaterialStore> {
        &self.store
    }
}

/// Storage selection: `DATABASE_URL` set means Postgres, otherwise a
/// volatile in-memory store seeded with the demo site inventory.
pub async fn build_services() -> anyhow::Result<AppServices> {
    match std::env::var("DATABASE_URL") {
        Ok(url) => {
            let store = PostgresMaterialStore::connect(&url).await?;
            tracing::info!("material store: postgres");
            Ok(AppServices::new(Arc::new(store)))
        }
        Err(_) => {
            tracing::warn!("DATABASE_URL not set; using volatile in-memory material store");
            let store: Arc<dyn MaterialStore> = Arc::new(InMemoryMaterialStore::new());
            seed_materials(&store).await?;
            Ok(AppServices::new(store))
        }
    }
}

/// Demo inventory for a fresh in-memory store (the project's initial site
/// stock).
async fn seed_materials(store: &Arc<dyn MaterialStore>) -> anyhow::Result<()> {
    if !store.list_materials().await?.is_empty() {
        return Ok(());
    }

    store
        .create_material(NewMaterial {
            name: "Cement (GRIHA Compliant)".to_string(),
            category: "cement".to_string(),
            unit: "bags".to_string(),
            stock: 500,
            griha_compliant: true,
            min_level: 10,
        })
        .await?;
    store
        .create_material(NewMaterial {
            name: "Steel TMT Bars".to_string(),
            category: "steel".to_string(),
            unit: "MT".to_string(),
            stock: 20,
            griha_compliant: false,
            min_level: 10,
        })
        .await?;

    Ok(())
}
