//! In-memory material store.
//!
//! Intended for tests/dev. The whole `record_transaction` body runs inside
//! one mutex guard, which gives the same serialized, all-or-nothing
//! semantics per store that a database transaction gives per row.
//! `fail_next_commit` lets tests inject a storage failure at the commit
//! point, after the movement has been staged but before anything is
//! visible.

use std::collections::BTreeMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use chrono::Utc;

use siteledger_core::{LedgerError, LedgerResult, MaterialId, TransactionId};
use siteledger_inventory::{
    Material, MaterialTransaction, NewMaterial, TransactionDraft, apply_movement,
};

use super::r#trait::MaterialStore;

#[derive(Debug, Default)]
struct Tables {
    materials: BTreeMap<i64, Material>,
    transactions: Vec<MaterialTransaction>,
    last_material_id: i64,
    last_transaction_id: i64,
}

#[derive(Debug, Default)]
pub struct InMemoryMaterialStore {
    tables: Mutex<Tables>,
    fail_next_commit: AtomicBool,
}

impl InMemoryMaterialStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fault injection: the next `record_transaction` fails at its commit
    /// point. Used to verify that a failed unit of work leaves neither a
    /// movement row nor a stock change behind.
    pub fn fail_next_commit(&self) {
        self.fail_next_commit.store(true, Ordering::SeqCst);
    }

    fn lock(&self) -> LedgerResult<std::sync::MutexGuard<'_, Tables>> {
        self.tables
            .lock()
            .map_err(|_| LedgerError::storage("material store lock poisoned"))
    }
}

#[async_trait]
impl MaterialStore for InMemoryMaterialStore {
    async fn create_material(&self, new: NewMaterial) -> LedgerResult<Material> {
        new.validate()?;

        let mut tables = self.lock()?;
        let id = tables.last_material_id + 1;
        let material = Material {
            id: MaterialId::from(id),
            name: new.name,
            category: new.category,
            unit: new.unit,
            stock: new.stock,
            griha_compliant: new.griha_compliant,
            min_level: new.min_level,
        };
        tables.last_material_id = id;
        tables.materials.insert(id, material.clone());
        Ok(material)
    }

    async fn get_material(&self, id: MaterialId) -> LedgerResult<Option<Material>> {
        Ok(self.lock()?.materials.get(&id.as_i64()).cloned())
    }

    async fn list_materials(&self) -> LedgerResult<Vec<Material>> {
        // BTreeMap iteration is already id-ordered.
        Ok(self.lock()?.materials.values().cloned().collect())
    }

    async fn record_transaction(&self, draft: TransactionDraft) -> LedgerResult<MaterialTransaction> {
        let mut tables = self.lock()?;

        let new_stock = {
            let material = tables
                .materials
                .get(&draft.material_id().as_i64())
                .ok_or_else(|| {
                    LedgerError::not_found(format!(
                        "material {} does not exist",
                        draft.material_id()
                    ))
                })?;
            apply_movement(material.stock, draft.kind(), draft.quantity())
        };

        let stored = MaterialTransaction {
            id: TransactionId::from(tables.last_transaction_id + 1),
            material_id: draft.material_id(),
            kind: draft.kind(),
            quantity: draft.quantity(),
            date: Utc::now(),
            reference: draft.reference().map(str::to_owned),
        };

        // Commit point: everything above is staged, nothing is visible yet.
        if self.fail_next_commit.swap(false, Ordering::SeqCst) {
            return Err(LedgerError::storage("injected commit failure"));
        }

        tables.last_transaction_id = stored.id.as_i64();
        tables.transactions.push(stored.clone());
        if let Some(material) = tables.materials.get_mut(&draft.material_id().as_i64()) {
            material.stock = new_stock;
        }

        Ok(stored)
    }

    async fn list_transactions(
        &self,
        material_id: MaterialId,
    ) -> LedgerResult<Vec<MaterialTransaction>> {
        let tables = self.lock()?;
        let mut transactions: Vec<MaterialTransaction> = tables
            .transactions
            .iter()
            .filter(|t| t.material_id == material_id)
            .cloned()
            .collect();
        transactions.sort_by(|a, b| b.id.cmp(&a.id));
        Ok(transactions)
    }
}
