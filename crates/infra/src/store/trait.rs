use async_trait::async_trait;
use std::sync::Arc;

use siteledger_core::{LedgerResult, MaterialId};
use siteledger_inventory::{Material, MaterialTransaction, NewMaterial, TransactionDraft};

/// Persistence boundary for materials and their movement ledger.
///
/// ## Stock invariant
///
/// `record_transaction` is the **sole legitimate way to mutate stock**.
/// After any committed call, a material's `stock` equals its initial stock
/// plus the net sum of all recorded movements. Implementations must make
/// the insert-movement/update-stock pair one atomic unit of work: either
/// both become visible or neither does.
///
/// ## Concurrency
///
/// Concurrent `record_transaction` calls against the *same* material must
/// be serialized (row lock, critical section, or an equivalent
/// compare-and-swap loop); calls against *distinct* materials must not
/// contend with each other. Implementations own all concurrency control --
/// callers never lock around the store.
///
/// ## Lifecycle
///
/// A store is constructed explicitly at process start and passed in as a
/// handle; there are no module-level singletons.
#[async_trait]
pub trait MaterialStore: Send + Sync {
    /// Inventory setup: persist a new material with a store-assigned id.
    async fn create_material(&self, new: NewMaterial) -> LedgerResult<Material>;

    /// Fetch one material, `None` if the id is unknown.
    async fn get_material(&self, id: MaterialId) -> LedgerResult<Option<Material>>;

    /// All materials, in id order.
    async fn list_materials(&self) -> LedgerResult<Vec<Material>>;

    /// The atomic ledger operation: insert the movement row and apply it to
    /// the material's stock, committing both or neither.
    ///
    /// Fails with `NotFound` when the draft references an unknown material
    /// (nothing is written) and `Storage` when the unit of work cannot
    /// commit (nothing is left behind).
    async fn record_transaction(&self, draft: TransactionDraft) -> LedgerResult<MaterialTransaction>;

    /// A material's movement log, newest first.
    async fn list_transactions(&self, material_id: MaterialId)
    -> LedgerResult<Vec<MaterialTransaction>>;
}

#[async_trait]
impl<S> MaterialStore for Arc<S>
where
    S: MaterialStore + ?Sized,
{
    async fn create_material(&self, new: NewMaterial) -> LedgerResult<Material> {
        (**self).create_material(new).await
    }

    async fn get_material(&self, id: MaterialId) -> LedgerResult<Option<Material>> {
        (**self).get_material(id).await
    }

    async fn list_materials(&self) -> LedgerResult<Vec<Material>> {
        (**self).list_materials().await
    }

    async fn record_transaction(&self, draft: TransactionDraft) -> LedgerResult<MaterialTransaction> {
        (**self).record_transaction(draft).await
    }

    async fn list_transactions(
        &self,
        material_id: MaterialId,
    ) -> LedgerResult<Vec<MaterialTransaction>> {
        (**self).list_transactions(material_id).await
    }
}
