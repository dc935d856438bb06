//! Postgres-backed material store.
//!
//! The ledger's atomic unit of work is a database transaction: the material
//! row is locked with `SELECT ... FOR UPDATE`, the movement row is inserted
//! (Postgres assigns `id` and `date`), and the new stock level is written
//! back, all committed together. Concurrent movements against the same
//! material serialize on the row lock; movements against distinct materials
//! lock distinct rows and never contend.
//!
//! ## Error mapping
//!
//! Every sqlx failure maps to `LedgerError::Storage`; an unknown material
//! surfaces as `LedgerError::NotFound` before anything is inserted. In both
//! cases the open transaction is dropped, which rolls it back.
//!
//! ## Thread safety
//!
//! `PostgresMaterialStore` is `Send + Sync`; the sqlx pool handles
//! connection management across tasks.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Row};
use tracing::instrument;

use siteledger_core::{LedgerError, LedgerResult, MaterialId, TransactionId};
use siteledger_inventory::{
    Material, MaterialTransaction, NewMaterial, TransactionDraft, TransactionType, apply_movement,
};

use super::r#trait::MaterialStore;

/// Postgres implementation of the material ledger.
///
/// Schema lives in `migrations/` at the workspace root; the pool is
/// constructed at process start and closed at shutdown.
#[derive(Debug, Clone)]
pub struct PostgresMaterialStore {
    pool: PgPool,
}

impl PostgresMaterialStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Connect a fresh pool to `database_url`.
    pub async fn connect(database_url: &str) -> LedgerResult<Self> {
        let pool = PgPool::connect(database_url)
            .await
            .map_err(|e| map_sqlx_error("connect", e))?;
        Ok(Self::new(pool))
    }

    /// Close the underlying pool (process shutdown).
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

// SQLx row types

#[derive(Debug)]
struct MaterialRow {
    id: i64,
    name: String,
    category: String,
    unit: String,
    stock: i64,
    griha_compliant: bool,
    min_level: i64,
}

impl<'r> sqlx::FromRow<'r, sqlx::postgres::PgRow> for MaterialRow {
    fn from_row(row: &'r sqlx::postgres::PgRow) -> Result<Self, sqlx::Error> {
        Ok(MaterialRow {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
            category: row.try_get("category")?,
            unit: row.try_get("unit")?,
            stock: row.try_get("stock")?,
            griha_compliant: row.try_get("griha_compliant")?,
            min_level: row.try_get("min_level")?,
        })
    }
}

impl From<MaterialRow> for Material {
    fn from(row: MaterialRow) -> Self {
        Material {
            id: MaterialId::from(row.id),
            name: row.name,
            category: row.category,
            unit: row.unit,
            stock: row.stock,
            griha_compliant: row.griha_compliant,
            min_level: row.min_level,
        }
    }
}

#[derive(Debug)]
struct TransactionRow {
    id: i64,
    material_id: i64,
    kind: String,
    quantity: i64,
    date: DateTime<Utc>,
    reference: Option<String>,
}

impl<'r> sqlx::FromRow<'r, sqlx::postgres::PgRow> for TransactionRow {
    fn from_row(row: &'r sqlx::postgres::PgRow) -> Result<Self, sqlx::Error> {
        Ok(TransactionRow {
            id: row.try_get("id")?,
            material_id: row.try_get("material_id")?,
            kind: row.try_get("kind")?,
            quantity: row.try_get("quantity")?,
            date: row.try_get("date")?,
            reference: row.try_get("reference")?,
        })
    }
}

impl TryFrom<TransactionRow> for MaterialTransaction {
    type Error = LedgerError;

    fn try_from(row: TransactionRow) -> Result<Self, Self::Error> {
        // A CHECK constraint keeps `kind` to 'in'/'out'; anything else is
        // corrupt data, not user input.
        let kind = row.kind.parse::<TransactionType>().map_err(|_| {
            LedgerError::storage(format!(
                "material_transactions.{}: unknown kind '{}'",
                row.id, row.kind
            ))
        })?;

        Ok(MaterialTransaction {
            id: TransactionId::from(row.id),
            material_id: MaterialId::from(row.material_id),
            kind,
            quantity: row.quantity,
            date: row.date,
            reference: row.reference,
        })
    }
}

#[async_trait]
impl MaterialStore for PostgresMaterialStore {
    #[instrument(skip(self, new), err)]
    async fn create_material(&self, new: NewMaterial) -> LedgerResult<Material> {
        new.validate()?;

        let row: MaterialRow = sqlx::query_as(
            r#"
            INSERT INTO materials (name, category, unit, stock, griha_compliant, min_level)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, name, category, unit, stock, griha_compliant, min_level
            "#,
        )
        .bind(&new.name)
        .bind(&new.category)
        .bind(&new.unit)
        .bind(new.stock)
        .bind(new.griha_compliant)
        .bind(new.min_level)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("create_material", e))?;

        Ok(row.into())
    }

    #[instrument(skip(self), fields(material_id = %id), err)]
    async fn get_material(&self, id: MaterialId) -> LedgerResult<Option<Material>> {
        let row: Option<MaterialRow> = sqlx::query_as(
            r#"
            SELECT id, name, category, unit, stock, griha_compliant, min_level
            FROM materials
            WHERE id = $1
            "#,
        )
        .bind(id.as_i64())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("get_material", e))?;

        Ok(row.map(Material::from))
    }

    #[instrument(skip(self), err)]
    async fn list_materials(&self) -> LedgerResult<Vec<Material>> {
        let rows: Vec<MaterialRow> = sqlx::query_as(
            r#"
            SELECT id, name, category, unit, stock, griha_compliant, min_level
            FROM materials
            ORDER BY id ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("list_materials", e))?;

        Ok(rows.into_iter().map(Material::from).collect())
    }

    #[instrument(
        skip(self, draft),
        fields(material_id = %draft.material_id(), kind = %draft.kind(), quantity = draft.quantity()),
        err
    )]
    async fn record_transaction(&self, draft: TransactionDraft) -> LedgerResult<MaterialTransaction> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| map_sqlx_error("record_transaction", e))?;

        // Row lock: serializes concurrent movements against this material
        // until commit, without touching any other material's row.
        let stock: Option<i64> =
            sqlx::query_scalar("SELECT stock FROM materials WHERE id = $1 FOR UPDATE")
                .bind(draft.material_id().as_i64())
                .fetch_optional(&mut *tx)
                .await
                .map_err(|e| map_sqlx_error("record_transaction", e))?;

        let Some(stock) = stock else {
            // Dropping `tx` rolls back; no movement row is left behind.
            return Err(LedgerError::not_found(format!(
                "material {} does not exist",
                draft.material_id()
            )));
        };

        let row: TransactionRow = sqlx::query_as(
            r#"
            INSERT INTO material_transactions (material_id, kind, quantity, reference)
            VALUES ($1, $2, $3, $4)
            RETURNING id, material_id, kind, quantity, date, reference
            "#,
        )
        .bind(draft.material_id().as_i64())
        .bind(draft.kind().as_str())
        .bind(draft.quantity())
        .bind(draft.reference())
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| map_sqlx_error("record_transaction", e))?;

        let new_stock = apply_movement(stock, draft.kind(), draft.quantity());
        sqlx::query("UPDATE materials SET stock = $1 WHERE id = $2")
            .bind(new_stock)
            .bind(draft.material_id().as_i64())
            .execute(&mut *tx)
            .await
            .map_err(|e| map_sqlx_error("record_transaction", e))?;

        tx.commit()
            .await
            .map_err(|e| map_sqlx_error("record_transaction", e))?;

        row.try_into()
    }

    #[instrument(skip(self), fields(material_id = %material_id), err)]
    async fn list_transactions(
        &self,
        material_id: MaterialId,
    ) -> LedgerResult<Vec<MaterialTransaction>> {
        let rows: Vec<TransactionRow> = sqlx::query_as(
            r#"
            SELECT id, material_id, kind, quantity, date, reference
            FROM material_transactions
            WHERE material_id = $1
            ORDER BY id DESC
            "#,
        )
        .bind(material_id.as_i64())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("list_transactions", e))?;

        rows.into_iter().map(MaterialTransaction::try_from).collect()
    }
}

fn map_sqlx_error(op: &str, e: sqlx::Error) -> LedgerError {
    LedgerError::storage(format!("{op}: {e}"))
}
