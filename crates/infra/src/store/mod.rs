//! Material store boundary.
//!
//! This module defines the persistence abstraction the ledger runs against,
//! without making storage assumptions: a Postgres implementation for
//! production and an in-memory implementation for tests/dev.

pub mod in_memory;
pub mod postgres;
pub mod r#trait;

pub use in_memory::InMemoryMaterialStore;
pub use postgres::PostgresMaterialStore;
pub use r#trait::MaterialStore;
