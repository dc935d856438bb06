//! Inventory domain module.
//!
//! This crate contains the business rules for materials and their stock
//! movement ledger, implemented purely as deterministic domain logic
//! (no IO, no HTTP, no storage).

pub mod material;
pub mod transaction;

pub use material::{DEFAULT_MIN_LEVEL, Material, NewMaterial};
pub use transaction::{MaterialTransaction, TransactionDraft, TransactionType, apply_movement};
