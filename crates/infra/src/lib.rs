//! Infrastructure layer: persistence implementations of the material ledger.

pub mod store;


pub use store::{InMemoryMaterialStore, MaterialStore, PostgresMaterialStore};
