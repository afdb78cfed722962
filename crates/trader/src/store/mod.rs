//! Storage abstractions and implementations

pub mod memory;
pub mod traits;

pub use memory::InMemoryStore;
pub use traits::{StoreError, StoreResult, StoreTx, TradingStore};
