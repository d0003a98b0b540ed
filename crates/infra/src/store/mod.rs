//! Storage boundary for the workshop entity graph.
//!
//! Every logical operation (a lifecycle transition, an invoice batch) runs
//! as one transaction: load a versioned snapshot, mutate it in memory, commit
//! it back with an optimistic version check. A failed step or a failed commit
//! leaves the stored graph exactly as it was.

pub mod in_memory;
pub mod r#trait;

pub use in_memory::InMemoryWorkshopStore;
pub use r#trait::{Snapshot, StoreError, WorkshopStore};
