//! Infrastructure layer: storage boundary, configuration and the
//! transactional services that drive the workshop model.

pub mod config;
pub mod invoicing;
pub mod repairs;
pub mod reports;
pub mod store;

#[cfg(test)]
mod integration_tests;

pub use config::{ConfigError, TaxRateSource, WorkshopConfig};
pub use invoicing::{CreateInvoice, InvoiceSummary, InvoicingError, InvoicingService, ReleaseFault};
pub use repairs::{RepairError, RepairService};
pub use store::{InMemoryWorkshopStore, Snapshot, StoreError, WorkshopStore};
