//! Invoicing: turning finished faults into an invoice.
//!
//! `create_invoice` either issues the invoice and moves every selected fault
//! to `invoiced`, or changes nothing at all.

pub mod error;
pub mod service;
pub mod summary;

pub use error::InvoicingError;
pub use service::{CreateInvoice, InvoicingService, ReleaseFault};
pub use summary::InvoiceSummary;
